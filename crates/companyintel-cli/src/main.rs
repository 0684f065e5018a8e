//! companyintel - terminal dashboard for CompanyIntel letter builder jobs
//!
//! Submits research jobs, follows their progress, and edits the generated
//! letter drafts through the job API.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use companyintel::{init_logging, LogFormat, Settings};

mod commands;
mod render;

use commands::create::FormArgs;
use commands::drafts::EditDraftArgs;
use commands::jobs::JobsArgs;
use commands::Context;

#[derive(Parser, Debug)]
#[command(name = "companyintel")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (default: <config dir>/companyintel/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the job API, e.g. http://localhost:8000
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List jobs, newest first
    #[command(alias = "ls")]
    Jobs(JobsArgs),

    /// Show a job with its records and logs
    Show {
        job_id: String,

        /// Skip the company records
        #[arg(long)]
        no_records: bool,

        /// Print the raw job as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the expected result count, search quota, and cost of a form
    Estimate(FormArgs),

    /// Submit a new job
    Create {
        #[command(flatten)]
        form: FormArgs,

        /// Follow the job's progress after submitting
        #[arg(long)]
        watch: bool,
    },

    /// Re-process the failed records of a job
    Rerun { job_id: String },

    /// Replace a record's letter draft
    EditDraft(EditDraftArgs),

    /// Follow a job's progress until it finishes
    Watch { job_id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format).context("failed to initialise logging")?;

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let ctx = Context::new(settings)?;
    tracing::debug!(base_url = %ctx.client.base_url(), "Settings loaded");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    rt.block_on(run(cli.command, &ctx))
}

async fn run(command: Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Jobs(args) => commands::jobs::list(ctx, &args).await,
        Commands::Show {
            job_id,
            no_records,
            json,
        } => commands::jobs::show(ctx, &job_id, no_records, json).await,
        Commands::Estimate(form) => commands::create::estimate(ctx, &form),
        Commands::Create { form, watch } => commands::create::create(ctx, &form, watch).await,
        Commands::Rerun { job_id } => commands::jobs::rerun(ctx, &job_id).await,
        Commands::EditDraft(args) => commands::drafts::edit(ctx, &args).await,
        Commands::Watch { job_id } => commands::watch::watch(ctx, &job_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "companyintel",
            "show",
            "job-1",
            "--base-url",
            "http://intel.local:8000",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://intel.local:8000"));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Show { ref job_id, .. } if job_id == "job-1"));
    }

    #[test]
    fn test_edit_draft_text_and_file_conflict() {
        let result = Cli::try_parse_from([
            "companyintel",
            "edit-draft",
            "job-1",
            "rec-1",
            "--text",
            "Hello",
            "--file",
            "draft.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_jobs_status_filter_parses() {
        let cli = Cli::try_parse_from(["companyintel", "jobs", "--status", "failed"]).unwrap();
        match cli.command {
            Commands::Jobs(args) => {
                assert_eq!(args.status, Some(companyintel::JobStatus::Failed))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

//! Editing a record's letter draft.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Args;
use companyintel::RecordUpdate;

use super::create::read_text;
use super::Context;

#[derive(Args, Debug)]
pub struct EditDraftArgs {
    pub job_id: String,

    pub record_id: String,

    /// New letter text
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the letter text from a file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Also replace the record's hypothesis
    #[arg(long)]
    pub hypothesis: Option<String>,

    /// Also replace the record's decision maker
    #[arg(long)]
    pub decision_maker: Option<String>,
}

impl EditDraftArgs {
    fn letter_text(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => read_text(path),
            (None, None) => bail!("provide the draft with --text or --file"),
        }
    }
}

/// Loads the job, buffers the new text, and saves it through the dashboard.
pub async fn edit(ctx: &Context, args: &EditDraftArgs) -> Result<()> {
    let text = args.letter_text()?;

    let dashboard = ctx.dashboard();
    let result = async {
        dashboard
            .select_job(&args.job_id)
            .await
            .with_context(|| format!("failed to load job {}", args.job_id))?;

        dashboard.edit_draft(&args.record_id, text);
        let update = RecordUpdate {
            letter_draft: None,
            hypothesis: args.hypothesis.clone(),
            decision_maker: args.decision_maker.clone(),
        };
        dashboard
            .save_record(&args.record_id, update)
            .await
            .context("failed to save letter draft")
    }
    .await;
    dashboard.close();

    let record = result?;
    println!(
        "Saved letter draft for {} ({}), {} characters",
        record.company_name,
        record.id,
        record.letter_draft.as_deref().map_or(0, |t| t.chars().count())
    );
    Ok(())
}

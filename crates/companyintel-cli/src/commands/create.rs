//! Job form assembly, cost estimate, and job creation.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use companyintel::types::{LlmProvider, OutputMode};
use companyintel::JobForm;

use super::{watch, Context};
use crate::render;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputModeArg {
    Csv,
    GoogleSheets,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::Csv => OutputMode::Csv,
            OutputModeArg::GoogleSheets => OutputMode::GoogleSheets,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderArg {
    Openai,
    Anthropic,
    Mock,
}

impl From<ProviderArg> for LlmProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => LlmProvider::Openai,
            ProviderArg::Anthropic => LlmProvider::Anthropic,
            ProviderArg::Mock => LlmProvider::Mock,
        }
    }
}

/// Overrides applied on top of the configured form.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// YAML file with the form; defaults come from the settings file
    #[arg(long = "form", value_name = "FILE")]
    pub form_file: Option<PathBuf>,

    /// Job name
    #[arg(long)]
    pub name: Option<String>,

    /// Search query; repeat for several. Replaces the configured queries
    #[arg(long = "query", value_name = "QUERY")]
    pub queries: Vec<String>,

    /// Number of companies to collect
    #[arg(long)]
    pub limit: Option<u32>,

    #[arg(long)]
    pub locale: Option<String>,

    /// Company as `name,url`; repeat for several
    #[arg(long = "company", value_name = "NAME,URL")]
    pub companies: Vec<String>,

    /// File with one `name,url` company per line
    #[arg(long, value_name = "FILE")]
    pub companies_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub output_mode: Option<OutputModeArg>,

    #[arg(long)]
    pub spreadsheet_id: Option<String>,

    #[arg(long)]
    pub worksheet: Option<String>,

    /// Do not export a document per company
    #[arg(long)]
    pub no_docs: bool,

    #[arg(long)]
    pub docs_folder_id: Option<String>,

    #[arg(long)]
    pub csv_path: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub temperature: Option<f64>,

    /// Pages crawled per company site
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Crawl without honouring robots.txt
    #[arg(long)]
    pub ignore_robots: bool,

    /// Seconds between requests to one site
    #[arg(long)]
    pub rate_limit: Option<f64>,

    /// Per-request crawl timeout in seconds
    #[arg(long)]
    pub timeout: Option<u32>,
}

fn append_lines(target: &mut String, lines: &str) {
    if !target.is_empty() && !target.ends_with('\n') {
        target.push('\n');
    }
    target.push_str(lines);
}

impl FormArgs {
    /// Builds the form: file or configured defaults, then flag overrides,
    /// then validation.
    pub fn build(&self, ctx: &Context) -> Result<JobForm> {
        let mut form = match &self.form_file {
            Some(path) => JobForm::load(path)
                .with_context(|| format!("failed to load form {}", path.display()))?,
            None => ctx.settings.form.clone(),
        };
        if let Some(path) = &self.companies_file {
            let content = read_text(path)?;
            append_lines(&mut form.manual_companies, &content);
        }
        self.apply(&mut form);
        form.validate().context("invalid job form")?;
        Ok(form)
    }

    fn apply(&self, form: &mut JobForm) {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if !self.queries.is_empty() {
            form.search_queries = self.queries.join("\n");
        }
        if let Some(limit) = self.limit {
            form.limit = limit;
        }
        if let Some(locale) = &self.locale {
            form.locale = locale.clone();
        }
        if !self.companies.is_empty() {
            append_lines(&mut form.manual_companies, &self.companies.join("\n"));
        }
        if let Some(mode) = self.output_mode {
            form.output_mode = mode.into();
        }
        if let Some(id) = &self.spreadsheet_id {
            form.spreadsheet_id = id.clone();
        }
        if let Some(worksheet) = &self.worksheet {
            form.worksheet = worksheet.clone();
        }
        if self.no_docs {
            form.docs_output = false;
        }
        if let Some(id) = &self.docs_folder_id {
            form.docs_folder_id = id.clone();
        }
        if let Some(path) = &self.csv_path {
            form.csv_path = path.clone();
        }
        if let Some(provider) = self.provider {
            form.llm_provider = provider.into();
        }
        if let Some(model) = &self.model {
            form.llm_model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            form.temperature = temperature;
        }
        if let Some(pages) = self.max_pages {
            form.max_pages_per_site = pages;
        }
        if self.ignore_robots {
            form.obey_robots = false;
        }
        if let Some(rate) = self.rate_limit {
            form.rate_limit_sec = rate;
        }
        if let Some(timeout) = self.timeout {
            form.request_timeout_sec = timeout;
        }
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn estimate(ctx: &Context, args: &FormArgs) -> Result<()> {
    let form = args.build(ctx)?;
    println!("{}", render::estimate_box(&form.estimate(), form.obey_robots));
    Ok(())
}

pub async fn create(ctx: &Context, args: &FormArgs, follow: bool) -> Result<()> {
    let form = args.build(ctx)?;
    println!("{}", render::estimate_box(&form.estimate(), form.obey_robots));

    let dashboard = ctx.dashboard();
    let events = dashboard.subscribe();
    let job = dashboard
        .create_job(&form)
        .await
        .context("failed to create job")?;
    println!("Created job {} ({})", job.id, job.status);

    let result = if follow && dashboard.polling_job_id().is_some() {
        watch::follow(&dashboard, events).await
    } else {
        Ok(())
    };
    dashboard.close();
    result
}

//! Subcommand implementations.

pub mod create;
pub mod drafts;
pub mod jobs;
pub mod watch;

use anyhow::{Context as _, Result};
use companyintel::{ApiClient, Dashboard, DashboardOptions, Settings};

/// Resolved settings plus the HTTP client built from them.
pub struct Context {
    pub settings: Settings,
    pub client: ApiClient,
}

impl Context {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = ApiClient::new(&settings.base_url)
            .with_context(|| format!("invalid API base URL '{}'", settings.base_url))?;
        Ok(Self { settings, client })
    }

    pub fn dashboard(&self) -> Dashboard<ApiClient> {
        Dashboard::new(
            self.client.clone(),
            DashboardOptions::from(&self.settings),
        )
    }
}

//! Layered client settings: defaults, then a YAML file, then environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::form::JobForm;
use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Overrides `base_url`.
pub const BASE_URL_ENV: &str = "COMPANYINTEL_API_BASE_URL";

/// Overrides `poll_interval_secs`.
pub const POLL_INTERVAL_ENV: &str = "COMPANYINTEL_POLL_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Page size of the dashboard's job list.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Defaults for new jobs.
    #[serde(default)]
    pub form: JobForm,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_list_limit() -> u32 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval_secs(),
            list_limit: default_list_limit(),
            form: JobForm::default(),
        }
    }
}

/// `<config dir>/companyintel/config.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("companyintel").join("config.yaml"))
}

impl Settings {
    /// Loads settings.
    ///
    /// An explicit `path` must exist. Without one, the default config path is
    /// used when present and silently skipped otherwise. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    log::debug!("Loading settings from {:?}", path);
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment overrides. Empty variables are ignored.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(base_url) = env_value(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(raw) = env_value(POLL_INTERVAL_ENV) {
            self.poll_interval_secs = raw.parse().map_err(|_| ConfigError::InvalidEnv {
                name: POLL_INTERVAL_ENV,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "base_url",
                message: "must not be empty".to_string(),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.list_limit == 0 {
            return Err(ConfigError::Validation {
                field: "list_limit",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

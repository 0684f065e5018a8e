use std::path::PathBuf;
use thiserror::Error;

use crate::dashboard::DashboardAction;

#[derive(Error, Debug)]
pub enum CompanyIntelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

/// Failures talking to the job API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a non-2xx status. The body is kept verbatim.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Environment variable '{name}' has invalid value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Failures of a dashboard action, as shown in the error slot.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("{action}: {source}")]
    Api {
        action: DashboardAction,
        #[source]
        source: ApiError,
    },

    #[error("{action}: another request is already in flight")]
    Busy { action: DashboardAction },

    #[error("{action}: no job is selected")]
    NoSelection { action: DashboardAction },

    #[error("{action}: record {record_id} is not part of the selected job")]
    UnknownRecord {
        action: DashboardAction,
        record_id: String,
    },
}

impl DashboardError {
    pub fn action(&self) -> DashboardAction {
        match self {
            DashboardError::Api { action, .. }
            | DashboardError::Busy { action }
            | DashboardError::NoSelection { action }
            | DashboardError::UnknownRecord { action, .. } => *action,
        }
    }

    /// Text for the error slot. API failures show their own message; the
    /// action label is kept for local rejections.
    pub fn slot_message(&self) -> String {
        match self {
            DashboardError::Api { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// The underlying API error, when the action reached the network.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            DashboardError::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompanyIntelError>;

//! Client for the CompanyIntel letter builder job API.
//!
//! The backend researches companies and drafts letters; this crate submits
//! jobs to it, follows their progress, and edits the generated drafts.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod estimate;
pub mod logging;
pub mod parse;
pub mod types;

pub use api::{ApiClient, CompanyIntelApi};
pub use config::{JobForm, Settings};
pub use dashboard::{
    Dashboard, DashboardAction, DashboardEvent, DashboardOptions, DashboardState, DraftBuffer,
    PollStopReason,
};
pub use error::{ApiError, CompanyIntelError, ConfigError, DashboardError, Result};
pub use estimate::CostEstimate;
pub use logging::{init_logging, LogFormat};
pub use parse::{parse_manual_companies, parse_search_queries};
pub use types::{Job, JobListQuery, JobListResponse, JobStatus, Record, RecordStatus, RecordUpdate};

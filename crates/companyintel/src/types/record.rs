//! Per-company record inside a job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Success,
    Failed,
    Skipped,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Pending => write!(f, "pending"),
            RecordStatus::Success => write!(f, "success"),
            RecordStatus::Failed => write!(f, "failed"),
            RecordStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// One company's research result and editable letter draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub job_id: String,
    pub company_name: String,
    pub company_url: String,
    #[serde(default)]
    pub summary_business: Option<String>,
    #[serde(default)]
    pub summary_ir: Option<String>,
    #[serde(default)]
    pub summary_other: Option<String>,
    #[serde(default)]
    pub decision_maker: Option<String>,
    #[serde(default)]
    pub hypothesis: Option<String>,
    #[serde(default)]
    pub letter_draft: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub doc_url: Option<String>,
    pub status: RecordStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

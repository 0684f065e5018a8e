//! Request payloads and query parameters sent to the job API.

use serde::{Deserialize, Serialize};

use super::job::{CrawlingConfig, JobStatus, LlmConfig, OutputMode, SearchConfig};

/// Output target as submitted on job creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRequest {
    pub mode: OutputMode,
    /// Sent only in `google_sheets` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    pub worksheet: String,
    pub docs_output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_folder_id: Option<String>,
    pub csv_path: String,
}

/// Body of `POST /api/companyintel-letter-builder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub name: String,
    pub search: SearchConfig,
    pub output: OutputRequest,
    pub llm: LlmConfig,
    pub crawling: CrawlingConfig,
    pub run_async: bool,
}

/// Body of the rerun `PATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerunRequest {
    pub rerun_failed_only: bool,
}

impl RerunRequest {
    pub fn failed_only() -> Self {
        Self {
            rerun_failed_only: true,
        }
    }
}

/// Partial update of a record's editable fields. Unset fields are omitted
/// from the body so the backend leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_maker: Option<String>,
}

impl RecordUpdate {
    pub fn letter_draft(text: impl Into<String>) -> Self {
        Self {
            letter_draft: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.letter_draft.is_none() && self.hypothesis.is_none() && self.decision_maker.is_none()
    }
}

/// Filters and paging for the job list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    pub has_failures: Option<bool>,
    pub include_records: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl JobListQuery {
    /// The page the dashboard keeps in its job list.
    pub fn dashboard_page(limit: u32) -> Self {
        Self {
            include_records: Some(false),
            limit: Some(limit),
            offset: Some(0),
            ..Self::default()
        }
    }

    /// Query pairs in wire order. Unset filters are left out entirely.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(has_failures) = self.has_failures {
            pairs.push(("has_failures", bool_str(has_failures).to_string()));
        }
        if let Some(include_records) = self.include_records {
            pairs.push(("include_records", bool_str(include_records).to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

pub(crate) fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

//! Job resource and its embedded configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::count;
use super::record::Record;
use super::timestamp;

/// Lifecycle status of a job, driven entirely by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Partial,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Whether the backend is still working on the job.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    /// No further automatic processing happens from a terminal status.
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Partial => "partial",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "partial" => Ok(JobStatus::Partial),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

/// A company entered by hand instead of found through search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCompany {
    pub company_name: String,
    pub company_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub search_queries: Vec<String>,
    #[serde(deserialize_with = "count::deserialize")]
    pub limit: u32,
    pub locale: String,
    #[serde(default)]
    pub manual_companies: Vec<ManualCompany>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    GoogleSheets,
    Csv,
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::GoogleSheets => write!(f, "google_sheets"),
            OutputMode::Csv => write!(f, "csv"),
        }
    }
}

/// Output target as echoed back by the backend. Every field but `mode` may
/// be missing on older jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub mode: OutputMode,
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub worksheet: Option<String>,
    #[serde(default)]
    pub docs_output: Option<bool>,
    #[serde(default)]
    pub docs_folder_id: Option<String>,
    #[serde(default)]
    pub csv_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Openai,
    Anthropic,
    Mock,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Openai => write!(f, "openai"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub temperature: f64,
}

/// Crawl limits handed to the backend. The client never applies them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlingConfig {
    #[serde(deserialize_with = "count::deserialize")]
    pub max_pages_per_site: u32,
    pub obey_robots: bool,
    pub rate_limit_sec: f64,
    #[serde(deserialize_with = "count::deserialize")]
    pub request_timeout_sec: u32,
}

/// One batch request to research companies and draft letters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    pub search_config: SearchConfig,
    pub output_config: OutputConfig,
    pub llm_config: LlmConfig,
    pub crawling_config: CrawlingConfig,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub total_companies: u32,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub processed_companies: u32,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub succeeded_companies: u32,
    #[serde(default, deserialize_with = "count::deserialize")]
    pub failed_companies: u32,
    #[serde(default)]
    pub estimated_cost_usd: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, with = "timestamp::option")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// Empty unless the job was fetched with records included.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Job {
    /// Completion percentage, safe for jobs that have no companies yet.
    pub fn progress_percent(&self) -> u32 {
        crate::estimate::progress_percent(self.processed_companies, self.total_companies)
    }

    pub fn record(&self, record_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == record_id)
    }
}

/// A page of jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<Job>,
    pub total: u64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal valid job JSON as the backend returns it.
    pub fn job_json(id: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": "CompanyIntel Batch",
            "status": status,
            "search_config": {
                "search_queries": ["渋谷 IT 受託開発"],
                "limit": 20,
                "locale": "ja-JP",
                "manual_companies": []
            },
            "output_config": {
                "mode": "csv",
                "spreadsheet_id": null,
                "worksheet": "companies",
                "docs_output": true,
                "docs_folder_id": null,
                "csv_path": "./output/companyintel_output.csv"
            },
            "llm_config": { "provider": "mock", "model": "gpt-4o-mini", "temperature": 0.2 },
            "crawling_config": {
                "max_pages_per_site": 5,
                "obey_robots": true,
                "rate_limit_sec": 2.0,
                "request_timeout_sec": 15
            },
            "total_companies": 10,
            "processed_companies": 5,
            "succeeded_companies": 4,
            "failed_companies": 1,
            "estimated_cost_usd": null,
            "error_message": null,
            "logs": ["queued", "started"],
            "started_at": "2024-05-01T09:00:00Z",
            "completed_at": null,
            "created_at": "2024-05-01T08:59:00",
            "updated_at": "2024-05-01T09:01:00+00:00",
            "records": []
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::job_json;
    use super::*;

    #[test]
    fn test_job_decodes_backend_shape() {
        let job: Job = serde_json::from_value(job_json("job-1", "running")).unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.output_config.mode, OutputMode::Csv);
        assert_eq!(job.output_config.spreadsheet_id, None);
        assert_eq!(job.llm_config.provider, LlmProvider::Mock);
        assert_eq!(job.logs, vec!["queued", "started"]);
        assert!(job.completed_at.is_none());
        assert_eq!(job.progress_percent(), 50);
    }

    #[test]
    fn test_job_without_records_field() {
        let mut value = job_json("job-2", "completed");
        value.as_object_mut().unwrap().remove("records");
        let job: Job = serde_json::from_value(value).unwrap();
        assert!(job.records.is_empty());
    }

    #[test]
    fn test_job_accepts_float_counts() {
        let mut value = job_json("job-3", "running");
        value["search_config"]["limit"] = serde_json::json!(20.0);
        value["crawling_config"]["max_pages_per_site"] = serde_json::json!(5.0);
        value["crawling_config"]["request_timeout_sec"] = serde_json::json!(15.0);
        value["total_companies"] = serde_json::json!(10.0);
        value["processed_companies"] = serde_json::json!(5.0);

        let job: Job = serde_json::from_value(value).unwrap();
        assert_eq!(job.search_config.limit, 20);
        assert_eq!(job.crawling_config.max_pages_per_site, 5);
        assert_eq!(job.crawling_config.request_timeout_sec, 15);
        assert_eq!(job.progress_percent(), 50);
    }

    #[test]
    fn test_status_classification() {
        assert!(JobStatus::Pending.is_active());
        assert!(JobStatus::Running.is_active());
        for status in [
            JobStatus::Completed,
            JobStatus::Partial,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ] {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
    }

    #[test]
    fn test_status_from_str_round_trips_display() {
        let status: JobStatus = "partial".parse().unwrap();
        assert_eq!(status.to_string(), "partial");
        assert!("unknown".parse::<JobStatus>().is_err());
    }
}

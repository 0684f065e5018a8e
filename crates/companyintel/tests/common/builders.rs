//! Builders for backend resources.

use companyintel::types::{Job, JobStatus, Record};
use serde_json::{json, Value};

/// Job JSON with sensible defaults and no records.
pub fn job_json(id: &str, status: JobStatus) -> Value {
    json!({
        "id": id,
        "name": format!("Batch {}", id),
        "status": status.as_str(),
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
        "total_companies": 2,
        "processed_companies": 1,
        "succeeded_companies": 1,
        "failed_companies": 0,
        "estimated_cost_usd": null,
        "error_message": null,
        "logs": ["job queued"],
        "started_at": null,
        "completed_at": null,
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z",
        "records": []
    })
}

pub fn record_json(id: &str, job_id: &str, letter_draft: Option<&str>) -> Value {
    json!({
        "id": id,
        "job_id": job_id,
        "company_name": format!("Company {}", id),
        "company_url": format!("https://{}.example", id),
        "summary_business": "Contract development",
        "summary_ir": null,
        "summary_other": null,
        "decision_maker": null,
        "hypothesis": "Wants to modernise",
        "letter_draft": letter_draft,
        "sources": [],
        "doc_url": null,
        "status": "success",
        "error_message": null,
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z"
    })
}

pub fn job(id: &str, status: JobStatus) -> Job {
    serde_json::from_value(job_json(id, status)).expect("valid job json")
}

pub fn record(id: &str, job_id: &str, letter_draft: Option<&str>) -> Record {
    serde_json::from_value(record_json(id, job_id, letter_draft)).expect("valid record json")
}

/// A job with the given records, each `(record_id, letter_draft)`.
pub fn job_with_records(id: &str, status: JobStatus, drafts: &[(&str, Option<&str>)]) -> Job {
    let mut job = job(id, status);
    job.records = drafts
        .iter()
        .map(|(record_id, draft)| record(record_id, id, *draft))
        .collect();
    job
}

//! Plain-text rendering of jobs, records, and estimates.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use companyintel::{CostEstimate, DraftBuffer, Job, Record};

const BAR_WIDTH: usize = 30;

/// `[#########.....]` for a percentage in 0..=100.
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// One line of the job list.
pub fn job_line(job: &Job) -> String {
    format!(
        "{:<36}  {:<9}  {:>4}/{:<4}  {}  {}",
        job.id,
        job.status,
        job.processed_companies,
        job.total_companies,
        timestamp(&job.created_at),
        job.name
    )
}

pub fn job_list(jobs: &[Job], total: u64) -> String {
    if jobs.is_empty() {
        return "No jobs yet.".to_string();
    }
    let mut out = String::new();
    for job in jobs {
        let _ = writeln!(out, "{}", job_line(job));
    }
    let _ = write!(out, "{} of {} job(s)", jobs.len(), total);
    out
}

/// `running 3/10 (30%)`
pub fn progress_line(job: &Job) -> String {
    format!(
        "{} {}/{} ({}%)",
        job.status,
        job.processed_companies,
        job.total_companies,
        job.progress_percent()
    )
}

fn record_block(out: &mut String, record: &Record, draft: &str) {
    let _ = writeln!(out, "--- {} [{}]", record.company_name, record.status);
    let _ = writeln!(out, "    id:   {}", record.id);
    let _ = writeln!(out, "    URL:  {}", record.company_url);
    if let Some(doc_url) = &record.doc_url {
        let _ = writeln!(out, "    Docs: {}", doc_url);
    }
    if let Some(summary) = record.summary_business.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "    Business: {}", summary);
    }
    if let Some(hypothesis) = record.hypothesis.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "    Hypothesis: {}", hypothesis);
    }
    if let Some(error) = &record.error_message {
        let _ = writeln!(out, "    Error: {}", error);
    }
    if draft.is_empty() {
        let _ = writeln!(out, "    Draft: (empty)");
    } else {
        let _ = writeln!(out, "    Draft:");
        for line in draft.lines() {
            let _ = writeln!(out, "      {}", line);
        }
    }
}

/// Header, progress, records, and logs of a job. Record drafts come from
/// `drafts` when given, else from the server copy.
pub fn job_detail(job: &Job, drafts: Option<&DraftBuffer>) -> String {
    let percent = job.progress_percent();
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", job.name, job.id);
    let _ = writeln!(out, "status:   {}", job.status);
    let _ = writeln!(
        out,
        "progress: {}/{} ({}%) {}",
        job.processed_companies,
        job.total_companies,
        percent,
        progress_bar(percent, BAR_WIDTH)
    );
    let _ = writeln!(
        out,
        "results:  {} succeeded, {} failed",
        job.succeeded_companies, job.failed_companies
    );
    if let Some(cost) = job.estimated_cost_usd {
        let _ = writeln!(out, "cost:     ${:.3}", cost);
    }
    let _ = writeln!(out, "created:  {}", timestamp(&job.created_at));
    if let Some(completed) = &job.completed_at {
        let _ = writeln!(out, "finished: {}", timestamp(completed));
    }
    if let Some(error) = &job.error_message {
        let _ = writeln!(out, "error:    {}", error);
    }

    let _ = writeln!(out);
    if job.records.is_empty() {
        let _ = writeln!(out, "No records yet.");
    }
    for record in &job.records {
        let draft = match drafts {
            Some(drafts) => drafts.text_for_save(record),
            None => record.letter_draft.clone().unwrap_or_default(),
        };
        record_block(&mut out, record, &draft);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Logs:");
    for line in &job.logs {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

/// The pre-flight summary shown before submitting a job.
pub fn estimate_box(estimate: &CostEstimate, obey_robots: bool) -> String {
    format!(
        "Expected companies:      {}\n\
         Search quota (requests): {}\n\
         Estimated cost:          ${} (approximate)\n\
         Check the output target and count before running; keeping obey_robots={} is recommended.",
        estimate.result_count,
        estimate.search_quota,
        estimate.cost_display(),
        obey_robots
    )
}

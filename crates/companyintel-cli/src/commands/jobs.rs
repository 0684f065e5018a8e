//! Read-only job commands and rerun.

use anyhow::{Context as _, Result};
use clap::Args;
use companyintel::{CompanyIntelApi, JobListQuery, JobStatus};

use super::Context;
use crate::render;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Only jobs with this status
    #[arg(long)]
    pub status: Option<JobStatus>,

    /// Only jobs with at least one failed record
    #[arg(long)]
    pub has_failures: bool,

    /// Embed records in each job (only visible with --json)
    #[arg(long)]
    pub include_records: bool,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Page offset
    #[arg(long)]
    pub offset: Option<u32>,

    /// Print the raw response as JSON
    #[arg(long)]
    pub json: bool,
}

impl JobsArgs {
    fn query(&self, default_limit: u32) -> JobListQuery {
        JobListQuery {
            status: self.status,
            has_failures: self.has_failures.then_some(true),
            include_records: Some(self.include_records),
            limit: Some(self.limit.unwrap_or(default_limit)),
            offset: self.offset,
        }
    }
}

pub async fn list(ctx: &Context, args: &JobsArgs) -> Result<()> {
    let query = args.query(ctx.settings.list_limit);
    let page = ctx
        .client
        .list_jobs(&query)
        .await
        .context("failed to fetch job list")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        println!("{}", render::job_list(&page.items, page.total));
    }
    Ok(())
}

pub async fn show(ctx: &Context, job_id: &str, no_records: bool, json: bool) -> Result<()> {
    let job = ctx
        .client
        .get_job(job_id, !no_records)
        .await
        .with_context(|| format!("failed to load job {}", job_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        print!("{}", render::job_detail(&job, None));
    }
    Ok(())
}

pub async fn rerun(ctx: &Context, job_id: &str) -> Result<()> {
    let job = ctx
        .client
        .rerun_failed(job_id)
        .await
        .with_context(|| format!("failed to rerun failed records of job {}", job_id))?;

    println!("Rerun requested for job {}: {}", job.id, render::progress_line(&job));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> JobsArgs {
        JobsArgs {
            status: None,
            has_failures: false,
            include_records: false,
            limit: None,
            offset: None,
            json: false,
        }
    }

    #[test]
    fn test_default_query_matches_dashboard_page_shape() {
        let query = args().query(30);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("include_records", "false".to_string()),
                ("limit", "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_filters_are_forwarded() {
        let query = JobsArgs {
            status: Some(JobStatus::Partial),
            has_failures: true,
            offset: Some(30),
            ..args()
        }
        .query(10);
        assert_eq!(query.status, Some(JobStatus::Partial));
        assert_eq!(query.has_failures, Some(true));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(30));
    }
}

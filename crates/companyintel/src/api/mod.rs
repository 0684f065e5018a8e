//! Access to the job API.
//!
//! [`CompanyIntelApi`] is the seam the dashboard talks through; [`ApiClient`]
//! is the HTTP implementation.

mod client;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{CreateJobRequest, Job, JobListQuery, JobListResponse, Record, RecordUpdate};

pub use client::{ApiClient, API_PATH};

/// The five operations the backend exposes.
#[async_trait]
pub trait CompanyIntelApi: Send + Sync {
    /// `GET /api/companyintel-letter-builder`
    async fn list_jobs(&self, query: &JobListQuery) -> Result<JobListResponse, ApiError>;

    /// `POST /api/companyintel-letter-builder`
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job, ApiError>;

    /// `GET /api/companyintel-letter-builder/{job_id}`
    async fn get_job(&self, job_id: &str, include_records: bool) -> Result<Job, ApiError>;

    /// `PATCH /api/companyintel-letter-builder/{job_id}` with `rerun_failed_only`.
    async fn rerun_failed(&self, job_id: &str) -> Result<Job, ApiError>;

    /// `PATCH /api/companyintel-letter-builder/{job_id}/records/{record_id}`
    async fn update_record(
        &self,
        job_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<Record, ApiError>;
}

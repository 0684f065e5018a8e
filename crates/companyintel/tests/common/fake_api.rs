//! In-memory job API for dashboard tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use companyintel::api::CompanyIntelApi;
use companyintel::types::{
    CreateJobRequest, Job, JobListQuery, JobListResponse, JobStatus, Record, RecordUpdate,
};
use companyintel::ApiError;

use super::builders::job;

#[derive(Default)]
struct FakeState {
    jobs: Vec<Job>,
    calls: Vec<String>,
    failures: HashMap<&'static str, (u16, String)>,
    delays: HashMap<&'static str, Duration>,
    updates: Vec<(String, String, RecordUpdate)>,
    created: Vec<CreateJobRequest>,
    next_id: u32,
}

/// Backend double. Operations are named `list_jobs`, `create_job`,
/// `get_job`, `rerun_failed` and `update_record` for failures and delays.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: Vec<Job>) -> Self {
        let api = Self::new();
        api.state.lock().unwrap().jobs = jobs;
        api
    }

    pub fn insert_job(&self, job: Job) {
        let mut state = self.state.lock().unwrap();
        state.jobs.retain(|j| j.id != job.id);
        state.jobs.push(job);
    }

    pub fn set_status(&self, job_id: &str, status: JobStatus) {
        self.modify_job(job_id, |job| job.status = status);
    }

    /// Changes the server-side draft, as another editor would.
    pub fn set_server_draft(&self, job_id: &str, record_id: &str, text: &str) {
        self.modify_job(job_id, |job| {
            if let Some(record) = job.records.iter_mut().find(|r| r.id == record_id) {
                record.letter_draft = Some(text.to_string());
            }
        });
    }

    pub fn modify_job(&self, job_id: &str, f: impl FnOnce(&mut Job)) {
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .expect("job exists in fake");
        f(job);
    }

    /// Makes every call to `op` fail with the given status until cleared.
    pub fn fail(&self, op: &'static str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, (status, body.to_string()));
    }

    pub fn clear_failure(&self, op: &'static str) {
        self.state.lock().unwrap().failures.remove(op);
    }

    /// Delays every call to `op` by `delay` before answering.
    pub fn delay(&self, op: &'static str, delay: Duration) {
        self.state.lock().unwrap().delays.insert(op, delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls whose name starts with `prefix`, e.g. `get_job:job-1`.
    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn updates(&self) -> Vec<(String, String, RecordUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn created_requests(&self) -> Vec<CreateJobRequest> {
        self.state.lock().unwrap().created.clone()
    }

    async fn enter(&self, op: &'static str, call: String) -> Result<(), ApiError> {
        let (delay, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (state.delays.get(op).copied(), state.failures.get(op).cloned())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some((status, body)) => Err(ApiError::Status { status, body }),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: 404,
            body: "not found".to_string(),
        }
    }
}

#[async_trait]
impl CompanyIntelApi for FakeApi {
    async fn list_jobs(&self, query: &JobListQuery) -> Result<JobListResponse, ApiError> {
        self.enter("list_jobs", "list_jobs".to_string()).await?;
        let state = self.state.lock().unwrap();
        let limit = query.limit.unwrap_or(u32::MAX) as usize;
        let items: Vec<Job> = state
            .jobs
            .iter()
            .take(limit)
            .cloned()
            .map(|mut job| {
                if query.include_records != Some(true) {
                    job.records.clear();
                }
                job
            })
            .collect();
        Ok(JobListResponse {
            items,
            total: state.jobs.len() as u64,
        })
    }

    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job, ApiError> {
        self.enter("create_job", "create_job".to_string()).await?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut created = job(&format!("new-{}", state.next_id), JobStatus::Pending);
        created.name = request.name.clone();
        created.total_companies = 0;
        created.processed_companies = 0;
        state.created.push(request.clone());
        state.jobs.push(created.clone());
        Ok(created)
    }

    async fn get_job(&self, job_id: &str, include_records: bool) -> Result<Job, ApiError> {
        self.enter("get_job", format!("get_job:{}", job_id)).await?;
        let state = self.state.lock().unwrap();
        let mut job = state
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or_else(Self::not_found)?;
        if !include_records {
            job.records.clear();
        }
        Ok(job)
    }

    async fn rerun_failed(&self, job_id: &str) -> Result<Job, ApiError> {
        self.enter("rerun_failed", format!("rerun_failed:{}", job_id))
            .await?;
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(Self::not_found)?;
        job.status = JobStatus::Running;
        Ok(job.clone())
    }

    async fn update_record(
        &self,
        job_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<Record, ApiError> {
        self.enter(
            "update_record",
            format!("update_record:{}:{}", job_id, record_id),
        )
        .await?;
        let mut state = self.state.lock().unwrap();
        state
            .updates
            .push((job_id.to_string(), record_id.to_string(), update.clone()));
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(Self::not_found)?;
        let record = job
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(Self::not_found)?;
        if let Some(text) = &update.letter_draft {
            record.letter_draft = Some(text.clone());
        }
        if let Some(text) = &update.hypothesis {
            record.hypothesis = Some(text.clone());
        }
        if let Some(text) = &update.decision_maker {
            record.decision_maker = Some(text.clone());
        }
        Ok(record.clone())
    }
}

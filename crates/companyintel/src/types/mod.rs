//! Wire types mirroring the job API's resources.
//!
//! The backend owns every one of these; the client only caches them.

mod count;
pub mod job;
pub mod record;
pub mod request;
mod timestamp;

pub use job::{
    CrawlingConfig, Job, JobListResponse, JobStatus, LlmConfig, LlmProvider, ManualCompany,
    OutputConfig, OutputMode, SearchConfig,
};
pub use record::{Record, RecordStatus};
pub use request::{CreateJobRequest, JobListQuery, OutputRequest, RecordUpdate, RerunRequest};

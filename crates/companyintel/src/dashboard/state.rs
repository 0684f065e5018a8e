//! Dashboard state: cached jobs, the selected job, drafts, and UI flags.

use super::drafts::DraftBuffer;
use crate::types::Job;

/// User-facing actions, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardAction {
    ListJobs,
    LoadJob,
    CreateJob,
    RerunFailed,
    SaveDraft,
}

impl std::fmt::Display for DashboardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardAction::ListJobs => write!(f, "Failed to fetch job list"),
            DashboardAction::LoadJob => write!(f, "Failed to load job details"),
            DashboardAction::CreateJob => write!(f, "Failed to create job"),
            DashboardAction::RerunFailed => write!(f, "Failed to rerun failed records"),
            DashboardAction::SaveDraft => write!(f, "Failed to save letter draft"),
        }
    }
}

/// Everything the dashboard shows. Cloned out as a snapshot for rendering.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Most recent page of jobs, without records.
    pub jobs: Vec<Job>,
    pub jobs_total: u64,
    /// Selected job with its records.
    pub selected: Option<Job>,
    pub drafts: DraftBuffer,
    /// A job submission is in flight.
    pub submitting: bool,
    /// Number of job-detail fetches in flight.
    pub pending_loads: u32,
    /// Record whose draft is being saved.
    pub saving_record_id: Option<String>,
    /// The last error. A new error replaces it.
    pub error: Option<String>,
}

impl DashboardState {
    pub fn is_loading_job(&self) -> bool {
        self.pending_loads > 0
    }

    pub fn is_saving(&self, record_id: &str) -> bool {
        self.saving_record_id.as_deref() == Some(record_id)
    }

    /// Progress of the selected job, 0 when nothing is selected.
    pub fn progress_percent(&self) -> u32 {
        self.selected.as_ref().map_or(0, Job::progress_percent)
    }

    /// Draft text shown in the editor for `record_id`.
    pub fn draft_text(&self, record_id: &str) -> &str {
        self.drafts.get(record_id).unwrap_or("")
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|job| job.id.as_str())
    }
}

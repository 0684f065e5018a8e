//! Dashboard event broadcasting for front-ends that render live updates.

use tokio::sync::broadcast;

use super::state::DashboardAction;
use crate::types::{Job, JobStatus};

/// Why a polling task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStopReason {
    /// The job reached a terminal status.
    Terminal(JobStatus),
    /// Another job was selected.
    Deselected,
    /// The dashboard was closed.
    Closed,
}

impl std::fmt::Display for PollStopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollStopReason::Terminal(status) => write!(f, "job is {}", status),
            PollStopReason::Deselected => write!(f, "another job was selected"),
            PollStopReason::Closed => write!(f, "dashboard closed"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    JobsRefreshed { count: usize, total: u64 },
    JobUpdated(Box<Job>),
    JobCreated { job_id: String },
    RerunRequested { job_id: String },
    DraftSaved { job_id: String, record_id: String },
    PollingStarted { job_id: String },
    PollingStopped { job_id: String, reason: PollStopReason },
    Error { action: DashboardAction, message: String },
}

/// Fans dashboard events out to subscribers.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn send(&self, event: DashboardEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

//! The dashboard: a single owner for the cached job list, the selected job,
//! the draft buffer, in-flight flags, the error slot, and the polling task.
//!
//! State lives behind a lock that is never held across a network call.
//! Every action reduces its failures to one message in the shared error slot
//! and clears its own in-flight flag on every exit path, including when the
//! action's future is dropped mid-request.

mod drafts;
mod events;
mod poller;
mod state;

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::api::CompanyIntelApi;
use crate::config::{JobForm, Settings};
use crate::error::DashboardError;
use crate::types::{Job, JobListQuery, JobStatus, Record, RecordUpdate};

pub use drafts::DraftBuffer;
pub use events::{DashboardEvent, EventBroadcaster, PollStopReason};
pub use state::{DashboardAction, DashboardState};

use poller::PollHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Time between refreshes of an active job.
    pub poll_interval: Duration,
    /// Page size of the job list.
    pub list_limit: u32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            list_limit: 30,
        }
    }
}

impl From<&Settings> for DashboardOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            list_limit: settings.list_limit,
        }
    }
}

/// Client-side view of the job API.
pub struct Dashboard<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A> {
    api: A,
    options: DashboardOptions,
    state: RwLock<DashboardState>,
    poller: Mutex<Option<PollHandle>>,
    events: EventBroadcaster,
}

/// Runs `reset` against the state when dropped.
struct ResetOnDrop<'a> {
    state: &'a RwLock<DashboardState>,
    reset: fn(&mut DashboardState),
}

impl<'a> ResetOnDrop<'a> {
    fn new(state: &'a RwLock<DashboardState>, reset: fn(&mut DashboardState)) -> Self {
        Self { state, reset }
    }
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        (self.reset)(&mut state);
    }
}

impl<A: CompanyIntelApi + 'static> Dashboard<A> {
    pub fn new(api: A, options: DashboardOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                options,
                state: RwLock::new(DashboardState::default()),
                poller: Mutex::new(None),
                events: EventBroadcaster::default(),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn options(&self) -> DashboardOptions {
        self.inner.options
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.events.subscribe()
    }

    /// A copy of the current state for rendering.
    pub fn snapshot(&self) -> DashboardState {
        self.inner.read().clone()
    }

    /// The job currently being polled, if any.
    pub fn polling_job_id(&self) -> Option<String> {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|handle| handle.job_id().to_string())
    }

    /// Initial load: fetches the job list.
    pub async fn open(&self) -> Result<(), DashboardError> {
        self.inner.refresh_jobs().await
    }

    pub async fn refresh_jobs(&self) -> Result<(), DashboardError> {
        self.inner.refresh_jobs().await
    }

    /// Fetches a job with its records and makes it the selected job.
    pub async fn select_job(&self, job_id: &str) -> Result<(), DashboardError> {
        self.inner.load_job(job_id, None).await.map(|_| ())
    }

    /// Re-fetches the selected job.
    pub async fn refresh_selected(&self) -> Result<(), DashboardError> {
        let selected = self.inner.read().selected_id().map(str::to_string);
        match selected {
            Some(job_id) => self.inner.load_job(&job_id, None).await.map(|_| ()),
            None => Err(self.inner.fail(DashboardError::NoSelection {
                action: DashboardAction::LoadJob,
            })),
        }
    }

    /// Submits the form as a new job and selects it.
    ///
    /// Rejected while another submission is in flight. Failures of the
    /// follow-up refreshes land in the error slot but do not fail the call.
    pub async fn create_job(&self, form: &JobForm) -> Result<Job, DashboardError> {
        let action = DashboardAction::CreateJob;
        let busy = {
            let mut state = self.inner.write();
            if state.submitting {
                true
            } else {
                state.submitting = true;
                state.error = None;
                false
            }
        };
        if busy {
            return Err(self.inner.fail(DashboardError::Busy { action }));
        }
        let _submitting = ResetOnDrop::new(&self.inner.state, |s| s.submitting = false);

        let request = form.to_request();
        info!(
            "Submitting job '{}' ({} queries, {} manual companies, limit {})",
            request.name,
            request.search.search_queries.len(),
            request.search.manual_companies.len(),
            request.search.limit
        );

        let created = self
            .inner
            .api
            .create_job(&request)
            .await
            .map_err(|source| self.inner.fail(DashboardError::Api { action, source }))?;
        info!("Created job {} ({})", created.id, created.status);

        self.inner.write().selected = Some(created.clone());
        self.inner.events.send(DashboardEvent::JobCreated {
            job_id: created.id.clone(),
        });
        self.inner.sync_polling(&created.id, created.status);

        let _ = self.inner.refresh_jobs().await;
        let _ = self.inner.load_job(&created.id, None).await;

        Ok(created)
    }

    /// Asks the backend to re-process the failed records of a job.
    pub async fn rerun_failed(&self, job_id: &str) -> Result<Job, DashboardError> {
        self.inner.write().error = None;

        let job = self.inner.api.rerun_failed(job_id).await.map_err(|source| {
            self.inner.fail(DashboardError::Api {
                action: DashboardAction::RerunFailed,
                source,
            })
        })?;
        info!("Requested rerun of failed records for job {}", job_id);
        self.inner.events.send(DashboardEvent::RerunRequested {
            job_id: job_id.to_string(),
        });

        let _ = self.inner.load_job(job_id, None).await;
        let _ = self.inner.refresh_jobs().await;

        Ok(job)
    }

    /// Replaces the buffered draft text of a record.
    pub fn edit_draft(&self, record_id: &str, text: impl Into<String>) {
        self.inner.write().drafts.edit(record_id, text);
    }

    /// Persists the buffered draft of a record of the selected job.
    pub async fn save_draft(&self, record_id: &str) -> Result<Record, DashboardError> {
        self.save_record(record_id, RecordUpdate::default()).await
    }

    /// Persists editable fields of a record of the selected job. When
    /// `update` carries no draft, the buffered draft is sent.
    ///
    /// Rejected while another save is in flight.
    pub async fn save_record(
        &self,
        record_id: &str,
        update: RecordUpdate,
    ) -> Result<Record, DashboardError> {
        let action = DashboardAction::SaveDraft;
        let prepared = {
            let mut state = self.inner.write();
            let target = match state.selected.as_ref() {
                None => Err(DashboardError::NoSelection { action }),
                Some(job) => match job.record(record_id) {
                    None => Err(DashboardError::UnknownRecord {
                        action,
                        record_id: record_id.to_string(),
                    }),
                    Some(record) => {
                        let mut update = update;
                        if update.letter_draft.is_none() {
                            update.letter_draft = Some(state.drafts.text_for_save(record));
                        }
                        Ok((job.id.clone(), update))
                    }
                },
            };

            match target {
                Ok(_) if state.saving_record_id.is_some() => {
                    Err(DashboardError::Busy { action })
                }
                Ok(target) => {
                    state.saving_record_id = Some(record_id.to_string());
                    state.error = None;
                    Ok(target)
                }
                Err(e) => Err(e),
            }
        };
        let (job_id, update) = prepared.map_err(|e| self.inner.fail(e))?;
        let _saving = ResetOnDrop::new(&self.inner.state, |s| s.saving_record_id = None);

        let record = self
            .inner
            .api
            .update_record(&job_id, record_id, &update)
            .await
            .map_err(|source| self.inner.fail(DashboardError::Api { action, source }))?;
        info!("Saved record {} of job {}", record_id, job_id);
        self.inner.events.send(DashboardEvent::DraftSaved {
            job_id: job_id.clone(),
            record_id: record_id.to_string(),
        });

        let _ = self.inner.load_job(&job_id, None).await;

        Ok(record)
    }

    /// Stops polling. The dashboard stays usable; selecting an active job
    /// starts polling again.
    pub fn close(&self) {
        let handle = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.stop();
            info!("Stopped polling job {} (dashboard closed)", handle.job_id());
            self.inner.events.send(DashboardEvent::PollingStopped {
                job_id: handle.job_id().to_string(),
                reason: PollStopReason::Closed,
            });
        }
    }
}

impl<A: CompanyIntelApi + 'static> Inner<A> {
    fn read(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Puts the error in the slot, replacing whatever was there.
    fn fail(&self, err: DashboardError) -> DashboardError {
        warn!("{}", err);
        let message = err.slot_message();
        self.write().error = Some(message.clone());
        self.events.send(DashboardEvent::Error {
            action: err.action(),
            message,
        });
        err
    }

    async fn refresh_jobs(&self) -> Result<(), DashboardError> {
        let query = JobListQuery::dashboard_page(self.options.list_limit);
        let page = self.api.list_jobs(&query).await.map_err(|source| {
            self.fail(DashboardError::Api {
                action: DashboardAction::ListJobs,
                source,
            })
        })?;

        let (count, total) = (page.items.len(), page.total);
        {
            let mut state = self.write();
            state.jobs = page.items;
            state.jobs_total = total;
        }
        debug!("Job list refreshed: {} of {} jobs", count, total);
        self.events.send(DashboardEvent::JobsRefreshed { count, total });
        Ok(())
    }

    /// Fetches a job with records and makes it the selected job.
    ///
    /// With `poll` set, the result is dropped if polling was cancelled or the
    /// selection moved on while the request was in flight. Returns whether
    /// the result was applied.
    async fn load_job(
        self: &Arc<Self>,
        job_id: &str,
        poll: Option<&CancellationToken>,
    ) -> Result<bool, DashboardError> {
        self.write().pending_loads += 1;
        let result = {
            let _loading = ResetOnDrop::new(&self.state, |s| {
                s.pending_loads = s.pending_loads.saturating_sub(1)
            });
            self.api.get_job(job_id, true).await
        };
        let job = result.map_err(|source| {
            self.fail(DashboardError::Api {
                action: DashboardAction::LoadJob,
                source,
            })
        })?;

        let status = job.status;
        {
            let mut state = self.write();
            if let Some(token) = poll {
                if token.is_cancelled() || state.selected_id() != Some(job_id) {
                    debug!("Discarding stale poll result for job {}", job_id);
                    return Ok(false);
                }
            }
            let seeded = state.drafts.seed(&job.records);
            if seeded > 0 {
                debug!("Seeded {} draft(s) for job {}", seeded, job_id);
            }
            state.selected = Some(job.clone());
        }
        debug!(
            "Job {} is {} ({}/{})",
            job_id, status, job.processed_companies, job.total_companies
        );
        self.events.send(DashboardEvent::JobUpdated(Box::new(job)));
        self.sync_polling(job_id, status);
        Ok(true)
    }

    /// Starts, keeps, or stops the polling task so that exactly the selected
    /// job is polled while its status is active.
    fn sync_polling(self: &Arc<Self>, job_id: &str, status: JobStatus) {
        let mut slot = self.poller.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(handle) = slot.as_ref() {
            if handle.job_id() == job_id && status.is_active() {
                return;
            }
        }

        if let Some(old) = slot.take() {
            old.stop();
            let reason = if old.job_id() == job_id {
                PollStopReason::Terminal(status)
            } else {
                PollStopReason::Deselected
            };
            info!("Stopped polling job {} ({})", old.job_id(), reason);
            self.events.send(DashboardEvent::PollingStopped {
                job_id: old.job_id().to_string(),
                reason,
            });
        }

        if status.is_active() {
            *slot = Some(self.spawn_poller(job_id));
            info!(
                "Polling job {} every {:?}",
                job_id, self.options.poll_interval
            );
            self.events.send(DashboardEvent::PollingStarted {
                job_id: job_id.to_string(),
            });
        }
    }

    fn spawn_poller(self: &Arc<Self>, job_id: &str) -> PollHandle {
        let weak = Arc::downgrade(self);
        let tick_job_id = job_id.to_string();
        poller::spawn(
            job_id.to_string(),
            self.options.poll_interval,
            move |token| {
                let inner = weak.upgrade()?;
                let job_id = tick_job_id.clone();
                Some(async move { inner.poll_tick(&job_id, &token).await })
            },
        )
    }

    /// One poll: the selected job's detail, then the job list. The list is
    /// left alone once polling was cancelled by close or a new selection.
    async fn poll_tick(self: &Arc<Self>, job_id: &str, token: &CancellationToken) {
        if token.is_cancelled() {
            return;
        }
        let loading = self.read().is_loading_job();
        if loading {
            debug!(
                "Skipping poll tick for job {}: a refresh is still in flight",
                job_id
            );
            return;
        }

        match self.load_job(job_id, Some(token)).await {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) if token.is_cancelled() => return,
            // Already in the error slot; keep polling.
            Err(_) => {}
        }
        let _ = self.refresh_jobs().await;
    }
}

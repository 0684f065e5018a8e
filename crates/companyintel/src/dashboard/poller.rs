//! Repeating refresh task for the selected job.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Owns one polling task. Dropping the handle stops the task.
#[derive(Debug)]
pub(crate) struct PollHandle {
    job_id: String,
    cancel: CancellationToken,
}

impl PollHandle {
    pub(crate) fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Cancels the task. Safe to call more than once.
    pub(crate) fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawns a task that calls `on_tick` every `interval`, first after one full
/// interval.
///
/// A tick is awaited before the next one is scheduled, so ticks never
/// overlap; ticks missed while a refresh runs long are skipped. The task
/// ends when the handle is stopped or dropped, or when `on_tick` returns
/// `None` because its owner is gone.
pub(crate) fn spawn<F, Fut>(job_id: String, interval: Duration, mut on_tick: F) -> PollHandle
where
    F: FnMut(CancellationToken) -> Option<Fut> + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let task_job_id = job_id.clone();

    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer.tick().await; // skip immediate first tick

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = timer.tick() => {}
            }

            match on_tick(token.clone()) {
                Some(tick) => tick.await,
                None => break,
            }
        }

        log::debug!("Polling task for job {} stopped", task_job_id);
    });

    PollHandle { job_id, cancel }
}

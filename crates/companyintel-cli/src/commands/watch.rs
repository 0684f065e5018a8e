//! Following a job's progress until it stops being polled.

use anyhow::{Context as _, Result};
use companyintel::{ApiClient, Dashboard, DashboardEvent, PollStopReason};
use tokio::sync::broadcast::{self, error::RecvError};

use super::Context;
use crate::render;

pub async fn watch(ctx: &Context, job_id: &str) -> Result<()> {
    let dashboard = ctx.dashboard();
    let events = dashboard.subscribe();

    dashboard
        .select_job(job_id)
        .await
        .with_context(|| format!("failed to load job {}", job_id))?;

    let result = if dashboard.polling_job_id().is_some() {
        follow(&dashboard, events).await
    } else {
        if let Some(job) = dashboard.snapshot().selected {
            println!("{}", render::progress_line(&job));
            print_logs(&job.logs, 0);
        }
        Ok(())
    };
    dashboard.close();
    result
}

fn print_logs(logs: &[String], from: usize) -> usize {
    for line in logs.iter().skip(from) {
        println!("  {}", line);
    }
    logs.len().max(from)
}

/// Prints progress and new log lines as the dashboard reports them. Returns
/// when polling stops or on Ctrl-C.
pub async fn follow(
    dashboard: &Dashboard<ApiClient>,
    mut events: broadcast::Receiver<DashboardEvent>,
) -> Result<()> {
    let mut seen_logs = 0;
    let mut last_line = String::new();

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                println!("Stopped watching.");
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(DashboardEvent::JobUpdated(job)) => {
                    let line = render::progress_line(&job);
                    if line != last_line {
                        println!("{}", line);
                        last_line = line;
                    }
                    seen_logs = print_logs(&job.logs, seen_logs);
                }
                Ok(DashboardEvent::Error { message, .. }) => {
                    eprintln!("{}", message);
                }
                Ok(DashboardEvent::PollingStopped { job_id, reason }) => {
                    match reason {
                        PollStopReason::Terminal(status) => {
                            println!("Job {} finished: {}", job_id, status);
                        }
                        other => println!("Stopped watching job {}: {}", job_id, other),
                    }
                    return Ok(());
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Dropped {} dashboard event(s)", skipped);
                }
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

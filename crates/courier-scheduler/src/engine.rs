use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use courier_channels::Transport;
use courier_core::config::DEFAULT_POLL_INTERVAL_MS;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::{error::Result, store::JobStore};

/// Outcome of a single poll-dispatch cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Jobs returned by the due query.
    pub due: usize,
    /// Jobs confirmed by the transport.
    pub sent: usize,
    /// Jobs left pending for the next tick.
    pub failed: usize,
}

/// Delivery loop: the only writer of the `sent` flag.
///
/// Each tick reads the due jobs, sends them one by one in `scheduled_at`
/// order and marks a job sent only after the transport confirmed it. A failed
/// send leaves the job pending; it is picked up again by the next tick, with
/// no backoff and no retry cap.
pub struct SchedulerEngine {
    store: JobStore,
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
}

impl SchedulerEngine {
    pub fn new(store: JobStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Main event loop. Ticks every `poll_interval` until `shutdown`
    /// broadcasts `true` or its sender is dropped.
    ///
    /// The first tick fires immediately, so jobs that fell due while the
    /// process was down go out right after a restart.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            transport = self.transport.name(),
            interval = ?self.poll_interval,
            "scheduler engine started"
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(report) if report.due > 0 => {
                            debug!(due = report.due, sent = report.sent, failed = report.failed, "tick complete");
                        }
                        Ok(_) => {}
                        Err(e) => error!("scheduler tick error: {e}"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Dispatch every job due right now.
    ///
    /// Only a failing due query is returned as an error. Send failures and
    /// `mark_sent` failures are logged and counted; the job stays pending.
    pub async fn tick(&self) -> Result<TickReport> {
        let due = self.store.list_due(Utc::now())?;
        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };
        if due.is_empty() {
            return Ok(report);
        }

        if !self.transport.is_connected().await {
            warn!(
                due = report.due,
                transport = self.transport.name(),
                "transport not connected; deferring due jobs"
            );
            report.failed = report.due;
            return Ok(report);
        }

        for job in due {
            match self.transport.send(&job.destination, &job.body).await {
                Ok(detail) => {
                    report.sent += 1;
                    match self.store.mark_sent(job.id) {
                        Ok(true) => {
                            info!(job_id = job.id, destination = %job.destination, %detail, "scheduled message sent");
                        }
                        Ok(false) => {
                            warn!(job_id = job.id, "scheduled message sent but job was already marked");
                        }
                        Err(e) => {
                            // The row stays pending and will be sent again next tick.
                            error!(job_id = job.id, "message sent but mark_sent failed: {e}");
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(job_id = job.id, destination = %job.destination, error = %e, "scheduled send failed; will retry");
                }
            }
        }

        Ok(report)
    }
}

//! ReminderWorker processor.
//!
//! Periodically sweeps the reminder candidates and runs the traffic and
//! expiry checks. Any number of workers may run concurrently — against
//! the same store, even across instances — because the gate is the dedup
//! point, not the sweep.

use crate::reminder::{ReminderError, ReminderService};
use crate::users::{DirectoryError, UserDirectory};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Errors aborting a whole sweep. Per-user failures only log.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Periodic reminder sweep.
pub struct ReminderWorker {
    directory: Arc<dyn UserDirectory>,
    reminders: ReminderService,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl ReminderWorker {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        reminders: ReminderService,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            directory,
            reminders,
            interval,
            shutdown_rx,
        }
    }

    /// Run until shutdown.
    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "ReminderWorker started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("ReminderWorker received shutdown signal");
                        break;
                    }
                }

                _ = tokio::time::sleep(self.interval) => {
                    if let Err(e) = self.run_once().await {
                        error!(error = %e, "reminder sweep failed");
                    }
                }
            }
        }

        info!("ReminderWorker shutdown complete");
    }

    /// One sweep over the candidate users.
    pub async fn run_once(&self) -> Result<(), SweepError> {
        let users = self.directory.reminder_candidates().await?;
        let now = OffsetDateTime::now_utc();

        for user in &users {
            if let Err(e) = self.reminders.remind_traffic(user).await {
                log_reminder_failure(user.id, "traffic", &e);
            }
            if let Err(e) = self.reminders.remind_expire(user, now).await {
                log_reminder_failure(user.id, "expiry", &e);
            }
        }
        Ok(())
    }
}

fn log_reminder_failure(user_id: i64, kind: &str, err: &ReminderError) {
    warn!(user = user_id, kind, error = %err, "reminder failed");
}

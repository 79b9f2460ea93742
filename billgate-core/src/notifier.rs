//! User notification boundary.
//!
//! Mail and Telegram delivery live behind this trait; the core only
//! decides *whether* a message goes out. Callers must hold a permit from
//! the notification gate before invoking it — the notifier itself does
//! not deduplicate.

use async_trait::async_trait;

/// Delivery failures from the downstream channel (mailer, bot).
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Fan-out boundary for user-facing messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_user(&self, user_id: i64, message: &str) -> Result<(), NotifyError>;
}

/// Notifier that only logs; development stand-in.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_user(&self, user_id: i64, message: &str) -> Result<(), NotifyError> {
        tracing::info!(user = user_id, message, "user notification");
        Ok(())
    }
}

//! Usage and expiry reminders.
//!
//! Point-in-time checks deduplicated per user per 24 h through the
//! notification gate. The checks carry no hysteresis: a user dropping
//! back below the traffic threshold does not reopen the gate early — it
//! expires by time window only.

use crate::entities::User;
use crate::gate::{GateError, GateKey, NotificationGate, ReminderKind};
use crate::notifier::{Notifier, NotifyError};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Fraction of quota at which the traffic reminder fires.
pub const TRAFFIC_WARN_RATIO: f64 = 0.95;

/// Reminder dedup window; also the expiry look-ahead.
pub const REMINDER_WINDOW: Duration = Duration::from_secs(24 * 3600);

/// Failures while sending a reminder.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Sends the traffic and expiry reminders.
pub struct ReminderService {
    gate: NotificationGate,
    notifier: Arc<dyn Notifier>,
}

impl ReminderService {
    pub fn new(gate: NotificationGate, notifier: Arc<dyn Notifier>) -> Self {
        Self { gate, notifier }
    }

    /// Send the traffic-threshold reminder if due. Returns true when a
    /// message went out.
    pub async fn remind_traffic(&self, user: &User) -> Result<bool, ReminderError> {
        if !user.remind_traffic {
            return Ok(false);
        }
        if !traffic_is_warn(user.upload_used, user.download_used, user.transfer_quota) {
            return Ok(false);
        }

        let key = GateKey::new(user.id.to_string(), ReminderKind::TrafficUsage);
        if !self.gate.try_fire(&key, REMINDER_WINDOW).await? {
            return Ok(false);
        }

        let message = format!(
            "Your traffic usage has reached 95%. Used {} of {}.",
            format_traffic(user.upload_used + user.download_used),
            format_traffic(user.transfer_quota),
        );
        self.notifier.notify_user(user.id, &message).await?;
        tracing::info!(user = user.id, "traffic reminder sent");
        Ok(true)
    }

    /// Send the expiring-soon reminder if due (inside the 24 h before
    /// expiry). Returns true when a message went out.
    pub async fn remind_expire(
        &self,
        user: &User,
        now: OffsetDateTime,
    ) -> Result<bool, ReminderError> {
        if !user.remind_expire {
            return Ok(false);
        }
        let Some(expired_at) = user.expired_at else {
            return Ok(false);
        };
        let window_opens = expired_at - time::Duration::hours(24);
        if !(window_opens < now && now < expired_at) {
            return Ok(false);
        }

        let key = GateKey::new(user.id.to_string(), ReminderKind::PlanExpiry);
        if !self.gate.try_fire(&key, REMINDER_WINDOW).await? {
            return Ok(false);
        }

        let message = format!("Your service expires on {}.", expired_at.date());
        self.notifier.notify_user(user.id, &message).await?;
        tracing::info!(user = user.id, "expiry reminder sent");
        Ok(true)
    }
}

/// Whether used traffic has crossed the warning ratio of the quota.
pub fn traffic_is_warn(upload: i64, download: i64, quota: i64) -> bool {
    if quota <= 0 {
        return false;
    }
    (upload + download) as f64 >= quota as f64 * TRAFFIC_WARN_RATIO
}

/// Human-readable byte count: `1.5 KB`, `2.34 GB`.
pub fn format_traffic(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gate::MemoryGateStore;
    use crate::notifier::test_support::RecordingNotifier;

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("user{id}@example.com"),
            telegram_id: None,
            upload_used: 0,
            download_used: 0,
            transfer_quota: 100 * 1024,
            expired_at: None,
            remind_traffic: true,
            remind_expire: true,
        }
    }

    fn service() -> (ReminderService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let gate = NotificationGate::new(Arc::new(MemoryGateStore::new()));
        (ReminderService::new(gate, notifier.clone()), notifier)
    }

    #[test]
    fn warn_threshold_is_95_percent_inclusive() {
        assert!(traffic_is_warn(95, 0, 100));
        assert!(traffic_is_warn(50, 45, 100));
        assert!(!traffic_is_warn(94, 0, 100));
        assert!(!traffic_is_warn(0, 0, 0));
        assert!(!traffic_is_warn(10, 10, -1));
    }

    #[test]
    fn traffic_formats_like_the_mailer() {
        assert_eq!(format_traffic(0), "0 B");
        assert_eq!(format_traffic(512), "512 B");
        assert_eq!(format_traffic(1024), "1 KB");
        assert_eq!(format_traffic(1536), "1.5 KB");
        assert_eq!(format_traffic(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_traffic(-3), "0 B");
    }

    #[tokio::test]
    async fn traffic_reminder_fires_once_per_window() {
        let (service, notifier) = service();
        let mut user = user(42);
        user.upload_used = 96 * 1024;

        assert!(service.remind_traffic(&user).await.unwrap());
        assert!(!service.remind_traffic(&user).await.unwrap());

        let messages = notifier.messages.lock().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, 42);
        assert!(messages[0].1.contains("95%"));
        assert!(messages[0].1.contains("96 KB"));
        assert!(messages[0].1.contains("100 KB"));
    }

    #[tokio::test]
    async fn traffic_reminder_skips_below_threshold() {
        let (service, notifier) = service();
        let mut user = user(42);
        user.upload_used = 50 * 1024;

        assert!(!service.remind_traffic(&user).await.unwrap());
        assert!(notifier.messages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn traffic_reminder_respects_opt_out() {
        let (service, notifier) = service();
        let mut user = user(42);
        user.upload_used = 99 * 1024;
        user.remind_traffic = false;

        assert!(!service.remind_traffic(&user).await.unwrap());
        assert!(notifier.messages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn expiry_reminder_fires_inside_the_last_day() {
        let (service, notifier) = service();
        let now = OffsetDateTime::now_utc();
        let mut user = user(42);
        user.expired_at = Some(now + time::Duration::hours(12));

        assert!(service.remind_expire(&user, now).await.unwrap());
        assert!(!service.remind_expire(&user, now).await.unwrap());
        assert_eq!(notifier.messages.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn expiry_reminder_skips_outside_the_window() {
        let (service, notifier) = service();
        let now = OffsetDateTime::now_utc();

        // Too far out.
        let mut early = user(1);
        early.expired_at = Some(now + time::Duration::hours(48));
        assert!(!service.remind_expire(&early, now).await.unwrap());

        // Already expired.
        let mut late = user(2);
        late.expired_at = Some(now - time::Duration::hours(1));
        assert!(!service.remind_expire(&late, now).await.unwrap());

        // No expiry at all.
        let never = user(3);
        assert!(!service.remind_expire(&never, now).await.unwrap());

        assert!(notifier.messages.lock().await.is_empty());
    }

    #[tokio::test]
    async fn reminders_gate_independently_per_kind() {
        let (service, notifier) = service();
        let now = OffsetDateTime::now_utc();
        let mut user = user(42);
        user.upload_used = 99 * 1024;
        user.expired_at = Some(now + time::Duration::hours(6));

        assert!(service.remind_traffic(&user).await.unwrap());
        assert!(service.remind_expire(&user, now).await.unwrap());
        assert_eq!(notifier.messages.lock().await.len(), 2);
    }
}

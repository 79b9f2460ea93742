//! Idempotent notification gate.
//!
//! `try_fire` answers one question: is this call the one permitted to
//! perform a keyed side effect within the window? The answer must come
//! from a single atomic set-if-absent-with-expiry on the backing store.
//! A read followed by a write is a race: two concurrent callers can both
//! observe "not set" and both fire.

mod store_memory;
mod store_redis;

pub use store_memory::MemoryGateStore;
pub use store_redis::RedisGateStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// What a gate entry deduplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    /// Order-completed notice, keyed by trade number.
    OrderPaid,
    /// Traffic-threshold reminder, keyed by user id.
    TrafficUsage,
    /// Plan-expiry reminder, keyed by user id.
    PlanExpiry,
}

impl ReminderKind {
    fn as_key_part(self) -> &'static str {
        match self {
            ReminderKind::OrderPaid => "order_paid",
            ReminderKind::TrafficUsage => "remind_traffic",
            ReminderKind::PlanExpiry => "remind_expire",
        }
    }
}

/// Key of one gated side effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateKey {
    pub subject: String,
    pub kind: ReminderKind,
}

impl GateKey {
    pub fn new(subject: impl Into<String>, kind: ReminderKind) -> Self {
        Self {
            subject: subject.into(),
            kind,
        }
    }

    /// Backing-store key, namespaced `gate:{kind}:{subject}`.
    fn storage_key(&self) -> String {
        format!("gate:{}:{}", self.kind.as_key_part(), self.subject)
    }
}

/// Errors from the gate backing store.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("gate store error: {0}")]
    Store(#[from] redis::RedisError),
}

/// Atomic set-if-absent-with-expiry backing store.
#[async_trait]
pub trait GateStore: Send + Sync {
    /// Record `key` for `ttl` iff it is not currently recorded. The check
    /// and the write are one atomic operation.
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, GateError>;
}

/// The gate itself: a thin façade over an atomic [`GateStore`].
#[derive(Clone)]
pub struct NotificationGate {
    store: Arc<dyn GateStore>,
}

impl NotificationGate {
    pub fn new(store: Arc<dyn GateStore>) -> Self {
        Self { store }
    }

    /// Returns true iff this call is the one permitted to perform the
    /// side effect for `key` within `window`.
    pub async fn try_fire(&self, key: &GateKey, window: Duration) -> Result<bool, GateError> {
        self.store.set_if_absent(&key.storage_key(), window).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_namespaced_per_kind() {
        let traffic = GateKey::new("42", ReminderKind::TrafficUsage);
        let expiry = GateKey::new("42", ReminderKind::PlanExpiry);
        assert_eq!(traffic.storage_key(), "gate:remind_traffic:42");
        assert_eq!(expiry.storage_key(), "gate:remind_expire:42");
        assert_ne!(traffic.storage_key(), expiry.storage_key());
    }

    #[tokio::test]
    async fn gate_admits_once_per_window() {
        let gate = NotificationGate::new(Arc::new(MemoryGateStore::new()));
        let key = GateKey::new("A1", ReminderKind::OrderPaid);
        let window = Duration::from_secs(60);

        assert!(gate.try_fire(&key, window).await.unwrap());
        assert!(!gate.try_fire(&key, window).await.unwrap());
    }

    #[tokio::test]
    async fn distinct_keys_do_not_interfere() {
        let gate = NotificationGate::new(Arc::new(MemoryGateStore::new()));
        let window = Duration::from_secs(60);

        assert!(
            gate.try_fire(&GateKey::new("1", ReminderKind::TrafficUsage), window)
                .await
                .unwrap()
        );
        assert!(
            gate.try_fire(&GateKey::new("2", ReminderKind::TrafficUsage), window)
                .await
                .unwrap()
        );
        assert!(
            gate.try_fire(&GateKey::new("1", ReminderKind::PlanExpiry), window)
                .await
                .unwrap()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_callers_admit_exactly_one() {
        let gate = Arc::new(NotificationGate::new(Arc::new(MemoryGateStore::new())));
        let barrier = Arc::new(tokio::sync::Barrier::new(16));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let gate = gate.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                gate.try_fire(
                    &GateKey::new("A1", ReminderKind::OrderPaid),
                    Duration::from_secs(60),
                )
                .await
                .unwrap()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn gate_reopens_after_the_window() {
        let gate = NotificationGate::new(Arc::new(MemoryGateStore::new()));
        let key = GateKey::new("A1", ReminderKind::OrderPaid);
        let window = Duration::from_millis(20);

        assert!(gate.try_fire(&key, window).await.unwrap());
        assert!(!gate.try_fire(&key, window).await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(gate.try_fire(&key, window).await.unwrap());
    }
}

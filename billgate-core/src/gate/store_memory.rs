use super::{GateError, GateStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Process-local gate store.
///
/// One mutex spans the expiry check and the insert; that is what makes
/// `set_if_absent` atomic for callers within this process. Suitable for
/// tests and single-instance deployments; multi-instance panels share a
/// [`RedisGateStore`](super::RedisGateStore).
#[derive(Debug, Default)]
pub struct MemoryGateStore {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryGateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GateStore for MemoryGateStore {
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, GateError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, expires_at| *expires_at > now);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), now + ttl);
        Ok(true)
    }
}

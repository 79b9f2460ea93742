use super::{GateError, GateStore};
use async_trait::async_trait;
use std::time::Duration;

/// Redis-backed gate store shared across panel instances.
///
/// `SET key 1 NX EX n` is a single server-side command, so the check and
/// the write cannot interleave with another caller's — the atomicity the
/// gate contract requires, across processes.
#[derive(Clone)]
pub struct RedisGateStore {
    client: redis::Client,
}

impl RedisGateStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GateStore for RedisGateStore {
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, GateError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // EX takes whole seconds; never pass 0, which Redis rejects.
        let ttl_secs = ttl.as_secs().max(1);
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }
}

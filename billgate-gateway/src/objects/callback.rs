//! Asynchronous payment notification payload.

use crate::signature::Signable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gateway sentinel for "payment completed" in the callback `status`.
pub const CALLBACK_STATUS_PAID: i64 = 2;

/// A payment notification as received from the gateway.
///
/// Arrives over the open internet and is untrusted until
/// [`verify_callback`](crate::callback::verify_callback) succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackPayload {
    /// Panel-side order number the gateway echoes back.
    pub order_id: String,
    /// Gateway-side transaction id.
    pub trade_id: String,
    pub status: i64,
    #[serde(default)]
    pub signature: String,
    /// Any additional scalar fields the gateway includes. They take part
    /// in signing like every other non-empty field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Signable for CallbackPayload {
    fn signing_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("order_id".to_string(), self.order_id.clone());
        fields.insert("trade_id".to_string(), self.trade_id.clone());
        fields.insert("status".to_string(), self.status.to_string());
        for (key, value) in &self.extra {
            if let Some(text) = scalar_text(value) {
                fields.insert(key.clone(), text);
            }
        }
        fields
    }
}

/// Scalar-to-text conversion for signing, matching how the gateway
/// interpolates values: numbers in their shortest decimal form, `true`
/// as `1`, `false` and `null` as absent.
fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(true) => Some("1".to_string()),
        _ => None,
    }
}

//! Callback verification: the trust boundary for inbound notifications.
//!
//! The notify endpoint is internet-reachable; nothing in the payload —
//! `order_id`, `trade_id`, `status` — may be believed before the digest
//! checks out. Verification is pure and touches no order state, so the
//! authentication logic tests independently of settlement.

use crate::objects::{CALLBACK_STATUS_PAID, CallbackPayload};
use crate::signature::Signable;

/// An authenticated payment outcome, safe to hand to settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Panel-side order number.
    pub trade_no: String,
    /// Gateway-side transaction id, recorded on the order.
    pub callback_no: String,
}

/// Rejections at the callback trust boundary.
///
/// Neither variant is retried internally and neither mutates order state.
/// `BadSignature` must stay distinguishable from `NotPaid` in logs so
/// operators can tell an attack or misconfiguration from a payment that
/// simply has not settled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CallbackError {
    /// The callback does not report a completed payment; nack so the
    /// gateway retries or alerts.
    #[error("payment not completed")]
    NotPaid,
    /// The digest does not match the payload.
    #[error("signature verification failed")]
    BadSignature,
}

/// Authenticate a callback and classify its outcome.
pub fn verify_callback(
    payload: &CallbackPayload,
    api_token: &str,
) -> Result<OrderOutcome, CallbackError> {
    if payload.status != CALLBACK_STATUS_PAID {
        return Err(CallbackError::NotPaid);
    }
    if !payload.verify_digest(api_token, &payload.signature) {
        return Err(CallbackError::BadSignature);
    }
    Ok(OrderOutcome {
        trade_no: payload.order_id.clone(),
        callback_no: payload.trade_id.clone(),
    })
}

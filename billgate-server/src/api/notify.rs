//! Inbound payment webhook.

use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use billgate_gateway::callback::{CallbackError, verify_callback};
use billgate_gateway::objects::CallbackPayload;

/// Ack body the gateway treats as success.
const ACK_OK: &str = "ok";
/// Nack for unpaid or unprocessable callbacks.
const ACK_FAILED: &str = "failed";
/// Nack for signature failures. Wording is part of the gateway contract.
const ACK_BAD_SIGNATURE: &str = "cannot pass verification";

/// `POST /payment/notify/epusdt`
///
/// The one internet-facing trust boundary: nothing in the payload is
/// believed before the signature verifies. Always answers 200 — the
/// gateway reads the body, not the status code.
pub(super) async fn payment_notify(
    State(state): State<AppState>,
    Json(payload): Json<CallbackPayload>,
) -> impl IntoResponse {
    let api_token = &state.gateway.config().api_token;
    let outcome = match verify_callback(&payload, api_token) {
        Ok(outcome) => outcome,
        Err(CallbackError::NotPaid) => {
            tracing::debug!(
                order = %payload.order_id,
                status = payload.status,
                "callback does not report payment"
            );
            return ACK_FAILED;
        }
        Err(CallbackError::BadSignature) => {
            // Kept distinct from NotPaid: this is an attack or a token
            // misconfiguration, never a normal pending payment.
            tracing::warn!(order = %payload.order_id, "callback signature verification failed");
            return ACK_BAD_SIGNATURE;
        }
    };

    match state.settlement.apply_paid_outcome(&outcome).await {
        Ok(transition) => {
            if transition.already_processed {
                tracing::debug!(order = %transition.trade_no, "duplicate callback acknowledged");
            }
            ACK_OK
        }
        Err(e) => {
            tracing::error!(order = %outcome.trade_no, error = %e, "failed to settle callback");
            ACK_FAILED
        }
    }
}

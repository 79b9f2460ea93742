//! Checkout: create the gateway transaction for a pending order.

use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use billgate_core::entities::OrderStatus;
use billgate_core::ledger::LedgerError;
use billgate_gateway::client::CheckoutOrder;
use billgate_gateway::error::GatewayError;
use billgate_gateway::objects::PaymentResult;
use serde::Serialize;

/// Response body for a successful checkout.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(super) enum CheckoutResponse {
    Redirect { url: String },
    Qrcode { payload: String },
}

/// `POST /orders/{trade_no}/checkout`
///
/// Looks up the pending order and asks the gateway for a payment page.
/// No local state changes here — the order only moves when the gateway's
/// callback arrives and verifies.
pub(super) async fn checkout(
    State(state): State<AppState>,
    Path(trade_no): Path<String>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let order = state
        .ledger
        .find_by_trade_no(&trade_no)
        .await?
        .ok_or(CheckoutApiError::NotFound)?;

    if order.status != OrderStatus::Pending {
        return Err(CheckoutApiError::NotPending);
    }

    let request = CheckoutOrder {
        trade_no: order.trade_no.clone(),
        total_amount: order.total_amount,
        notify_url: notify_url(&state),
        return_url: state.notify.return_url.to_string(),
    };

    match state.gateway.create_order(&request).await {
        Ok(PaymentResult::Redirect { url }) => Ok(Json(CheckoutResponse::Redirect { url })),
        Ok(PaymentResult::QrCode { payload }) => Ok(Json(CheckoutResponse::Qrcode { payload })),
        Err(e) => Err(CheckoutApiError::Gateway(e)),
    }
}

/// Webhook URL advertised to the gateway.
fn notify_url(state: &AppState) -> String {
    format!(
        "{}/payment/notify/epusdt",
        state.notify.public_url.as_str().trim_end_matches('/')
    )
}

/// Errors that can occur in the checkout handler.
#[derive(Debug, thiserror::Error)]
pub(super) enum CheckoutApiError {
    #[error("order not found")]
    NotFound,
    #[error("order is not pending")]
    NotPending,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Gateway(GatewayError),
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            CheckoutApiError::NotFound => {
                (StatusCode::NOT_FOUND, "order not found").into_response()
            }
            CheckoutApiError::NotPending => {
                (StatusCode::CONFLICT, "order is not pending").into_response()
            }
            CheckoutApiError::Ledger(e) => {
                tracing::error!(error = %e, "checkout ledger error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            CheckoutApiError::Gateway(e) => {
                tracing::error!(error = %e, "gateway order creation failed");
                let message = match &e {
                    GatewayError::BadStatus(message) => message.clone(),
                    GatewayError::Timeout => "gateway timeout".to_string(),
                    GatewayError::Network(_) => "gateway unreachable".to_string(),
                };
                (
                    StatusCode::BAD_GATEWAY,
                    format!("Failed to create order. Error: {message}"),
                )
                    .into_response()
            }
        }
    }
}

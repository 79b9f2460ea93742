//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `POST /payment/notify/epusdt`       – gateway payment webhook
//! - `POST /orders/{trade_no}/checkout`  – create the gateway transaction

mod checkout;
mod notify;

use crate::state::AppState;
use axum::{Router, routing::post};

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payment/notify/epusdt", post(notify::payment_notify))
        .route("/orders/{trade_no}/checkout", post(checkout::checkout))
}

//! HTTP client for the EpusdtPay order-creation API.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::objects::{CreateTransactionRequest, CreateTransactionResponse, PaymentResult};
use crate::signature::Signable;
use rust_decimal::Decimal;
use std::time::Duration;

/// Bound on each gateway call; expiry surfaces as [`GatewayError::Timeout`].
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent the reference clients present to the gateway.
const USER_AGENT: &str = "EpusdtPay";

/// Order-creation endpoint, relative to the configured base URL.
const CREATE_TRANSACTION_PATH: &str = "/api/v1/order/create-transaction";

/// An order to submit to the gateway.
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    /// Panel-side order number.
    pub trade_no: String,
    /// Amount in minor currency units (cents).
    pub total_amount: i64,
    /// Webhook URL the gateway calls back on payment.
    pub notify_url: String,
    /// URL the payer is sent back to after paying.
    pub return_url: String,
}

/// Client for one configured gateway instance.
pub struct GatewayClient {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Build a client for the configured gateway.
    ///
    /// TLS certificate verification is deliberately disabled: deployed
    /// EpusdtPay instances routinely present self-signed certificates,
    /// and the callback signature — not the channel — is the trust
    /// anchor. An operator decision is required before tightening this;
    /// see DESIGN.md.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(GatewayError::Network)?;
        Ok(Self { config, http })
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Create a transaction on the gateway and normalize the outcome.
    ///
    /// Mutates no local state; a caller may abandon the future after the
    /// timeout without compensation.
    pub async fn create_order(
        &self,
        order: &CheckoutOrder,
    ) -> Result<PaymentResult, GatewayError> {
        let request = self.build_request(order);
        let url = format!(
            "{}{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            CREATE_TRANSACTION_PATH
        );

        tracing::debug!(order = %order.trade_no, url = %url, "creating gateway transaction");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body: CreateTransactionResponse =
            response.json().await.map_err(classify_transport_error)?;
        normalize_response(body)
    }

    /// Assemble and sign the wire request for `order`.
    fn build_request(&self, order: &CheckoutOrder) -> CreateTransactionRequest {
        let mut request = CreateTransactionRequest {
            address: String::new(),
            trade_type: self.config.trade_type,
            order_id: order.trade_no.clone(),
            amount: major_amount(order.total_amount),
            notify_url: order.notify_url.clone(),
            redirect_url: order.return_url.clone(),
            signature: String::new(),
        };
        request.signature = request.digest(&self.config.api_token);
        request
    }
}

/// Convert minor currency units to major units with two decimals.
fn major_amount(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Map the gateway-domain response envelope to the normalized result.
fn normalize_response(body: CreateTransactionResponse) -> Result<PaymentResult, GatewayError> {
    if body.status_code != 200 {
        let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
        return Err(GatewayError::BadStatus(message));
    }
    let data = body
        .data
        .ok_or_else(|| GatewayError::BadStatus("Unknown error".to_string()))?;
    Ok(PaymentResult::Redirect {
        url: data.payment_url,
    })
}

fn classify_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(err)
    }
}

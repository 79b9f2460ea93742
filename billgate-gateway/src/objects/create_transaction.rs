//! Order-creation request and response bodies.

use super::trade_type::TradeType;
use crate::signature::Signable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body for `POST /api/v1/order/create-transaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Receiving wallet address. Left empty to let the gateway allocate
    /// one from its pool; empty fields drop out of the digest.
    pub address: String,
    pub trade_type: TradeType,
    /// Panel-side order number, echoed back in the callback.
    pub order_id: String,
    /// Amount in major currency units. The gateway's JSON uses a number
    /// here, not a string.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub notify_url: String,
    pub redirect_url: String,
    pub signature: String,
}

impl Signable for CreateTransactionRequest {
    fn signing_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("address".to_string(), self.address.clone());
        fields.insert("trade_type".to_string(), self.trade_type.to_string());
        fields.insert("order_id".to_string(), self.order_id.clone());
        // Trailing zeros are stripped so both sides serialize 10.00 as 10.
        fields.insert("amount".to_string(), self.amount.normalize().to_string());
        fields.insert("notify_url".to_string(), self.notify_url.clone());
        fields.insert("redirect_url".to_string(), self.redirect_url.clone());
        fields
    }
}

/// Response envelope of the order-creation endpoint.
///
/// `status_code` is gateway-domain, distinct from the HTTP status.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionResponse {
    pub status_code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<TransactionData>,
}

/// Payload of a successful order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionData {
    /// Hosted cashier page for the payer.
    pub payment_url: String,
}

/// Normalized outcome of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentResult {
    /// Send the payer to a hosted cashier page.
    Redirect { url: String },
    /// Render the payload as a QR code. Part of the panel's payment
    /// contract; EpusdtPay gateways always answer with a redirect.
    QrCode { payload: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::verify;

    fn request(amount: Decimal) -> CreateTransactionRequest {
        CreateTransactionRequest {
            address: String::new(),
            trade_type: TradeType::UsdtTrc20,
            order_id: "A202608080001".to_string(),
            amount,
            notify_url: "https://panel.example.com/payment/notify/epusdt".to_string(),
            redirect_url: "https://panel.example.com/orders".to_string(),
            signature: String::new(),
        }
    }

    #[test]
    fn amount_signs_with_two_decimals() {
        let fields = request(Decimal::new(1999, 2)).signing_fields();
        assert_eq!(fields.get("amount").map(String::as_str), Some("19.99"));
    }

    #[test]
    fn amount_signs_without_trailing_zeros() {
        let fields = request(Decimal::new(1000, 2)).signing_fields();
        assert_eq!(fields.get("amount").map(String::as_str), Some("10"));
    }

    #[test]
    fn empty_address_is_absent_from_the_digest() {
        let request = request(Decimal::new(1999, 2));
        let mut without_address = request.signing_fields();
        without_address.remove("address");
        assert_eq!(
            request.digest("token"),
            crate::signature::sign(&without_address, "token")
        );
    }

    #[test]
    fn signed_request_verifies() {
        let mut request = request(Decimal::new(1999, 2));
        request.signature = request.digest("token");
        assert!(verify(&request.signing_fields(), "token", &request.signature));
    }

    #[test]
    fn amount_serializes_as_json_number() {
        let mut request = request(Decimal::new(1999, 2));
        request.signature = "x".to_string();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], serde_json::json!(19.99));
    }

    #[test]
    fn response_parses_without_message_or_data() {
        let response: CreateTransactionResponse =
            serde_json::from_str(r#"{"status_code": 500}"#).unwrap();
        assert_eq!(response.status_code, 500);
        assert!(response.message.is_none());
        assert!(response.data.is_none());
    }

    #[test]
    fn response_parses_success_payload() {
        let response: CreateTransactionResponse = serde_json::from_str(
            r#"{"status_code": 200, "data": {"trade_id": "T1", "payment_url": "https://pay.example.com/t/T1"}}"#,
        )
        .unwrap();
        assert_eq!(
            response.data.unwrap().payment_url,
            "https://pay.example.com/t/T1"
        );
    }
}

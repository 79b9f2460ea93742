//! Errors on the outbound gateway path.

/// Failures while creating an order on the gateway.
///
/// These surface to the checkout caller as a user-facing failure; any
/// retry policy belongs to the caller, not to this client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway did not answer within the request timeout. Nothing was
    /// mutated locally, so abandoning the call needs no compensation.
    #[error("gateway request timed out")]
    Timeout,
    /// Gateway-domain rejection: the response `status_code` was not 200.
    #[error("{0}")]
    BadStatus(String),
    /// Transport-level failure below the gateway protocol.
    #[error("gateway request failed: {0}")]
    Network(reqwest::Error),
}

//! Gateway connection settings.

use crate::objects::TradeType;
use serde::Deserialize;
use url::Url;

/// Settings for one configured EpusdtPay gateway instance.
///
/// Immutable once the client is built; reconfiguring means building a new
/// client.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway API endpoint, e.g. `https://epusdt-pay.example.com`.
    pub base_url: Url,
    /// Shared signing secret for requests and callbacks.
    pub api_token: String,
    /// Settlement rail for created orders.
    #[serde(default)]
    pub trade_type: TradeType,
}

//! Settlement rails supported by EpusdtPay gateways.

use serde::{Deserialize, Serialize};

/// The rail a payment settles on.
///
/// Wire strings follow the gateway convention (`usdt.trc20` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TradeType {
    #[default]
    #[serde(rename = "usdt.trc20")]
    UsdtTrc20,
    #[serde(rename = "tron.trx")]
    TronTrx,
    #[serde(rename = "usdt.polygon")]
    UsdtPolygon,
}

impl TradeType {
    /// The wire representation.
    pub fn as_wire(self) -> &'static str {
        match self {
            TradeType::UsdtTrc20 => "usdt.trc20",
            TradeType::TronTrx => "tron.trx",
            TradeType::UsdtPolygon => "usdt.polygon",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_roundtrip() {
        for (trade_type, wire) in [
            (TradeType::UsdtTrc20, "\"usdt.trc20\""),
            (TradeType::TronTrx, "\"tron.trx\""),
            (TradeType::UsdtPolygon, "\"usdt.polygon\""),
        ] {
            assert_eq!(serde_json::to_string(&trade_type).unwrap(), wire);
            let parsed: TradeType = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, trade_type);
        }
    }

    #[test]
    fn default_is_trc20_usdt() {
        assert_eq!(TradeType::default(), TradeType::UsdtTrc20);
    }
}

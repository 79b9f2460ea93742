//! Application state shared across all request handlers.

use crate::config::NotifyConfig;
use billgate_core::ledger::OrderLedger;
use billgate_core::settlement::SettlementService;
use billgate_gateway::client::GatewayClient;
use std::sync::Arc;

/// Shared handler state; cheap to clone, everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn OrderLedger>,
    pub settlement: Arc<SettlementService>,
    pub gateway: Arc<GatewayClient>,
    pub notify: Arc<NotifyConfig>,
}

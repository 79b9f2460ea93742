//! TOML file configuration structures.
//!
//! These structs map directly to the `billgate.toml` file format.

use billgate_gateway::config::GatewayConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Gateway connection section; shape shared with the protocol crate.
    pub gateway: GatewayConfig,
    pub notify: NotifyConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Webhook and redirect URL construction.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Public base URL of this panel, reachable by the gateway.
    pub public_url: Url,
    /// Where payers land after completing payment.
    pub return_url: Url,
}

/// Reminder sweep settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_reminder_interval")]
    pub interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_reminder_interval(),
        }
    }
}

fn default_reminder_interval() -> u64 {
    1800
}

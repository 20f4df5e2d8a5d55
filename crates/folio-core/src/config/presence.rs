//! Presence gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the live presence feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Whether the presence client is started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// WebSocket URL of the presence gateway.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Discord user id to subscribe to.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Fixed delay before reconnecting after a disconnect, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
}

impl PresenceConfig {
    /// Reconnect delay as a `Duration`.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gateway_url: default_gateway_url(),
            user_id: default_user_id(),
            reconnect_delay_ms: default_reconnect_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_gateway_url() -> String {
    "wss://api.lanyard.rest/socket".to_string()
}

fn default_user_id() -> String {
    "825069530376044594".to_string()
}

fn default_reconnect_delay() -> u64 {
    5000
}

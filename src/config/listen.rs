//! WebSocket listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

/// WebSocket listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (default: "0.0.0.0:4000").
    #[serde(default = "default_address")]
    pub address: SocketAddr,
    /// Allowed origins for CORS (e.g., `["https://example.com"]`).
    /// Empty list allows all origins.
    #[serde(default)]
    pub allow_origins: Vec<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            allow_origins: Vec::new(),
        }
    }
}

impl ListenConfig {
    /// Whether a request from `origin` may upgrade.
    ///
    /// Requests without an Origin header are always allowed; only browsers send one.
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        if self.allow_origins.is_empty() {
            return true;
        }
        match origin {
            Some(origin) => self.allow_origins.iter().any(|a| a == origin || a == "*"),
            None => true,
        }
    }
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 4000))
}

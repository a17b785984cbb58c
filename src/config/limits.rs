//! Queue and frame size limits.

use serde::Deserialize;

/// Queue and frame size limits.
///
/// Outbound queues are never waited on: when a connection's queue is
/// full, frames for it are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Outbound frames buffered per connection (default: 256).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
    /// Presence actor mailbox capacity (default: 1024).
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,
    /// Largest inbound text frame accepted, in bytes (default: 65536).
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            outbound_queue: default_outbound_queue(),
            event_queue: default_event_queue(),
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

fn default_outbound_queue() -> usize {
    256
}

fn default_event_queue() -> usize {
    1024
}

fn default_max_frame_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let config = LimitsConfig::default();
        assert_eq!(config.outbound_queue, 256);
        assert_eq!(config.event_queue, 1024);
        assert_eq!(config.max_frame_bytes, 65536);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config: LimitsConfig = toml::from_str("outbound_queue = 8").unwrap();
        assert_eq!(config.outbound_queue, 8);
        assert_eq!(config.event_queue, 1024);
    }
}

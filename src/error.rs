//! Unified error handling for presenced.
//!
//! Nothing in here is ever sent to a client: connection rejections close
//! the socket, handler drops are logged and counted, and the process
//! keeps running.

use thiserror::Error;

// ============================================================================
// Connection Gate
// ============================================================================

/// Reasons the connection gate refuses a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("missing handshake headers: {}", .0.join(", "))]
    MissingHeaders(Vec<&'static str>),
}

// ============================================================================
// Handler outcomes
// ============================================================================

/// Why an inbound event was dropped without touching presence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("area entry without a usable profile, room, or area id")]
    InvalidAreaPayload,

    #[error("event not permitted for this connection role")]
    RoleNotPermitted,

    #[error("event arrived from a socket that is not attached")]
    UnknownSocket,
}

impl DropReason {
    /// Get a static label for metrics.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidAreaPayload => "invalid_area_payload",
            Self::RoleNotPermitted => "role_not_permitted",
            Self::UnknownSocket => "unknown_socket",
        }
    }
}

/// Result of running one presence handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// Registries were updated and events emitted.
    Applied,
    /// The event was ignored.
    Dropped(DropReason),
}

// ============================================================================
// Connection task
// ============================================================================

/// Errors that end a connection task.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("presence actor is gone")]
    ActorGone,
}

//! Error types for the presence protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// The frame was not valid JSON or did not match the envelope shape.
    #[error("invalid frame: {0}")]
    InvalidFrame(#[source] serde_json::Error),

    /// The event name is not one the server understands.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The event name was recognised but its payload did not decode.
    #[error("malformed payload for {event}: {source}")]
    MalformedPayload {
        /// Event whose payload failed to decode.
        event: &'static str,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The frame could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// A WebSocket message that cannot carry a frame (binary, ping, ...).
    #[error("unsupported websocket message")]
    UnsupportedMessage,
}

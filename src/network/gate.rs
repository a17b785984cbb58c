//! Connection Gate.
//!
//! Inspects the upgrade request once, before any event can be handled.
//! A connection that fails the gate is closed without ever reaching the
//! presence actor.

use crate::error::GateError;
use presence_proto::{HandshakeIdentity, REQUIRED_HEADERS};
use tokio_tungstenite::tungstenite::http::HeaderMap;

/// Check the handshake headers and build the connection identity.
pub fn admit(headers: &HeaderMap) -> Result<HandshakeIdentity, GateError> {
    HandshakeIdentity::from_headers(headers).map_err(GateError::MissingHeaders)
}

/// Gate result for a handshake whose headers were never seen.
pub fn unseen() -> GateError {
    GateError::MissingHeaders(REQUIRED_HEADERS.to_vec())
}

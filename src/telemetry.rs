//! Standardized span constructors for presence observability.

use tracing::{Span, info_span};

/// Create a span for a client connection.
pub fn connection(socket_id: &str, addr: &str) -> Span {
    info_span!("connection", socket_id = %socket_id, addr = %addr)
}

/// Create a span for one inbound event.
pub fn event(name: &str, socket_id: &str) -> Span {
    info_span!("event", name = %name, socket_id = %socket_id)
}

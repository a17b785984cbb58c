//! Event delivery.
//!
//! Destinations are resolved to outbound queues by `socketId` at send
//! time. Delivery never waits: a full or closed queue loses the frame
//! for that destination only.

use super::super::PresenceActor;
use presence_proto::{OutboundEvent, UserRecord};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error};

/// Who receives an emitted event.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Destination<'a> {
    /// A single connection.
    Socket(&'a str),
    /// The connection of every listed record. An empty list reaches nobody.
    Users(&'a [UserRecord]),
    /// Every attached connection.
    Everyone,
}

impl PresenceActor {
    /// Deliver `event` to `destination`. Returns how many queues accepted it.
    pub(crate) fn send(&self, event: &OutboundEvent, destination: Destination<'_>) -> usize {
        let frame = match event.to_frame().and_then(|f| f.encode()) {
            Ok(text) => Arc::<str>::from(text),
            Err(e) => {
                error!(event = event.name(), error = %e, "Failed to encode outbound event");
                return 0;
            }
        };

        let targets: Vec<&str> = match destination {
            Destination::Socket(socket_id) => vec![socket_id],
            Destination::Users(users) => users
                .iter()
                .filter_map(|u| u.socket_id.as_deref())
                .collect(),
            Destination::Everyone => self.sockets.keys().map(String::as_str).collect(),
        };

        let mut delivered = 0;
        for socket_id in targets {
            if self.deliver(socket_id, &frame) {
                delivered += 1;
            }
        }

        debug!(event = event.name(), recipients = delivered, "Event emitted");
        crate::metrics::record_fanout(delivered);
        delivered
    }

    fn deliver(&self, socket_id: &str, frame: &Arc<str>) -> bool {
        let Some(socket) = self.sockets.get(socket_id) else {
            debug!(socket_id, "No attached connection for destination");
            return false;
        };
        match socket.outbound.try_send(Arc::clone(frame)) {
            Ok(()) => {
                crate::metrics::record_frame_sent();
                true
            }
            Err(TrySendError::Full(_)) => {
                debug!(socket_id, "Outbound queue full, frame dropped");
                crate::metrics::record_frame_dropped();
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(socket_id, "Outbound queue closed, frame dropped");
                crate::metrics::record_frame_dropped();
                false
            }
        }
    }

    /// Send `server-emit-visitor-joined` with `entries` to every visitor observing `uid`.
    ///
    /// Nothing is sent when `entries` is empty.
    pub(crate) fn notify_visitors(&self, uid: Option<&str>, entries: Vec<UserRecord>) {
        if entries.is_empty() {
            return;
        }
        let event = OutboundEvent::VisitorJoined(entries);
        for visitor in self.registries.visitors.iter().filter(|v| v.observes(uid)) {
            self.send(&event, Destination::Socket(&visitor.socket_id));
        }
    }
}

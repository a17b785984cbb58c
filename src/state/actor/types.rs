use crate::state::SocketId;
use presence_proto::{HandshakeIdentity, InboundEvent, UserRecord, VisitorRecord};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// An encoded frame queued for one connection.
pub type Outbound = Arc<str>;

/// Events that can be sent to the presence actor.
#[derive(Debug)]
pub enum PresenceEvent {
    /// A connection passed the gate.
    Attach {
        socket_id: SocketId,
        identity: HandshakeIdentity,
        outbound: mpsc::Sender<Outbound>,
    },
    /// A decoded client event.
    Inbound {
        socket_id: SocketId,
        event: InboundEvent,
    },
    /// The transport closed.
    Disconnected { socket_id: SocketId },
    /// Copy of the current state, for diagnostics.
    Snapshot {
        reply_tx: oneshot::Sender<PresenceSnapshot>,
    },
}

/// Point-in-time copy of the presence state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresenceSnapshot {
    pub active_area_users: Vec<UserRecord>,
    pub users_pending_area_entry: Vec<UserRecord>,
    pub visitors: Vec<VisitorRecord>,
    pub areas: BTreeMap<String, BTreeSet<SocketId>>,
    pub connections: usize,
}

impl PresenceSnapshot {
    /// Whether any registry still references `socket_id`.
    #[cfg(test)]
    pub fn references_socket(&self, socket_id: &str) -> bool {
        let wanted = Some(socket_id);
        self.active_area_users
            .iter()
            .chain(&self.users_pending_area_entry)
            .any(|u| u.socket_id.as_deref() == wanted)
            || self.visitors.iter().any(|v| v.socket_id == socket_id)
    }
}

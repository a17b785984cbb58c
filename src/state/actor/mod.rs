//! Actor model for presence state.
//!
//! The `PresenceActor` owns every presence registry in a single Tokio
//! task. Connection tasks talk to it only through [`PresenceEvent`]s.
//!
//! # Architecture
//!
//! - **State Ownership**: the actor owns the registries, the area channel
//!   grouping, and the outbound queue of every attached connection.
//! - **Message Passing**: connections send events through a [`PresenceHandle`].
//! - **Run to completion**: each event is handled synchronously before the
//!   next is received, so handlers never interleave their registry
//!   mutations and later steps of a handler always see the writes of
//!   earlier steps.

use crate::error::{DropReason, HandlerOutcome};
use crate::state::{AreaChannels, Registries, SocketId};
use presence_proto::{HandshakeIdentity, InboundEvent, Role};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

mod handlers;
mod types;

pub use types::*;

/// A connection that passed the gate.
#[derive(Debug)]
struct AttachedSocket {
    identity: HandshakeIdentity,
    outbound: mpsc::Sender<Outbound>,
}

/// The Presence Actor.
#[derive(Debug, Default)]
pub struct PresenceActor {
    registries: Registries,
    areas: AreaChannels,
    sockets: HashMap<SocketId, AttachedSocket>,
}

impl PresenceActor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Presence Actor and spawn it.
    pub fn spawn(capacity: usize) -> PresenceHandle {
        let (tx, rx) = mpsc::channel(capacity);
        let actor = Self::new();

        tokio::spawn(async move {
            actor.run(rx).await;
        });

        PresenceHandle { tx }
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<PresenceEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!("Presence actor stopped");
    }

    /// Handle one event to completion.
    pub fn handle_event(&mut self, event: PresenceEvent) {
        match event {
            PresenceEvent::Attach {
                socket_id,
                identity,
                outbound,
            } => {
                self.attach(socket_id, identity, outbound);
            }
            PresenceEvent::Inbound { socket_id, event } => {
                let name = event.name();
                let _span = crate::telemetry::event(name, &socket_id).entered();
                match self.dispatch(&socket_id, event) {
                    HandlerOutcome::Applied => crate::metrics::record_event(name),
                    HandlerOutcome::Dropped(reason) => {
                        debug!(%reason, "Event dropped");
                        crate::metrics::record_dropped_event(reason.label());
                    }
                }
            }
            PresenceEvent::Disconnected { socket_id } => {
                let _span = crate::telemetry::event("disconnect", &socket_id).entered();
                self.handle_disconnected(&socket_id);
                crate::metrics::record_event("disconnect");
            }
            PresenceEvent::Snapshot { reply_tx } => {
                let _ = reply_tx.send(self.snapshot());
                return;
            }
        }
        self.publish_sizes();
    }

    fn attach(
        &mut self,
        socket_id: SocketId,
        identity: HandshakeIdentity,
        outbound: mpsc::Sender<Outbound>,
    ) {
        info!(
            socket_id = %socket_id,
            subject = %identity.subject,
            role = %identity.role,
            "Connection attached"
        );
        if let Some(previous) = self
            .sockets
            .insert(socket_id, AttachedSocket { identity, outbound })
        {
            warn!(subject = %previous.identity.subject, "Replaced an attached socket with the same id");
        }
    }

    /// Route an inbound event to the handler attached for the connection's role.
    fn dispatch(&mut self, socket_id: &str, event: InboundEvent) -> HandlerOutcome {
        let Some(role) = self.sockets.get(socket_id).map(|s| s.identity.role.clone()) else {
            return HandlerOutcome::Dropped(DropReason::UnknownSocket);
        };

        match event {
            InboundEvent::UserJoined(record) => self.handle_user_joined(socket_id, record),
            InboundEvent::UserJoinedAnArea(entry) => {
                self.handle_user_joined_an_area(socket_id, entry)
            }
            InboundEvent::VisitorJoined(announcement) => {
                if role == Role::Visitor {
                    self.handle_visitor_joined(socket_id, announcement)
                } else {
                    HandlerOutcome::Dropped(DropReason::RoleNotPermitted)
                }
            }
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            active_area_users: self.registries.active_area_users.to_vec(),
            users_pending_area_entry: self.registries.users_pending_area_entry.to_vec(),
            visitors: self.registries.visitors.to_vec(),
            areas: self.areas.to_map(),
            connections: self.sockets.len(),
        }
    }

    fn publish_sizes(&self) {
        crate::metrics::set_connections(self.sockets.len());
        crate::metrics::set_registry_size("active_area_users", self.registries.active_area_users.len());
        crate::metrics::set_registry_size(
            "users_pending_area_entry",
            self.registries.users_pending_area_entry.len(),
        );
        crate::metrics::set_registry_size("visitors", self.registries.visitors.len());
        crate::metrics::set_registry_size("areas", self.areas.len());
    }
}

/// Cloneable sender side of the presence actor.
#[derive(Debug, Clone)]
pub struct PresenceHandle {
    tx: mpsc::Sender<PresenceEvent>,
}

impl PresenceHandle {
    /// Register a connection that passed the gate.
    pub async fn attach(
        &self,
        socket_id: SocketId,
        identity: HandshakeIdentity,
        outbound: mpsc::Sender<Outbound>,
    ) -> Result<(), crate::error::ConnectionError> {
        self.send(PresenceEvent::Attach {
            socket_id,
            identity,
            outbound,
        })
        .await
    }

    /// Forward a decoded client event.
    pub async fn inbound(
        &self,
        socket_id: SocketId,
        event: InboundEvent,
    ) -> Result<(), crate::error::ConnectionError> {
        self.send(PresenceEvent::Inbound { socket_id, event }).await
    }

    /// Report a closed transport.
    pub async fn disconnected(&self, socket_id: SocketId) -> Result<(), crate::error::ConnectionError> {
        self.send(PresenceEvent::Disconnected { socket_id }).await
    }

    /// Fetch a copy of the current state. `None` if the actor has stopped.
    pub async fn snapshot(&self) -> Option<PresenceSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(PresenceEvent::Snapshot { reply_tx }).await.ok()?;
        reply_rx.await.ok()
    }

    async fn send(&self, event: PresenceEvent) -> Result<(), crate::error::ConnectionError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| crate::error::ConnectionError::ActorGone)
    }
}

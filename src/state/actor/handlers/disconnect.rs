//! Transport close.

use super::super::PresenceActor;
use super::broadcast::Destination;
use presence_proto::{OutboundEvent, UserRecord, VisitorRecord};
use tracing::info;

impl PresenceActor {
    /// Forget every record owned by `socket_id` and tell the remaining area users.
    pub(crate) fn handle_disconnected(&mut self, socket_id: &str) {
        let key = Some(socket_id);
        let active = self
            .registries
            .active_area_users
            .remove_by_key(key, UserRecord::by_socket);
        let pending = self
            .registries
            .users_pending_area_entry
            .remove_by_key(key, UserRecord::by_socket);
        let visitors = self
            .registries
            .visitors
            .remove_by_key(key, VisitorRecord::by_socket);
        let areas = self.areas.leave_all(socket_id);
        let attached = self.sockets.remove(socket_id).is_some();

        info!(
            socket_id,
            attached,
            active,
            pending,
            visitors,
            areas = areas.len(),
            "Connection detached"
        );

        // Every remaining member hears it; only uid-bearing entries are listed.
        let remaining: Vec<UserRecord> = self
            .registries
            .active_area_users
            .filter(|u| u.socket_id.as_deref() != key);
        self.send(
            &OutboundEvent::UserLeftOrLoggedOut(self.registries.active_with_uid()),
            Destination::Users(&remaining),
        );
    }
}

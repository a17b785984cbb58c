//! `client-emit-visitor-joined`.

use super::super::PresenceActor;
use super::broadcast::Destination;
use crate::error::HandlerOutcome;
use crate::state::UpdateOutcome;
use presence_proto::{OutboundEvent, UserRecord, VisitorAnnouncement, VisitorRecord};
use tracing::debug;

impl PresenceActor {
    /// Register a visitor and tell it which of its hosts are already present.
    pub(crate) fn handle_visitor_joined(
        &mut self,
        socket_id: &str,
        announcement: VisitorAnnouncement,
    ) -> HandlerOutcome {
        let visitor = VisitorRecord {
            host_ids: announcement.host_ids,
            socket_id: socket_id.to_string(),
            extra: announcement.extra,
        };

        let visitors = &mut self.registries.visitors;
        if !visitors.add_if_absent(visitor.clone(), VisitorRecord::by_socket)
            && visitors.merge_update(visitor.clone(), VisitorRecord::by_socket) == UpdateOutcome::Merged
        {
            debug!(hosts = ?visitor.host_ids, "Visitor hosts replaced");
        }

        let present = self.present_hosts(&visitor.host_ids);
        if !present.is_empty() {
            self.send(
                &OutboundEvent::VisitorJoined(present),
                Destination::Socket(socket_id),
            );
        }

        HandlerOutcome::Applied
    }

    /// Area entries of the listed hosts, then pending entries of hosts not yet in an area.
    fn present_hosts(&self, host_ids: &[String]) -> Vec<UserRecord> {
        let find = |set: &crate::state::PresenceSet<UserRecord>, host: &String| {
            set.find(Some(host.as_str()), UserRecord::by_uid).cloned()
        };
        let active = &self.registries.active_area_users;
        let pending = &self.registries.users_pending_area_entry;

        let mut present: Vec<UserRecord> = host_ids.iter().filter_map(|h| find(active, h)).collect();
        present.extend(
            host_ids
                .iter()
                .filter(|h| active.find(Some(h.as_str()), UserRecord::by_uid).is_none())
                .filter_map(|h| find(pending, h)),
        );
        present
    }
}

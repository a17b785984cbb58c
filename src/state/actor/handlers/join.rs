//! `client-emit-user-joined`.

use super::super::PresenceActor;
use super::broadcast::Destination;
use crate::error::HandlerOutcome;
use presence_proto::{OutboundEvent, UserRecord};
use tracing::debug;

impl PresenceActor {
    /// Announce a user: park them as pending area entry and pull them out of any area.
    pub(crate) fn handle_user_joined(
        &mut self,
        socket_id: &str,
        record: UserRecord,
    ) -> HandlerOutcome {
        let uid = record.uid.clone();

        if record.role.as_ref().is_some_and(|r| r.is_user()) {
            let pending = record.with_socket(socket_id);
            if !self
                .registries
                .users_pending_area_entry
                .add_if_absent(pending, UserRecord::by_uid)
            {
                debug!(uid = ?uid, "Already pending area entry, existing record kept");
            }
        }

        let left = self
            .registries
            .active_area_users
            .remove_by_key(uid.as_deref(), UserRecord::by_uid);
        if left > 0 {
            debug!(uid = ?uid, "Left area on re-join");
        }

        let active = self.registries.active_with_uid();
        self.send(
            &OutboundEvent::UserJoined(active.clone()),
            Destination::Users(&active),
        );

        let pending = self
            .registries
            .users_pending_area_entry
            .filter(|u| u.uid == uid);
        self.notify_visitors(uid.as_deref(), pending);

        HandlerOutcome::Applied
    }
}

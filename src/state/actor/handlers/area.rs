//! `client-emit-user-joined-an-area`.

use super::super::PresenceActor;
use super::broadcast::Destination;
use crate::error::{DropReason, HandlerOutcome};
use crate::state::UpdateOutcome;
use presence_proto::{AreaEntry, OutboundEvent, UserRecord};
use tracing::{debug, info};

/// Room names containing either marker never enter an area.
const FORBIDDEN_ROOM_MARKERS: [&str; 2] = ["undefined", "visitor"];

/// Split a valid area entry into the profile, its room, and the area id.
fn validate(entry: AreaEntry) -> Option<(UserRecord, String, String)> {
    let profile = entry.local_profile?;
    let room = profile.room.clone().filter(|r| !r.is_empty())?;
    if FORBIDDEN_ROOM_MARKERS.iter().any(|m| room.contains(m)) {
        return None;
    }
    let area_id = entry.last_area_id.filter(|a| !a.is_empty())?;
    Some((profile, room, area_id))
}

impl PresenceActor {
    /// Move a user into an area and tell every connection.
    pub(crate) fn handle_user_joined_an_area(
        &mut self,
        socket_id: &str,
        entry: AreaEntry,
    ) -> HandlerOutcome {
        let Some((profile, room, area_id)) = validate(entry) else {
            return HandlerOutcome::Dropped(DropReason::InvalidAreaPayload);
        };

        let mut joined = profile.with_socket(socket_id);
        joined.user_in_this_area = Some(area_id);
        let uid = joined.uid.clone();

        let active = &mut self.registries.active_area_users;
        let _ = active.add_if_absent(joined.clone(), UserRecord::by_uid);
        if active.merge_update(joined, UserRecord::by_uid) == UpdateOutcome::Missed {
            info!(uid = ?uid, "No matching record found to update");
        }

        self.registries
            .users_pending_area_entry
            .remove_by_key(uid.as_deref(), UserRecord::by_uid);

        if self.areas.join(&room, socket_id) {
            debug!(room = %room, members = self.areas.members(&room).len(), "Joined area channel");
        }

        // Every connection hears about it, not just the area's members.
        let active = self.registries.active_with_uid();
        let entries: Vec<UserRecord> = active.iter().filter(|u| u.uid == uid).cloned().collect();
        self.send(
            &OutboundEvent::UserJoinedAnArea(active),
            Destination::Everyone,
        );

        self.notify_visitors(uid.as_deref(), entries);

        HandlerOutcome::Applied
    }
}

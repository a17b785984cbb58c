//! Presence registries.
//!
//! A [`PresenceSet`] is an insertion-ordered collection whose uniqueness
//! is defined by a caller-supplied key function. Absent keys compare
//! equal to each other, so at most one keyless record survives an
//! `add_if_absent` and `remove_by_key(None, ..)` clears every keyless one.

use presence_proto::{Merge, UserRecord, VisitorRecord};

/// Outcome of [`PresenceSet::merge_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum UpdateOutcome {
    /// An entry with the same key was updated in place.
    Merged,
    /// No entry matched; nothing changed.
    Missed,
}

/// An insertion-ordered set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceSet<T> {
    entries: Vec<T>,
}

impl<T> Default for PresenceSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> PresenceSet<T> {
    /// Insert `record` unless an entry with the same key exists.
    ///
    /// An existing entry is left untouched; the new record's fields are dropped.
    pub fn add_if_absent<K>(&mut self, record: T, key: K) -> bool
    where
        K: for<'a> Fn(&'a T) -> Option<&'a str>,
    {
        let wanted = key(&record);
        if self.entries.iter().any(|e| key(e) == wanted) {
            return false;
        }
        self.entries.push(record);
        true
    }

    /// Remove every entry whose key equals `wanted`. Returns how many were removed.
    pub fn remove_by_key<K>(&mut self, wanted: Option<&str>, key: K) -> usize
    where
        K: for<'a> Fn(&'a T) -> Option<&'a str>,
    {
        let before = self.entries.len();
        self.entries.retain(|e| key(e) != wanted);
        before - self.entries.len()
    }

    /// Merge `record` into the first entry sharing its key.
    pub fn merge_update<K>(&mut self, record: T, key: K) -> UpdateOutcome
    where
        T: Merge,
        K: for<'a> Fn(&'a T) -> Option<&'a str>,
    {
        let position = {
            let wanted = key(&record);
            self.entries.iter().position(|e| key(e) == wanted)
        };
        match position {
            Some(index) => {
                self.entries[index].merge(record);
                UpdateOutcome::Merged
            }
            None => UpdateOutcome::Missed,
        }
    }

    /// Clone out every entry matching `predicate`, in insertion order.
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        T: Clone,
        P: Fn(&T) -> bool,
    {
        self.entries.iter().filter(|e| predicate(*e)).cloned().collect()
    }

    /// First entry whose key equals `wanted`.
    pub fn find<K>(&self, wanted: Option<&str>, key: K) -> Option<&T>
    where
        K: for<'a> Fn(&'a T) -> Option<&'a str>,
    {
        self.entries.iter().find(|e| key(e) == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.clone()
    }
}

/// The presence registries owned by the presence actor.
#[derive(Debug, Default)]
pub struct Registries {
    /// Users who have entered an area. One entry per `uid`.
    pub active_area_users: PresenceSet<UserRecord>,
    /// Identified users not yet inside an area. One entry per `uid`.
    pub users_pending_area_entry: PresenceSet<UserRecord>,
    /// Connected visitors. One entry per `socketId`.
    pub visitors: PresenceSet<VisitorRecord>,
}

impl Registries {
    /// Active area users that carry a `uid`.
    ///
    /// Both broadcast payloads and broadcast destinations are drawn from this list.
    pub fn active_with_uid(&self) -> Vec<UserRecord> {
        self.active_area_users.filter(UserRecord::has_uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_proto::Attributes;
    use serde_json::json;

    fn user(uid: Option<&str>, socket: &str) -> UserRecord {
        UserRecord {
            uid: uid.map(str::to_string),
            socket_id: Some(socket.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn add_if_absent_keeps_first_record() {
        let mut set = PresenceSet::default();
        assert!(set.add_if_absent(user(Some("u1"), "s1"), UserRecord::by_uid));
        assert!(!set.add_if_absent(user(Some("u1"), "s2"), UserRecord::by_uid));

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().socket_id.as_deref(), Some("s1"));
    }

    #[test]
    fn keyless_records_collide_with_each_other() {
        let mut set = PresenceSet::default();
        assert!(set.add_if_absent(user(None, "s1"), UserRecord::by_uid));
        assert!(!set.add_if_absent(user(None, "s2"), UserRecord::by_uid));
        assert!(set.add_if_absent(user(Some("u1"), "s3"), UserRecord::by_uid));

        assert_eq!(set.remove_by_key(None, UserRecord::by_uid), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_by_socket_removes_every_match() {
        let mut set = PresenceSet::default();
        let _ = set.add_if_absent(user(Some("u1"), "s1"), UserRecord::by_uid);
        let _ = set.add_if_absent(user(Some("u2"), "s1"), UserRecord::by_uid);
        let _ = set.add_if_absent(user(Some("u3"), "s2"), UserRecord::by_uid);

        assert_eq!(set.remove_by_key(Some("s1"), UserRecord::by_socket), 2);
        assert_eq!(set.filter(|_| true), vec![user(Some("u3"), "s2")]);
    }

    #[test]
    fn merge_update_merges_into_existing_entry() {
        let mut set = PresenceSet::default();
        let _ = set.add_if_absent(user(Some("u1"), "s1"), UserRecord::by_uid);

        let mut patch = user(Some("u1"), "s2");
        patch.extra.insert("color".into(), json!("teal"));

        assert_eq!(set.merge_update(patch, UserRecord::by_uid), UpdateOutcome::Merged);
        let merged = set.find(Some("u1"), UserRecord::by_uid).unwrap();
        assert_eq!(merged.socket_id.as_deref(), Some("s2"));
        assert_eq!(merged.extra["color"], "teal");
    }

    #[test]
    fn merge_update_without_match_is_a_miss() {
        let mut set: PresenceSet<UserRecord> = PresenceSet::default();
        assert_eq!(
            set.merge_update(user(Some("ghost"), "s1"), UserRecord::by_uid),
            UpdateOutcome::Missed
        );
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn visitors_are_unique_by_socket() {
        let mut set = PresenceSet::default();
        let visitor = |hosts: &[&str]| VisitorRecord {
            host_ids: hosts.iter().map(|h| h.to_string()).collect(),
            socket_id: "v1".into(),
            extra: Attributes::new(),
        };
        assert!(set.add_if_absent(visitor(&["u1"]), VisitorRecord::by_socket));
        assert!(!set.add_if_absent(visitor(&["u2"]), VisitorRecord::by_socket));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn active_with_uid_skips_guests() {
        let mut registries = Registries::default();
        let _ = registries
            .active_area_users
            .add_if_absent(user(None, "s0"), UserRecord::by_uid);
        let _ = registries
            .active_area_users
            .add_if_absent(user(Some("u1"), "s1"), UserRecord::by_uid);

        assert_eq!(registries.active_with_uid(), vec![user(Some("u1"), "s1")]);
    }
}

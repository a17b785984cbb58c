//! Area channel grouping.
//!
//! Tracks which connections have entered which named area so delivery can
//! be scoped to an area. Membership is dropped when the connection closes.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::SocketId;

#[derive(Debug, Default)]
pub struct AreaChannels {
    members: HashMap<String, HashSet<SocketId>>,
    joined: HashMap<SocketId, HashSet<String>>,
}

impl AreaChannels {
    /// Add `socket_id` to `area`. Returns false if it was already a member.
    pub fn join(&mut self, area: &str, socket_id: &str) -> bool {
        let added = self
            .members
            .entry(area.to_string())
            .or_default()
            .insert(socket_id.to_string());
        self.joined
            .entry(socket_id.to_string())
            .or_default()
            .insert(area.to_string());
        added
    }

    /// Remove `socket_id` from every area, dropping areas left empty.
    pub fn leave_all(&mut self, socket_id: &str) -> Vec<String> {
        let Some(areas) = self.joined.remove(socket_id) else {
            return Vec::new();
        };
        for area in &areas {
            if let Some(members) = self.members.get_mut(area) {
                members.remove(socket_id);
                if members.is_empty() {
                    self.members.remove(area);
                }
            }
        }
        areas.into_iter().collect()
    }

    /// Connections currently grouped under `area`.
    pub fn members(&self, area: &str) -> Vec<SocketId> {
        self.members
            .get(area)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Sorted view of every area and its members.
    pub fn to_map(&self) -> BTreeMap<String, BTreeSet<SocketId>> {
        self.members
            .iter()
            .map(|(area, members)| (area.clone(), members.iter().cloned().collect()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_idempotent() {
        let mut areas = AreaChannels::default();
        assert!(areas.join("lobby-1", "s1"));
        assert!(!areas.join("lobby-1", "s1"));
        assert_eq!(areas.members("lobby-1"), vec!["s1".to_string()]);
    }

    #[test]
    fn leave_all_clears_every_area_and_empty_groups() {
        let mut areas = AreaChannels::default();
        areas.join("lobby-1", "s1");
        areas.join("lobby-2", "s1");
        areas.join("lobby-2", "s2");

        let mut left = areas.leave_all("s1");
        left.sort();
        assert_eq!(left, vec!["lobby-1".to_string(), "lobby-2".to_string()]);
        assert!(areas.members("lobby-1").is_empty());
        assert_eq!(areas.members("lobby-2"), vec!["s2".to_string()]);
        assert_eq!(areas.len(), 1);
    }

    #[test]
    fn leave_all_for_unknown_socket_is_harmless() {
        let mut areas = AreaChannels::default();
        assert!(areas.leave_all("nobody").is_empty());
    }
}

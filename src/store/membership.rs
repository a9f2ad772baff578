//! Room membership directory
//!
//! The membership oracle consumed by sprinkle creation. The core only asks
//! "how many eligible participants are in this room"; who maintains the
//! roster is outside the claim protocol.

use std::collections::HashSet;

use dashmap::DashMap;

/// In-memory roster of room members.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    members: DashMap<String, HashSet<i64>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user to a room. Returns false if already a member.
    pub fn join(&self, room_id: impl Into<String>, user_id: i64) -> bool {
        self.members.entry(room_id.into()).or_default().insert(user_id)
    }

    /// Number of eligible participants in a room.
    pub fn member_count(&self, room_id: &str) -> usize {
        self.members
            .get(room_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }
}

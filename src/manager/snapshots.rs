use chrono::{DateTime, Local};

use super::or_default;
use crate::model::{SnapshotDelta, StateSnapshot, deltas};
use crate::storage::SqliteStorage;

/// Cached snapshot history, either one room's or everyone's.
#[derive(Debug, Default)]
pub struct SnapshotManager {
    snapshots: Vec<StateSnapshot>,
}

impl SnapshotManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }

    /// Record the room's current counts and reload its history.
    pub fn take_snapshot(
        &mut self,
        storage: &mut SqliteStorage,
        room_id: i64,
        now: DateTime<Local>,
    ) -> Option<i64> {
        let id = or_default(
            "insert_snapshot",
            storage.insert_snapshot(room_id, now.timestamp_millis()).map(Some),
        );
        self.load_for_room(storage, room_id);
        id
    }

    pub fn load_for_room(&mut self, storage: &SqliteStorage, room_id: i64) {
        self.snapshots = or_default(
            "list_snapshots_for_room",
            storage.list_snapshots_for_room(room_id),
        );
    }

    pub fn load_all(&mut self, storage: &SqliteStorage) {
        self.snapshots = or_default("list_all_snapshots", storage.list_all_snapshots());
    }

    /// Changes between consecutive cached snapshots of a room.
    #[must_use]
    pub fn deltas_for_room(&self, room_id: i64) -> Vec<SnapshotDelta> {
        deltas(&self.snapshots, room_id)
    }
}

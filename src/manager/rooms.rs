use chrono::{DateTime, Local};
use tracing::debug;

use super::or_default;
use crate::model::{Room, RoomIcon, RoomUpdate};
use crate::storage::SqliteStorage;

/// Cached room list in display order.
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: Vec<Room>,
}

impl RoomManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Replace the cache with fresh rooms and counts.
    pub fn load(&mut self, storage: &SqliteStorage, now: DateTime<Local>) {
        self.rooms = or_default("list_rooms", storage.list_rooms(now));
        debug!(count = self.rooms.len(), "Loaded rooms");
    }

    /// Returns the new room's ID, or `None` if the insert failed.
    pub fn add_room(
        &mut self,
        storage: &mut SqliteStorage,
        name: &str,
        icon: RoomIcon,
        now: DateTime<Local>,
    ) -> Option<i64> {
        let id = or_default("insert_room", storage.insert_room(name, icon).map(Some));
        self.load(storage, now);
        id
    }

    pub fn update_room(
        &mut self,
        storage: &mut SqliteStorage,
        id: i64,
        update: &RoomUpdate,
        now: DateTime<Local>,
    ) -> bool {
        let updated = or_default("update_room", storage.update_room(id, update));
        self.load(storage, now);
        updated
    }

    pub fn delete_room(&mut self, storage: &mut SqliteStorage, id: i64, now: DateTime<Local>) -> bool {
        let deleted = or_default("delete_room", storage.delete_room(id));
        self.load(storage, now);
        deleted
    }

    /// Mark decluttered; returns how many default tasks were seeded.
    pub fn mark_decluttered(
        &mut self,
        storage: &mut SqliteStorage,
        id: i64,
        now: DateTime<Local>,
    ) -> usize {
        let seeded = or_default("mark_room_decluttered", storage.mark_room_decluttered(id));
        self.load(storage, now);
        seeded
    }

    pub fn move_room(
        &mut self,
        storage: &mut SqliteStorage,
        id: i64,
        position: usize,
        now: DateTime<Local>,
    ) -> bool {
        let moved = or_default("move_room", storage.move_room(id, position));
        self.load(storage, now);
        moved
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn decluttered_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_decluttered)
    }

    pub fn undecluttered_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| !r.is_decluttered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_add_and_partition() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut manager = RoomManager::new();

        let kitchen = manager
            .add_room(&mut storage, "Kitchen", RoomIcon::Kitchen, now())
            .unwrap();
        manager.add_room(&mut storage, "Den", RoomIcon::LivingRoom, now());
        assert_eq!(manager.rooms().len(), 2);

        assert_eq!(manager.mark_decluttered(&mut storage, kitchen, now()), 5);
        assert_eq!(manager.decluttered_rooms().count(), 1);
        assert_eq!(manager.undecluttered_rooms().count(), 1);
        assert_eq!(manager.get(kitchen).unwrap().task_count, 5);
    }

    #[test]
    fn test_update_move_delete() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut manager = RoomManager::new();
        let a = manager.add_room(&mut storage, "A", RoomIcon::Other, now()).unwrap();
        let b = manager.add_room(&mut storage, "B", RoomIcon::Other, now()).unwrap();

        let update = RoomUpdate {
            icon: Some(RoomIcon::Attic),
            ..RoomUpdate::default()
        };
        assert!(manager.update_room(&mut storage, a, &update, now()));
        assert_eq!(manager.get(a).unwrap().icon, RoomIcon::Attic);

        assert!(manager.move_room(&mut storage, b, 0, now()));
        assert_eq!(manager.rooms()[0].id, b);

        assert!(manager.delete_room(&mut storage, a, now()));
        assert!(manager.get(a).is_none());
        assert!(!manager.delete_room(&mut storage, a, now()));
    }

    #[test]
    fn test_failed_insert_degrades_to_none() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage
            .conn()
            .execute_batch(
                "DROP TABLE state_snapshots;
                 DROP TABLE cleaning_logs;
                 DROP TABLE cleaning_tasks;
                 DROP TABLE declutter_items;
                 DROP TABLE rooms;",
            )
            .unwrap();

        let mut manager = RoomManager::new();
        assert!(manager.add_room(&mut storage, "Nowhere", RoomIcon::Other, now()).is_none());
        assert!(manager.rooms().is_empty());
    }
}

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use super::or_default;
use crate::model::{CleaningTask, RoomIcon, TaskFrequency, TaskUpdate};
use crate::schedule;
use crate::storage::SqliteStorage;

/// Due tasks of one room, for grouped display.
#[derive(Debug, Clone, Serialize)]
pub struct RoomTasks {
    pub room_name: String,
    pub room_icon: RoomIcon,
    pub tasks: Vec<CleaningTask>,
}

/// Cached cleaning tasks plus the overall streak.
#[derive(Debug, Default)]
pub struct TaskManager {
    due_tasks: Vec<CleaningTask>,
    all_tasks: Vec<CleaningTask>,
    current_streak: u32,
}

impl TaskManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn due_tasks(&self) -> &[CleaningTask] {
        &self.due_tasks
    }

    #[must_use]
    pub fn all_tasks(&self) -> &[CleaningTask] {
        &self.all_tasks
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Load due tasks, every active task in decluttered rooms, and the
    /// current streak.
    pub fn load_due_tasks(&mut self, storage: &SqliteStorage, now: DateTime<Local>) {
        self.all_tasks = or_default("list_active_tasks", storage.list_active_tasks(now));
        self.due_tasks = self
            .all_tasks
            .iter()
            .filter(|t| t.is_due_today)
            .cloned()
            .collect();
        self.current_streak = or_default("current_streak", storage.current_streak(now.date_naive()));
        debug!(
            due = self.due_tasks.len(),
            active = self.all_tasks.len(),
            "Loaded tasks"
        );
    }

    /// Replace the task list with one room's active tasks.
    pub fn load_tasks_for_room(&mut self, storage: &SqliteStorage, room_id: i64, now: DateTime<Local>) {
        self.all_tasks = or_default("list_tasks_for_room", storage.list_tasks_for_room(room_id, now));
    }

    /// Log a completion at `now`. Returns the log ID.
    pub fn complete_task(&mut self, storage: &mut SqliteStorage, task_id: i64, now: DateTime<Local>) -> Option<i64> {
        let log = or_default(
            "complete_task",
            storage.complete_task(task_id, now.timestamp_millis()).map(Some),
        );
        self.load_due_tasks(storage, now);
        log
    }

    pub fn add_task(
        &mut self,
        storage: &mut SqliteStorage,
        room_id: i64,
        name: &str,
        frequency: TaskFrequency,
        now: DateTime<Local>,
    ) -> Option<i64> {
        let id = or_default("insert_task", storage.insert_task(room_id, name, frequency).map(Some));
        self.load_due_tasks(storage, now);
        id
    }

    pub fn update_task(
        &mut self,
        storage: &mut SqliteStorage,
        task_id: i64,
        update: &TaskUpdate,
        now: DateTime<Local>,
    ) -> bool {
        let updated = or_default("update_task", storage.update_task(task_id, update));
        self.load_due_tasks(storage, now);
        updated
    }

    pub fn delete_task(&mut self, storage: &mut SqliteStorage, task_id: i64, now: DateTime<Local>) -> bool {
        let deleted = or_default("delete_task", storage.delete_task(task_id));
        self.load_due_tasks(storage, now);
        deleted
    }

    /// Due tasks grouped by room name, rooms sorted by name.
    #[must_use]
    pub fn tasks_by_room(&self) -> Vec<RoomTasks> {
        let mut grouped: BTreeMap<&str, RoomTasks> = BTreeMap::new();
        for task in &self.due_tasks {
            grouped
                .entry(task.room_name.as_str())
                .or_insert_with(|| RoomTasks {
                    room_name: task.room_name.clone(),
                    room_icon: task.room_icon,
                    tasks: Vec::new(),
                })
                .tasks
                .push(task.clone());
        }
        grouped.into_values().collect()
    }

    /// Completions logged since local midnight.
    #[must_use]
    pub fn completed_today_count(&self, storage: &SqliteStorage, now: DateTime<Local>) -> usize {
        let start = schedule::start_of_day_ms(now.date_naive());
        or_default("list_logs_since", storage.list_logs_since(start)).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
    }

    fn setup() -> (SqliteStorage, i64, i64) {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let office = storage.insert_room("Office", RoomIcon::Office).unwrap();
        let attic = storage.insert_room("Attic", RoomIcon::Attic).unwrap();
        storage.mark_room_decluttered(office).unwrap();
        storage.mark_room_decluttered(attic).unwrap();
        (storage, office, attic)
    }

    #[test]
    fn test_complete_removes_from_due() {
        let (mut storage, office, _) = setup();
        let mut manager = TaskManager::new();
        manager.load_due_tasks(&storage, at(15, 12));
        assert_eq!(manager.due_tasks().len(), 5);
        assert_eq!(manager.current_streak(), 0);

        let tidy = manager
            .all_tasks()
            .iter()
            .find(|t| t.room_id == office && t.name == "Tidy desk")
            .unwrap()
            .id;
        assert!(manager.complete_task(&mut storage, tidy, at(15, 12)).is_some());
        assert_eq!(manager.due_tasks().len(), 4);
        assert_eq!(manager.current_streak(), 1);
        assert_eq!(manager.completed_today_count(&storage, at(15, 18)), 1);

        // Daily task comes back the next day
        manager.load_due_tasks(&storage, at(16, 9));
        assert_eq!(manager.due_tasks().len(), 5);
    }

    #[test]
    fn test_tasks_by_room_sorted_by_name() {
        let (storage, _, _) = setup();
        let mut manager = TaskManager::new();
        manager.load_due_tasks(&storage, at(15, 12));

        let groups = manager.tasks_by_room();
        let names: Vec<&str> = groups.iter().map(|g| g.room_name.as_str()).collect();
        assert_eq!(names, vec!["Attic", "Office"]);
        assert_eq!(groups[0].tasks.len(), 2);
        assert_eq!(groups[1].room_icon, RoomIcon::Office);
    }

    #[test]
    fn test_add_update_delete() {
        let (mut storage, office, _) = setup();
        let mut manager = TaskManager::new();
        let id = manager
            .add_task(&mut storage, office, "Water plants", TaskFrequency::Weekly, at(15, 12))
            .unwrap();
        assert_eq!(manager.all_tasks().len(), 6);

        let update = TaskUpdate {
            is_active: Some(false),
            ..TaskUpdate::default()
        };
        assert!(manager.update_task(&mut storage, id, &update, at(15, 12)));
        assert_eq!(manager.all_tasks().len(), 5);

        assert!(manager.delete_task(&mut storage, id, at(15, 12)));
        assert!(!manager.delete_task(&mut storage, id, at(15, 12)));
    }

    #[test]
    fn test_load_tasks_for_room() {
        let (storage, _, attic) = setup();
        let mut manager = TaskManager::new();
        manager.load_tasks_for_room(&storage, attic, at(15, 12));
        let names: Vec<&str> = manager.all_tasks().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Check for leaks", "Organize storage"]);
    }
}

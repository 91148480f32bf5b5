//! SQLite storage implementation.
//!
//! This module is the only place that talks SQL. Every write goes through
//! [`SqliteStorage::mutate`], which wraps the closure in an IMMEDIATE
//! transaction. Reads return rooms and tasks with their derived counts
//! and due status already filled in, computed against the `now` the
//! caller passes.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    CleaningLog, CleaningTask, DEFAULT_ROOMS, DailyCount, DeclutterItem, ItemCategory, ItemUpdate,
    NewItem, Room, RoomIcon, RoomUpdate, StateSnapshot, TaskFrequency, TaskUpdate,
};
use crate::schedule;
use crate::storage::schema::apply_schema;

/// `app_meta` key set once the default rooms have been created.
const ROOMS_SEEDED_KEY: &str = "default_rooms_seeded";

/// Number of logs returned for a task when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 30;

const ROOM_COLUMNS: &str = "id, name, icon, is_decluttered, sort_order, created_at";

const ITEM_COLUMNS: &str =
    "id, room_id, name, category, is_furniture, photo_path, notes, sort_order, auto_group, created_at";

const TASK_SELECT: &str = "SELECT t.id, t.room_id, t.name, t.frequency, t.is_active, t.created_at, r.name, r.icon
     FROM cleaning_tasks t JOIN rooms r ON r.id = t.room_id";

const SNAPSHOT_COLUMNS: &str = "id, room_id, snapshot_date, total_items, categorized_count, keep_count,
     donate_count, trash_count, sell_count, furniture_count, created_at";

/// Items with a real disposition. Unknown stored values read back as
/// uncategorized, so they are excluded here too.
const CATEGORIZED_SQL: &str = "category IN ('keep', 'donate', 'trash', 'sell')";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn to_count(n: i64) -> usize {
    usize::try_from(n).unwrap_or_default()
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a write inside an IMMEDIATE transaction.
    ///
    /// The transaction is rolled back if the closure returns an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the closure or the commit fails.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;
        tx.commit()?;

        debug!(op, "Mutation committed");
        Ok(result)
    }

    fn count<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<usize> {
        let n: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(to_count(n))
    }

    // ===============
    // Room Operations
    // ===============

    /// Create the default rooms the first time the store is used.
    ///
    /// A marker in `app_meta` records that seeding happened, so rooms the
    /// user later deletes are not recreated. A store that already holds
    /// rooms is marked without seeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn seed_default_rooms_if_needed(&mut self) -> Result<usize> {
        let now = now_ms();
        let seeded = self.mutate("seed_default_rooms", |tx| {
            let marked: Option<String> = tx
                .query_row(
                    "SELECT value FROM app_meta WHERE key = ?1",
                    [ROOMS_SEEDED_KEY],
                    |row| row.get(0),
                )
                .optional()?;
            if marked.is_some() {
                return Ok(0);
            }

            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))?;
            let mut seeded = 0;
            if existing == 0 {
                for (order, (name, icon)) in (0_i64..).zip(DEFAULT_ROOMS) {
                    tx.execute(
                        "INSERT INTO rooms (name, icon, is_decluttered, sort_order, created_at)
                         VALUES (?1, ?2, 0, ?3, ?4)",
                        params![name, icon.as_str(), order, now],
                    )?;
                    seeded += 1;
                }
            }

            tx.execute(
                "INSERT INTO app_meta (key, value) VALUES (?1, ?2)",
                params![ROOMS_SEEDED_KEY, now.to_string()],
            )?;
            Ok(seeded)
        })?;

        if seeded > 0 {
            info!(count = seeded, "Seeded default rooms");
        }
        Ok(seeded)
    }

    /// All rooms in display order with derived counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rooms(&self, now: DateTime<Local>) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY sort_order, id"
        ))?;
        let rooms = stmt
            .query_map([], map_room_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rooms
            .into_iter()
            .map(|mut room| {
                self.fill_room_counts(&mut room, now)?;
                Ok(room)
            })
            .collect()
    }

    /// Get a room by ID with derived counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_room(&self, id: i64, now: DateTime<Local>) -> Result<Option<Room>> {
        let room = self
            .conn
            .query_row(
                &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
                [id],
                map_room_row,
            )
            .optional()?;

        match room {
            Some(mut room) => {
                self.fill_room_counts(&mut room, now)?;
                Ok(Some(room))
            }
            None => Ok(None),
        }
    }

    fn fill_room_counts(&self, room: &mut Room, now: DateTime<Local>) -> Result<()> {
        let id = room.id;
        room.item_count = self.count("SELECT COUNT(*) FROM declutter_items WHERE room_id = ?1", [id])?;
        room.categorized_count = self.count(
            &format!("SELECT COUNT(*) FROM declutter_items WHERE room_id = ?1 AND {CATEGORIZED_SQL}"),
            [id],
        )?;
        room.non_furniture_count = self.count(
            "SELECT COUNT(*) FROM declutter_items WHERE room_id = ?1 AND is_furniture = 0",
            [id],
        )?;
        room.non_furniture_categorized_count = self.count(
            &format!(
                "SELECT COUNT(*) FROM declutter_items
                 WHERE room_id = ?1 AND is_furniture = 0 AND {CATEGORIZED_SQL}"
            ),
            [id],
        )?;

        let tasks = self.list_tasks_for_room(id, now)?;
        room.task_count = tasks.len();
        room.due_today_count = tasks.iter().filter(|t| t.is_due_today).count();

        let (start, _) = schedule::day_range_ms(now.date_naive());
        room.completed_today_count = self.count(
            "SELECT COUNT(*) FROM cleaning_logs l
             JOIN cleaning_tasks t ON t.id = l.task_id
             WHERE t.room_id = ?1 AND l.completed_at >= ?2",
            params![id, start],
        )?;
        Ok(())
    }

    /// Insert a room at the end of the display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_room(&mut self, name: &str, icon: RoomIcon) -> Result<i64> {
        let now = now_ms();
        self.mutate("insert_room", |tx| {
            let max: Option<i64> =
                tx.query_row("SELECT MAX(sort_order) FROM rooms", [], |row| row.get(0))?;
            let order = max.map_or(0, |m| m + 1);
            tx.execute(
                "INSERT INTO rooms (name, icon, is_decluttered, sort_order, created_at)
                 VALUES (?1, ?2, 0, ?3, ?4)",
                params![name, icon.as_str(), order, now],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Apply a partial update to a room. Returns false if no such room.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_room(&mut self, id: i64, update: &RoomUpdate) -> Result<bool> {
        self.mutate("update_room", |tx| {
            let changed = tx.execute(
                "UPDATE rooms SET
                     name = COALESCE(?2, name),
                     icon = COALESCE(?3, icon),
                     is_decluttered = COALESCE(?4, is_decluttered)
                 WHERE id = ?1",
                params![
                    id,
                    update.name,
                    update.icon.map(|i| i.as_str()),
                    update.is_decluttered
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a room. Its items, tasks, logs and snapshots cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_room(&mut self, id: i64) -> Result<bool> {
        self.mutate("delete_room", |tx| {
            Ok(tx.execute("DELETE FROM rooms WHERE id = ?1", [id])? > 0)
        })
    }

    /// Mark a room decluttered and seed its icon's default cleaning tasks.
    ///
    /// Only the transition from not-decluttered seeds tasks; marking an
    /// already decluttered room is a no-op. Returns the number of tasks
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_room_decluttered(&mut self, id: i64) -> Result<usize> {
        let now = now_ms();
        self.mutate("mark_room_decluttered", |tx| {
            let changed = tx.execute(
                "UPDATE rooms SET is_decluttered = 1 WHERE id = ?1 AND is_decluttered = 0",
                [id],
            )?;
            if changed == 0 {
                return Ok(0);
            }

            let icon: String = tx.query_row("SELECT icon FROM rooms WHERE id = ?1", [id], |row| {
                row.get(0)
            })?;
            let defaults = RoomIcon::from_stored(&icon).default_cleaning_tasks();
            for (name, frequency) in defaults {
                tx.execute(
                    "INSERT INTO cleaning_tasks (room_id, name, frequency, is_active, created_at)
                     VALUES (?1, ?2, ?3, 1, ?4)",
                    params![id, name, frequency.as_str(), now],
                )?;
            }
            Ok(defaults.len())
        })
    }

    /// Move a room to `position` in the display order (clamped to the end)
    /// and renumber every room. Returns false if no such room.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn move_room(&mut self, id: i64, position: usize) -> Result<bool> {
        self.mutate("move_room", |tx| {
            let mut ids: Vec<i64> = tx
                .prepare("SELECT id FROM rooms ORDER BY sort_order, id")?
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;

            let Some(from) = ids.iter().position(|&r| r == id) else {
                return Ok(false);
            };
            let moved = ids.remove(from);
            ids.insert(position.min(ids.len()), moved);

            for (order, room_id) in (0_i64..).zip(&ids) {
                tx.execute(
                    "UPDATE rooms SET sort_order = ?1 WHERE id = ?2",
                    params![order, room_id],
                )?;
            }
            Ok(true)
        })
    }

    // ===============
    // Item Operations
    // ===============

    /// Items in a room, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_items(&self, room_id: i64) -> Result<Vec<DeclutterItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM declutter_items
             WHERE room_id = ?1 ORDER BY created_at DESC, id DESC"
        ))?;
        let items = stmt
            .query_map([room_id], map_item_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item(&self, id: i64) -> Result<Option<DeclutterItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM declutter_items WHERE id = ?1"),
                [id],
                map_item_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Insert one item at the end of its room's manual order.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including an unknown room).
    pub fn insert_item(&mut self, item: &NewItem) -> Result<i64> {
        let now = now_ms();
        self.mutate("insert_item", |tx| {
            let order = next_item_order(tx, item.room_id)?;
            insert_item_row(tx, item, order, now)?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Insert several uncategorized items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; none are kept in that case.
    pub fn insert_items(&mut self, room_id: i64, names: &[String]) -> Result<usize> {
        let now = now_ms();
        self.mutate("insert_items", |tx| {
            let mut order = next_item_order(tx, room_id)?;
            for name in names {
                insert_item_row(tx, &NewItem::named(room_id, name.as_str()), order, now)?;
                order += 1;
            }
            Ok(names.len())
        })
    }

    /// Set an item's category. Returns false if no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_item_category(&mut self, id: i64, category: ItemCategory) -> Result<bool> {
        self.update_item(
            id,
            &ItemUpdate {
                category: Some(category),
                ..ItemUpdate::default()
            },
        )
    }

    /// Apply a partial update to an item. Returns false if no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_item(&mut self, id: i64, update: &ItemUpdate) -> Result<bool> {
        self.mutate("update_item", |tx| {
            let changed = tx.execute(
                "UPDATE declutter_items SET
                     name = COALESCE(?2, name),
                     category = COALESCE(?3, category),
                     photo_path = COALESCE(?4, photo_path),
                     notes = COALESCE(?5, notes)
                 WHERE id = ?1",
                params![
                    id,
                    update.name,
                    update.category.map(|c| c.as_str()),
                    update.photo_path,
                    update.notes
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Set or clear an item's furniture flag. Returns false if no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_item_furniture(&mut self, id: i64, is_furniture: bool) -> Result<bool> {
        self.mutate("update_item_furniture", |tx| {
            let changed = tx.execute(
                "UPDATE declutter_items SET is_furniture = ?2 WHERE id = ?1",
                params![id, is_furniture],
            )?;
            Ok(changed > 0)
        })
    }

    /// Replace or clear an item's photo path. Returns false if no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_item_photo(&mut self, id: i64, photo_path: Option<&str>) -> Result<bool> {
        self.mutate("set_item_photo", |tx| {
            let changed = tx.execute(
                "UPDATE declutter_items SET photo_path = ?2 WHERE id = ?1",
                params![id, photo_path],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete an item. Returns false if no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_item(&mut self, id: i64) -> Result<bool> {
        self.mutate("delete_item", |tx| {
            Ok(tx.execute("DELETE FROM declutter_items WHERE id = ?1", [id])? > 0)
        })
    }

    /// Persist manual ordering as `(item_id, sort_order)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any update fails; none are kept in that case.
    pub fn set_item_sort_orders(&mut self, orders: &[(i64, i64)]) -> Result<()> {
        self.mutate("set_item_sort_orders", |tx| {
            let mut stmt = tx.prepare("UPDATE declutter_items SET sort_order = ?2 WHERE id = ?1")?;
            for (id, order) in orders {
                stmt.execute(params![id, order])?;
            }
            Ok(())
        })
    }

    /// Persist autogroup labels as `(item_id, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any update fails; none are kept in that case.
    pub fn set_item_groups(&mut self, groups: &[(i64, Option<String>)]) -> Result<()> {
        self.mutate("set_item_groups", |tx| {
            let mut stmt = tx.prepare("UPDATE declutter_items SET auto_group = ?2 WHERE id = ?1")?;
            for (id, label) in groups {
                stmt.execute(params![id, label])?;
            }
            Ok(())
        })
    }

    /// Remove every autogroup label in a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn clear_item_groups(&mut self, room_id: i64) -> Result<usize> {
        self.mutate("clear_item_groups", |tx| {
            Ok(tx.execute(
                "UPDATE declutter_items SET auto_group = NULL
                 WHERE room_id = ?1 AND auto_group IS NOT NULL",
                [room_id],
            )?)
        })
    }

    // ===============
    // Task Operations
    // ===============

    /// Active tasks in a room, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tasks_for_room(&self, room_id: i64, now: DateTime<Local>) -> Result<Vec<CleaningTask>> {
        self.query_tasks(
            &format!("{TASK_SELECT} WHERE t.room_id = ?1 AND t.is_active = 1 ORDER BY t.name, t.id"),
            [room_id],
            now,
        )
    }

    /// Active tasks in decluttered rooms, by room order then task name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_tasks(&self, now: DateTime<Local>) -> Result<Vec<CleaningTask>> {
        self.query_tasks(
            &format!(
                "{TASK_SELECT} WHERE t.is_active = 1 AND r.is_decluttered = 1
                 ORDER BY r.sort_order, r.id, t.name, t.id"
            ),
            [],
            now,
        )
    }

    /// The subset of [`list_active_tasks`](Self::list_active_tasks) due at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_due_tasks(&self, now: DateTime<Local>) -> Result<Vec<CleaningTask>> {
        let mut tasks = self.list_active_tasks(now)?;
        tasks.retain(|t| t.is_due_today);
        Ok(tasks)
    }

    /// Get a task by ID, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_task(&self, id: i64, now: DateTime<Local>) -> Result<Option<CleaningTask>> {
        let mut tasks = self.query_tasks(&format!("{TASK_SELECT} WHERE t.id = ?1"), [id], now)?;
        Ok(tasks.pop())
    }

    fn query_tasks<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
        now: DateTime<Local>,
    ) -> Result<Vec<CleaningTask>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tasks = stmt
            .query_map(params, map_task_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let today = now.date_naive();
        tasks
            .into_iter()
            .map(|mut task| {
                task.last_completed = self.last_completion(task.id)?;
                task.is_due_today = schedule::is_due(task.last_completed, task.frequency, now);
                task.current_streak = self.task_streak(task.id, today)?;
                Ok(task)
            })
            .collect()
    }

    /// Insert an active task.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including an unknown room).
    pub fn insert_task(&mut self, room_id: i64, name: &str, frequency: TaskFrequency) -> Result<i64> {
        let now = now_ms();
        self.mutate("insert_task", |tx| {
            tx.execute(
                "INSERT INTO cleaning_tasks (room_id, name, frequency, is_active, created_at)
                 VALUES (?1, ?2, ?3, 1, ?4)",
                params![room_id, name, frequency.as_str(), now],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Apply a partial update to a task. Returns false if no such task.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_task(&mut self, id: i64, update: &TaskUpdate) -> Result<bool> {
        self.mutate("update_task", |tx| {
            let changed = tx.execute(
                "UPDATE cleaning_tasks SET
                     name = COALESCE(?2, name),
                     frequency = COALESCE(?3, frequency),
                     is_active = COALESCE(?4, is_active)
                 WHERE id = ?1",
                params![
                    id,
                    update.name,
                    update.frequency.map(|f| f.as_str()),
                    update.is_active
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a task and its logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_task(&mut self, id: i64) -> Result<bool> {
        self.mutate("delete_task", |tx| {
            Ok(tx.execute("DELETE FROM cleaning_tasks WHERE id = ?1", [id])? > 0)
        })
    }

    /// Append a completion log. Returns the new log's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including an unknown task).
    pub fn complete_task(&mut self, task_id: i64, completed_at: i64) -> Result<i64> {
        self.mutate("complete_task", |tx| {
            tx.execute(
                "INSERT INTO cleaning_logs (task_id, completed_at) VALUES (?1, ?2)",
                params![task_id, completed_at],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Most recent completions of a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_logs_for_task(&self, task_id: i64, limit: usize) -> Result<Vec<CleaningLog>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, completed_at FROM cleaning_logs
             WHERE task_id = ?1 ORDER BY completed_at DESC, id DESC LIMIT ?2",
        )?;
        let logs = stmt
            .query_map(params![task_id, limit], map_log_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Every completion at or after `since`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_logs_since(&self, since: i64) -> Result<Vec<CleaningLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, completed_at FROM cleaning_logs
             WHERE completed_at >= ?1 ORDER BY completed_at, id",
        )?;
        let logs = stmt
            .query_map([since], map_log_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    /// Timestamp of a task's latest completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn last_completion(&self, task_id: i64) -> Result<Option<i64>> {
        let last: Option<i64> = self.conn.query_row(
            "SELECT MAX(completed_at) FROM cleaning_logs WHERE task_id = ?1",
            [task_id],
            |row| row.get(0),
        )?;
        Ok(last)
    }

    // ==========
    // Aggregates
    // ==========

    /// Item counts per category across all rooms.
    ///
    /// Stored values that are not a known category count as uncategorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_items_by_category(&self) -> Result<BTreeMap<ItemCategory, usize>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, COUNT(*) FROM declutter_items GROUP BY category")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut counts = BTreeMap::new();
        for (category, n) in rows {
            *counts.entry(ItemCategory::from_stored(&category)).or_default() += to_count(n);
        }
        Ok(counts)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn total_item_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM declutter_items", [])
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn decluttered_room_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM rooms WHERE is_decluttered = 1", [])
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn total_room_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM rooms", [])
    }

    /// Completions of any task on a local calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn completion_count_on(&self, day: NaiveDate) -> Result<usize> {
        let (start, end) = schedule::day_range_ms(day);
        self.count(
            "SELECT COUNT(*) FROM cleaning_logs WHERE completed_at >= ?1 AND completed_at < ?2",
            params![start, end],
        )
    }

    /// Consecutive days with at least one completion, ending today or
    /// yesterday.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn current_streak(&self, today: NaiveDate) -> Result<u32> {
        schedule::walk_back_streak::<Error>(today, |day| Ok(self.completion_count_on(day)? > 0))
    }

    /// Longest run of consecutive completion days ever recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn longest_streak(&self) -> Result<u32> {
        let mut stmt = self.conn.prepare("SELECT completed_at FROM cleaning_logs")?;
        let days: Vec<NaiveDate> = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .filter_map(schedule::local_date)
            .collect();
        Ok(schedule::longest_run(&days))
    }

    /// Streak for a single task, walked the same way as
    /// [`current_streak`](Self::current_streak).
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn task_streak(&self, task_id: i64, today: NaiveDate) -> Result<u32> {
        schedule::walk_back_streak::<Error>(today, |day| {
            let (start, end) = schedule::day_range_ms(day);
            let n = self.count(
                "SELECT COUNT(*) FROM cleaning_logs
                 WHERE task_id = ?1 AND completed_at >= ?2 AND completed_at < ?3",
                params![task_id, start, end],
            )?;
            Ok(n > 0)
        })
    }

    /// Completions per local day from `today - days` through `today`.
    ///
    /// Days without completions are omitted; results are in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn daily_completion_counts(&self, today: NaiveDate, days: u32) -> Result<Vec<DailyCount>> {
        let start = schedule::start_of_day_ms(today - chrono::Duration::days(i64::from(days)));
        let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for log in self.list_logs_since(start)? {
            if let Some(day) = schedule::local_date(log.completed_at) {
                *buckets.entry(day).or_default() += 1;
            }
        }
        Ok(buckets
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect())
    }

    // ===================
    // Snapshot Operations
    // ===================

    /// Record a room's current item counts. Returns the snapshot ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including an unknown room).
    pub fn insert_snapshot(&mut self, room_id: i64, taken_at: i64) -> Result<i64> {
        let now = now_ms();
        self.mutate("insert_snapshot", |tx| {
            tx.execute(
                &format!(
                    "INSERT INTO state_snapshots (
                         room_id, snapshot_date, total_items, categorized_count, keep_count,
                         donate_count, trash_count, sell_count, furniture_count, created_at)
                     SELECT ?1, ?2,
                         COUNT(*),
                         COALESCE(SUM(CASE WHEN {CATEGORIZED_SQL} THEN 1 ELSE 0 END), 0),
                         COALESCE(SUM(CASE WHEN category = 'keep' THEN 1 ELSE 0 END), 0),
                         COALESCE(SUM(CASE WHEN category = 'donate' THEN 1 ELSE 0 END), 0),
                         COALESCE(SUM(CASE WHEN category = 'trash' THEN 1 ELSE 0 END), 0),
                         COALESCE(SUM(CASE WHEN category = 'sell' THEN 1 ELSE 0 END), 0),
                         COALESCE(SUM(is_furniture), 0),
                         ?3
                     FROM declutter_items WHERE room_id = ?1"
                ),
                params![room_id, taken_at, now],
            )?;
            Ok(tx.last_insert_rowid())
        })
    }

    /// Snapshots of one room, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_snapshots_for_room(&self, room_id: i64) -> Result<Vec<StateSnapshot>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM state_snapshots
             WHERE room_id = ?1 ORDER BY snapshot_date, id"
        ))?;
        let snapshots = stmt
            .query_map([room_id], map_snapshot_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(snapshots)
    }

    /// Every snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_snapshots(&self) -> Result<Vec<StateSnapshot>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM state_snapshots ORDER BY snapshot_date, id"
        ))?;
        let snapshots = stmt
            .query_map([], map_snapshot_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(snapshots)
    }
}

fn next_item_order(tx: &Transaction, room_id: i64) -> rusqlite::Result<i64> {
    let max: Option<i64> = tx.query_row(
        "SELECT MAX(sort_order) FROM declutter_items WHERE room_id = ?1",
        [room_id],
        |row| row.get(0),
    )?;
    Ok(max.map_or(0, |m| m + 1))
}

fn insert_item_row(tx: &Transaction, item: &NewItem, order: i64, now: i64) -> rusqlite::Result<usize> {
    tx.execute(
        "INSERT INTO declutter_items
             (room_id, name, category, is_furniture, photo_path, notes, sort_order, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            item.room_id,
            item.name,
            item.category.as_str(),
            item.is_furniture,
            item.photo_path,
            item.notes,
            order,
            now
        ],
    )
}

fn map_room_row(row: &rusqlite::Row) -> rusqlite::Result<Room> {
    let icon: String = row.get(2)?;
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: RoomIcon::from_stored(&icon),
        is_decluttered: row.get(3)?,
        sort_order: row.get(4)?,
        created_at: row.get(5)?,
        item_count: 0,
        categorized_count: 0,
        non_furniture_count: 0,
        non_furniture_categorized_count: 0,
        task_count: 0,
        due_today_count: 0,
        completed_today_count: 0,
    })
}

fn map_item_row(row: &rusqlite::Row) -> rusqlite::Result<DeclutterItem> {
    let category: String = row.get(3)?;
    Ok(DeclutterItem {
        id: row.get(0)?,
        room_id: row.get(1)?,
        name: row.get(2)?,
        category: ItemCategory::from_stored(&category),
        is_furniture: row.get(4)?,
        photo_path: row.get(5)?,
        notes: row.get(6)?,
        sort_order: row.get(7)?,
        auto_group: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_task_row(row: &rusqlite::Row) -> rusqlite::Result<CleaningTask> {
    let frequency: String = row.get(3)?;
    let room_icon: String = row.get(7)?;
    Ok(CleaningTask {
        id: row.get(0)?,
        room_id: row.get(1)?,
        name: row.get(2)?,
        frequency: TaskFrequency::from_stored(&frequency),
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        room_name: row.get(6)?,
        room_icon: RoomIcon::from_stored(&room_icon),
        last_completed: None,
        is_due_today: false,
        current_streak: 0,
    })
}

fn map_log_row(row: &rusqlite::Row) -> rusqlite::Result<CleaningLog> {
    Ok(CleaningLog {
        id: row.get(0)?,
        task_id: row.get(1)?,
        completed_at: row.get(2)?,
    })
}

fn map_snapshot_row(row: &rusqlite::Row) -> rusqlite::Result<StateSnapshot> {
    Ok(StateSnapshot {
        id: row.get(0)?,
        room_id: row.get(1)?,
        snapshot_date: row.get(2)?,
        total_items: row.get(3)?,
        categorized_count: row.get(4)?,
        keep_count: row.get(5)?,
        donate_count: row.get(6)?,
        trash_count: row.get(7)?,
        sell_count: row.get(8)?,
        furniture_count: row.get(9)?,
        created_at: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn now() -> DateTime<Local> {
        at(2024, 6, 15, 12)
    }

    fn storage_with_room(icon: RoomIcon) -> (SqliteStorage, i64) {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.insert_room("Test Room", icon).unwrap();
        (storage, id)
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_seed_default_rooms_only_once() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(storage.seed_default_rooms_if_needed().unwrap(), 8);

        let rooms = storage.list_rooms(now()).unwrap();
        assert_eq!(rooms.len(), 8);
        assert_eq!(rooms[0].name, "Kitchen");
        assert_eq!(rooms[7].name, "Laundry Room");
        assert!(rooms.iter().all(|r| !r.is_decluttered));

        // Deleting every room must not trigger reseeding
        for room in &rooms {
            storage.delete_room(room.id).unwrap();
        }
        assert_eq!(storage.seed_default_rooms_if_needed().unwrap(), 0);
        assert_eq!(storage.total_room_count().unwrap(), 0);
    }

    #[test]
    fn test_seed_skips_store_with_rooms() {
        let (mut storage, _) = storage_with_room(RoomIcon::Attic);
        assert_eq!(storage.seed_default_rooms_if_needed().unwrap(), 0);
        assert_eq!(storage.total_room_count().unwrap(), 1);
    }

    #[test]
    fn test_insert_room_appends_sort_order() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let a = storage.insert_room("A", RoomIcon::Office).unwrap();
        let b = storage.insert_room("B", RoomIcon::Garage).unwrap();

        let rooms = storage.list_rooms(now()).unwrap();
        assert_eq!(rooms.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a, b]);
        assert!(rooms[0].sort_order < rooms[1].sort_order);
    }

    #[test]
    fn test_room_counts() {
        let (mut storage, room) = storage_with_room(RoomIcon::Kitchen);
        storage.insert_item(&NewItem::named(room, "Mug")).unwrap();
        let plate = storage.insert_item(&NewItem::named(room, "Plate")).unwrap();
        let table = storage.insert_item(&NewItem::named(room, "Table")).unwrap();
        storage.update_item_category(plate, ItemCategory::Donate).unwrap();
        storage.update_item_furniture(table, true).unwrap();

        let r = storage.get_room(room, now()).unwrap().unwrap();
        assert_eq!(r.item_count, 3);
        assert_eq!(r.categorized_count, 1);
        assert_eq!(r.non_furniture_count, 2);
        assert_eq!(r.non_furniture_categorized_count, 1);
        assert_eq!(r.task_count, 0);
    }

    #[test]
    fn test_update_room_partial() {
        let (mut storage, room) = storage_with_room(RoomIcon::Kitchen);
        let update = RoomUpdate {
            name: Some("Galley".to_string()),
            ..RoomUpdate::default()
        };
        assert!(storage.update_room(room, &update).unwrap());
        assert!(!storage.update_room(9999, &update).unwrap());

        let r = storage.get_room(room, now()).unwrap().unwrap();
        assert_eq!(r.name, "Galley");
        assert_eq!(r.icon, RoomIcon::Kitchen);
    }

    #[test]
    fn test_delete_room_cascades() {
        let (mut storage, room) = storage_with_room(RoomIcon::Kitchen);
        storage.insert_item(&NewItem::named(room, "Mug")).unwrap();
        let task = storage.insert_task(room, "Sweep", TaskFrequency::Daily).unwrap();
        storage.complete_task(task, now().timestamp_millis()).unwrap();
        storage.insert_snapshot(room, now().timestamp_millis()).unwrap();

        assert!(storage.delete_room(room).unwrap());
        assert!(storage.get_room(room, now()).unwrap().is_none());
        assert_eq!(storage.total_item_count().unwrap(), 0);
        assert!(storage.get_task(task, now()).unwrap().is_none());
        assert!(storage.list_logs_for_task(task, 10).unwrap().is_empty());
        assert!(storage.list_all_snapshots().unwrap().is_empty());
    }

    #[test]
    fn test_mark_decluttered_seeds_tasks_once() {
        let (mut storage, room) = storage_with_room(RoomIcon::Bathroom);
        assert_eq!(storage.mark_room_decluttered(room).unwrap(), 5);
        assert_eq!(storage.mark_room_decluttered(room).unwrap(), 0);

        let tasks = storage.list_tasks_for_room(room, now()).unwrap();
        assert_eq!(tasks.len(), 5);
        // Ordered by name
        assert_eq!(tasks[0].name, "Clean toilet");
        assert!(tasks.iter().all(|t| t.is_due_today));
        assert!(storage.get_room(room, now()).unwrap().unwrap().is_decluttered);
    }

    #[test]
    fn test_mark_decluttered_unknown_room() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert_eq!(storage.mark_room_decluttered(42).unwrap(), 0);
    }

    #[test]
    fn test_move_room() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let a = storage.insert_room("A", RoomIcon::Other).unwrap();
        let b = storage.insert_room("B", RoomIcon::Other).unwrap();
        let c = storage.insert_room("C", RoomIcon::Other).unwrap();

        assert!(storage.move_room(c, 0).unwrap());
        let order: Vec<i64> = storage.list_rooms(now()).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(order, vec![c, a, b]);

        assert!(storage.move_room(c, 99).unwrap());
        let order: Vec<i64> = storage.list_rooms(now()).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(order, vec![a, b, c]);

        assert!(!storage.move_room(1234, 0).unwrap());
    }

    #[test]
    fn test_items_newest_first_and_sort_order() {
        let (mut storage, room) = storage_with_room(RoomIcon::Office);
        let names = vec!["Stapler".to_string(), "Cables".to_string()];
        assert_eq!(storage.insert_items(room, &names).unwrap(), 2);
        storage.insert_item(&NewItem::named(room, "Monitor")).unwrap();

        let items = storage.list_items(room).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.category == ItemCategory::Uncategorized));
        let mut orders: Vec<i64> = items.iter().map(|i| i.sort_order).collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_insert_item_into_missing_room_fails() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.insert_item(&NewItem::named(77, "Ghost")).is_err());
    }

    #[test]
    fn test_update_item_partial() {
        let (mut storage, room) = storage_with_room(RoomIcon::Office);
        let id = storage.insert_item(&NewItem::named(room, "Lamp")).unwrap();

        let update = ItemUpdate {
            notes: Some("works fine".to_string()),
            category: Some(ItemCategory::Sell),
            ..ItemUpdate::default()
        };
        assert!(storage.update_item(id, &update).unwrap());

        let item = storage.get_item(id).unwrap().unwrap();
        assert_eq!(item.name, "Lamp");
        assert_eq!(item.category, ItemCategory::Sell);
        assert_eq!(item.notes.as_deref(), Some("works fine"));
        assert!(!storage.update_item(id + 100, &update).unwrap());
    }

    #[test]
    fn test_unknown_stored_category_reads_uncategorized() {
        let (storage, room) = storage_with_room(RoomIcon::Office);
        storage
            .conn()
            .execute(
                "INSERT INTO declutter_items (room_id, name, category, created_at)
                 VALUES (?1, 'Odd', 'recycle', 0)",
                [room],
            )
            .unwrap();

        let items = storage.list_items(room).unwrap();
        assert_eq!(items[0].category, ItemCategory::Uncategorized);

        let counts = storage.count_items_by_category().unwrap();
        assert_eq!(counts.get(&ItemCategory::Uncategorized), Some(&1));
        let r = storage.get_room(room, now()).unwrap().unwrap();
        assert_eq!(r.categorized_count, 0);
    }

    #[test]
    fn test_item_groups() {
        let (mut storage, room) = storage_with_room(RoomIcon::Kitchen);
        let a = storage.insert_item(&NewItem::named(room, "Coffee mug")).unwrap();
        let b = storage.insert_item(&NewItem::named(room, "Coffee beans")).unwrap();
        storage
            .set_item_groups(&[(a, Some("Coffee".to_string())), (b, Some("Coffee".to_string()))])
            .unwrap();
        assert_eq!(
            storage.get_item(a).unwrap().unwrap().auto_group.as_deref(),
            Some("Coffee")
        );

        assert_eq!(storage.clear_item_groups(room).unwrap(), 2);
        assert!(storage.get_item(b).unwrap().unwrap().auto_group.is_none());
    }

    #[test]
    fn test_set_item_photo_can_clear() {
        let (mut storage, room) = storage_with_room(RoomIcon::Office);
        let id = storage.insert_item(&NewItem::named(room, "Lamp")).unwrap();

        assert!(storage.set_item_photo(id, Some("photos/a.jpg")).unwrap());
        assert_eq!(
            storage.get_item(id).unwrap().unwrap().photo_path.as_deref(),
            Some("photos/a.jpg")
        );
        assert!(storage.set_item_photo(id, None).unwrap());
        assert!(storage.get_item(id).unwrap().unwrap().photo_path.is_none());
    }

    #[test]
    fn test_delete_item() {
        let (mut storage, room) = storage_with_room(RoomIcon::Kitchen);
        let id = storage.insert_item(&NewItem::named(room, "Mug")).unwrap();
        assert!(storage.delete_item(id).unwrap());
        assert!(!storage.delete_item(id).unwrap());
        assert!(storage.get_item(id).unwrap().is_none());
    }

    #[test]
    fn test_active_tasks_only_in_decluttered_rooms() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let messy = storage.insert_room("Messy", RoomIcon::Garage).unwrap();
        let clean = storage.insert_room("Clean", RoomIcon::Garage).unwrap();
        storage.insert_task(messy, "Sweep", TaskFrequency::Weekly).unwrap();
        storage.mark_room_decluttered(clean).unwrap();

        let tasks = storage.list_active_tasks(now()).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.room_id == clean));
        assert_eq!(tasks[0].room_name, "Clean");
        assert_eq!(tasks[0].room_icon, RoomIcon::Garage);
    }

    #[test]
    fn test_inactive_tasks_hidden() {
        let (mut storage, room) = storage_with_room(RoomIcon::Garage);
        storage.mark_room_decluttered(room).unwrap();
        let extra = storage.insert_task(room, "Hose down", TaskFrequency::Monthly).unwrap();
        let update = TaskUpdate {
            is_active: Some(false),
            ..TaskUpdate::default()
        };
        assert!(storage.update_task(extra, &update).unwrap());

        assert_eq!(storage.list_tasks_for_room(room, now()).unwrap().len(), 2);
        let task = storage.get_task(extra, now()).unwrap().unwrap();
        assert!(!task.is_active);
    }

    #[test]
    fn test_due_status_from_logs() {
        let (mut storage, room) = storage_with_room(RoomIcon::Other);
        let update = RoomUpdate {
            is_decluttered: Some(true),
            ..RoomUpdate::default()
        };
        storage.update_room(room, &update).unwrap();
        let daily = storage.insert_task(room, "Daily", TaskFrequency::Daily).unwrap();
        let weekly = storage.insert_task(room, "Weekly", TaskFrequency::Weekly).unwrap();
        let monthly = storage.insert_task(room, "Monthly", TaskFrequency::Monthly).unwrap();

        // No logs: everything due
        assert_eq!(storage.list_due_tasks(now()).unwrap().len(), 3);

        storage.complete_task(daily, at(2024, 6, 15, 8).timestamp_millis()).unwrap();
        storage.complete_task(weekly, at(2024, 6, 8, 12).timestamp_millis()).unwrap();
        storage.complete_task(monthly, at(2024, 5, 20, 12).timestamp_millis()).unwrap();

        let due: Vec<i64> = storage.list_due_tasks(now()).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(due, vec![weekly]);

        let r = storage.get_room(room, now()).unwrap().unwrap();
        assert_eq!(r.task_count, 3);
        assert_eq!(r.due_today_count, 1);
        assert_eq!(r.completed_today_count, 1);
    }

    #[test]
    fn test_logs_newest_first_with_limit() {
        let (mut storage, room) = storage_with_room(RoomIcon::Other);
        let task = storage.insert_task(room, "Dust", TaskFrequency::Daily).unwrap();
        for d in 1..=5 {
            storage.complete_task(task, at(2024, 6, d, 9).timestamp_millis()).unwrap();
        }

        let logs = storage.list_logs_for_task(task, 3).unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].completed_at, at(2024, 6, 5, 9).timestamp_millis());
        assert_eq!(
            storage.last_completion(task).unwrap(),
            Some(at(2024, 6, 5, 9).timestamp_millis())
        );

        let since = storage.list_logs_since(at(2024, 6, 4, 0).timestamp_millis()).unwrap();
        assert_eq!(since.len(), 2);
    }

    #[test]
    fn test_streaks() {
        let (mut storage, room) = storage_with_room(RoomIcon::Other);
        let task = storage.insert_task(room, "Dust", TaskFrequency::Daily).unwrap();
        let today = now().date_naive();

        assert_eq!(storage.current_streak(today).unwrap(), 0);
        assert_eq!(storage.longest_streak().unwrap(), 0);

        // Old run of four days
        for d in 1..=4 {
            storage.complete_task(task, at(2024, 6, d, 9).timestamp_millis()).unwrap();
        }
        // Recent run: 13th and 14th, twice on the 14th
        storage.complete_task(task, at(2024, 6, 13, 9).timestamp_millis()).unwrap();
        storage.complete_task(task, at(2024, 6, 14, 9).timestamp_millis()).unwrap();
        storage.complete_task(task, at(2024, 6, 14, 18).timestamp_millis()).unwrap();

        // Nothing yet today, but yesterday keeps the streak alive
        assert_eq!(storage.current_streak(today).unwrap(), 2);
        assert_eq!(storage.task_streak(task, today).unwrap(), 2);
        assert_eq!(storage.longest_streak().unwrap(), 4);
        assert_eq!(storage.completion_count_on(at(2024, 6, 14, 0).date_naive()).unwrap(), 2);

        storage.complete_task(task, at(2024, 6, 15, 7).timestamp_millis()).unwrap();
        assert_eq!(storage.current_streak(today).unwrap(), 3);

        // Two days later without completions the streak is gone
        let later = at(2024, 6, 17, 12).date_naive();
        assert_eq!(storage.current_streak(later).unwrap(), 0);
    }

    #[test]
    fn test_daily_completion_counts() {
        let (mut storage, room) = storage_with_room(RoomIcon::Other);
        let task = storage.insert_task(room, "Dust", TaskFrequency::Daily).unwrap();
        storage.complete_task(task, at(2024, 5, 1, 9).timestamp_millis()).unwrap();
        storage.complete_task(task, at(2024, 6, 10, 9).timestamp_millis()).unwrap();
        storage.complete_task(task, at(2024, 6, 10, 19).timestamp_millis()).unwrap();
        storage.complete_task(task, at(2024, 6, 15, 9).timestamp_millis()).unwrap();

        let counts = storage.daily_completion_counts(now().date_naive(), 30).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].date, at(2024, 6, 10, 0).date_naive());
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 1);
    }

    #[test]
    fn test_aggregate_counts() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let a = storage.insert_room("A", RoomIcon::Other).unwrap();
        storage.insert_room("B", RoomIcon::Other).unwrap();
        storage.mark_room_decluttered(a).unwrap();
        let keep = storage.insert_item(&NewItem::named(a, "Book")).unwrap();
        storage.insert_item(&NewItem::named(a, "Sock")).unwrap();
        storage.update_item_category(keep, ItemCategory::Keep).unwrap();

        assert_eq!(storage.total_room_count().unwrap(), 2);
        assert_eq!(storage.decluttered_room_count().unwrap(), 1);
        assert_eq!(storage.total_item_count().unwrap(), 2);
        let counts = storage.count_items_by_category().unwrap();
        assert_eq!(counts.get(&ItemCategory::Keep), Some(&1));
        assert_eq!(counts.get(&ItemCategory::Uncategorized), Some(&1));
        assert_eq!(counts.get(&ItemCategory::Trash), None);
    }

    #[test]
    fn test_snapshot_counts_and_order() {
        let (mut storage, room) = storage_with_room(RoomIcon::Closet);
        let empty = storage.insert_snapshot(room, at(2024, 6, 1, 9).timestamp_millis()).unwrap();

        let shirt = storage.insert_item(&NewItem::named(room, "Shirt")).unwrap();
        let dresser = storage.insert_item(&NewItem::named(room, "Dresser")).unwrap();
        storage.insert_item(&NewItem::named(room, "Scarf")).unwrap();
        storage.update_item_category(shirt, ItemCategory::Donate).unwrap();
        storage.update_item_category(dresser, ItemCategory::Keep).unwrap();
        storage.update_item_furniture(dresser, true).unwrap();
        storage.insert_snapshot(room, at(2024, 6, 8, 9).timestamp_millis()).unwrap();

        let snaps = storage.list_snapshots_for_room(room).unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].id, empty);
        assert_eq!(snaps[0].total_items, 0);

        let latest = &snaps[1];
        assert_eq!(latest.total_items, 3);
        assert_eq!(latest.categorized_count, 2);
        assert_eq!(latest.keep_count, 1);
        assert_eq!(latest.donate_count, 1);
        assert_eq!(latest.trash_count, 0);
        assert_eq!(latest.furniture_count, 1);
        assert_eq!(storage.list_all_snapshots().unwrap().len(), 2);
    }

    #[test]
    fn test_snapshot_for_missing_room_fails() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.insert_snapshot(5, 0).is_err());
    }
}

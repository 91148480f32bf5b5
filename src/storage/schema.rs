//! Database schema definitions and migration logic.
//!
//! This module contains the complete SQLite schema for tidy.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the tidy database.
///
/// Note: Timestamps are stored as INTEGER (Unix milliseconds).
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- Key/value flags (first-launch seeding, etc.)
CREATE TABLE IF NOT EXISTS app_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- ====================
-- Core Tables
-- ====================

-- Rooms: physical spaces being decluttered and cleaned
CREATE TABLE IF NOT EXISTS rooms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    icon TEXT NOT NULL,
    is_decluttered INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_rooms_sort_order ON rooms(sort_order);

-- Declutter items: objects pending a disposition decision
CREATE TABLE IF NOT EXISTS declutter_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'uncategorized',
    is_furniture INTEGER NOT NULL DEFAULT 0,
    photo_path TEXT,
    notes TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0,
    auto_group TEXT,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_declutter_items_room ON declutter_items(room_id);
CREATE INDEX IF NOT EXISTS idx_declutter_items_category ON declutter_items(category);

-- Cleaning tasks: recurring chores per room
CREATE TABLE IF NOT EXISTS cleaning_tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    frequency TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_cleaning_tasks_room ON cleaning_tasks(room_id);

-- Cleaning logs: append-only completion events
CREATE TABLE IF NOT EXISTS cleaning_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task_id INTEGER NOT NULL,
    completed_at INTEGER NOT NULL,
    FOREIGN KEY (task_id) REFERENCES cleaning_tasks(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_cleaning_logs_task ON cleaning_logs(task_id);
CREATE INDEX IF NOT EXISTS idx_cleaning_logs_completed ON cleaning_logs(completed_at);

-- State snapshots: immutable per-room count rollups
CREATE TABLE IF NOT EXISTS state_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    room_id INTEGER NOT NULL,
    snapshot_date INTEGER NOT NULL,
    total_items INTEGER NOT NULL DEFAULT 0,
    categorized_count INTEGER NOT NULL DEFAULT 0,
    keep_count INTEGER NOT NULL DEFAULT 0,
    donate_count INTEGER NOT NULL DEFAULT 0,
    trash_count INTEGER NOT NULL DEFAULT 0,
    sell_count INTEGER NOT NULL DEFAULT 0,
    furniture_count INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_state_snapshots_room_date ON state_snapshots(room_id, snapshot_date);
";

/// Apply the schema to a database connection.
///
/// This is idempotent and safe to call on every open.
///
/// # Errors
///
/// Returns an error if a pragma, the DDL, or a migration fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // Set pragmas before schema creation
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;

    // Apply schema
    conn.execute_batch(SCHEMA_SQL)?;

    // Run migrations for existing databases
    super::migrations::run_migrations(conn)?;

    // Record schema version
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

//! Command implementations.

pub mod completions;
pub mod init;
pub mod item;
pub mod progress;
pub mod recommend;
pub mod remind;
pub mod report;
pub mod room;
pub mod snapshot;
pub mod task;
pub mod version;

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::model::Room;
use crate::storage::SqliteStorage;
use crate::validate::find_similar_names;

/// Open the database, failing with [`Error::NotInitialized`] when it has
/// not been created yet. Returns the resolved path alongside the handle.
///
/// Default rooms are seeded on first use.
pub(crate) fn open_storage(db_path: Option<&PathBuf>) -> Result<(SqliteStorage, PathBuf)> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or(Error::NotInitialized)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    let mut storage = SqliteStorage::open(&db_path)?;
    storage.seed_default_rooms_if_needed()?;
    Ok((storage, db_path))
}

/// Find a room by ID, or by name ignoring case.
///
/// A miss carries up to three similarly named rooms for the hint.
pub(crate) fn resolve_room(storage: &SqliteStorage, arg: &str, now: DateTime<Local>) -> Result<Room> {
    let arg = arg.trim();
    if let Ok(id) = arg.parse::<i64>() {
        if let Some(room) = storage.get_room(id, now)? {
            return Ok(room);
        }
    }

    let rooms = storage.list_rooms(now)?;
    let wanted = arg.to_lowercase();
    if let Some(room) = rooms.iter().find(|r| r.name.to_lowercase() == wanted) {
        return Ok(room.clone());
    }

    let names: Vec<String> = rooms.into_iter().map(|r| r.name).collect();
    Err(Error::RoomNotFound {
        room: arg.to_string(),
        similar: find_similar_names(arg, &names, 3),
    })
}

/// Print a value as one line of JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Format a Unix-millisecond timestamp as local `YYYY-MM-DD HH:MM`.
pub(crate) fn format_ms(ms: i64) -> String {
    crate::schedule::local_datetime(ms)
        .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

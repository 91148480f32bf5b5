//! Initialize the tidy database.
//!
//! Creates the data directory, the database file with its schema, and the
//! default rooms. Photos are stored in `photos/` beside the database.

use crate::config::{data_dir, resolve_db_path};
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    data_dir: PathBuf,
    rooms_seeded: usize,
}

/// Execute the init command.
///
/// With `force`, an existing database file is removed first, so the new
/// one starts empty with fresh default rooms.
///
/// # Errors
///
/// Returns an error if the database already exists (without `force`), or
/// the directory or database cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path))
        .ok_or_else(|| Error::Config("Could not determine the tidy data directory".to_string()))?;

    let seeded = init_database(&db_path, force)?;

    if crate::is_silent() {
        println!("{}", db_path.display());
        return Ok(());
    }

    if json {
        let output = InitOutput {
            data_dir: data_dir(&db_path),
            database: db_path,
            rooms_seeded: seeded,
        };
        super::print_json(&output)?;
    } else {
        println!("Initialized tidy database");
        println!("  Database: {}", db_path.display());
        if seeded > 0 {
            println!("  Rooms:    {seeded} default rooms created");
        }
        println!();
        println!("Next: run 'tidy room list' to see your rooms.");
    }

    Ok(())
}

/// Create the database file and seed it. Returns how many rooms were seeded.
fn init_database(db_path: &Path, force: bool) -> Result<usize> {
    if db_path.exists() {
        if !force {
            return Err(Error::AlreadyInitialized {
                path: db_path.to_path_buf(),
            });
        }
        fs::remove_file(db_path)?;
        info!(path = %db_path.display(), "Removed existing database");
    }

    fs::create_dir_all(data_dir(db_path))?;

    let mut storage = SqliteStorage::open(db_path)?;
    storage.seed_default_rooms_if_needed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_ROOMS;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_database_and_rooms() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("nested").join("tidy.db");

        let seeded = init_database(&db, false).unwrap();
        assert_eq!(seeded, DEFAULT_ROOMS.len());
        assert!(db.exists());
    }

    #[test]
    fn test_init_fails_if_already_initialized() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("tidy.db");

        init_database(&db, false).unwrap();
        let result = init_database(&db, false);
        assert!(matches!(result, Err(Error::AlreadyInitialized { .. })));
    }

    #[test]
    fn test_init_force_starts_over() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("tidy.db");

        init_database(&db, false).unwrap();
        {
            let mut storage = SqliteStorage::open(&db).unwrap();
            storage
                .insert_room("Sunroom", crate::model::RoomIcon::Other)
                .unwrap();
        }

        let seeded = init_database(&db, true).unwrap();
        assert_eq!(seeded, DEFAULT_ROOMS.len());
        let storage = SqliteStorage::open(&db).unwrap();
        assert_eq!(storage.total_room_count().unwrap(), DEFAULT_ROOMS.len());
    }
}

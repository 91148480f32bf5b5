//! Configuration management.
//!
//! This module resolves where tidy keeps its data.
//!
//! # Layout
//!
//! Everything lives under a single home directory, `~/.tidyhome/`:
//! - **Database**: `~/.tidyhome/data/tidy.db`
//! - **Photos**: `photos/` next to the database file
//!
//! Test mode (`TIDY_TEST_DB`) swaps `data/` for `test/` so development runs
//! never touch real data.

use std::path::{Path, PathBuf};

use crate::services::PhotoStore;

/// Environment variable naming an explicit database file.
pub const DB_ENV: &str = "TIDY_DB";

/// Environment variable enabling the isolated test database.
pub const TEST_DB_ENV: &str = "TIDY_TEST_DB";

const DB_FILE: &str = "tidy.db";

/// Get the global tidy directory location (`~/.tidyhome/`).
#[must_use]
pub fn global_tidy_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".tidyhome"))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && value.to_lowercase() != "false"
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `TIDY_TEST_DB=1` (or any non-empty
/// value other than `0` / `false`).
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var(TEST_DB_ENV).is_ok_and(|v| is_truthy(&v))
}

/// Get the test database path: `~/.tidyhome/test/tidy.db`.
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_tidy_dir().map(|dir| dir.join("test").join(DB_FILE))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `TIDY_DB` environment variable
/// 3. `TIDY_TEST_DB` environment variable → uses test database
/// 4. Global location: `~/.tidyhome/data/tidy.db`
///
/// # Returns
///
/// Returns the path to the database file, or `None` if no home directory
/// can be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var(DB_ENV) {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    if is_test_mode() {
        return test_db_path();
    }

    global_tidy_dir().map(|dir| dir.join("data").join(DB_FILE))
}

/// Directory holding the database file and its photos.
#[must_use]
pub fn data_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Photo store rooted beside the database.
#[must_use]
pub fn photo_store(db_path: &Path) -> PhotoStore {
    PhotoStore::new(data_dir(db_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/tidy.db");
        let result = resolve_db_path(Some(&explicit));
        assert_eq!(result, Some(explicit));
    }

    #[test]
    fn test_global_tidy_dir_returns_some() {
        let dir = global_tidy_dir().unwrap();
        assert!(dir.ends_with(".tidyhome"));
    }

    #[test]
    fn test_test_db_path_is_separate() {
        let global = global_tidy_dir().unwrap();
        let test = test_db_path().unwrap();

        assert!(test.to_string_lossy().contains("/test/"));
        assert!(test.ends_with("tidy.db"));
        assert_ne!(global.join("data").join("tidy.db"), test);
    }

    #[test]
    fn test_truthy_parsing() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
    }

    #[test]
    fn test_data_dir() {
        assert_eq!(data_dir(Path::new("/a/b/tidy.db")), PathBuf::from("/a/b"));
        assert_eq!(data_dir(Path::new("tidy.db")), PathBuf::from("."));
    }

    #[test]
    fn test_photo_store_beside_db() {
        let store = photo_store(Path::new("/srv/home/tidy.db"));
        assert_eq!(
            store.path_of("photos/x.jpg"),
            PathBuf::from("/srv/home/photos/x.jpg")
        );
    }
}

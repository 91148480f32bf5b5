//! Database migrations embedded at compile time.
//!
//! Migrations are sourced from `/migrations/` at the repo root and
//! embedded into the binary using `include_str!`, so the binary carries
//! no runtime file dependencies.

use rusqlite::{Connection, Result};
use tracing::{info, warn};

/// A single migration with version identifier and SQL content.
struct Migration {
    version: &'static str,
    sql: &'static str,
}

/// All migrations in order, embedded at compile time.
///
/// Version names match the SQL filenames (without .sql extension).
/// The `schema_migrations` table tracks which have been applied.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "001_add_item_furniture_flag",
        sql: include_str!("../../migrations/001_add_item_furniture_flag.sql"),
    },
    Migration {
        version: "002_add_item_sort_order",
        sql: include_str!("../../migrations/002_add_item_sort_order.sql"),
    },
    Migration {
        version: "003_add_item_auto_group",
        sql: include_str!("../../migrations/003_add_item_auto_group.sql"),
    },
    Migration {
        version: "004_add_state_snapshots",
        sql: include_str!("../../migrations/004_add_state_snapshots.sql"),
    },
];

/// Number of migrations embedded in this build.
#[must_use]
pub const fn migration_count() -> usize {
    MIGRATIONS.len()
}

/// Run all pending migrations on the database.
///
/// Already-applied migrations (tracked in `schema_migrations`) are
/// skipped, so this is safe to call on every open.
///
/// # Errors
///
/// Returns an error if a migration fails to apply. ALTER TABLE failures
/// for duplicate columns are logged and treated as applied, since a fresh
/// database already has those columns from the base DDL.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let applied: std::collections::HashSet<String> = conn
        .prepare("SELECT version FROM schema_migrations")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    for migration in MIGRATIONS {
        if applied.contains(migration.version) {
            continue;
        }

        info!(version = migration.version, "Applying migration");

        if let Err(e) = conn.execute_batch(migration.sql) {
            if e.to_string().contains("duplicate column name") {
                warn!(
                    version = migration.version,
                    "Migration partially applied (columns exist), marking complete"
                );
            } else {
                return Err(e);
            }
        }

        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![migration.version, chrono::Utc::now().timestamp_millis()],
        )?;

        info!(version = migration.version, "Migration complete");
    }

    Ok(())
}

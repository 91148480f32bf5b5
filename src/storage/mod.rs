//! SQLite storage layer for tidy.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - IMMEDIATE transactions for every write
//! - Foreign-key cascades from rooms to their items, tasks and snapshots
//!
//! # Submodules
//!
//! - [`migrations`] - Embedded column/table migrations
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use sqlite::{DEFAULT_LOG_LIMIT, SqliteStorage};

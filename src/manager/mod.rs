//! In-memory state managers over the storage gateway.
//!
//! Each manager caches one slice of state (rooms, a room's items, tasks,
//! progress, snapshots), reloads it after every write, and never returns a
//! storage error: failures are logged and the manager falls back to empty
//! or unchanged state. Callers that need a hard error (import, argument
//! validation) get it through an explicit `Result`.
//!
//! The storage handle is passed to every call instead of being owned, so
//! several managers can work against one connection.

mod items;
mod progress;
mod rooms;
mod snapshots;
mod tasks;

pub use items::ItemManager;
pub use progress::ProgressManager;
pub use rooms::RoomManager;
pub use snapshots::SnapshotManager;
pub use tasks::{RoomTasks, TaskManager};

use tracing::warn;

use crate::error::Result;

/// Unwrap a storage result, logging the failure and returning `T::default()`.
pub(crate) fn or_default<T: Default>(op: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(op, error = %e, "Storage call failed");
            T::default()
        }
    }
}

/// Like [`or_default`] for calls whose result carries no value.
pub(crate) fn or_log(op: &str, result: Result<()>) {
    or_default(op, result);
}

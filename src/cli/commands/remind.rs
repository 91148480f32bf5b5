//! Remind command implementation.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use super::{open_storage, print_json};
use crate::error::Result;
use crate::manager::TaskManager;
use crate::services::{Reminder, plan_reminders, write_reminders};

#[derive(Serialize)]
struct RemindOutput<'a> {
    reminders: &'a [Reminder],
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<&'a Path>,
}

/// Execute the remind command: plan a week of reminders from the active
/// tasks and optionally write them to `out`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the file write fails.
pub fn execute(out: Option<&Path>, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let now = Local::now();

    let mut tasks = TaskManager::new();
    tasks.load_due_tasks(&storage, now);
    let reminders = plan_reminders(tasks.all_tasks(), now);

    if let Some(path) = out {
        write_reminders(path, &reminders)?;
    }

    if crate::is_silent() {
        println!("{}", reminders.len());
        return Ok(());
    }

    if json {
        return print_json(&RemindOutput {
            reminders: &reminders,
            count: reminders.len(),
            written_to: out,
        });
    }

    if reminders.is_empty() {
        println!("No reminders needed this week.");
    }
    for r in &reminders {
        println!("{}  {}", r.fire_at.format("%a %b %d %H:%M"), r.body);
    }
    if let Some(path) = out {
        println!();
        println!("Wrote {} reminders to {}", reminders.len(), path.display());
    }
    Ok(())
}

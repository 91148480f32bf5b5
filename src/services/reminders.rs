//! Daily cleaning reminders for the coming week.
//!
//! Planning is pure: given the active tasks and the current time it yields
//! at most one reminder per day. Delivery is left to whatever reads the
//! JSON written by [`write_reminders`].

use std::path::Path;

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::CleaningTask;
use crate::schedule;

/// Days looked ahead, starting today.
pub const REMINDER_DAYS: i64 = 7;

/// Hard cap on planned reminders.
pub const MAX_REMINDERS: usize = 60;

/// Local hour reminders fire at.
pub const REMINDER_HOUR: u32 = 9;

pub const REMINDER_TITLE: &str = "Cleaning Tasks Due";

/// One scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// `cleaning-<day offset>`; replanning replaces reminders with the same id.
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Local>,
    pub task_count: usize,
}

fn reminder_body(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} task{plural} to complete today")
}

/// Plan reminders for each of the next [`REMINDER_DAYS`] days that has at
/// least one task due.
///
/// A task counts as due on a day when it was never completed or when the
/// whole days between its last completion and that day reach its interval.
/// Reminders whose fire time has already passed are skipped.
#[must_use]
pub fn plan_reminders(tasks: &[CleaningTask], now: DateTime<Local>) -> Vec<Reminder> {
    let fire_time = NaiveTime::from_hms_opt(REMINDER_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let mut reminders = Vec::new();

    for offset in 0..REMINDER_DAYS {
        if reminders.len() >= MAX_REMINDERS {
            break;
        }

        let target = now + Duration::days(offset);
        let due = tasks
            .iter()
            .filter(|t| schedule::is_due_on(t.last_completed, t.frequency, target))
            .count();
        if due == 0 {
            continue;
        }

        let Some(fire_at) = Local
            .from_local_datetime(&target.date_naive().and_time(fire_time))
            .earliest()
        else {
            continue;
        };
        if fire_at < now {
            debug!(offset, "Skipping reminder in the past");
            continue;
        }

        reminders.push(Reminder {
            id: format!("cleaning-{offset}"),
            title: REMINDER_TITLE.to_string(),
            body: reminder_body(due),
            fire_at,
            task_count: due,
        });
    }

    reminders
}

/// Write planned reminders to `path` as pretty JSON, atomically.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_reminders(path: &Path, reminders: &[Reminder]) -> Result<()> {
    let json = serde_json::to_vec_pretty(reminders)?;
    super::atomic_write(path, &json)
}

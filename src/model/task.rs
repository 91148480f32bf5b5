//! Cleaning task and completion log models.

use serde::{Deserialize, Serialize};

use super::room::RoomIcon;

/// How often a cleaning task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl TaskFrequency {
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    /// Decode a stored value, falling back to `Weekly`.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Weekly)
    }

    /// Days between due dates.
    #[must_use]
    pub const fn interval_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

impl std::fmt::Display for TaskFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring chore scoped to a room.
///
/// Everything after `created_at` is derived on read from the room row and
/// the task's completion logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningTask {
    pub id: i64,
    pub room_id: i64,
    pub name: String,
    pub frequency: TaskFrequency,
    pub is_active: bool,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    pub room_name: String,
    pub room_icon: RoomIcon,
    /// Most recent completion (Unix milliseconds)
    pub last_completed: Option<i64>,
    pub is_due_today: bool,
    pub current_streak: u32,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub frequency: Option<TaskFrequency>,
    pub is_active: Option<bool>,
}

/// One completion of a task. Never modified after insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningLog {
    pub id: i64,
    pub task_id: i64,
    /// Completion timestamp (Unix milliseconds)
    pub completed_at: i64,
}

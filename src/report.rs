//! Shareable plain-text status report across all rooms.

use colored::Colorize;
use serde::Serialize;

use crate::model::Room;

/// Where a room stands, in the order the checks are made.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoomState {
    /// Decluttered; `clean_percent` is set when tasks are due today.
    Decluttered { clean_percent: Option<u32> },
    InProgress { declutter_percent: u32 },
    Categorizing { categorized: usize, total: usize },
    NotStarted,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomStatus {
    pub room_id: i64,
    pub room_name: String,
    #[serde(flatten)]
    pub state: RoomState,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub rooms: Vec<RoomStatus>,
    pub rooms_decluttered: usize,
    pub total_rooms: usize,
    pub total_items: usize,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).floor().clamp(0.0, 100.0) as u32
}

/// Classify one room, first match wins.
#[must_use]
pub fn room_state(room: &Room) -> RoomState {
    if room.is_decluttered {
        RoomState::Decluttered {
            clean_percent: (room.due_today_count > 0).then(|| percent(room.clean_progress())),
        }
    } else if room.non_furniture_count > 0 {
        RoomState::InProgress {
            declutter_percent: percent(room.declutter_progress()),
        }
    } else if room.item_count > 0 {
        RoomState::Categorizing {
            categorized: room.categorized_count,
            total: room.item_count,
        }
    } else {
        RoomState::NotStarted
    }
}

/// Build the report from rooms loaded with their counts.
#[must_use]
pub fn build_report(rooms: &[Room]) -> StatusReport {
    StatusReport {
        rooms: rooms
            .iter()
            .map(|room| RoomStatus {
                room_id: room.id,
                room_name: room.name.clone(),
                state: room_state(room),
            })
            .collect(),
        rooms_decluttered: rooms.iter().filter(|r| r.is_decluttered).count(),
        total_rooms: rooms.len(),
        total_items: rooms.iter().map(|r| r.item_count).sum(),
    }
}

impl RoomState {
    /// One-line description, uncolored.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Decluttered { clean_percent: Some(p) } => format!("Decluttered, {p}% cleaned today"),
            Self::Decluttered { clean_percent: None } => "Decluttered".to_string(),
            Self::InProgress { declutter_percent } => format!("{declutter_percent}% decluttered"),
            Self::Categorizing { categorized, total } => format!("{categorized}/{total} categorized"),
            Self::NotStarted => "Not started".to_string(),
        }
    }
}

impl StatusReport {
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "{}/{} rooms decluttered, {} items tracked",
            self.rooms_decluttered, self.total_rooms, self.total_items
        )
    }

    /// Render for the terminal. Colors follow `colored`'s global override.
    #[must_use]
    pub fn render(&self) -> String {
        let width = self
            .rooms
            .iter()
            .map(|r| r.room_name.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&format!("{}\n\n", "Home Status".bold()));
        for room in &self.rooms {
            let description = room.state.describe();
            let description = match room.state {
                RoomState::Decluttered { .. } => description.green().to_string(),
                RoomState::NotStarted => description.dimmed().to_string(),
                _ => description,
            };
            out.push_str(&format!("  {:width$}  {description}\n", room.room_name));
        }
        out.push('\n');
        out.push_str(&self.footer());
        out
    }
}

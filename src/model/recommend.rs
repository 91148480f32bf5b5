//! Which room to declutter next.

use serde::Serialize;

use super::room::{Room, RoomIcon};

/// A suggested room, lower `priority` first.
#[derive(Debug, Clone, Serialize)]
pub struct RoomRecommendation {
    pub room_id: i64,
    pub room_name: String,
    pub room_icon: RoomIcon,
    pub reason: String,
    /// 1 = highest
    pub priority: u8,
    pub uncategorized_count: usize,
    pub total_items: usize,
}

/// Rank rooms that are not yet decluttered.
///
/// Rooms where every item already has a disposition get no entry.
#[must_use]
pub fn recommend(rooms: &[Room]) -> Vec<RoomRecommendation> {
    let mut recs: Vec<RoomRecommendation> = rooms
        .iter()
        .filter(|room| !room.is_decluttered)
        .filter_map(|room| {
            let uncategorized = room.uncategorized_count();
            let (priority, reason) = if uncategorized > 20 {
                (
                    1,
                    format!(
                        "High volume: {uncategorized} uncategorized items. \
                         Tackling this room will make a big impact."
                    ),
                )
            } else if uncategorized > 10 {
                (
                    2,
                    format!(
                        "{uncategorized} items need categorizing. \
                         A focused session could clear this room."
                    ),
                )
            } else if room.item_count > 0 && room.categorized_count == 0 {
                (
                    3,
                    format!(
                        "Not started yet. {} items waiting, even 10 minutes helps.",
                        room.item_count
                    ),
                )
            } else if uncategorized > 0 {
                (
                    4,
                    format!("Almost done! Just {uncategorized} items left to categorize."),
                )
            } else if room.item_count == 0 {
                (5, "Empty room. Add items to start decluttering.".to_string())
            } else {
                return None;
            };

            Some(RoomRecommendation {
                room_id: room.id,
                room_name: room.name.clone(),
                room_icon: room.icon,
                reason,
                priority,
                uncategorized_count: uncategorized,
                total_items: room.item_count,
            })
        })
        .collect();

    recs.sort_by_key(|r| r.priority);
    recs
}

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use super::or_default;
use crate::model::{DailyCount, DeclutterSummary, ItemCategory};
use crate::storage::SqliteStorage;

/// Days of completion history loaded for the progress chart.
pub const HISTORY_DAYS: u32 = 30;

/// Whole-home statistics.
#[derive(Debug, Default)]
pub struct ProgressManager {
    summary: DeclutterSummary,
    category_breakdown: BTreeMap<ItemCategory, usize>,
    daily_counts: Vec<DailyCount>,
}

impl ProgressManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn summary(&self) -> &DeclutterSummary {
        &self.summary
    }

    #[must_use]
    pub fn category_breakdown(&self) -> &BTreeMap<ItemCategory, usize> {
        &self.category_breakdown
    }

    #[must_use]
    pub fn daily_counts(&self) -> &[DailyCount] {
        &self.daily_counts
    }

    /// Rebuild the summary, the per-category breakdown and the last
    /// `days` days of completion counts.
    pub fn load_stats(&mut self, storage: &SqliteStorage, now: DateTime<Local>, days: u32) {
        let today = now.date_naive();
        let counts = or_default("count_items_by_category", storage.count_items_by_category());
        let count = |c: ItemCategory| counts.get(&c).copied().unwrap_or(0);

        self.summary = DeclutterSummary {
            total_items: or_default("total_item_count", storage.total_item_count()),
            keep_count: count(ItemCategory::Keep),
            donate_count: count(ItemCategory::Donate),
            trash_count: count(ItemCategory::Trash),
            sell_count: count(ItemCategory::Sell),
            uncategorized_count: count(ItemCategory::Uncategorized),
            rooms_decluttered: or_default("decluttered_room_count", storage.decluttered_room_count()),
            total_rooms: or_default("total_room_count", storage.total_room_count()),
            current_streak: or_default("current_streak", storage.current_streak(today)),
            longest_streak: or_default("longest_streak", storage.longest_streak()),
        };
        self.daily_counts = or_default(
            "daily_completion_counts",
            storage.daily_completion_counts(today, days),
        );
        self.category_breakdown = counts;
    }
}

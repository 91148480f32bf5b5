//! Whole-home progress rollup.

use serde::{Deserialize, Serialize};

/// Declutter and cleaning totals across every room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclutterSummary {
    pub total_items: usize,
    pub keep_count: usize,
    pub donate_count: usize,
    pub trash_count: usize,
    pub sell_count: usize,
    pub uncategorized_count: usize,
    pub rooms_decluttered: usize,
    pub total_rooms: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl DeclutterSummary {
    #[must_use]
    pub fn categorized_count(&self) -> usize {
        self.keep_count + self.donate_count + self.trash_count + self.sell_count
    }

    /// Share of all items with a disposition (0.0 when there are none).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        self.categorized_count() as f64 / self.total_items as f64
    }
}

/// Completions logged on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: chrono::NaiveDate,
    pub count: usize,
}

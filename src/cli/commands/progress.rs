//! Progress command implementation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use super::{open_storage, print_json};
use crate::error::Result;
use crate::manager::ProgressManager;
use crate::model::{DailyCount, DeclutterSummary, ItemCategory};

const BAR_WIDTH: usize = 20;

#[derive(Serialize)]
struct ProgressOutput<'a> {
    #[serde(flatten)]
    summary: &'a DeclutterSummary,
    categorized_count: usize,
    progress_percent: u32,
    categories: &'a BTreeMap<ItemCategory, usize>,
    history_days: u32,
    daily_completions: &'a [DailyCount],
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

fn bar(fraction: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Execute the progress command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or output fails.
pub fn execute(days: u32, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let mut manager = ProgressManager::new();
    manager.load_stats(&storage, Local::now(), days);
    let summary = manager.summary();

    if crate::is_csv() {
        println!("date,completions");
        for day in manager.daily_counts() {
            println!("{},{}", day.date, day.count);
        }
        return Ok(());
    }

    if json {
        return print_json(&ProgressOutput {
            summary,
            categorized_count: summary.categorized_count(),
            progress_percent: percent(summary.progress()),
            categories: manager.category_breakdown(),
            history_days: days,
            daily_completions: manager.daily_counts(),
        });
    }

    println!("{}", "Declutter Progress".bold());
    println!();
    println!(
        "  {} {}%  ({}/{} items categorized)",
        bar(summary.progress()).green(),
        percent(summary.progress()),
        summary.categorized_count(),
        summary.total_items
    );
    println!(
        "  Rooms decluttered: {}/{}",
        summary.rooms_decluttered, summary.total_rooms
    );
    println!();
    for category in ItemCategory::ALL {
        let count = manager.category_breakdown().get(&category).copied().unwrap_or(0);
        println!("  {:<14} {count}", category.label());
    }

    println!();
    println!("{}", "Cleaning".bold());
    println!();
    println!("  Current streak: {} days", summary.current_streak);
    println!("  Longest streak: {} days", summary.longest_streak);

    let daily = manager.daily_counts();
    if !daily.is_empty() {
        let total: usize = daily.iter().map(|d| d.count).sum();
        println!(
            "  Last {days} days: {total} completions on {} days",
            daily.len()
        );
        for day in daily.iter().rev().take(7) {
            println!("    {}  {}", day.date.format("%a %b %d"), "■".repeat(day.count));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fills_proportionally() {
        assert_eq!(bar(0.0).chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar(0.5).chars().filter(|&c| c == '█').count(), 10);
        assert_eq!(bar(1.0).chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(percent(0.666), 67);
        assert_eq!(percent(1.2), 100);
    }
}

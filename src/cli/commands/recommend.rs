//! Recommend command implementation.

use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use super::{open_storage, print_json};
use crate::error::Result;
use crate::manager::RoomManager;
use crate::model::{RoomRecommendation, recommend};

#[derive(Serialize)]
struct RecommendOutput<'a> {
    recommendations: &'a [RoomRecommendation],
    count: usize,
}

/// Execute the recommend command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or output fails.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let mut rooms = RoomManager::new();
    rooms.load(&storage, Local::now());
    let recs = recommend(rooms.rooms());

    if crate::is_csv() {
        println!("priority,room_id,room,uncategorized,total,reason");
        for r in &recs {
            println!(
                "{},{},{},{},{},{}",
                r.priority,
                r.room_id,
                crate::csv_escape(&r.room_name),
                r.uncategorized_count,
                r.total_items,
                crate::csv_escape(&r.reason)
            );
        }
    } else if json {
        print_json(&RecommendOutput {
            count: recs.len(),
            recommendations: &recs,
        })?;
    } else if recs.is_empty() {
        println!("Every room is decluttered. {}", "Nice work!".green());
    } else {
        println!("Where to declutter next:");
        println!();
        for (n, r) in recs.iter().enumerate() {
            println!("{}. {} [{}]", n + 1, r.room_name.bold(), r.room_id);
            println!("   {}", r.reason);
        }
    }
    Ok(())
}

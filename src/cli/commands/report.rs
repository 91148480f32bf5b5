//! Report command implementation.

use std::path::PathBuf;

use chrono::Local;

use super::{open_storage, print_json};
use crate::error::Result;
use crate::manager::RoomManager;
use crate::report::build_report;

/// Execute the report command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or output fails.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let mut rooms = RoomManager::new();
    rooms.load(&storage, Local::now());
    let report = build_report(rooms.rooms());

    if crate::is_csv() {
        println!("room_id,room,status");
        for room in &report.rooms {
            println!(
                "{},{},{}",
                room.room_id,
                crate::csv_escape(&room.room_name),
                crate::csv_escape(&room.state.describe())
            );
        }
    } else if json {
        print_json(&report)?;
    } else {
        println!("{}", report.render());
    }
    Ok(())
}

//! Snapshot command implementations.

use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use super::{format_ms, open_storage, print_json, resolve_room};
use crate::cli::SnapshotCommands;
use crate::error::{Error, Result};
use crate::manager::SnapshotManager;
use crate::model::{SnapshotDelta, StateSnapshot};

#[derive(Serialize)]
struct SnapshotListOutput<'a> {
    snapshots: &'a [StateSnapshot],
    count: usize,
}

#[derive(Serialize)]
struct DeltasOutput<'a> {
    room_id: i64,
    room_name: &'a str,
    deltas: &'a [SnapshotDelta],
    count: usize,
}

/// Execute snapshot commands.
pub fn execute(command: &SnapshotCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        SnapshotCommands::Take { room } => take(room, db_path, json),
        SnapshotCommands::List { room } => list(room.as_deref(), db_path, json),
        SnapshotCommands::Deltas { room } => deltas(room, db_path, json),
    }
}

fn take(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    let mut manager = SnapshotManager::new();
    let id = manager
        .take_snapshot(&mut storage, room.id, now)
        .ok_or_else(|| Error::Other(format!("Could not snapshot {}", room.name)))?;

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    let snapshot = manager.snapshots().iter().find(|s| s.id == id);
    if json {
        return print_json(&snapshot);
    }

    println!("Snapshot [{id}] of {}", room.name);
    if let Some(s) = snapshot {
        println!(
            "  {} items, {} categorized (keep {}, donate {}, trash {}, sell {}), {} furniture",
            s.total_items,
            s.categorized_count,
            s.keep_count,
            s.donate_count,
            s.trash_count,
            s.sell_count,
            s.furniture_count
        );
    }
    Ok(())
}

fn list(room: Option<&str>, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let mut manager = SnapshotManager::new();
    match room {
        Some(room) => {
            let room = resolve_room(&storage, room, Local::now())?;
            manager.load_for_room(&storage, room.id);
        }
        None => manager.load_all(&storage),
    }
    let snapshots = manager.snapshots();

    if crate::is_csv() {
        println!("id,room_id,date,total,categorized,keep,donate,trash,sell,furniture");
        for s in snapshots {
            println!(
                "{},{},{},{},{},{},{},{},{},{}",
                s.id,
                s.room_id,
                format_ms(s.snapshot_date),
                s.total_items,
                s.categorized_count,
                s.keep_count,
                s.donate_count,
                s.trash_count,
                s.sell_count,
                s.furniture_count
            );
        }
    } else if json {
        print_json(&SnapshotListOutput {
            snapshots,
            count: snapshots.len(),
        })?;
    } else if snapshots.is_empty() {
        println!("No snapshots yet. Take one with 'tidy snapshot take <room>'.");
    } else {
        println!("Snapshots ({}):", snapshots.len());
        println!();
        for s in snapshots {
            println!(
                "  [{}] room {}  {}  {} items, {} categorized",
                s.id,
                s.room_id,
                format_ms(s.snapshot_date),
                s.total_items,
                s.categorized_count
            );
        }
    }
    Ok(())
}

fn signed(n: i64) -> String {
    format!("{n:+}")
}

fn deltas(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, room, Local::now())?;

    let mut manager = SnapshotManager::new();
    manager.load_for_room(&storage, room.id);
    let deltas = manager.deltas_for_room(room.id);

    if json {
        return print_json(&DeltasOutput {
            room_id: room.id,
            room_name: &room.name,
            count: deltas.len(),
            deltas: &deltas,
        });
    }

    if deltas.is_empty() {
        println!("{} needs at least two snapshots to compare.", room.name);
        return Ok(());
    }

    println!("Changes in {}:", room.name);
    println!();
    for d in &deltas {
        println!(
            "  {} → {}  items {}  categorized {}  keep {}  donate {}  trash {}  sell {}",
            format_ms(d.from_date),
            format_ms(d.to_date),
            signed(d.items_delta),
            signed(d.categorized_delta),
            signed(d.keep_delta),
            signed(d.donate_delta),
            signed(d.trash_delta),
            signed(d.sell_delta)
        );
    }
    Ok(())
}

//! Room command implementations.

use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use super::{open_storage, print_json, resolve_room};
use crate::cli::RoomCommands;
use crate::config::photo_store;
use crate::error::{Error, Result};
use crate::manager::{RoomManager, TaskManager};
use crate::model::{CleaningTask, Room, RoomUpdate};
use crate::report::room_state;
use crate::validate::normalize_icon;

#[derive(Serialize)]
struct RoomListOutput<'a> {
    rooms: &'a [Room],
    count: usize,
}

#[derive(Serialize)]
struct RoomShowOutput<'a> {
    #[serde(flatten)]
    room: &'a Room,
    status: String,
    tasks: &'a [CleaningTask],
}

#[derive(Serialize)]
struct RoomChangeOutput<'a> {
    id: i64,
    name: &'a str,
    action: &'a str,
}

#[derive(Serialize)]
struct DeclutterOutput<'a> {
    id: i64,
    name: &'a str,
    tasks_added: usize,
}

/// Execute room commands.
pub fn execute(command: &RoomCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        RoomCommands::List => list(db_path, json),
        RoomCommands::Show { room } => show(room, db_path, json),
        RoomCommands::Add { name, icon } => add(name, icon, db_path, json),
        RoomCommands::Rename { room, name } => rename(room, name, db_path, json),
        RoomCommands::Icon { room, icon } => set_icon(room, icon, db_path, json),
        RoomCommands::Declutter { room } => declutter(room, db_path, json),
        RoomCommands::Move { room, position } => move_room(room, *position, db_path, json),
        RoomCommands::Delete { room } => delete(room, db_path, json),
    }
}

fn list(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let mut manager = RoomManager::new();
    manager.load(&storage, Local::now());
    let rooms = manager.rooms();

    if crate::is_csv() {
        println!("id,name,icon,decluttered,items,categorized,tasks");
        for room in rooms {
            println!(
                "{},{},{},{},{},{},{}",
                room.id,
                crate::csv_escape(&room.name),
                room.icon,
                room.is_decluttered,
                room.item_count,
                room.categorized_count,
                room.task_count
            );
        }
    } else if json {
        print_json(&RoomListOutput {
            rooms,
            count: rooms.len(),
        })?;
    } else if rooms.is_empty() {
        println!("No rooms. Add one with 'tidy room add <name>'.");
    } else {
        print_room_list(rooms);
    }

    Ok(())
}

fn print_room_list(rooms: &[Room]) {
    let width = rooms.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    println!("Rooms ({}):", rooms.len());
    println!();
    for room in rooms {
        let marker = if room.is_decluttered {
            "✓".green().to_string()
        } else {
            "○".to_string()
        };
        println!(
            "{marker} [{:>3}] {:width$}  {:<11} {}",
            room.id,
            room.name,
            room.icon.label(),
            room_state(room).describe().dimmed()
        );
    }
}

fn show(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    let mut tasks = TaskManager::new();
    tasks.load_tasks_for_room(&storage, room.id, now);
    let status = room_state(&room).describe();

    if json {
        return print_json(&RoomShowOutput {
            room: &room,
            status,
            tasks: tasks.all_tasks(),
        });
    }

    println!("[{}] {} ({})", room.id, room.name.bold(), room.icon.label());
    println!();
    println!("Status:      {status}");
    println!(
        "Items:       {} ({} categorized, {} furniture)",
        room.item_count,
        room.categorized_count,
        room.item_count.saturating_sub(room.non_furniture_count)
    );
    if room.is_decluttered {
        println!(
            "Today:       {}/{} due tasks done",
            room.completed_today_count, room.due_today_count
        );
    }

    if !tasks.all_tasks().is_empty() {
        println!();
        println!("Tasks:");
        for task in tasks.all_tasks() {
            let due = if task.is_due_today { " (due)" } else { "" };
            println!("  [{}] {} - {}{due}", task.id, task.name, task.frequency.label());
        }
    }

    Ok(())
}

fn add(name: &str, icon: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Room name cannot be empty".to_string()));
    }
    let icon = normalize_icon(icon)?;

    let (mut storage, _) = open_storage(db_path)?;
    let mut manager = RoomManager::new();
    let id = manager
        .add_room(&mut storage, name, icon, Local::now())
        .ok_or_else(|| Error::Other(format!("Could not add room '{name}'")))?;

    report_change(id, name, "added", json)
}

fn rename(room: &str, name: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Room name cannot be empty".to_string()));
    }

    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    let update = RoomUpdate {
        name: Some(name.to_string()),
        ..RoomUpdate::default()
    };
    RoomManager::new().update_room(&mut storage, room.id, &update, now);

    report_change(room.id, name, "renamed", json)
}

fn set_icon(room: &str, icon: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let icon = normalize_icon(icon)?;
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    let update = RoomUpdate {
        icon: Some(icon),
        ..RoomUpdate::default()
    };
    RoomManager::new().update_room(&mut storage, room.id, &update, now);

    report_change(room.id, &room.name, "icon_changed", json)
}

fn declutter(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    if !room.is_decluttered && room.uncategorized_count() > 0 {
        warn!(
            room = %room.name,
            uncategorized = room.uncategorized_count(),
            "Marking room decluttered with uncategorized items"
        );
    }

    let added = RoomManager::new().mark_decluttered(&mut storage, room.id, now);

    if crate::is_silent() {
        println!("{}", room.id);
        return Ok(());
    }

    if json {
        print_json(&DeclutterOutput {
            id: room.id,
            name: &room.name,
            tasks_added: added,
        })?;
    } else if room.is_decluttered {
        println!("{} is already decluttered.", room.name);
    } else {
        println!("{} {} is decluttered!", "✓".green(), room.name);
        if added > 0 {
            println!("  Added {added} cleaning tasks. See them with 'tidy task list --room {}'.", room.id);
        }
    }

    Ok(())
}

fn move_room(room: &str, position: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    RoomManager::new().move_room(&mut storage, room.id, position, now);

    report_change(room.id, &room.name, "moved", json)
}

fn delete(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, db_path) = open_storage(db_path)?;
    let now = Local::now();
    let room = resolve_room(&storage, room, now)?;

    // Photo files are not covered by the cascade.
    let photos: Vec<String> = storage
        .list_items(room.id)?
        .into_iter()
        .filter_map(|item| item.photo_path)
        .collect();

    if !RoomManager::new().delete_room(&mut storage, room.id, now) {
        return Err(Error::Other(format!("Could not delete room '{}'", room.name)));
    }

    let store = photo_store(&db_path);
    for photo in &photos {
        if let Err(e) = store.delete(photo) {
            warn!(path = %photo, error = %e, "Could not remove photo");
        }
    }

    report_change(room.id, &room.name, "deleted", json)
}

fn report_change(id: i64, name: &str, action: &str, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        print_json(&RoomChangeOutput { id, name, action })?;
    } else {
        let label = match action {
            "added" => "Added room",
            "renamed" => "Renamed room",
            "icon_changed" => "Changed icon of room",
            "moved" => "Moved room",
            _ => "Deleted room",
        };
        println!("{label}: {name} [{id}]");
    }
    Ok(())
}

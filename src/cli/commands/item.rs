//! Item command implementations.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use super::{open_storage, print_json, resolve_room};
use crate::cli::{ItemAddArgs, ItemCommands, ItemEditArgs, ItemListArgs, ItemSort};
use crate::config::photo_store;
use crate::error::{Error, Result};
use crate::manager::ItemManager;
use crate::model::{DeclutterItem, ItemCategory, ItemUpdate, NewItem, Room, SortMode};
use crate::parse::parse_item_names;
use crate::storage::SqliteStorage;
use crate::validate::normalize_category;

#[derive(Serialize)]
struct ItemListOutput<'a> {
    room_id: i64,
    room_name: &'a str,
    sort: SortMode,
    items: Vec<&'a DeclutterItem>,
    count: usize,
}

#[derive(Serialize)]
struct ItemCreateOutput<'a> {
    id: i64,
    room_id: i64,
    name: &'a str,
    category: ItemCategory,
    is_furniture: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_path: Option<&'a str>,
}

#[derive(Serialize)]
struct ItemsAddedOutput<'a> {
    room_id: i64,
    room_name: &'a str,
    added: usize,
    names: &'a [String],
}

#[derive(Serialize)]
struct ItemChangeOutput<'a> {
    ids: &'a [i64],
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<ItemCategory>,
}

#[derive(Serialize)]
struct FurnitureOutput {
    id: i64,
    is_furniture: bool,
}

#[derive(Serialize)]
struct PhotoOutput<'a> {
    id: i64,
    photo_path: Option<&'a str>,
}

#[derive(Serialize)]
struct AutogroupOutput<'a> {
    room_id: i64,
    room_name: &'a str,
    grouped: usize,
    cleared: usize,
}

/// Execute item commands.
pub fn execute(command: &ItemCommands, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    match command {
        ItemCommands::List(args) => list(args, db_path, json),
        ItemCommands::Add(args) => add(args, db_path, json),
        ItemCommands::Bulk { room, text } => bulk(room, text, db_path, json),
        ItemCommands::Import { room, file } => import(room, file, db_path, json),
        ItemCommands::Paste { room } => paste(room, db_path, json),
        ItemCommands::Categorize { category, ids } => categorize(category, ids, db_path, json),
        ItemCommands::Edit(args) => edit(args, db_path, json),
        ItemCommands::Furniture { id } => furniture(*id, db_path, json),
        ItemCommands::Move { id, position } => move_item(*id, *position, db_path, json),
        ItemCommands::Photo { id, file, remove } => {
            photo(*id, file.as_deref(), *remove, db_path, json)
        }
        ItemCommands::Delete { ids } => delete(ids, db_path, json),
        ItemCommands::Autogroup { room, clear } => autogroup(room, *clear, db_path, json),
    }
}

const fn sort_mode(sort: ItemSort) -> SortMode {
    match sort {
        ItemSort::Recent => SortMode::Recent,
        ItemSort::Alphabetical => SortMode::Alphabetical,
        ItemSort::Custom => SortMode::Custom,
    }
}

fn list(args: &ItemListArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let filter = args.category.as_deref().map(normalize_category).transpose()?;

    let (storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, &args.room, Local::now())?;

    let mut manager = ItemManager::new();
    manager.load(&storage, room.id);
    manager.set_sort_mode(sort_mode(args.sort));

    let items: Vec<&DeclutterItem> = match filter {
        Some(category) => manager.items_in(category),
        None => manager.items().iter().collect(),
    };

    if crate::is_csv() {
        println!("id,name,category,furniture,group,notes");
        for item in &items {
            println!(
                "{},{},{},{},{},{}",
                item.id,
                crate::csv_escape(&item.name),
                item.category,
                item.is_furniture,
                crate::csv_escape(item.auto_group.as_deref().unwrap_or("")),
                crate::csv_escape(item.notes.as_deref().unwrap_or(""))
            );
        }
    } else if json {
        print_json(&ItemListOutput {
            room_id: room.id,
            room_name: &room.name,
            sort: manager.sort_mode(),
            count: items.len(),
            items,
        })?;
    } else if items.is_empty() {
        println!("No items in {}.", room.name);
    } else {
        print_item_sections(&room, &items, args.groups && manager.is_autogrouped());
    }

    Ok(())
}

/// Print items under one heading per category, keeping the list order
/// within each section.
fn print_item_sections(room: &Room, items: &[&DeclutterItem], show_groups: bool) {
    println!("{} ({} items):", room.name.bold(), items.len());
    for category in ItemCategory::ALL {
        let section: Vec<&&DeclutterItem> = items.iter().filter(|i| i.category == category).collect();
        if section.is_empty() {
            continue;
        }
        println!();
        println!("{} ({}):", category.label(), section.len());
        for item in section {
            let mut line = format!("  [{}] {}", item.id, item.name);
            if item.is_furniture {
                line.push_str(&format!(" {}", "(furniture)".dimmed()));
            }
            if item.photo_path.is_some() {
                line.push_str(" 📷");
            }
            if show_groups {
                if let Some(group) = &item.auto_group {
                    line.push_str(&format!(" {}", format!("#{group}").cyan()));
                }
            }
            println!("{line}");
        }
    }
}

fn add(args: &ItemAddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Item name cannot be empty".to_string()));
    }
    let category = args
        .category
        .as_deref()
        .map(normalize_category)
        .transpose()?
        .unwrap_or(ItemCategory::Uncategorized);

    let (mut storage, db_path) = open_storage(db_path)?;
    let room = resolve_room(&storage, &args.room, Local::now())?;

    let photo_path = match &args.photo {
        Some(file) => Some(photo_store(&db_path).save_file(file)?),
        None => None,
    };

    let new_item = NewItem {
        room_id: room.id,
        name: name.to_string(),
        category,
        is_furniture: args.furniture,
        photo_path,
        notes: args.notes.clone().filter(|n| !n.trim().is_empty()),
    };

    let mut manager = ItemManager::new();
    let Some(id) = manager.add_item(&mut storage, &new_item) else {
        if let Some(photo) = &new_item.photo_path {
            remove_photo(&db_path, photo);
        }
        return Err(Error::Other(format!("Could not add item '{name}'")));
    };

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        print_json(&ItemCreateOutput {
            id,
            room_id: room.id,
            name,
            category,
            is_furniture: new_item.is_furniture,
            photo_path: new_item.photo_path.as_deref(),
        })?;
    } else {
        println!("Added item: {name} [{id}] to {}", room.name);
        if category != ItemCategory::Uncategorized {
            println!("  Category: {}", category.label());
        }
    }

    Ok(())
}

fn bulk(room: &str, text: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let names = parse_item_names(text);
    if names.is_empty() {
        return Err(Error::InvalidArgument(
            "No item names found. Separate names with commas, semicolons or 'and'".to_string(),
        ));
    }

    let (mut storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, room, Local::now())?;

    let added = ItemManager::new().add_items(&mut storage, room.id, &names);
    if added == 0 {
        return Err(Error::Other(format!("Could not add items to {}", room.name)));
    }

    report_added(&room, added, &names, json)
}

fn import(room: &str, file: &Path, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, room, Local::now())?;

    let mut manager = ItemManager::new();
    manager.load(&storage, room.id);
    let before: Vec<i64> = manager.items().iter().map(|i| i.id).collect();
    let added = manager.import_file(&mut storage, room.id, file)?;

    report_added(&room, added, &new_names(&manager, &before), json)
}

fn paste(room: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let (mut storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, room, Local::now())?;

    let mut manager = ItemManager::new();
    manager.load(&storage, room.id);
    let before: Vec<i64> = manager.items().iter().map(|i| i.id).collect();
    let added = manager.import_text(&mut storage, room.id, &text)?;

    report_added(&room, added, &new_names(&manager, &before), json)
}

/// Names of items that were not in the room before an import.
fn new_names(manager: &ItemManager, before: &[i64]) -> Vec<String> {
    let mut added: Vec<&DeclutterItem> = manager
        .items()
        .iter()
        .filter(|i| !before.contains(&i.id))
        .collect();
    added.sort_by_key(|i| i.sort_order);
    added.into_iter().map(|i| i.name.clone()).collect()
}

fn report_added(room: &Room, added: usize, names: &[String], json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{added}");
        return Ok(());
    }

    if json {
        print_json(&ItemsAddedOutput {
            room_id: room.id,
            room_name: &room.name,
            added,
            names,
        })?;
    } else {
        println!("Added {added} items to {}:", room.name);
        for name in names {
            println!("  - {name}");
        }
    }
    Ok(())
}

fn categorize(category: &str, ids: &[i64], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let category = normalize_category(category)?;
    let (mut storage, _) = open_storage(db_path)?;

    let mut manager = ItemManager::new();
    for &id in ids {
        if !manager.categorize(&mut storage, id, category) {
            return Err(Error::ItemNotFound { id });
        }
    }

    report_items(ids, "categorized", Some(category), json, |id| {
        format!("Item {id} → {}", category.label())
    })
}

fn edit(args: &ItemEditArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let category = args.category.as_deref().map(normalize_category).transpose()?;
    let name = args.name.as_deref().map(str::trim);
    if name.is_some_and(str::is_empty) {
        return Err(Error::InvalidArgument("Item name cannot be empty".to_string()));
    }

    let update = ItemUpdate {
        name: name.map(ToString::to_string),
        category,
        photo_path: None,
        notes: args.notes.clone(),
    };
    if update.name.is_none() && update.category.is_none() && update.notes.is_none() {
        return Err(Error::InvalidArgument(
            "Nothing to change. Pass --name, --category or --notes".to_string(),
        ));
    }

    let (mut storage, _) = open_storage(db_path)?;
    if !ItemManager::new().update_item(&mut storage, args.id, &update) {
        return Err(Error::ItemNotFound { id: args.id });
    }

    report_items(&[args.id], "updated", category, json, |id| format!("Updated item {id}"))
}

fn furniture(id: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let is_furniture = ItemManager::new()
        .toggle_furniture(&mut storage, id)
        .ok_or(Error::ItemNotFound { id })?;

    if crate::is_silent() {
        println!("{id}");
    } else if json {
        print_json(&FurnitureOutput { id, is_furniture })?;
    } else if is_furniture {
        println!("Item {id} marked as furniture (left out of declutter progress)");
    } else {
        println!("Item {id} is no longer furniture");
    }
    Ok(())
}

fn move_item(id: i64, position: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let item = find_item(&storage, id)?;

    let mut manager = ItemManager::new();
    manager.load(&storage, item.room_id);
    manager.set_sort_mode(SortMode::Custom);
    if !manager.move_item_to(&mut storage, id, position) {
        return Err(Error::ItemNotFound { id });
    }

    report_items(&[id], "moved", None, json, |id| {
        format!("Moved item {id} to position {position} in {}", item.category.label())
    })
}

fn photo(
    id: i64,
    file: Option<&Path>,
    remove: bool,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let (mut storage, db_path) = open_storage(db_path)?;
    find_item(&storage, id)?;

    let new_path = match file {
        Some(file) if !remove => Some(photo_store(&db_path).save_file(file)?),
        _ => None,
    };

    let previous = ItemManager::new()
        .set_photo(&mut storage, id, new_path.as_deref())
        .ok_or(Error::ItemNotFound { id })?;
    if let Some(old) = previous {
        remove_photo(&db_path, &old);
    }

    if crate::is_silent() {
        println!("{}", new_path.as_deref().unwrap_or(""));
    } else if json {
        print_json(&PhotoOutput {
            id,
            photo_path: new_path.as_deref(),
        })?;
    } else if let Some(path) = &new_path {
        println!("Saved photo for item {id}: {path}");
    } else {
        println!("Removed photo from item {id}");
    }
    Ok(())
}

fn delete(ids: &[i64], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, db_path) = open_storage(db_path)?;

    let mut manager = ItemManager::new();
    for &id in ids {
        let item = manager
            .delete_item(&mut storage, id)
            .ok_or(Error::ItemNotFound { id })?;
        if let Some(photo) = &item.photo_path {
            remove_photo(&db_path, photo);
        }
    }

    report_items(ids, "deleted", None, json, |id| format!("Deleted item {id}"))
}

fn autogroup(room: &str, clear: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (mut storage, _) = open_storage(db_path)?;
    let room = resolve_room(&storage, room, Local::now())?;

    let mut manager = ItemManager::new();
    manager.load(&storage, room.id);
    let (grouped, cleared) = if clear {
        (0, manager.clear_autogroups(&mut storage))
    } else {
        (manager.autogroup(&mut storage), 0)
    };

    if crate::is_silent() {
        println!("{}", if clear { cleared } else { grouped });
        return Ok(());
    }

    if json {
        return print_json(&AutogroupOutput {
            room_id: room.id,
            room_name: &room.name,
            grouped,
            cleared,
        });
    }

    if clear {
        println!("Cleared groups from {cleared} items in {}", room.name);
    } else if grouped == 0 {
        println!("No shared words found in {}'s item names.", room.name);
    } else {
        let mut labels: Vec<&str> = manager
            .items()
            .iter()
            .filter_map(|i| i.auto_group.as_deref())
            .collect();
        labels.sort_unstable();
        labels.dedup();
        println!("Grouped {grouped} items in {}: {}", room.name, labels.join(", "));
    }
    Ok(())
}

fn find_item(storage: &SqliteStorage, id: i64) -> Result<DeclutterItem> {
    storage.get_item(id)?.ok_or(Error::ItemNotFound { id })
}

/// Best-effort removal of a photo file; the record is already gone.
fn remove_photo(db_path: &Path, relative: &str) {
    if let Err(e) = photo_store(db_path).delete(relative) {
        warn!(path = %relative, error = %e, "Could not remove photo");
    }
}

fn report_items(
    ids: &[i64],
    action: &str,
    category: Option<ItemCategory>,
    json: bool,
    describe: impl Fn(i64) -> String,
) -> Result<()> {
    if crate::is_silent() {
        for id in ids {
            println!("{id}");
        }
        return Ok(());
    }

    if json {
        print_json(&ItemChangeOutput {
            ids,
            action,
            category,
        })?;
    } else {
        for &id in ids {
            println!("{}", describe(id));
        }
    }
    Ok(())
}

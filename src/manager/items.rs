use std::path::Path;

use tracing::{debug, warn};

use super::{or_default, or_log};
use crate::error::{Error, Result};
use crate::model::{DeclutterItem, ItemCategory, ItemUpdate, NewItem, SortMode};
use crate::parse;
use crate::storage::SqliteStorage;

const UNREADABLE_FILE: &str = "Could not read file or file is empty.";
const NO_ITEMS_FOUND: &str = "No items found in file.";

/// Cached items of one room, kept in the current sort order.
#[derive(Debug, Default)]
pub struct ItemManager {
    room_id: Option<i64>,
    items: Vec<DeclutterItem>,
    sort_mode: SortMode,
}

impl ItemManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[DeclutterItem] {
        &self.items
    }

    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Load a room's items and sort them by the current mode.
    pub fn load(&mut self, storage: &SqliteStorage, room_id: i64) {
        self.room_id = Some(room_id);
        self.items = or_default("list_items", storage.list_items(room_id));
        self.apply_sorting();
        debug!(room_id, count = self.items.len(), "Loaded items");
    }

    fn reload(&mut self, storage: &SqliteStorage) {
        if let Some(room_id) = self.room_id {
            self.load(storage, room_id);
        }
    }

    pub fn add_item(&mut self, storage: &mut SqliteStorage, item: &NewItem) -> Option<i64> {
        let id = or_default("insert_item", storage.insert_item(item).map(Some));
        self.load(storage, item.room_id);
        id
    }

    /// Add uncategorized items by name; returns how many were stored.
    pub fn add_items(&mut self, storage: &mut SqliteStorage, room_id: i64, names: &[String]) -> usize {
        let added = or_default("insert_items", storage.insert_items(room_id, names));
        self.load(storage, room_id);
        added
    }

    pub fn categorize(&mut self, storage: &mut SqliteStorage, item_id: i64, category: ItemCategory) -> bool {
        let updated = or_default(
            "update_item_category",
            storage.update_item_category(item_id, category),
        );
        self.reload(storage);
        updated
    }

    pub fn update_item(&mut self, storage: &mut SqliteStorage, item_id: i64, update: &ItemUpdate) -> bool {
        let updated = or_default("update_item", storage.update_item(item_id, update));
        self.reload(storage);
        updated
    }

    /// Flip the furniture flag. Returns the new value, or `None` if the
    /// item does not exist.
    pub fn toggle_furniture(&mut self, storage: &mut SqliteStorage, item_id: i64) -> Option<bool> {
        let item = or_default("get_item", storage.get_item(item_id))?;
        let flag = !item.is_furniture;
        let updated = or_default(
            "update_item_furniture",
            storage.update_item_furniture(item_id, flag),
        );
        self.reload(storage);
        updated.then_some(flag)
    }

    /// Point the item at a new photo, or none. Returns the path it had
    /// before, so callers can remove the old file; `None` if the item does
    /// not exist.
    pub fn set_photo(
        &mut self,
        storage: &mut SqliteStorage,
        item_id: i64,
        photo_path: Option<&str>,
    ) -> Option<Option<String>> {
        let item = or_default("get_item", storage.get_item(item_id))?;
        let updated = or_default("set_item_photo", storage.set_item_photo(item_id, photo_path));
        self.reload(storage);
        updated.then_some(item.photo_path)
    }

    /// Delete an item and return it, so callers can clean up its photo.
    pub fn delete_item(&mut self, storage: &mut SqliteStorage, item_id: i64) -> Option<DeclutterItem> {
        let item = or_default("get_item", storage.get_item(item_id))?;
        let deleted = or_default("delete_item", storage.delete_item(item_id));
        self.reload(storage);
        deleted.then_some(item)
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.apply_sorting();
    }

    /// Re-sort the cache: recent is newest first, alphabetical ignores
    /// case, custom follows the stored manual order.
    pub fn apply_sorting(&mut self) {
        match self.sort_mode {
            SortMode::Recent => self
                .items
                .sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
            SortMode::Alphabetical => self.items.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.id.cmp(&b.id))
            }),
            SortMode::Custom => self
                .items
                .sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id))),
        }
    }

    /// Reorder items within one category section, as a list drag does:
    /// the items at `from` (indices into [`items_in`](Self::items_in)) are
    /// moved to sit before the item currently at `to`.
    ///
    /// The room's manual order is renumbered and the manager switches to
    /// custom sorting. Returns false when an index is out of range.
    pub fn move_items(
        &mut self,
        storage: &mut SqliteStorage,
        category: ItemCategory,
        from: &[usize],
        to: usize,
    ) -> bool {
        let mut section: Vec<i64> = self.items_in(category).iter().map(|i| i.id).collect();
        if from.is_empty() || from.iter().any(|&i| i >= section.len()) {
            return false;
        }

        let mut offsets = from.to_vec();
        offsets.sort_unstable();
        offsets.dedup();

        let moving: Vec<i64> = offsets.iter().map(|&i| section[i]).collect();
        let to = to.min(section.len());
        let dest = to - offsets.iter().filter(|&&i| i < to).count();
        for &i in offsets.iter().rev() {
            section.remove(i);
        }
        section.splice(dest..dest, moving);

        let mut orders = Vec::with_capacity(self.items.len());
        for cat in ItemCategory::ALL {
            let ids: Vec<i64> = if cat == category {
                section.clone()
            } else {
                self.items_in(cat).iter().map(|i| i.id).collect()
            };
            for id in ids {
                let order = i64::try_from(orders.len()).unwrap_or(i64::MAX);
                orders.push((id, order));
            }
        }

        or_log("set_item_sort_orders", storage.set_item_sort_orders(&orders));
        self.sort_mode = SortMode::Custom;
        self.reload(storage);
        true
    }

    /// Move one item to `position` within its category section.
    pub fn move_item_to(&mut self, storage: &mut SqliteStorage, item_id: i64, position: usize) -> bool {
        let Some(category) = self.items.iter().find(|i| i.id == item_id).map(|i| i.category) else {
            return false;
        };
        let Some(current) = self.items_in(category).iter().position(|i| i.id == item_id) else {
            return false;
        };
        // Drag destinations count the slot the item is leaving.
        let to = if position > current { position + 1 } else { position };
        self.move_items(storage, category, &[current], to)
    }

    /// Label items by shared name keywords and persist the labels.
    /// Returns how many items received a group.
    pub fn autogroup(&mut self, storage: &mut SqliteStorage) -> usize {
        let groups = parse::autogroup(&self.items);
        let grouped = groups.iter().filter(|(_, g)| g.is_some()).count();
        or_log("set_item_groups", storage.set_item_groups(&groups));
        self.reload(storage);
        grouped
    }

    pub fn clear_autogroups(&mut self, storage: &mut SqliteStorage) -> usize {
        let Some(room_id) = self.room_id else {
            return 0;
        };
        let cleared = or_default("clear_item_groups", storage.clear_item_groups(room_id));
        self.reload(storage);
        cleared
    }

    #[must_use]
    pub fn is_autogrouped(&self) -> bool {
        self.items.iter().any(|i| i.auto_group.is_some())
    }

    #[must_use]
    pub fn uncategorized_items(&self) -> Vec<&DeclutterItem> {
        self.items_in(ItemCategory::Uncategorized)
    }

    #[must_use]
    pub fn categorized_items(&self) -> Vec<&DeclutterItem> {
        self.items
            .iter()
            .filter(|i| i.category != ItemCategory::Uncategorized)
            .collect()
    }

    #[must_use]
    pub fn items_in(&self, category: ItemCategory) -> Vec<&DeclutterItem> {
        self.items.iter().filter(|i| i.category == category).collect()
    }

    /// Add every item named in pasted or dictated text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Import`] when the text names no items.
    pub fn import_text(&mut self, storage: &mut SqliteStorage, room_id: i64, text: &str) -> Result<usize> {
        let names = parse::parse_item_names(text);
        if names.is_empty() {
            return Err(Error::Import(NO_ITEMS_FOUND.to_string()));
        }
        Ok(self.add_items(storage, room_id, &names))
    }

    /// Add every item named in a text file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Import`] when the file cannot be read, is blank, or
    /// names no items.
    pub fn import_file(&mut self, storage: &mut SqliteStorage, room_id: i64, path: &Path) -> Result<usize> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Err(Error::Import(UNREADABLE_FILE.to_string())),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Import file unreadable");
                return Err(Error::Import(UNREADABLE_FILE.to_string()));
            }
        };
        self.import_text(storage, room_id, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoomIcon;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn setup() -> (SqliteStorage, ItemManager, i64) {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let room = storage.insert_room("Office", RoomIcon::Office).unwrap();
        let mut manager = ItemManager::new();
        manager.load(&storage, room);
        (storage, manager, room)
    }

    fn names(items: &[&DeclutterItem]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_add_and_categorize() {
        let (mut storage, mut manager, room) = setup();
        let id = manager.add_item(&mut storage, &NewItem::named(room, "Stapler")).unwrap();
        manager.add_items(&mut storage, room, &["Pens".to_string(), "Tape".to_string()]);
        assert_eq!(manager.items().len(), 3);

        assert!(manager.categorize(&mut storage, id, ItemCategory::Donate));
        assert_eq!(manager.categorized_items().len(), 1);
        assert_eq!(manager.uncategorized_items().len(), 2);
        assert_eq!(names(&manager.items_in(ItemCategory::Donate)), vec!["Stapler"]);
    }

    #[test]
    fn test_toggle_furniture() {
        let (mut storage, mut manager, room) = setup();
        let id = manager.add_item(&mut storage, &NewItem::named(room, "Desk")).unwrap();
        assert_eq!(manager.toggle_furniture(&mut storage, id), Some(true));
        assert!(manager.items()[0].is_furniture);
        assert_eq!(manager.toggle_furniture(&mut storage, id), Some(false));
        assert_eq!(manager.toggle_furniture(&mut storage, id + 50), None);
    }

    #[test]
    fn test_set_photo_returns_previous_path() {
        let (mut storage, mut manager, room) = setup();
        let id = manager.add_item(&mut storage, &NewItem::named(room, "Chair")).unwrap();

        assert_eq!(manager.set_photo(&mut storage, id, Some("photos/1.jpg")), Some(None));
        assert_eq!(
            manager.set_photo(&mut storage, id, None),
            Some(Some("photos/1.jpg".to_string()))
        );
        assert!(manager.items()[0].photo_path.is_none());
        assert_eq!(manager.set_photo(&mut storage, id + 9, None), None);
    }

    #[test]
    fn test_delete_returns_item() {
        let (mut storage, mut manager, room) = setup();
        let mut new = NewItem::named(room, "Printer");
        new.photo_path = Some("photos/abc.jpg".to_string());
        let id = manager.add_item(&mut storage, &new).unwrap();

        let deleted = manager.delete_item(&mut storage, id).unwrap();
        assert_eq!(deleted.photo_path.as_deref(), Some("photos/abc.jpg"));
        assert!(manager.items().is_empty());
        assert!(manager.delete_item(&mut storage, id).is_none());
    }

    #[test]
    fn test_sort_modes() {
        let (mut storage, mut manager, room) = setup();
        let names_in = ["banana", "Apple", "cherry"].map(ToString::to_string);
        manager.add_items(&mut storage, room, &names_in);

        // Same timestamp: recent falls back to newest ID first
        assert_eq!(manager.items()[0].name, "cherry");

        manager.set_sort_mode(SortMode::Alphabetical);
        let sorted: Vec<&str> = manager.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(sorted, vec!["Apple", "banana", "cherry"]);

        manager.set_sort_mode(SortMode::Custom);
        let custom: Vec<&str> = manager.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(custom, vec!["banana", "Apple", "cherry"]);
    }

    #[test]
    fn test_move_items_within_category() {
        let (mut storage, mut manager, room) = setup();
        let names_in = ["a", "b", "c", "d"].map(ToString::to_string);
        manager.add_items(&mut storage, room, &names_in);
        manager.set_sort_mode(SortMode::Custom);

        // Drag "a" below "c"
        assert!(manager.move_items(&mut storage, ItemCategory::Uncategorized, &[0], 3));
        assert_eq!(manager.sort_mode(), SortMode::Custom);
        assert_eq!(
            names(&manager.uncategorized_items()),
            vec!["b", "c", "a", "d"]
        );

        // Drag "a" and "d" to the top
        assert!(manager.move_items(&mut storage, ItemCategory::Uncategorized, &[2, 3], 0));
        assert_eq!(
            names(&manager.uncategorized_items()),
            vec!["a", "d", "b", "c"]
        );

        assert!(!manager.move_items(&mut storage, ItemCategory::Uncategorized, &[9], 0));
    }

    #[test]
    fn test_move_item_to_position() {
        let (mut storage, mut manager, room) = setup();
        let names_in = ["a", "b", "c"].map(ToString::to_string);
        manager.add_items(&mut storage, room, &names_in);
        manager.set_sort_mode(SortMode::Custom);
        let a = manager.items()[0].id;

        assert!(manager.move_item_to(&mut storage, a, 2));
        assert_eq!(names(&manager.uncategorized_items()), vec!["b", "c", "a"]);

        // Order survives a reload
        let mut fresh = ItemManager::new();
        fresh.set_sort_mode(SortMode::Custom);
        fresh.load(&storage, room);
        assert_eq!(names(&fresh.uncategorized_items()), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_autogroup_persists_and_clears() {
        let (mut storage, mut manager, room) = setup();
        let names_in = ["Coffee mug", "Coffee filter", "Lamp"].map(ToString::to_string);
        manager.add_items(&mut storage, room, &names_in);

        assert!(!manager.is_autogrouped());
        assert_eq!(manager.autogroup(&mut storage), 2);
        assert!(manager.is_autogrouped());

        let mut fresh = ItemManager::new();
        fresh.load(&storage, room);
        assert!(fresh.is_autogrouped());

        assert_eq!(manager.clear_autogroups(&mut storage), 2);
        assert!(!manager.is_autogrouped());
    }

    #[test]
    fn test_import_text() {
        let (mut storage, mut manager, room) = setup();
        let added = manager.import_text(&mut storage, room, "lamp, rug\nbooks").unwrap();
        assert_eq!(added, 3);

        let err = manager.import_text(&mut storage, room, " ;, ").unwrap_err();
        assert_eq!(err.to_string(), "No items found in file.");
    }

    #[test]
    fn test_import_file() {
        let (mut storage, mut manager, room) = setup();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "blender and toaster").unwrap();

        assert_eq!(manager.import_file(&mut storage, room, file.path()).unwrap(), 2);
        assert_eq!(manager.items().len(), 2);
    }

    #[test]
    fn test_import_file_errors() {
        let (mut storage, mut manager, room) = setup();
        let empty = NamedTempFile::new().unwrap();
        let err = manager.import_file(&mut storage, room, empty.path()).unwrap_err();
        assert_eq!(err.to_string(), "Could not read file or file is empty.");

        let missing = Path::new("/nonexistent/tidy/items.txt");
        let err = manager.import_file(&mut storage, room, missing).unwrap_err();
        assert_eq!(err.to_string(), "Could not read file or file is empty.");

        let mut punct = NamedTempFile::new().unwrap();
        writeln!(punct, ",,;").unwrap();
        let err = manager.import_file(&mut storage, room, punct.path()).unwrap_err();
        assert_eq!(err.to_string(), "No items found in file.");
    }
}

//! Declutter item model.

use serde::{Deserialize, Serialize};

/// Disposition decision for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Uncategorized,
    Keep,
    Donate,
    Trash,
    Sell,
}

impl ItemCategory {
    pub const ALL: [Self; 5] = [
        Self::Uncategorized,
        Self::Keep,
        Self::Donate,
        Self::Trash,
        Self::Sell,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uncategorized => "uncategorized",
            Self::Keep => "keep",
            Self::Donate => "donate",
            Self::Trash => "trash",
            Self::Sell => "sell",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Decode a stored value, falling back to `Uncategorized`.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Uncategorized)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Uncategorized => "Uncategorized",
            Self::Keep => "Keep",
            Self::Donate => "Donate",
            Self::Trash => "Trash",
            Self::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied to a room's item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first
    #[default]
    Recent,
    /// Case-insensitive by name
    Alphabetical,
    /// Manual order by `sort_order`
    Custom,
}

/// A physical object logged against a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclutterItem {
    pub id: i64,
    pub room_id: i64,
    pub name: String,
    pub category: ItemCategory,
    pub is_furniture: bool,
    /// Relative path under the data directory
    pub photo_path: Option<String>,
    pub notes: Option<String>,
    pub sort_order: i64,
    pub auto_group: Option<String>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

/// Fields for a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub room_id: i64,
    pub name: String,
    pub category: ItemCategory,
    pub is_furniture: bool,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
}

impl NewItem {
    /// An uncategorized, non-furniture item with no photo or notes.
    #[must_use]
    pub fn named(room_id: i64, name: impl Into<String>) -> Self {
        Self {
            room_id,
            name: name.into(),
            category: ItemCategory::Uncategorized,
            is_furniture: false,
            photo_path: None,
            notes: None,
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    pub photo_path: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_fallback() {
        assert_eq!(ItemCategory::from_stored("donate"), ItemCategory::Donate);
        assert_eq!(ItemCategory::from_stored("recycle"), ItemCategory::Uncategorized);
        assert_eq!(ItemCategory::from_stored(""), ItemCategory::Uncategorized);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&ItemCategory::Sell).unwrap();
        assert_eq!(json, "\"sell\"");
    }
}

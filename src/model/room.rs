//! Room model.
//!
//! Rooms are the top-level grouping for declutter items and cleaning tasks.
//! Counts are never stored; the storage layer fills them in on every read.

use serde::{Deserialize, Serialize};

use super::task::TaskFrequency;

/// Icon tag for a room. Also selects the default cleaning tasks seeded
/// when the room is marked decluttered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomIcon {
    Kitchen,
    LivingRoom,
    Bedroom,
    Bathroom,
    Office,
    Garage,
    Basement,
    Attic,
    DiningRoom,
    Laundry,
    Closet,
    Other,
}

impl RoomIcon {
    pub const ALL: [Self; 12] = [
        Self::Kitchen,
        Self::LivingRoom,
        Self::Bedroom,
        Self::Bathroom,
        Self::Office,
        Self::Garage,
        Self::Basement,
        Self::Attic,
        Self::DiningRoom,
        Self::Laundry,
        Self::Closet,
        Self::Other,
    ];

    /// Stored tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::LivingRoom => "livingRoom",
            Self::Bedroom => "bedroom",
            Self::Bathroom => "bathroom",
            Self::Office => "office",
            Self::Garage => "garage",
            Self::Basement => "basement",
            Self::Attic => "attic",
            Self::DiningRoom => "diningRoom",
            Self::Laundry => "laundry",
            Self::Closet => "closet",
            Self::Other => "other",
        }
    }

    /// Parse an exact stored tag.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.as_str() == value)
    }

    /// Decode a stored tag, falling back to `Other` for unknown values.
    #[must_use]
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Other)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen",
            Self::LivingRoom => "Living Room",
            Self::Bedroom => "Bedroom",
            Self::Bathroom => "Bathroom",
            Self::Office => "Office",
            Self::Garage => "Garage",
            Self::Basement => "Basement",
            Self::Attic => "Attic",
            Self::DiningRoom => "Dining Room",
            Self::Laundry => "Laundry",
            Self::Closet => "Closet",
            Self::Other => "Other",
        }
    }

    /// Cleaning tasks seeded for a room of this kind once it is decluttered.
    #[must_use]
    pub fn default_cleaning_tasks(&self) -> &'static [(&'static str, TaskFrequency)] {
        use TaskFrequency::{Daily, Monthly, Weekly};
        match self {
            Self::Kitchen => &[
                ("Wipe counters", Daily),
                ("Do dishes", Daily),
                ("Mop floor", Weekly),
                ("Clean oven", Monthly),
                ("Clean refrigerator", Monthly),
            ],
            Self::LivingRoom => &[
                ("Vacuum floor", Weekly),
                ("Dust surfaces", Weekly),
                ("Clean windows", Monthly),
            ],
            Self::Bedroom => &[
                ("Make bed", Daily),
                ("Vacuum floor", Weekly),
                ("Change sheets", Weekly),
                ("Dust furniture", Monthly),
            ],
            Self::Bathroom => &[
                ("Wipe sink and counter", Daily),
                ("Clean toilet", Weekly),
                ("Scrub shower/tub", Weekly),
                ("Mop floor", Weekly),
                ("Deep clean grout", Monthly),
            ],
            Self::Office => &[
                ("Tidy desk", Daily),
                ("Vacuum floor", Weekly),
                ("Dust electronics", Monthly),
            ],
            Self::Garage => &[("Sweep floor", Weekly), ("Organize tools", Monthly)],
            Self::Basement => &[
                ("Check for moisture", Weekly),
                ("Sweep floor", Monthly),
                ("Organize storage", Monthly),
            ],
            Self::Attic => &[("Check for leaks", Monthly), ("Organize storage", Monthly)],
            Self::DiningRoom => &[
                ("Wipe table", Daily),
                ("Vacuum floor", Weekly),
                ("Polish furniture", Monthly),
            ],
            Self::Laundry => &[
                ("Wipe machines", Weekly),
                ("Clean lint trap", Weekly),
                ("Deep clean washer", Monthly),
            ],
            Self::Closet => &[("Organize clothes", Monthly), ("Vacuum floor", Monthly)],
            Self::Other => &[("General tidy", Weekly), ("Deep clean", Monthly)],
        }
    }
}

impl std::fmt::Display for RoomIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rooms created on first launch, in display order.
pub const DEFAULT_ROOMS: [(&str, RoomIcon); 8] = [
    ("Kitchen", RoomIcon::Kitchen),
    ("Living Room", RoomIcon::LivingRoom),
    ("Master Bedroom", RoomIcon::Bedroom),
    ("Bathroom", RoomIcon::Bathroom),
    ("Home Office", RoomIcon::Office),
    ("Garage", RoomIcon::Garage),
    ("Dining Room", RoomIcon::DiningRoom),
    ("Laundry Room", RoomIcon::Laundry),
];

/// A room with its derived counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub icon: RoomIcon,
    pub is_decluttered: bool,
    pub sort_order: i64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    #[serde(default)]
    pub item_count: usize,
    #[serde(default)]
    pub categorized_count: usize,
    #[serde(default)]
    pub non_furniture_count: usize,
    #[serde(default)]
    pub non_furniture_categorized_count: usize,
    #[serde(default)]
    pub task_count: usize,
    #[serde(default)]
    pub due_today_count: usize,
    #[serde(default)]
    pub completed_today_count: usize,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RoomUpdate {
    pub name: Option<String>,
    pub icon: Option<RoomIcon>,
    pub is_decluttered: Option<bool>,
}

impl Room {
    /// Share of non-furniture items that have a disposition.
    ///
    /// A room holding only furniture counts as fully decluttered.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn declutter_progress(&self) -> f64 {
        if self.non_furniture_count == 0 {
            return if self.item_count > 0 { 1.0 } else { 0.0 };
        }
        self.non_furniture_categorized_count as f64 / self.non_furniture_count as f64
    }

    /// Share of today's due tasks already completed today.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn clean_progress(&self) -> f64 {
        if self.due_today_count == 0 {
            return 0.0;
        }
        self.completed_today_count as f64 / self.due_today_count as f64
    }

    #[must_use]
    pub fn all_items_categorized(&self) -> bool {
        self.item_count > 0 && self.categorized_count == self.item_count
    }

    #[must_use]
    pub fn uncategorized_count(&self) -> usize {
        self.item_count.saturating_sub(self.categorized_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room {
            id: 1,
            name: "Kitchen".to_string(),
            icon: RoomIcon::Kitchen,
            is_decluttered: false,
            sort_order: 0,
            created_at: 0,
            item_count: 0,
            categorized_count: 0,
            non_furniture_count: 0,
            non_furniture_categorized_count: 0,
            task_count: 0,
            due_today_count: 0,
            completed_today_count: 0,
        }
    }

    #[test]
    fn test_icon_fallback() {
        assert_eq!(RoomIcon::from_stored("livingRoom"), RoomIcon::LivingRoom);
        assert_eq!(RoomIcon::from_stored("spaceship"), RoomIcon::Other);
    }

    #[test]
    fn test_every_icon_has_default_tasks() {
        for icon in RoomIcon::ALL {
            assert!(!icon.default_cleaning_tasks().is_empty(), "{icon}");
        }
        assert_eq!(RoomIcon::Kitchen.default_cleaning_tasks().len(), 5);
    }

    #[test]
    fn test_declutter_progress() {
        let mut r = room();
        assert!((r.declutter_progress() - 0.0).abs() < f64::EPSILON);

        // Only furniture: counts as done
        r.item_count = 2;
        assert!((r.declutter_progress() - 1.0).abs() < f64::EPSILON);

        r.item_count = 6;
        r.non_furniture_count = 4;
        r.non_furniture_categorized_count = 1;
        assert!((r.declutter_progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clean_progress() {
        let mut r = room();
        assert!((r.clean_progress() - 0.0).abs() < f64::EPSILON);
        r.due_today_count = 4;
        r.completed_today_count = 2;
        assert!((r.clean_progress() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_all_items_categorized() {
        let mut r = room();
        assert!(!r.all_items_categorized());
        r.item_count = 3;
        r.categorized_count = 3;
        assert!(r.all_items_categorized());
        assert_eq!(r.uncategorized_count(), 0);
    }
}

//! Input normalization for command-line values.
//!
//! Provides O(1) validation sets and synonym maps so people can type
//! natural words for categories, frequencies and room icons. Three-tier
//! resolution: exact match → synonym lookup → error with suggestion.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{ItemCategory, RoomIcon, TaskFrequency};

// ── Valid value sets (O(1) lookups) ──────────────────────────

pub static VALID_CATEGORIES: LazyLock<HashSet<&str>> =
    LazyLock::new(|| ItemCategory::ALL.iter().map(ItemCategory::as_str).collect());

pub static VALID_FREQUENCIES: LazyLock<HashSet<&str>> =
    LazyLock::new(|| TaskFrequency::ALL.iter().map(TaskFrequency::as_str).collect());

/// Icon tags keyed by their compact lowercase form (`livingroom`).
pub static VALID_ICONS: LazyLock<HashMap<String, RoomIcon>> = LazyLock::new(|| {
    RoomIcon::ALL
        .into_iter()
        .map(|icon| (icon.as_str().to_lowercase(), icon))
        .collect()
});

// ── Synonym maps ─────────────────────────────────────────────

pub static CATEGORY_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("toss", "trash"),
        ("bin", "trash"),
        ("junk", "trash"),
        ("garbage", "trash"),
        ("discard", "trash"),
        ("throw", "trash"),
        ("recycle", "trash"),
        ("give", "donate"),
        ("giveaway", "donate"),
        ("charity", "donate"),
        ("gift", "donate"),
        ("stay", "keep"),
        ("save", "keep"),
        ("store", "keep"),
        ("sold", "sell"),
        ("resell", "sell"),
        ("list", "sell"),
        ("none", "uncategorized"),
        ("undecided", "uncategorized"),
        ("unsorted", "uncategorized"),
        ("maybe", "uncategorized"),
    ]
    .into_iter()
    .collect()
});

pub static FREQUENCY_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("day", "daily"),
        ("everyday", "daily"),
        ("d", "daily"),
        ("week", "weekly"),
        ("w", "weekly"),
        ("month", "monthly"),
        ("m", "monthly"),
    ]
    .into_iter()
    .collect()
});

pub static ICON_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("living", "livingroom"),
        ("lounge", "livingroom"),
        ("den", "livingroom"),
        ("family", "livingroom"),
        ("bed", "bedroom"),
        ("bath", "bathroom"),
        ("toilet", "bathroom"),
        ("restroom", "bathroom"),
        ("study", "office"),
        ("workspace", "office"),
        ("cellar", "basement"),
        ("loft", "attic"),
        ("dining", "diningroom"),
        ("utility", "laundry"),
        ("laundryroom", "laundry"),
        ("wardrobe", "closet"),
        ("pantry", "closet"),
        ("shed", "garage"),
    ]
    .into_iter()
    .collect()
});

/// Normalize a disposition category via exact match or synonym lookup.
///
/// # Errors
///
/// Returns [`Error::InvalidCategory`] with the closest suggestion.
pub fn normalize_category(input: &str) -> Result<ItemCategory> {
    let lower = input.trim().to_lowercase();

    let canonical = if VALID_CATEGORIES.contains(lower.as_str()) {
        Some(lower.as_str())
    } else {
        CATEGORY_SYNONYMS.get(lower.as_str()).copied()
    };

    canonical.and_then(ItemCategory::parse).ok_or_else(|| Error::InvalidCategory {
        value: input.to_string(),
        suggestion: find_closest_match(&lower, VALID_CATEGORIES.iter().copied(), &CATEGORY_SYNONYMS),
    })
}

/// Normalize a task frequency via exact match or synonym lookup.
///
/// # Errors
///
/// Returns [`Error::InvalidFrequency`] with the closest suggestion.
pub fn normalize_frequency(input: &str) -> Result<TaskFrequency> {
    let lower = input.trim().to_lowercase();

    let canonical = if VALID_FREQUENCIES.contains(lower.as_str()) {
        Some(lower.as_str())
    } else {
        FREQUENCY_SYNONYMS.get(lower.as_str()).copied()
    };

    canonical.and_then(TaskFrequency::parse).ok_or_else(|| Error::InvalidFrequency {
        value: input.to_string(),
        suggestion: find_closest_match(&lower, VALID_FREQUENCIES.iter().copied(), &FREQUENCY_SYNONYMS),
    })
}

/// Normalize a room icon. Case, spaces, hyphens and underscores are
/// ignored, so `living room`, `living_room` and `livingRoom` all match.
///
/// # Errors
///
/// Returns [`Error::InvalidIcon`] with the closest suggestion.
pub fn normalize_icon(input: &str) -> Result<RoomIcon> {
    let compact: String = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect();

    let key = ICON_SYNONYMS
        .get(compact.as_str())
        .copied()
        .unwrap_or(compact.as_str());
    if let Some(&icon) = VALID_ICONS.get(key) {
        return Ok(icon);
    }

    let suggestion = find_closest_match(
        &compact,
        VALID_ICONS.keys().map(String::as_str),
        &ICON_SYNONYMS,
    )
    .and_then(|key| VALID_ICONS.get(key.as_str()))
    .map(|icon| icon.as_str().to_string());

    Err(Error::InvalidIcon {
        value: input.to_string(),
        suggestion,
    })
}

/// Find the closest matching value across valid set and synonyms.
fn find_closest_match<'a>(
    input: &str,
    valid: impl Iterator<Item = &'a str>,
    synonyms: &HashMap<&str, &'a str>,
) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for (candidate, canonical) in valid
        .map(|v| (v, v))
        .chain(synonyms.iter().map(|(&k, &v)| (k, v)))
    {
        let dist = levenshtein_distance(input, candidate);
        let closer = best.is_none_or(|(_, d)| dist < d);
        if dist <= 3 && closer {
            // For synonyms, show what it maps to
            best = Some((canonical, dist));
        }
    }

    best.map(|(v, _)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing names similar to the searched one, case-insensitively.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
#[must_use]
pub fn find_similar_names(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let searched = searched.to_lowercase();
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|name| (levenshtein_distance(&searched, &name.to_lowercase()), name.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

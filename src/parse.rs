//! Free-text helpers: item-name parsing and keyword autogrouping.

use std::collections::{BTreeMap, HashSet};

use crate::model::DeclutterItem;

/// Shortest word that can name an autogroup.
const MIN_KEYWORD_LEN: usize = 3;

/// Fewest items that must share a word before it becomes a group.
const MIN_KEYWORD_ITEMS: usize = 2;

/// Split dictated or pasted text into item names.
///
/// Commas, semicolons and newlines separate names. Only when that yields a
/// single name is it split again on the literal `" and "`, so
/// `"A, B and C"` keeps `"B and C"` together.
#[must_use]
pub fn parse_item_names(text: &str) -> Vec<String> {
    let names: Vec<&str> = text
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if let [single] = names.as_slice() {
        return single
            .split(" and ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
    }

    names.into_iter().map(ToString::to_string).collect()
}

/// Lowercased words of at least three characters.
fn keywords_of(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .map(ToString::to_string)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Assign each item a group label from words shared across item names.
///
/// A word qualifies when at least two items contain it. Keywords are tried
/// most-shared first (ties alphabetical) and the first one an item contains
/// wins. Returns `(item_id, label)` for every item, `None` when nothing
/// matched.
#[must_use]
pub fn autogroup(items: &[DeclutterItem]) -> Vec<(i64, Option<String>)> {
    let item_words: Vec<HashSet<String>> = items
        .iter()
        .map(|item| keywords_of(&item.name).into_iter().collect())
        .collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for words in &item_words {
        for word in words {
            *counts.entry(word.as_str()).or_default() += 1;
        }
    }

    let mut keywords: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, n)| *n >= MIN_KEYWORD_ITEMS)
        .collect();
    // BTreeMap iteration is alphabetical; stable sort keeps that for ties.
    keywords.sort_by(|a, b| b.1.cmp(&a.1));

    items
        .iter()
        .zip(&item_words)
        .map(|(item, words)| {
            let label = keywords
                .iter()
                .find(|(kw, _)| words.contains(*kw))
                .map(|(kw, _)| capitalize(kw));
            (item.id, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemCategory;

    fn item(id: i64, name: &str) -> DeclutterItem {
        DeclutterItem {
            id,
            room_id: 1,
            name: name.to_string(),
            category: ItemCategory::Uncategorized,
            is_furniture: false,
            photo_path: None,
            notes: None,
            sort_order: id,
            auto_group: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_parse_commas_semicolons_newlines() {
        assert_eq!(
            parse_item_names("lamp, rug;  books\nold chair\n\n"),
            vec!["lamp", "rug", "books", "old chair"]
        );
    }

    #[test]
    fn test_parse_single_phrase_splits_on_and() {
        assert_eq!(
            parse_item_names("blender and toaster and kettle"),
            vec!["blender", "toaster", "kettle"]
        );
    }

    #[test]
    fn test_parse_comma_takes_precedence_over_and() {
        assert_eq!(parse_item_names("A, B and C"), vec!["A", "B and C"]);
    }

    #[test]
    fn test_parse_and_split_uses_trimmed_token() {
        assert_eq!(parse_item_names("  cups and plates;\n"), vec!["cups", "plates"]);
    }

    #[test]
    fn test_parse_word_containing_and_is_kept() {
        assert_eq!(parse_item_names("sandals"), vec!["sandals"]);
        assert_eq!(parse_item_names("candle holder"), vec!["candle holder"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_item_names("").is_empty());
        assert!(parse_item_names(" , ;\n").is_empty());
    }

    #[test]
    fn test_autogroup_shared_words() {
        let items = vec![
            item(1, "Blue coffee mug"),
            item(2, "Coffee grinder"),
            item(3, "Old mug"),
            item(4, "Lamp"),
        ];
        let groups = autogroup(&items);
        // "coffee" and "mug" both appear twice; alphabetical tie-break puts coffee first
        assert_eq!(groups[0], (1, Some("Coffee".to_string())));
        assert_eq!(groups[1], (2, Some("Coffee".to_string())));
        assert_eq!(groups[2], (3, Some("Mug".to_string())));
        assert_eq!(groups[3], (4, None));
    }

    #[test]
    fn test_autogroup_prefers_most_shared_keyword() {
        let items = vec![
            item(1, "Wool winter scarf"),
            item(2, "Winter boots"),
            item(3, "Winter coat wool"),
        ];
        let groups = autogroup(&items);
        assert!(groups.iter().all(|(_, g)| g.as_deref() == Some("Winter")));
    }

    #[test]
    fn test_autogroup_ignores_short_words_and_single_item_repeats() {
        let items = vec![item(1, "TV tv stand"), item(2, "TV remote"), item(3, "box box")];
        let groups = autogroup(&items);
        assert!(groups.iter().all(|(_, g)| g.is_none()));
    }
}

//! Tag filter engine.
//!
//! Pure, synchronous selection of the visible note subset given the active
//! tag filter set. No side effects on any store; ordering of the input is
//! preserved.

use std::collections::BTreeSet;

use crate::models::Note;

/// Tags selected by the user to restrict the visible note list.
///
/// Empty means "no filter".
pub type FilterSet = BTreeSet<String>;

/// Return `filter` with `tag` removed if present, else added.
pub fn toggle_filter(filter: &FilterSet, tag: &str) -> FilterSet {
    let mut next = filter.clone();
    if !next.remove(tag) {
        next.insert(tag.to_string());
    }
    next
}

/// Select the notes visible under `filter`, preserving input order.
///
/// A note is visible when the filter is empty or its `tag_list` intersects
/// the filter. Untagged notes never match a non-empty filter.
pub fn visible<'a>(notes: &'a [Note], filter: &FilterSet) -> Vec<&'a Note> {
    if filter.is_empty() {
        return notes.iter().collect();
    }
    notes
        .iter()
        .filter(|note| note.tag_list.iter().any(|t| filter.contains(t)))
        .collect()
}

/// Display-time ordering for a tag set.
///
/// Storage treats tags as unordered sets; sorting for presentation is a
/// separate pure step.
pub fn sorted_tags(tags: &BTreeSet<String>) -> Vec<String> {
    tags.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note(content: &str, tags: &[&str]) -> Note {
        Note {
            id: Uuid::now_v7(),
            owner: "u1".to_string(),
            content: content.to_string(),
            tag_list: tags.iter().map(|t| t.to_string()).collect(),
            created_at_utc: Utc::now(),
            updated_at_utc: Utc::now(),
        }
    }

    #[test]
    fn test_toggle_filter_adds_missing_tag() {
        let filter = FilterSet::new();
        let next = toggle_filter(&filter, "work");
        assert!(next.contains("work"));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_toggle_filter_removes_present_tag() {
        let filter: FilterSet = ["work".to_string()].into_iter().collect();
        let next = toggle_filter(&filter, "work");
        assert!(next.is_empty());
    }

    #[test]
    fn test_toggle_filter_round_trips() {
        let filter = FilterSet::new();
        let once = toggle_filter(&filter, "x");
        let twice = toggle_filter(&once, "x");
        assert_eq!(twice, filter);
    }

    #[test]
    fn test_visible_empty_filter_returns_all_in_order() {
        let notes = vec![note("a", &["x"]), note("b", &[]), note("c", &["y"])];
        let shown = visible(&notes, &FilterSet::new());
        let contents: Vec<_> = shown.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_visible_selects_intersecting_notes() {
        let notes = vec![
            note("a", &["work"]),
            note("b", &["home"]),
            note("c", &["work", "home"]),
        ];
        let filter: FilterSet = ["work".to_string()].into_iter().collect();
        let shown = visible(&notes, &filter);
        let contents: Vec<_> = shown.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
    }

    #[test]
    fn test_visible_untagged_never_matches_non_empty_filter() {
        let notes = vec![note("a", &[])];
        let filter: FilterSet = ["work".to_string()].into_iter().collect();
        assert!(visible(&notes, &filter).is_empty());
    }

    #[test]
    fn test_visible_multi_tag_filter_is_union() {
        let notes = vec![note("a", &["x"]), note("b", &["y"]), note("c", &["z"])];
        let filter: FilterSet = ["x".to_string(), "z".to_string()].into_iter().collect();
        let shown = visible(&notes, &filter);
        let contents: Vec<_> = shown.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
    }

    #[test]
    fn test_sorted_tags_is_lexicographic() {
        let tags: BTreeSet<String> = ["zebra", "apple", "mango"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        assert_eq!(
            sorted_tags(&tags),
            vec!["apple".to_string(), "mango".to_string(), "zebra".to_string()]
        );
    }
}

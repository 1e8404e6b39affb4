//! Tag normalization and boundary parsing.
//!
//! Tags are stored as true sets of normalized strings: lowercase, trimmed,
//! never empty, never duplicated. Display ordering is a presentation
//! concern handled separately ([`crate::filter::sorted_tags`]).
//!
//! Navigation layers hand tags around as either a single string or an
//! array of strings; [`TagsParam`] normalizes both shapes into the
//! canonical ordered list in one explicit step so nothing downstream
//! branches on shape.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Normalize a single tag: trim whitespace, lowercase.
///
/// Returns `None` when the result is empty; empty tags never enter a
/// `tag_list` or the tag index.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Normalize a sequence of raw tags into a deduplicated set.
///
/// Empty entries are dropped. The result is the canonical shape for
/// `Note::tag_list` and the tag index.
pub fn normalize_tags<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|t| normalize_tag(t.as_ref()))
        .collect()
}

/// Normalize a sequence of raw tags preserving first-seen order.
///
/// Used for draft tag lists, which keep the order the user entered them.
pub fn normalize_tags_ordered<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for tag in raw.into_iter().filter_map(|t| normalize_tag(t.as_ref())) {
        if seen.insert(tag.clone()) {
            out.push(tag);
        }
    }
    out
}

/// Duck-typed tag parameter from route/navigation layers.
///
/// Transient route parameters carry tags as either a bare string or an
/// array of strings. Deserialization accepts both; [`TagsParam::into_list`]
/// is the single normalization point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsParam {
    /// A single tag passed as a bare string.
    One(String),
    /// A list of tags.
    Many(Vec<String>),
}

impl TagsParam {
    /// Normalize into the canonical ordered list of tags.
    pub fn into_list(self) -> Vec<String> {
        match self {
            TagsParam::One(tag) => normalize_tags_ordered([tag]),
            TagsParam::Many(tags) => normalize_tags_ordered(tags),
        }
    }
}

//! Core data models for scrappr.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::tags::{normalize_tag, normalize_tags_ordered, TagsParam};

/// A persisted note.
///
/// `id` and `created_at_utc` are assigned by the store on creation and
/// never change. `updated_at_utc` is the client-assigned modification
/// timestamp, rewritten on every save, and serves as the display/fallback
/// ordering value. `tag_list` is a true set (no duplicates, no empties)
/// with display ordering applied separately at presentation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Store-assigned identifier (UUIDv7, time-ordered).
    pub id: Uuid,
    /// Authenticated user owning this note.
    pub owner: String,
    /// Note text.
    pub content: String,
    /// Normalized tags carried by this note.
    pub tag_list: BTreeSet<String>,
    /// Store-assigned creation marker; list ordering key, immutable.
    pub created_at_utc: DateTime<Utc>,
    /// Client-assigned modification timestamp, updated on every save.
    pub updated_at_utc: DateTime<Utc>,
}

impl Note {
    /// Whether this note carries the given (already normalized) tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list.contains(tag)
    }
}

/// The in-progress, unsaved note being edited.
///
/// Transient: nothing here touches the store until the caller saves the
/// draft through the note repository. Tags keep the order the user entered
/// them; duplicates are rejected at insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Text being edited.
    pub content: String,
    /// Ordered normalized tags pending on this draft.
    tags: Vec<String>,
}

impl Draft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a draft from route parameters, returning the note id when the
    /// draft edits an existing note.
    ///
    /// This is the one place duck-typed navigation input (tags as string or
    /// array) is normalized; see [`TagsParam`].
    pub fn from_params(params: DraftParams) -> (Option<Uuid>, Self) {
        let draft = Self {
            content: params.content.unwrap_or_default(),
            tags: params.tags.map(TagsParam::into_list).unwrap_or_default(),
        };
        (params.id, draft)
    }

    /// The pending tags, in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add a tag to the draft.
    ///
    /// The tag is normalized first; empty and duplicate tags are rejected
    /// with a validation error before reaching any store.
    pub fn push_tag(&mut self, raw: &str) -> Result<()> {
        let tag = normalize_tag(raw)
            .ok_or_else(|| Error::Validation("tag cannot be empty".to_string()))?;
        if self.tags.contains(&tag) {
            return Err(Error::Validation(format!("duplicate tag: {}", tag)));
        }
        self.tags.push(tag);
        Ok(())
    }

    /// Remove a tag from the draft. Returns whether it was present.
    pub fn remove_tag(&mut self, raw: &str) -> bool {
        match normalize_tag(raw) {
            Some(tag) => {
                let before = self.tags.len();
                self.tags.retain(|t| t != &tag);
                self.tags.len() != before
            }
            None => false,
        }
    }

    /// Replace the pending tags wholesale, normalizing and deduplicating.
    pub fn set_tags<I, S>(&mut self, raw: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags_ordered(raw);
    }

    /// Merge transcribed text into the draft content.
    ///
    /// Space-joined when the draft already has content, otherwise the
    /// transcript becomes the content.
    pub fn merge_transcript(&mut self, text: &str) {
        if self.content.is_empty() {
            self.content = text.to_string();
        } else {
            self.content = format!("{} {}", self.content, text);
        }
    }
}

/// Transient route parameters for opening the note editor.
///
/// `tags` may arrive as either a bare string or an array depending on the
/// navigation layer; [`Draft::from_params`] normalizes it exactly once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftParams {
    /// Existing note id when editing, absent when creating.
    pub id: Option<Uuid>,
    /// Prefilled content.
    pub content: Option<String>,
    /// Prefilled tags (string or array).
    pub tags: Option<TagsParam>,
}

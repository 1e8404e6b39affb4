//! Core traits for scrappr abstractions.
//!
//! These traits define the interfaces that concrete store implementations
//! must satisfy, enabling pluggable backends and testability.

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::events::{NoteSubscription, TagSubscription};
use crate::models::Note;

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note CRUD and live subscription.
///
/// Writes are surfaced once and never retried; a failed write leaves prior
/// state unchanged. Saving a note with tags also union-adds those tags into
/// the owner's tag index as part of the same atomic commit.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Create a note, returning its store-assigned id.
    ///
    /// Rejects content that is empty after trimming, before any write.
    async fn create(&self, owner: &str, content: &str, tags: &[String]) -> Result<Uuid>;

    /// Overwrite content and tag list of an existing note in place.
    ///
    /// `created_at_utc` is unchanged; `updated_at_utc` is rewritten.
    async fn update(&self, owner: &str, id: Uuid, content: &str, tags: &[String]) -> Result<()>;

    /// Delete a note. Idempotent: a missing id signals nothing changed.
    async fn delete(&self, owner: &str, id: Uuid) -> Result<()>;

    /// Fetch a single note.
    async fn get(&self, owner: &str, id: Uuid) -> Result<Option<Note>>;

    /// Subscribe to the owner's notes, ordered by creation time descending.
    ///
    /// Delivers an initial snapshot, then one snapshot per change.
    /// Re-subscribing yields a fresh initial snapshot.
    async fn subscribe(&self, owner: &str) -> NoteSubscription;
}

// =============================================================================
// TAG INDEX REPOSITORY
// =============================================================================

/// Repository for the per-owner denormalized tag index.
#[async_trait]
pub trait TagIndexRepository: Send + Sync {
    /// Union the given tags into the owner's index.
    ///
    /// Idempotent and commutative: the final index is independent of call
    /// order and repetition.
    async fn add_tags(&self, owner: &str, tags: &[String]) -> Result<()>;

    /// Remove a tag from the index and from every note carrying it, as one
    /// atomic all-or-nothing batch.
    async fn delete_tag_globally(&self, owner: &str, tag: &str) -> Result<()>;

    /// Read the current index.
    async fn list(&self, owner: &str) -> Result<BTreeSet<String>>;

    /// Subscribe to live index snapshots (initial + on change).
    async fn subscribe(&self, owner: &str) -> TagSubscription;
}

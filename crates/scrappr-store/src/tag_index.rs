//! Tag index repository implementation.
//!
//! The index is the canonical set of tags an owner has ever used,
//! denormalized from their notes. Union-adds are idempotent and
//! commutative; global deletion cascades through every note carrying the
//! tag as one atomic batch.

use std::collections::BTreeSet;

use async_trait::async_trait;

use scrappr_core::{
    normalize_tag, normalize_tags, Error, Result, TagIndexRepository, TagSubscription,
};

use crate::backend::MemoryBackend;

/// Tag index over the document backend (`owner/metadata/tags`).
#[derive(Clone)]
pub struct TagIndex {
    backend: MemoryBackend,
}

impl TagIndex {
    /// Create a new TagIndex over the given backend.
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl TagIndexRepository for TagIndex {
    async fn add_tags(&self, owner: &str, tags: &[String]) -> Result<()> {
        let tags = normalize_tags(tags);
        if tags.is_empty() {
            // Nothing to union; performs no write at all.
            return Ok(());
        }

        let count = tags.len();
        let mut batch = self.backend.batch(owner);
        batch.union_index_tags(tags);
        batch.commit().await?;

        tracing::debug!(owner, tag_count = count, "tags unioned into index");
        Ok(())
    }

    async fn delete_tag_globally(&self, owner: &str, tag: &str) -> Result<()> {
        let tag = normalize_tag(tag)
            .ok_or_else(|| Error::Validation("tag cannot be empty".to_string()))?;

        // Find every note carrying the tag, then remove it from the index
        // and from each of them in one batch. A save re-adding the tag can
        // race this; whichever commit lands last wins.
        let carriers = self.backend.notes_with_tag(owner, &tag);

        let mut batch = self.backend.batch(owner);
        batch.remove_index_tag(tag.clone());
        for id in &carriers {
            batch.remove_note_tag(*id, tag.clone());
        }
        batch.commit().await?;

        tracing::info!(
            owner,
            tag,
            note_count = carriers.len(),
            "tag deleted globally"
        );
        Ok(())
    }

    async fn list(&self, owner: &str) -> Result<BTreeSet<String>> {
        Ok(self.backend.index_tags(owner))
    }

    async fn subscribe(&self, owner: &str) -> TagSubscription {
        self.backend.subscribe_tags(owner)
    }
}

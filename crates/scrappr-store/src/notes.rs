//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use scrappr_core::{
    normalize_tags, Draft, Error, Note, NoteRepository, NoteSubscription, Result,
};

use crate::backend::MemoryBackend;

/// Note store over the document backend.
///
/// Source of truth for note content and per-note tag lists. Saving a note
/// with tags union-adds them into the owner's tag index inside the same
/// atomic commit, so the index invariant holds without extra coordination.
#[derive(Clone)]
pub struct NoteStore {
    backend: MemoryBackend,
}

impl NoteStore {
    /// Create a new NoteStore over the given backend.
    pub fn new(backend: MemoryBackend) -> Self {
        Self { backend }
    }

    /// Save a draft: create when `id` is absent, update in place otherwise.
    ///
    /// Returns the id of the saved note either way.
    pub async fn save_draft(&self, owner: &str, id: Option<Uuid>, draft: &Draft) -> Result<Uuid> {
        match id {
            Some(id) => {
                self.update(owner, id, &draft.content, draft.tags()).await?;
                Ok(id)
            }
            None => self.create(owner, &draft.content, draft.tags()).await,
        }
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation("note content cannot be empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl NoteRepository for NoteStore {
    async fn create(&self, owner: &str, content: &str, tags: &[String]) -> Result<Uuid> {
        validate_content(content)?;
        let tag_list = normalize_tags(tags);

        let id = Uuid::now_v7();
        let mut batch = self.backend.batch(owner);
        batch.put_note(id, content.to_string(), tag_list.clone(), Utc::now());
        if !tag_list.is_empty() {
            batch.union_index_tags(tag_list.clone());
        }
        batch.commit().await?;

        tracing::debug!(
            owner,
            note_id = %id,
            tag_count = tag_list.len(),
            "note created"
        );
        Ok(id)
    }

    async fn update(&self, owner: &str, id: Uuid, content: &str, tags: &[String]) -> Result<()> {
        validate_content(content)?;
        let tag_list = normalize_tags(tags);

        let mut batch = self.backend.batch(owner);
        batch.update_note(id, content.to_string(), tag_list.clone(), Utc::now());
        if !tag_list.is_empty() {
            batch.union_index_tags(tag_list.clone());
        }
        batch.commit().await?;

        tracing::debug!(owner, note_id = %id, tag_count = tag_list.len(), "note updated");
        Ok(())
    }

    async fn delete(&self, owner: &str, id: Uuid) -> Result<()> {
        let mut batch = self.backend.batch(owner);
        batch.delete_note(id);
        batch.commit().await?;

        tracing::debug!(owner, note_id = %id, "note deleted");
        Ok(())
    }

    async fn get(&self, owner: &str, id: Uuid) -> Result<Option<Note>> {
        Ok(self.backend.get_note(owner, id))
    }

    async fn subscribe(&self, owner: &str) -> NoteSubscription {
        self.backend.subscribe_notes(owner)
    }
}

//! Long-lived note session.
//!
//! Owns the live note and tag-index subscriptions for one owner, together
//! with the active filter set, and derives the visible note list through
//! the filter engine. The session has an explicit start/stop lifecycle
//! rather than ambient global state: start captures initial snapshots,
//! stop tears both subscriptions down deterministically.

use std::collections::BTreeSet;

use scrappr_core::{
    filter, FilterSet, Note, NoteRepository, NoteSubscription, TagIndexRepository, TagSubscription,
};

/// Live view over one owner's notes and tags.
pub struct NoteSession {
    owner: String,
    notes_sub: NoteSubscription,
    tags_sub: TagSubscription,
    notes: Vec<Note>,
    tags: BTreeSet<String>,
    filter: FilterSet,
}

impl NoteSession {
    /// Subscribe to notes and tag index and capture initial snapshots.
    pub async fn start(
        notes: &dyn NoteRepository,
        index: &dyn TagIndexRepository,
        owner: &str,
    ) -> Self {
        let mut notes_sub = notes.subscribe(owner).await;
        let mut tags_sub = index.subscribe(owner).await;
        let initial_notes = notes_sub.recv().await.unwrap_or_default();
        let initial_tags = tags_sub.recv().await.unwrap_or_default();

        tracing::info!(
            owner,
            note_count = initial_notes.len(),
            tag_count = initial_tags.len(),
            "note session started"
        );

        Self {
            owner: owner.to_string(),
            notes_sub,
            tags_sub,
            notes: initial_notes,
            tags: initial_tags,
            filter: FilterSet::new(),
        }
    }

    /// Wait for the next snapshot from either subscription and fold it in.
    ///
    /// Returns false when both subscriptions have ended; the session then
    /// keeps serving its last snapshots until stopped.
    pub async fn poll_change(&mut self) -> bool {
        tokio::select! {
            snapshot = self.notes_sub.recv() => match snapshot {
                Some(notes) => {
                    self.notes = notes;
                    true
                }
                None => false,
            },
            snapshot = self.tags_sub.recv() => match snapshot {
                Some(tags) => {
                    self.tags = tags;
                    true
                }
                None => false,
            },
        }
    }

    /// The owner this session is scoped to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Current note list, creation time descending.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Tags ever used by the owner, in display order.
    pub fn tags(&self) -> Vec<String> {
        filter::sorted_tags(&self.tags)
    }

    /// The active filter set.
    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }

    /// Toggle one tag in the filter set.
    pub fn toggle_filter(&mut self, tag: &str) {
        self.filter = filter::toggle_filter(&self.filter, tag);
    }

    /// Drop all filters ("all notes").
    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Notes visible under the active filter, input order preserved.
    pub fn visible(&self) -> Vec<&Note> {
        filter::visible(&self.notes, &self.filter)
    }

    /// Tear down both subscriptions. Nothing is delivered afterwards.
    pub fn stop(self) {
        tracing::info!(owner = %self.owner, "note session stopped");
        self.notes_sub.unsubscribe();
        self.tags_sub.unsubscribe();
    }
}

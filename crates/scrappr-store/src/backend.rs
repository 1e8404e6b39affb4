//! In-memory document backend.
//!
//! Stand-in for the remote document store collaborator, exposing exactly
//! the primitives the engine relies on: point reads, ordered queries by
//! creation time, real-time snapshot subscriptions keyed by owner, and an
//! atomic multi-document batch-write primitive. Documents live under
//! `owner/notes/{id}` and `owner/metadata/tags`, mirrored here as one
//! [`OwnerSpace`] per owner.
//!
//! A batch commits all-or-nothing: every operation is validated against
//! current state before the first mutation is applied, so a failing batch
//! leaves both the notes and the tag index untouched.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use scrappr_core::defaults::SNAPSHOT_CHANNEL_CAPACITY;
use scrappr_core::{Error, Note, NoteSubscription, Result, Subscription, TagSubscription};

/// One write inside an atomic batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert a new note. `created_at_utc` is assigned by the store clock
    /// at commit time.
    PutNote {
        id: Uuid,
        content: String,
        tags: BTreeSet<String>,
        updated_at_utc: DateTime<Utc>,
    },
    /// Overwrite content and tags of an existing note in place.
    UpdateNote {
        id: Uuid,
        content: String,
        tags: BTreeSet<String>,
        updated_at_utc: DateTime<Utc>,
    },
    /// Remove a note. Missing ids commit as no-ops.
    DeleteNote { id: Uuid },
    /// Union tags into the owner's tag index.
    UnionIndexTags { tags: BTreeSet<String> },
    /// Remove one tag from the owner's tag index.
    RemoveIndexTag { tag: String },
    /// Remove one tag from one note's tag list.
    RemoveNoteTag { id: Uuid, tag: String },
}

struct OwnerSpace {
    notes: HashMap<Uuid, Note>,
    tag_index: BTreeSet<String>,
    last_created_at: DateTime<Utc>,
    notes_tx: broadcast::Sender<Vec<Note>>,
    tags_tx: broadcast::Sender<BTreeSet<String>>,
}

impl OwnerSpace {
    fn new() -> Self {
        let (notes_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        let (tags_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            notes: HashMap::new(),
            tag_index: BTreeSet::new(),
            last_created_at: Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now),
            notes_tx,
            tags_tx,
        }
    }

    /// Server-side creation clock, strictly monotonic per owner so the
    /// createdAt ordering is a total order.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if now <= self.last_created_at {
            now = self.last_created_at + Duration::microseconds(1);
        }
        self.last_created_at = now;
        now
    }

    /// Ordered range query: all notes, creation time descending.
    fn ordered_notes(&self) -> Vec<Note> {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| b.created_at_utc.cmp(&a.created_at_utc));
        notes
    }
}

struct Inner {
    spaces: Mutex<HashMap<String, OwnerSpace>>,
    fail_next_commit: AtomicBool,
}

/// In-memory implementation of the document store collaborator.
///
/// Cheap to clone; clones share state, as repository handles over one
/// remote database would.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                spaces: Mutex::new(HashMap::new()),
                fail_next_commit: AtomicBool::new(false),
            }),
        }
    }

    /// Start an atomic batch for one owner.
    pub fn batch(&self, owner: &str) -> WriteBatch {
        WriteBatch {
            backend: self.clone(),
            owner: owner.to_string(),
            ops: Vec::new(),
        }
    }

    /// Point read of a single note.
    pub fn get_note(&self, owner: &str, id: Uuid) -> Option<Note> {
        let spaces = self.lock_spaces();
        spaces.get(owner).and_then(|s| s.notes.get(&id).cloned())
    }

    /// Ordered query: the owner's notes, creation time descending.
    pub fn list_notes(&self, owner: &str) -> Vec<Note> {
        let spaces = self.lock_spaces();
        spaces.get(owner).map(|s| s.ordered_notes()).unwrap_or_default()
    }

    /// Query: ids of the owner's notes whose tag list contains `tag`.
    pub fn notes_with_tag(&self, owner: &str, tag: &str) -> Vec<Uuid> {
        let spaces = self.lock_spaces();
        spaces
            .get(owner)
            .map(|s| {
                s.ordered_notes()
                    .iter()
                    .filter(|n| n.tag_list.contains(tag))
                    .map(|n| n.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Point read of the owner's tag index document.
    pub fn index_tags(&self, owner: &str) -> BTreeSet<String> {
        let spaces = self.lock_spaces();
        spaces.get(owner).map(|s| s.tag_index.clone()).unwrap_or_default()
    }

    /// Subscribe to the owner's ordered note list.
    pub fn subscribe_notes(&self, owner: &str) -> NoteSubscription {
        let mut spaces = self.lock_spaces();
        let space = spaces.entry(owner.to_string()).or_insert_with(OwnerSpace::new);
        Subscription::new(space.ordered_notes(), space.notes_tx.subscribe())
    }

    /// Subscribe to the owner's tag index.
    pub fn subscribe_tags(&self, owner: &str) -> TagSubscription {
        let mut spaces = self.lock_spaces();
        let space = spaces.entry(owner.to_string()).or_insert_with(OwnerSpace::new);
        Subscription::new(space.tag_index.clone(), space.tags_tx.subscribe())
    }

    /// Number of live note-list subscribers for an owner.
    pub fn note_subscriber_count(&self, owner: &str) -> usize {
        let spaces = self.lock_spaces();
        spaces.get(owner).map(|s| s.notes_tx.receiver_count()).unwrap_or(0)
    }

    /// Number of live tag-index subscribers for an owner.
    pub fn tag_subscriber_count(&self, owner: &str) -> usize {
        let spaces = self.lock_spaces();
        spaces.get(owner).map(|s| s.tags_tx.receiver_count()).unwrap_or(0)
    }

    /// Make the next batch commit fail with a store error, changing
    /// nothing.
    ///
    /// Always compiled (not test-gated) so downstream crates' tests can
    /// exercise the all-or-nothing commit contract.
    pub fn inject_commit_failure(&self) {
        self.inner.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn lock_spaces(&self) -> std::sync::MutexGuard<'_, HashMap<String, OwnerSpace>> {
        // A poisoned lock still yields the guard; commits validate the
        // whole batch before the first mutation.
        match self.inner.spaces.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn commit(&self, owner: &str, ops: Vec<WriteOp>) -> Result<()> {
        if self.inner.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(Error::Store("injected commit failure".to_string()));
        }

        let mut spaces = self.lock_spaces();
        let space = spaces.entry(owner.to_string()).or_insert_with(OwnerSpace::new);

        // Validation pass: the whole batch is checked against current
        // state before anything is applied.
        for op in &ops {
            match op {
                WriteOp::PutNote { id, .. } => {
                    if space.notes.contains_key(id) {
                        return Err(Error::Store(format!("note {} already exists", id)));
                    }
                }
                WriteOp::UpdateNote { id, .. } | WriteOp::RemoveNoteTag { id, .. } => {
                    if !space.notes.contains_key(id) {
                        return Err(Error::NoteNotFound(*id));
                    }
                }
                WriteOp::DeleteNote { .. }
                | WriteOp::UnionIndexTags { .. }
                | WriteOp::RemoveIndexTag { .. } => {}
            }
        }

        let mut notes_changed = false;
        let mut tags_changed = false;

        for op in ops {
            match op {
                WriteOp::PutNote {
                    id,
                    content,
                    tags,
                    updated_at_utc,
                } => {
                    let created_at_utc = space.next_created_at();
                    space.notes.insert(
                        id,
                        Note {
                            id,
                            owner: owner.to_string(),
                            content,
                            tag_list: tags,
                            created_at_utc,
                            updated_at_utc,
                        },
                    );
                    notes_changed = true;
                }
                WriteOp::UpdateNote {
                    id,
                    content,
                    tags,
                    updated_at_utc,
                } => {
                    // Presence validated above.
                    if let Some(note) = space.notes.get_mut(&id) {
                        note.content = content;
                        note.tag_list = tags;
                        note.updated_at_utc = updated_at_utc;
                    }
                    notes_changed = true;
                }
                WriteOp::DeleteNote { id } => {
                    notes_changed |= space.notes.remove(&id).is_some();
                }
                WriteOp::UnionIndexTags { tags } => {
                    for tag in tags {
                        tags_changed |= space.tag_index.insert(tag);
                    }
                }
                WriteOp::RemoveIndexTag { tag } => {
                    tags_changed |= space.tag_index.remove(&tag);
                }
                WriteOp::RemoveNoteTag { id, tag } => {
                    if let Some(note) = space.notes.get_mut(&id) {
                        notes_changed |= note.tag_list.remove(&tag);
                    }
                }
            }
        }

        if notes_changed {
            let _ = space.notes_tx.send(space.ordered_notes());
        }
        if tags_changed {
            let _ = space.tags_tx.send(space.tag_index.clone());
        }

        Ok(())
    }
}

/// Builder for an atomic multi-document write.
///
/// Operations accumulate locally and hit the store only on
/// [`commit`](WriteBatch::commit), which applies all of them or none.
pub struct WriteBatch {
    backend: MemoryBackend,
    owner: String,
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn put_note(
        &mut self,
        id: Uuid,
        content: String,
        tags: BTreeSet<String>,
        updated_at_utc: DateTime<Utc>,
    ) -> &mut Self {
        self.ops.push(WriteOp::PutNote {
            id,
            content,
            tags,
            updated_at_utc,
        });
        self
    }

    pub fn update_note(
        &mut self,
        id: Uuid,
        content: String,
        tags: BTreeSet<String>,
        updated_at_utc: DateTime<Utc>,
    ) -> &mut Self {
        self.ops.push(WriteOp::UpdateNote {
            id,
            content,
            tags,
            updated_at_utc,
        });
        self
    }

    pub fn delete_note(&mut self, id: Uuid) -> &mut Self {
        self.ops.push(WriteOp::DeleteNote { id });
        self
    }

    pub fn union_index_tags(&mut self, tags: BTreeSet<String>) -> &mut Self {
        self.ops.push(WriteOp::UnionIndexTags { tags });
        self
    }

    pub fn remove_index_tag(&mut self, tag: String) -> &mut Self {
        self.ops.push(WriteOp::RemoveIndexTag { tag });
        self
    }

    pub fn remove_note_tag(&mut self, id: Uuid, tag: String) -> &mut Self {
        self.ops.push(WriteOp::RemoveNoteTag { id, tag });
        self
    }

    /// Number of operations queued in this batch.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Commit the batch atomically. On error nothing was applied.
    pub async fn commit(self) -> Result<()> {
        self.backend.commit(&self.owner, self.ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_put_note_assigns_monotonic_created_at() {
        let backend = MemoryBackend::new();
        for _ in 0..5 {
            let mut batch = backend.batch("u1");
            batch.put_note(Uuid::now_v7(), "n".to_string(), BTreeSet::new(), Utc::now());
            batch.commit().await.unwrap();
        }

        let notes = backend.list_notes("u1");
        assert_eq!(notes.len(), 5);
        // Descending order with no ties.
        for pair in notes.windows(2) {
            assert!(pair[0].created_at_utc > pair[1].created_at_utc);
        }
    }

    #[tokio::test]
    async fn test_update_missing_note_fails_whole_batch() {
        let backend = MemoryBackend::new();
        let id = Uuid::now_v7();
        let mut batch = backend.batch("u1");
        batch.union_index_tags(tags(&["a"]));
        batch.update_note(id, "x".to_string(), BTreeSet::new(), Utc::now());

        let err = batch.commit().await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound(_)));
        // The union in the same batch must not have been applied.
        assert!(backend.index_tags("u1").is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_note_is_noop() {
        let backend = MemoryBackend::new();
        let mut batch = backend.batch("u1");
        batch.delete_note(Uuid::now_v7());
        batch.commit().await.unwrap();
        assert!(backend.list_notes("u1").is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_changes_nothing() {
        let backend = MemoryBackend::new();
        backend.inject_commit_failure();

        let mut batch = backend.batch("u1");
        batch.put_note(Uuid::now_v7(), "n".to_string(), tags(&["a"]), Utc::now());
        batch.union_index_tags(tags(&["a"]));
        let err = batch.commit().await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(backend.list_notes("u1").is_empty());
        assert!(backend.index_tags("u1").is_empty());

        // The failure is armed for one commit only.
        let mut batch = backend.batch("u1");
        batch.union_index_tags(tags(&["a"]));
        batch.commit().await.unwrap();
        assert_eq!(backend.index_tags("u1"), tags(&["a"]));
    }

    #[tokio::test]
    async fn test_snapshot_published_on_note_change() {
        let backend = MemoryBackend::new();
        let mut sub = backend.subscribe_notes("u1");
        assert!(sub.recv().await.unwrap().is_empty());

        let mut batch = backend.batch("u1");
        batch.put_note(Uuid::now_v7(), "hello".to_string(), BTreeSet::new(), Utc::now());
        batch.commit().await.unwrap();

        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].content, "hello");
    }

    #[tokio::test]
    async fn test_tag_snapshot_not_published_without_index_change() {
        let backend = MemoryBackend::new();

        // Union that changes nothing publishes nothing.
        let mut batch = backend.batch("u1");
        batch.union_index_tags(tags(&["a"]));
        batch.commit().await.unwrap();

        let mut sub = backend.subscribe_tags("u1");
        assert_eq!(sub.recv().await.unwrap(), tags(&["a"]));

        let mut batch = backend.batch("u1");
        batch.union_index_tags(tags(&["a"]));
        batch.commit().await.unwrap();

        let mut batch = backend.batch("u1");
        batch.union_index_tags(tags(&["b"]));
        batch.commit().await.unwrap();

        // The idempotent re-add produced no snapshot; next delivery is the
        // real change.
        assert_eq!(sub.recv().await.unwrap(), tags(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_unsubscribe_drops_receiver() {
        let backend = MemoryBackend::new();
        let sub = backend.subscribe_notes("u1");
        assert_eq!(backend.note_subscriber_count("u1"), 1);
        sub.unsubscribe();
        assert_eq!(backend.note_subscriber_count("u1"), 0);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let backend = MemoryBackend::new();
        let mut batch = backend.batch("u1");
        batch.put_note(Uuid::now_v7(), "mine".to_string(), tags(&["a"]), Utc::now());
        batch.union_index_tags(tags(&["a"]));
        batch.commit().await.unwrap();

        assert!(backend.list_notes("u2").is_empty());
        assert!(backend.index_tags("u2").is_empty());
    }

    #[tokio::test]
    async fn test_notes_with_tag_query() {
        let backend = MemoryBackend::new();
        let tagged = Uuid::now_v7();
        let untagged = Uuid::now_v7();
        let mut batch = backend.batch("u1");
        batch.put_note(tagged, "a".to_string(), tags(&["x"]), Utc::now());
        batch.put_note(untagged, "b".to_string(), BTreeSet::new(), Utc::now());
        batch.commit().await.unwrap();

        assert_eq!(backend.notes_with_tag("u1", "x"), vec![tagged]);
        assert!(backend.notes_with_tag("u1", "y").is_empty());
    }
}

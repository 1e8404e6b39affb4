//! # scrappr-store
//!
//! Store layer for scrappr.
//!
//! This crate provides:
//! - An in-memory document backend with the collaborator primitives the
//!   engine depends on (point reads, ordered queries, atomic batch
//!   commit, snapshot subscriptions)
//! - Repository implementations for notes and the tag index
//! - The long-lived note session owning live subscriptions and filters
//!
//! ## Example
//!
//! ```rust,ignore
//! use scrappr_core::NoteRepository;
//! use scrappr_store::{MemoryBackend, NoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = MemoryBackend::new();
//!     let notes = NoteStore::new(backend);
//!
//!     let id = notes
//!         .create("user-1", "Hello, world!", &["greeting".to_string()])
//!         .await?;
//!
//!     println!("Created note: {}", id);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod notes;
pub mod session;
pub mod tag_index;

// Re-export core types
pub use scrappr_core::*;

pub use backend::{MemoryBackend, WriteBatch, WriteOp};
pub use notes::NoteStore;
pub use session::NoteSession;
pub use tag_index::TagIndex;

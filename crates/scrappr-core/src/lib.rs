//! # scrappr-core
//!
//! Core types, traits, and pure logic for the scrappr note engine.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the store and capture crates depend on: the note/tag
//! data model, the unified error type, tag normalization, the text link
//! tokenizer, the tag filter engine, and snapshot subscription plumbing.

pub mod defaults;
pub mod error;
pub mod events;
pub mod filter;
pub mod link_text;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{NoteSubscription, Subscription, TagSubscription};
pub use filter::{sorted_tags, toggle_filter, visible, FilterSet};
pub use link_text::{tokenize, Segment};
pub use models::{Draft, DraftParams, Note};
pub use tags::{normalize_tag, normalize_tags, normalize_tags_ordered, TagsParam};
pub use traits::{NoteRepository, TagIndexRepository};

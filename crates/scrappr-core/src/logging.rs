//! Structured logging schema and field name constants for scrappr.
//!
//! All crates use these constants for consistent structured logging fields
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (lagged subscriber, lost race) |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ─── Identity fields ───────────────────────────────────────────────────────

/// Owner (authenticated user id) the operation is scoped to.
pub const OWNER: &str = "owner";

/// Component within a subsystem.
/// Examples: "note_store", "tag_index", "pipeline", "callable"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "delete_tag_globally", "transcribe"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note UUID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Tag name being added, removed, or filtered on.
pub const TAG: &str = "tag";

/// Number of tags in a union-add or cascade.
pub const TAG_COUNT: &str = "tag_count";

/// Number of notes in a delivered snapshot or touched by a cascade.
pub const NOTE_COUNT: &str = "note_count";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Byte length of an audio clip handed to transcription.
pub const CLIP_BYTES: &str = "clip_bytes";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Initialize tracing for embedding binaries and examples.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

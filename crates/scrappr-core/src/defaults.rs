//! Centralized default constants for scrappr.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Broadcast buffer capacity for snapshot subscriptions.
///
/// Recommended: 256 for production, 32 for tests. Receivers that fall more
/// than this many snapshots behind resume at the oldest retained one.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// TRANSCRIPTION
// =============================================================================

/// Environment variable naming the remote transcription callable URL.
pub const ENV_TRANSCRIBE_URL: &str = "SCRAPPR_TRANSCRIBE_URL";

/// Environment variable holding the caller's identity token, if any.
pub const ENV_TRANSCRIBE_ID_TOKEN: &str = "SCRAPPR_ID_TOKEN";

/// Request timeout for the transcription callable, in seconds.
///
/// Mirrors the callable's own declared execution limit; the collaborator,
/// not this client, owns the real ceiling.
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// AUDIO CAPTURE
// =============================================================================

/// Container MIME type of the clip produced by one recording session.
pub const CLIP_MIME_M4A: &str = "audio/m4a";

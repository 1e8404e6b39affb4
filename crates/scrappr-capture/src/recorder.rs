//! Microphone recorder abstraction.
//!
//! The device layer is a collaborator behind these traits: permission
//! handling and encoding belong to the platform, the pipeline only cares
//! about an exclusive handle it can open and finalize. One recording
//! session produces one encoded clip in a single container format.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use scrappr_core::defaults::CLIP_MIME_M4A;
use scrappr_core::{Error, Result};

/// One encoded audio artifact produced by a finished recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Encoded audio bytes.
    pub bytes: Vec<u8>,
    /// Container MIME type.
    pub mime: String,
}

/// Backend able to open the microphone for capture.
#[async_trait]
pub trait AudioRecorder: Send + Sync {
    /// Open the exclusive microphone resource.
    ///
    /// Fails with [`Error::PermissionDenied`] when microphone capture has
    /// not been granted; no resource is opened in that case.
    async fn begin(&self) -> Result<Box<dyn ActiveRecording>>;
}

/// An open, exclusive recording session.
#[async_trait]
pub trait ActiveRecording: Send {
    /// Stop capture, release the microphone, and return the encoded clip.
    async fn finish(self: Box<Self>) -> Result<AudioClip>;
}

/// In-memory recorder for deterministic testing.
///
/// Always compiled (not test-gated) so downstream crates can drive the
/// pipeline without a device. Tracks open handles so tests can assert the
/// exclusivity contract.
#[derive(Clone)]
pub struct MemoryRecorder {
    granted: bool,
    clip_bytes: Vec<u8>,
    open: Arc<AtomicUsize>,
    sessions: Arc<AtomicUsize>,
}

impl Default for MemoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecorder {
    /// Recorder with permission granted and a small fixed clip.
    pub fn new() -> Self {
        Self {
            granted: true,
            clip_bytes: b"m4a-clip".to_vec(),
            open: Arc::new(AtomicUsize::new(0)),
            sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Simulate the user declining the microphone permission prompt.
    pub fn deny_permission(mut self) -> Self {
        self.granted = false;
        self
    }

    /// Set the clip bytes every session produces.
    pub fn with_clip(mut self, bytes: Vec<u8>) -> Self {
        self.clip_bytes = bytes;
        self
    }

    /// Number of currently open microphone handles.
    pub fn open_handles(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Total sessions ever opened.
    pub fn total_sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioRecorder for MemoryRecorder {
    async fn begin(&self) -> Result<Box<dyn ActiveRecording>> {
        if !self.granted {
            return Err(Error::PermissionDenied(
                "microphone permission not granted".to_string(),
            ));
        }
        self.open.fetch_add(1, Ordering::SeqCst);
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryActiveRecording {
            clip_bytes: self.clip_bytes.clone(),
            open: Arc::clone(&self.open),
            finished: false,
        }))
    }
}

struct MemoryActiveRecording {
    clip_bytes: Vec<u8>,
    open: Arc<AtomicUsize>,
    finished: bool,
}

#[async_trait]
impl ActiveRecording for MemoryActiveRecording {
    async fn finish(mut self: Box<Self>) -> Result<AudioClip> {
        self.finished = true;
        self.open.fetch_sub(1, Ordering::SeqCst);
        Ok(AudioClip {
            bytes: self.clip_bytes.clone(),
            mime: CLIP_MIME_M4A.to_string(),
        })
    }
}

impl Drop for MemoryActiveRecording {
    fn drop(&mut self) {
        // A handle dropped without finish still releases the microphone.
        if !self.finished {
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

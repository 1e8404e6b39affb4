//! Recording pipeline state machine.
//!
//! Governs one microphone session at a time: `Idle` → `Recording` on
//! start, `Recording` → `Transcribing` on stop (always; there is no
//! discard path), then back to `Idle` whether transcription succeeded or
//! failed. On success the transcript is merged into the draft; on failure
//! the draft is left untouched and the error surfaces to the caller.

use std::sync::Arc;

use scrappr_core::{Draft, Error, Result};

use crate::recorder::{ActiveRecording, AudioRecorder};
use crate::transcription::TranscriptionBackend;

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Transcribing,
}

/// Microphone capture and transcription pipeline for one editor.
pub struct RecordingPipeline {
    recorder: Arc<dyn AudioRecorder>,
    transcriber: Arc<dyn TranscriptionBackend>,
    state: RecordingState,
    active: Option<Box<dyn ActiveRecording>>,
}

impl RecordingPipeline {
    pub fn new(
        recorder: Arc<dyn AudioRecorder>,
        transcriber: Arc<dyn TranscriptionBackend>,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            state: RecordingState::Idle,
            active: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Open the microphone and enter `Recording`.
    ///
    /// Only one session may be active: a second start is rejected without
    /// opening another microphone handle. A permission failure surfaces
    /// and the pipeline remains `Idle`.
    pub async fn start(&mut self) -> Result<()> {
        if self.state != RecordingState::Idle {
            return Err(Error::Validation(
                "a recording session is already active".to_string(),
            ));
        }

        let active = self.recorder.begin().await?;
        self.active = Some(active);
        self.state = RecordingState::Recording;
        tracing::info!("recording started");
        Ok(())
    }

    /// Finalize the session, transcribe the clip, and merge the text into
    /// `draft`.
    ///
    /// In `Idle` this is a no-op. Once invoked there is no cancellation:
    /// the clip always goes to transcription. Any failure surfaces with
    /// the draft unmodified; either way the pipeline ends `Idle`.
    pub async fn stop(&mut self, draft: &mut Draft) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };

        self.state = RecordingState::Transcribing;
        let result = self.finish_and_merge(active, draft).await;
        self.state = RecordingState::Idle;

        if let Err(e) = &result {
            tracing::warn!(error = %e, "transcription failed; draft unchanged");
        }
        result
    }

    async fn finish_and_merge(
        &self,
        active: Box<dyn ActiveRecording>,
        draft: &mut Draft,
    ) -> Result<()> {
        let clip = active.finish().await?;
        tracing::debug!(clip_bytes = clip.bytes.len(), "clip finalized, transcribing");

        let text = self.transcriber.transcribe(&clip.bytes).await?;
        draft.merge_transcript(&text);
        tracing::info!("transcript merged into draft");
        Ok(())
    }
}

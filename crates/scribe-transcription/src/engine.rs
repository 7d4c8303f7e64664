//! The transcription capability injected into the server.

use std::path::Path;

use async_trait::async_trait;

use crate::types::{TranscriptionError, TranscriptionResult};

/// A loaded speech-to-text engine.
///
/// Implementations are constructed once and shared across concurrent
/// requests, so `transcribe` takes `&self`. Each call owns its input file
/// and must not keep it open after returning.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Short human-readable description, reported back to clients.
    fn name(&self) -> &str;

    /// Transcribe the audio file at `audio_path`.
    ///
    /// The file extension is the container hint; engines may rely on it to
    /// pick a demuxer.
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, TranscriptionError>;
}

//! Core types for the transcription engines.

/// Result of transcribing an audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    /// The transcribed text, trimmed.
    pub text: String,
    /// Language reported by the engine or the configured hint.
    pub language: Option<String>,
}

/// Errors that can occur during transcription.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The audio decoder executable could not be found.
    #[error(
        "audio decoder `{binary}` not found: install ffmpeg and make sure it is on PATH, \
         or point transcription.ffmpegPath at the executable"
    )]
    DecoderMissing {
        /// Executable name or path that failed to spawn.
        binary: String,
    },

    /// Audio decoding failure (unsupported format, corrupt data).
    #[error("audio decode error: {0}")]
    AudioDecode(String),

    /// The engine ran but recognised no speech.
    #[error("could not understand the audio")]
    Unintelligible,

    /// The external speech service could not be reached.
    #[error("speech service unavailable: {0}")]
    Unavailable(String),

    /// Engine-internal failure (bad response, inference error).
    #[error("engine error: {0}")]
    Engine(String),

    /// Model file missing or failed to load.
    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    /// I/O error (file read/write, process spawn).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extension trait to reduce `.map_err()` boilerplate when wrapping errors into `TranscriptionError`.
pub trait ResultExt<T> {
    /// Wrap the error as [`TranscriptionError::Engine`] with `context` prefix.
    fn engine(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap the error as [`TranscriptionError::AudioDecode`] with `context` prefix.
    fn audio_decode(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap the error as [`TranscriptionError::ModelNotAvailable`] with `context` prefix.
    fn model(self, context: &str) -> Result<T, TranscriptionError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn engine(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::Engine(format!("{context}: {e}")))
    }
    fn audio_decode(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::AudioDecode(format!("{context}: {e}")))
    }
    fn model(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::ModelNotAvailable(format!("{context}: {e}")))
    }
}

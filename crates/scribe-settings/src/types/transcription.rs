//! Speech-to-text engine settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which transcription engine the server constructs at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External HTTP speech service.
    #[default]
    Sidecar,
    /// In-process whisper.cpp model (requires the `whisper` feature).
    Whisper,
}

/// Transcription engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionSettings {
    /// Engine to use.
    pub engine: EngineKind,
    /// Base URL of the speech service (sidecar engine).
    pub base_url: String,
    /// Speech service request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Language hint passed to the engine (e.g. `"en"`, `"vi"`); auto-detect when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Path to the whisper.cpp model file (whisper engine).
    pub model_path: PathBuf,
    /// ffmpeg executable name or path used to decode uploads.
    pub ffmpeg_path: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::Sidecar,
            base_url: "http://127.0.0.1:9876".to_string(),
            timeout_ms: 120_000,
            language: None,
            model_path: super::scribe_home().join("models").join("ggml-base.bin"),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

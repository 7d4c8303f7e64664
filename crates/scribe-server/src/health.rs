//! `/health` endpoint.

use serde::Serialize;
use std::time::Instant;

use scribe_transcription::TranscriptionError;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Description of the loaded transcription engine.
    pub engine: String,
    /// Audio decoder check; omitted when the engine needs no decoder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoder: Option<DecoderStatus>,
}

/// Whether the external audio decoder can be run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DecoderStatus {
    /// The decoder ran and reported a version.
    pub available: bool,
    /// Version banner when available, otherwise the error with its hint.
    pub detail: String,
}

impl From<Result<String, TranscriptionError>> for DecoderStatus {
    fn from(result: Result<String, TranscriptionError>) -> Self {
        match result {
            Ok(version) => Self {
                available: true,
                detail: version,
            },
            Err(e) => Self {
                available: false,
                detail: e.to_string(),
            },
        }
    }
}

/// Build a health response.
pub fn health_check(
    start_time: Instant,
    engine: &str,
    decoder: Option<DecoderStatus>,
) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        engine: engine.to_string(),
        decoder,
    }
}

//! Engine that delegates to an external HTTP speech-to-text service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::engine::Transcriber;
use crate::types::{ResultExt, TranscriptionError, TranscriptionResult};

/// Reply body of the speech service. Only `text` is required.
#[derive(Debug, Deserialize)]
struct SidecarReply {
    #[serde(default)]
    text: String,
    #[serde(default)]
    language: Option<String>,
}

/// Posts audio files to `{base_url}/transcribe` as multipart form data.
///
/// The file goes in the `audio` part; the configured language hint, if any,
/// goes in a `language` text part.
pub struct SidecarTranscriber {
    client: reqwest::Client,
    endpoint: String,
    language: Option<String>,
}

impl SidecarTranscriber {
    /// Create a client for the service at `base_url`.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        language: Option<String>,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .engine("build http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/transcribe", base_url.trim_end_matches('/')),
            language,
        })
    }

    /// Full URL the engine posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transcriber for SidecarTranscriber {
    fn name(&self) -> &str {
        "sidecar speech service"
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, TranscriptionError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map_or_else(|| "audio.wav".to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(audio_path).first_or_octet_stream();
        debug!(bytes = bytes.len(), %mime, "sending audio to speech service");

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .engine("build multipart")?;
        let mut form = Form::new().part("audio", part);
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Engine(format!(
                "speech service returned {status}: {body}"
            )));
        }

        let reply: SidecarReply = response.json().await.engine("parse speech service reply")?;
        let text = reply.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::Unintelligible);
        }

        Ok(TranscriptionResult {
            text,
            language: reply.language.or_else(|| self.language.clone()),
        })
    }
}

//! Builds the transcription engine named in settings.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use scribe_settings::{EngineKind, TranscriptionSettings};
use scribe_transcription::{SidecarTranscriber, Transcriber, decoder};

/// Construct the configured engine. Called once at startup.
pub async fn build_transcriber(settings: &TranscriptionSettings) -> Result<Arc<dyn Transcriber>> {
    match settings.engine {
        EngineKind::Sidecar => {
            let engine = SidecarTranscriber::new(
                &settings.base_url,
                Duration::from_millis(settings.timeout_ms),
                settings.language.clone(),
            )
            .context("Failed to create speech service client")?;
            tracing::info!(endpoint = engine.endpoint(), "using sidecar speech service");
            Ok(Arc::new(engine))
        }
        EngineKind::Whisper => {
            check_decoder(&settings.ffmpeg_path).await;
            load_whisper(settings).await
        }
    }
}

#[cfg(feature = "whisper")]
async fn load_whisper(settings: &TranscriptionSettings) -> Result<Arc<dyn Transcriber>> {
    let engine = scribe_transcription::WhisperTranscriber::load(
        settings.model_path.clone(),
        settings.ffmpeg_path.clone(),
        settings.language.clone(),
    )
    .await
    .with_context(|| format!("Failed to load whisper model {}", settings.model_path.display()))?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "whisper"))]
#[allow(clippy::unused_async)]
async fn load_whisper(_settings: &TranscriptionSettings) -> Result<Arc<dyn Transcriber>> {
    anyhow::bail!("the whisper engine is not compiled in; rebuild with `--features whisper`")
}

/// Log whether the audio decoder can be spawned. Missing decoders are
/// reported per request, so this only warns.
async fn check_decoder(ffmpeg: &str) {
    match decoder::probe(ffmpeg).await {
        Ok(version) => tracing::info!(%version, "audio decoder available"),
        Err(e) => tracing::warn!(error = %e, "audio decoder unavailable"),
    }
}

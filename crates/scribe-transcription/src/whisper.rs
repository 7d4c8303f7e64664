//! In-process whisper.cpp engine.
//!
//! The model is loaded once; every request decodes its file through ffmpeg
//! and runs on a blocking thread with its own decoding state, so concurrent
//! requests share only the read-only model context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::decoder;
use crate::engine::Transcriber;
use crate::types::{ResultExt, TranscriptionError, TranscriptionResult};

/// whisper.cpp model plus the decoder it needs.
pub struct WhisperTranscriber {
    context: Arc<WhisperContext>,
    ffmpeg: String,
    language: Option<String>,
    threads: i32,
}

impl WhisperTranscriber {
    /// Load the model at `model_path`.
    ///
    /// This reads the whole model into memory; call once at startup.
    pub async fn load(
        model_path: PathBuf,
        ffmpeg: String,
        language: Option<String>,
    ) -> Result<Self, TranscriptionError> {
        if !model_path.exists() {
            return Err(TranscriptionError::ModelNotAvailable(format!(
                "model file not found: {}",
                model_path.display()
            )));
        }

        info!(path = %model_path.display(), "loading whisper model");
        let context = tokio::task::spawn_blocking(move || {
            let path = model_path.to_string_lossy().into_owned();
            WhisperContext::new_with_params(&path, WhisperContextParameters::default())
                .model("load whisper model")
        })
        .await
        .engine("model load task")??;

        let threads = std::thread::available_parallelism()
            .map_or(4, |n| i32::try_from(n.get()).unwrap_or(4))
            .min(8);
        info!(threads, language = ?language, "whisper engine ready");

        Ok(Self {
            context: Arc::new(context),
            ffmpeg,
            language,
            threads,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        "whisper.cpp (ffmpeg decode)"
    }

    #[instrument(skip(self))]
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, TranscriptionError> {
        let samples = decoder::decode_to_pcm(&self.ffmpeg, audio_path).await?;

        let context = Arc::clone(&self.context);
        let language = self.language.clone();
        let threads = self.threads;
        let text = tokio::task::spawn_blocking(move || {
            run_inference(&context, language.as_deref(), threads, &samples)
        })
        .await
        .engine("inference task")??;

        if text.is_empty() {
            return Err(TranscriptionError::Unintelligible);
        }

        Ok(TranscriptionResult {
            text,
            language: self.language.clone(),
        })
    }
}

fn run_inference(
    context: &WhisperContext,
    language: Option<&str>,
    threads: i32,
    samples: &[f32],
) -> Result<String, TranscriptionError> {
    let mut state = context.create_state().engine("create state")?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
    params.set_n_threads(threads);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_special(false);
    params.set_print_timestamps(false);
    params.set_language(Some(language.unwrap_or("auto")));

    state.full(params, samples).engine("whisper inference")?;

    let mut text = String::new();
    for segment in state.as_iter() {
        let piece = segment.to_str_lossy().engine("segment text")?;
        text.push_str(&piece);
    }
    debug!(chars = text.len(), "whisper decode finished");

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_requires_model_file() {
        let tmp = tempfile::tempdir().unwrap();
        let result = WhisperTranscriber::load(
            tmp.path().join("ggml-missing.bin"),
            "ffmpeg".into(),
            None,
        )
        .await;
        assert!(matches!(result, Err(TranscriptionError::ModelNotAvailable(_))));
    }
}

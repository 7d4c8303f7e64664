//! `POST /transcribe` handler.

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scribe_transcription::{TranscriptionError, TranscriptionResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::ApiError;
use crate::server::AppState;
use crate::upload::{self, TempUpload, UploadMeta};

/// JSON body returned by the transcription endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscribeResponse {
    /// Whether a transcript was produced.
    pub success: bool,
    /// Transcript text on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    /// Engine that produced the transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Declared content type, echoed on format rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_type: Option<String>,
    /// Declared filename, echoed on format rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_name: Option<String>,
}

impl TranscribeResponse {
    /// Successful transcription.
    pub fn success(transcription: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            success: true,
            transcription: Some(transcription.into()),
            method: Some(method.into()),
            ..Self::default()
        }
    }

    /// Failed transcription.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// POST /transcribe
///
/// Persists the uploaded file, runs the engine on it, and always removes
/// the temporary file before responding.
#[instrument(skip_all, fields(engine = state.transcriber.name()))]
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match handle(&state, multipart).await {
        Ok(result) => {
            info!(chars = result.text.chars().count(), "transcription succeeded");
            let body = TranscribeResponse::success(result.text, state.transcriber.name());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            if e.status().is_server_error() {
                warn!(error = %e, "transcription request failed");
            } else {
                debug!(error = %e, "transcription request rejected");
            }
            e.into_response()
        }
    }
}

async fn handle(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<TranscriptionResult, ApiError> {
    let mut multipart = multipart?;
    let upload = receive_upload(state, &mut multipart).await?;
    debug!(path = %upload.path().display(), bytes = upload.bytes(), "upload stored");

    let outcome = state.transcriber.transcribe(upload.path()).await;
    upload.close();

    let result = outcome?;
    let text = result.text.trim().to_string();
    if text.is_empty() {
        return Err(TranscriptionError::Unintelligible.into());
    }
    Ok(TranscriptionResult { text, ..result })
}

/// Find the file under the configured field and persist it.
///
/// Parts with another name, and parts without a filename (or with an empty
/// one), are skipped.
async fn receive_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<TempUpload, ApiError> {
    let config = &state.config;
    while let Some(field) = multipart.next_field().await? {
        let meta = UploadMeta::from_field(&field);
        let has_file_name = meta.file_name.as_deref().is_some_and(|n| !n.is_empty());
        if meta.field_name != config.upload_field || !has_file_name {
            debug!(field = %meta.field_name, "skipping multipart field");
            continue;
        }

        if config.strict_formats {
            upload::check_format(&meta, &config.accepted_extensions)?;
        }
        let (source, ext) = upload::resolve_extension(&meta);
        debug!(
            file_name = ?meta.file_name,
            content_type = ?meta.content_type,
            ?source,
            ext,
            "resolved upload extension"
        );
        return upload::persist_upload(field, &config.upload_dir(), &ext, config.max_upload_bytes)
            .await;
    }
    Err(ApiError::MissingFile)
}

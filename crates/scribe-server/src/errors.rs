//! API errors and their HTTP mapping.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scribe_transcription::TranscriptionError;

use crate::transcribe::TranscribeResponse;

/// Everything that can go wrong while serving a transcription request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request carried no file under the upload field.
    #[error("No audio file provided")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("Invalid upload: {message}")]
    Multipart {
        /// Status chosen by the multipart parser (400, 413, ...).
        status: StatusCode,
        /// Parser message.
        message: String,
    },

    /// The uploaded file exceeded the configured size limit.
    #[error("Upload too large: limit is {limit} bytes")]
    TooLarge {
        /// Configured maximum in bytes.
        limit: u64,
    },

    /// The upload contained no bytes.
    #[error("Uploaded audio file is empty")]
    EmptyUpload,

    /// Strict mode rejected the declared type and filename.
    #[error("Unsupported audio format, expected one of: {accepted}")]
    UnsupportedFormat {
        /// Declared content type (empty when absent).
        received_type: String,
        /// Declared filename (empty when absent).
        received_name: String,
        /// Comma-separated accepted extensions.
        accepted: String,
    },

    /// Writing the temporary file failed.
    #[error("Failed to store upload: {0}")]
    Storage(#[source] std::io::Error),

    /// The engine failed.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyUpload | Self::UnsupportedFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Multipart { status, .. } => *status,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transcription(TranscriptionError::Unintelligible) => StatusCode::BAD_REQUEST,
            Self::Transcription(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message placed in the `error` field.
    pub fn message(&self) -> String {
        match self {
            Self::Transcription(TranscriptionError::Unintelligible) => {
                "Could not understand the audio".into()
            }
            Self::Transcription(e) => format!("Transcription failed: {e}"),
            other => other.to_string(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    // A body that is not multipart at all carries no file.
    fn from(e: MultipartRejection) -> Self {
        tracing::debug!(error = %e.body_text(), "request is not multipart");
        Self::MissingFile
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = TranscribeResponse::failure(self.message());
        if let Self::UnsupportedFormat {
            received_type,
            received_name,
            ..
        } = self
        {
            body.received_type = Some(received_type);
            body.received_name = Some(received_name);
        }
        (status, Json(body)).into_response()
    }
}

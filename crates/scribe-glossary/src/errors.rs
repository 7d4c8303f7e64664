//! Glossary errors.

use std::path::PathBuf;

/// Errors raised while fetching, parsing, or persisting a glossary.
#[derive(Debug, thiserror::Error)]
pub enum GlossaryError {
    /// Network failure or client construction failure.
    #[error("error fetching the page: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("error fetching the page: {url} returned {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The document does not have the expected structure.
    #[error("error parsing the content: {0}")]
    Parse(String),

    /// Reading or writing the JSON file failed.
    #[error("glossary file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("glossary json: {0}")]
    Json(#[from] serde_json::Error),
}

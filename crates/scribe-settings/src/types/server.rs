//! HTTP server and upload settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default maximum upload size (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Server network and upload handling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Multipart field carrying the audio upload.
    pub upload_field: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
    /// Directory for temporary upload files (system temp dir when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,
    /// Reject uploads that are not one of `accepted_extensions`.
    pub strict_formats: bool,
    /// Containers accepted in strict mode (lowercase, no leading dot).
    pub accepted_extensions: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            upload_field: "audio".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: None,
            strict_formats: false,
            accepted_extensions: ["wav", "mp3", "m4a", "ogg", "webm", "flac"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

//! Server configuration.

use std::path::PathBuf;

use scribe_settings::ServerSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the scribe server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
    /// Multipart field that carries the audio file.
    pub upload_field: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
    /// Directory for temporary upload files; system temp dir when `None`.
    pub upload_dir: Option<PathBuf>,
    /// Only accept uploads whose type or extension is in `accepted_extensions`.
    pub strict_formats: bool,
    /// Containers accepted in strict mode.
    pub accepted_extensions: Vec<String>,
    /// Decoder binary `/health` checks; unchecked when `None`.
    #[serde(default)]
    pub decoder: Option<String>,
}

impl ServerConfig {
    /// Directory temporary uploads are written to.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Request body limit: the upload limit plus room for multipart framing.
    pub fn body_limit(&self) -> usize {
        const MULTIPART_OVERHEAD: u64 = 64 * 1024;
        usize::try_from(self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD))
            .unwrap_or(usize::MAX)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ServerSettings::default())
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(s: &ServerSettings) -> Self {
        Self {
            host: s.host.clone(),
            port: s.port,
            upload_field: s.upload_field.clone(),
            max_upload_bytes: s.max_upload_bytes,
            upload_dir: s.upload_dir.clone(),
            strict_formats: s.strict_formats,
            accepted_extensions: s
                .accepted_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            decoder: None,
        }
    }
}

//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so partial JSON files are valid: missing fields keep their default value.

mod glossary;
mod server;
mod transcription;

pub use glossary::*;
pub use server::*;
pub use transcription::*;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "server": { "port": 9000, "strictFormats": true },
///   "transcription": { "engine": "whisper", "language": "vi" }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScribeSettings {
    /// HTTP server and upload handling.
    pub server: ServerSettings,
    /// Speech-to-text engine selection and options.
    pub transcription: TranscriptionSettings,
    /// Glossary scraper options.
    pub glossary: GlossarySettings,
}

/// Root directory for scribe data (`~/.scribe`).
pub fn scribe_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".scribe")
}

//! # scribe-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`ScribeSettings::default()`]
//! 2. **User file**: `~/.scribe/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SCRIBE_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = ScribeSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = ScribeSettings::default();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.upload_field, "audio");
        assert!(!settings.server.strict_formats);
        assert_eq!(settings.transcription.engine, EngineKind::Sidecar);
        assert!(settings.transcription.language.is_none());
        assert_eq!(
            settings.glossary.url,
            "https://en.wikipedia.org/wiki/Glossary_of_computer_science"
        );
        assert_eq!(settings.glossary.preview_terms, 5);
    }
}

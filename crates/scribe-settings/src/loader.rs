//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ScribeSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `SCRIBE_*` environment variable overrides (highest priority)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{EngineKind, ScribeSettings, scribe_home};

/// Resolve the path to the settings file (`~/.scribe/settings.json`).
pub fn settings_path() -> PathBuf {
    scribe_home().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ScribeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<ScribeSettings> {
    let mut settings = load_file_layer(path)?;
    apply_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<ScribeSettings> {
    let defaults = serde_json::to_value(ScribeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `SCRIBE_*` overrides read through `lookup`.
///
/// Values that fail to parse (or fall outside their range) are ignored with
/// a warning and the file/default value is kept.
pub fn apply_overrides(settings: &mut ScribeSettings, lookup: impl Fn(&str) -> Option<String>) {
    let env = EnvReader { lookup };

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = env.string("SCRIBE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.parsed("SCRIBE_PORT", |s| parse_u16_range(s, 1, 65535)) {
        settings.server.port = v;
    }
    if let Some(v) = env.parsed("SCRIBE_MAX_UPLOAD_BYTES", |s| {
        parse_u64_range(s, 1024, 4 * 1024 * 1024 * 1024)
    }) {
        settings.server.max_upload_bytes = v;
    }
    if let Some(v) = env.string("SCRIBE_UPLOAD_DIR") {
        settings.server.upload_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env.parsed("SCRIBE_STRICT_FORMATS", parse_bool) {
        settings.server.strict_formats = v;
    }

    // ── Transcription ───────────────────────────────────────────────
    if let Some(v) = env.parsed("SCRIBE_ENGINE", parse_engine) {
        settings.transcription.engine = v;
    }
    if let Some(v) = env.string("SCRIBE_TRANSCRIBE_URL") {
        settings.transcription.base_url = v;
    }
    if let Some(v) = env.parsed("SCRIBE_TRANSCRIBE_TIMEOUT_MS", |s| {
        parse_u64_range(s, 1000, 3_600_000)
    }) {
        settings.transcription.timeout_ms = v;
    }
    if let Some(v) = env.string("SCRIBE_LANGUAGE") {
        settings.transcription.language = Some(v);
    }
    if let Some(v) = env.string("SCRIBE_WHISPER_MODEL") {
        settings.transcription.model_path = PathBuf::from(v);
    }
    if let Some(v) = env.string("SCRIBE_FFMPEG") {
        settings.transcription.ffmpeg_path = v;
    }

    // ── Glossary ────────────────────────────────────────────────────
    if let Some(v) = env.string("SCRIBE_GLOSSARY_URL") {
        settings.glossary.url = v;
    }
    if let Some(v) = env.string("SCRIBE_GLOSSARY_OUTPUT") {
        settings.glossary.output_path = PathBuf::from(v);
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse an engine name (`sidecar` or `whisper`, case-insensitive).
pub fn parse_engine(val: &str) -> Option<EngineKind> {
    serde_json::from_value(Value::String(val.to_lowercase())).ok()
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn parsed<T>(&self, name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let val = self.string(name)?;
        let result = parse(&val);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

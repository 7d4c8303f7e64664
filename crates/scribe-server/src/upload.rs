//! Upload metadata, container-extension inference, and scoped temp files.
//!
//! Decoders sniff the codec partly from the file suffix, so every upload is
//! written to a uniquely named temp file whose extension is inferred from
//! what the client declared. The file lives exactly as long as its
//! [`TempUpload`].

use std::path::Path;

use axum::extract::multipart::Field;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::errors::ApiError;

/// Extension used when neither the filename nor the MIME type yields one.
pub const DEFAULT_EXTENSION: &str = "wav";

const MAX_EXTENSION_LEN: usize = 8;

/// What the client declared about an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMeta {
    /// Multipart field name.
    pub field_name: String,
    /// Declared filename, if any.
    pub file_name: Option<String>,
    /// Declared content type, if any.
    pub content_type: Option<String>,
}

impl UploadMeta {
    /// Capture the declared metadata of a multipart field.
    pub fn from_field(field: &Field<'_>) -> Self {
        Self {
            field_name: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
        }
    }
}

/// Where an inferred extension came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionSource {
    /// Suffix of the declared filename.
    FileName,
    /// Lookup of the declared MIME type.
    MimeType,
    /// [`DEFAULT_EXTENSION`].
    Default,
}

type ExtensionStrategy = fn(&UploadMeta) -> Option<String>;

/// Tried in order; the first hit wins, otherwise [`DEFAULT_EXTENSION`].
const EXTENSION_STRATEGIES: &[(ExtensionSource, ExtensionStrategy)] = &[
    (ExtensionSource::FileName, extension_from_file_name),
    (ExtensionSource::MimeType, extension_from_mime_type),
];

/// Infer the container extension for an upload, without the leading dot.
pub fn resolve_extension(meta: &UploadMeta) -> (ExtensionSource, String) {
    EXTENSION_STRATEGIES
        .iter()
        .find_map(|&(source, strategy)| strategy(meta).map(|ext| (source, ext)))
        .unwrap_or_else(|| (ExtensionSource::Default, DEFAULT_EXTENSION.to_string()))
}

fn extension_from_file_name(meta: &UploadMeta) -> Option<String> {
    let name = meta.file_name.as_deref()?;
    let ext = Path::new(name).extension()?.to_str()?;
    sanitize_extension(ext)
}

fn extension_from_mime_type(meta: &UploadMeta) -> Option<String> {
    let mime = essence(meta.content_type.as_deref()?);
    if let Some(ext) = known_audio_extension(&mime) {
        return Some(ext.to_string());
    }
    // Anything outside audio/video (octet-stream, text) says nothing about the codec.
    if !(mime.starts_with("audio/") || mime.starts_with("video/")) {
        return None;
    }
    mime_guess::get_mime_extensions_str(&mime)
        .and_then(|exts| exts.first())
        .and_then(|ext| sanitize_extension(ext))
}

/// Containers whose canonical suffix differs from `mime_guess`'s first pick.
fn known_audio_extension(mime: &str) -> Option<&'static str> {
    let ext = match mime {
        "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => "wav",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => "m4a",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/vorbis" | "audio/opus" => "ogg",
        "audio/webm" | "video/webm" => "webm",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/x-caf" => "caf",
        "audio/aiff" | "audio/x-aiff" => "aiff",
        _ => return None,
    };
    Some(ext)
}

/// `audio/webm;codecs=opus` → `audio/webm`.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn sanitize_extension(ext: &str) -> Option<String> {
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

/// Strict-mode gate: accept when the declared MIME type maps to an accepted
/// extension or the filename's own extension is accepted.
pub fn check_format(meta: &UploadMeta, accepted: &[String]) -> Result<(), ApiError> {
    let is_accepted = |ext: Option<String>| ext.is_some_and(|e| accepted.contains(&e));

    if is_accepted(extension_from_mime_type(meta)) || is_accepted(extension_from_file_name(meta)) {
        return Ok(());
    }
    Err(ApiError::UnsupportedFormat {
        received_type: meta.content_type.clone().unwrap_or_default(),
        received_name: meta.file_name.clone().unwrap_or_default(),
        accepted: accepted.join(", "),
    })
}

/// A persisted upload. The file is removed on [`close`](Self::close) or drop.
#[derive(Debug)]
pub struct TempUpload {
    path: TempPath,
    bytes: u64,
}

impl TempUpload {
    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes written.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Delete the file. Failures are logged and otherwise ignored.
    pub fn close(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            debug!(path = %shown, error = %e, "failed to remove temporary upload");
        }
    }
}

/// Stream a multipart field into a fresh temp file under `dir`.
///
/// The file name is unique per call and ends in `.{ext}`. Exceeding
/// `max_bytes` aborts with [`ApiError::TooLarge`]; the partial file is
/// removed on every error path.
pub async fn persist_upload(
    mut field: Field<'_>,
    dir: &Path,
    ext: &str,
    max_bytes: u64,
) -> Result<TempUpload, ApiError> {
    let named = tempfile::Builder::new()
        .prefix("scribe-upload-")
        .suffix(&format!(".{ext}"))
        .tempfile_in(dir)
        .map_err(ApiError::Storage)?;
    let (file, path) = named.into_parts();
    let mut upload = TempUpload { path, bytes: 0 };
    let mut file = tokio::fs::File::from_std(file);

    while let Some(chunk) = field.chunk().await? {
        upload.bytes += chunk.len() as u64;
        if upload.bytes > max_bytes {
            return Err(ApiError::TooLarge { limit: max_bytes });
        }
        file.write_all(&chunk).await.map_err(ApiError::Storage)?;
    }
    file.flush().await.map_err(ApiError::Storage)?;
    drop(file);

    if upload.bytes == 0 {
        return Err(ApiError::EmptyUpload);
    }
    Ok(upload)
}

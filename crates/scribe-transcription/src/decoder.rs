//! Audio decoding through an external ffmpeg binary.
//!
//! Any container/codec ffmpeg understands is converted to 16kHz mono
//! little-endian f32 PCM on stdout, which is what whisper.cpp consumes.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::types::TranscriptionError;

/// Sample rate expected by the speech models.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Lines of ffmpeg stderr kept in decode error messages.
const STDERR_TAIL_LINES: usize = 3;

/// Decode `path` to 16kHz mono f32 samples using the `ffmpeg` executable.
pub async fn decode_to_pcm(ffmpeg: &str, path: &Path) -> Result<Vec<f32>, TranscriptionError> {
    let output = Command::new(ffmpeg)
        .args(["-nostdin", "-hide_banner", "-loglevel", "error", "-i"])
        .arg(path)
        .args(["-f", "f32le", "-ac", "1", "-ar"])
        .arg(TARGET_SAMPLE_RATE.to_string())
        .arg("-")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_error(ffmpeg, e))?;

    if !output.status.success() {
        return Err(TranscriptionError::AudioDecode(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr_tail(&output.stderr)
        )));
    }

    let samples = pcm_from_f32le(&output.stdout);
    if samples.is_empty() {
        return Err(TranscriptionError::AudioDecode(
            "no audio samples decoded".into(),
        ));
    }

    #[allow(clippy::cast_precision_loss)]
    let seconds = samples.len() as f64 / f64::from(TARGET_SAMPLE_RATE);
    debug!(samples = samples.len(), seconds, "decoded audio");
    Ok(samples)
}

/// Check that `ffmpeg` runs, returning its version banner line.
pub async fn probe(ffmpeg: &str) -> Result<String, TranscriptionError> {
    let output = Command::new(ffmpeg)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| spawn_error(ffmpeg, e))?;

    if !output.status.success() {
        return Err(TranscriptionError::AudioDecode(format!(
            "`{ffmpeg} -version` exited with {}",
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string())
}

/// Reinterpret raw little-endian f32 bytes as samples; a trailing partial sample is dropped.
pub fn pcm_from_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn spawn_error(binary: &str, e: std::io::Error) -> TranscriptionError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TranscriptionError::DecoderMissing {
            binary: binary.to_string(),
        }
    } else {
        TranscriptionError::Io(e)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    if lines.is_empty() {
        "no diagnostic output".to_string()
    } else {
        lines[start..].join(" | ")
    }
}

//! Speech-to-text engines for scribe.
//!
//! Every engine implements [`Transcriber`]: it takes the path of an audio
//! file on disk and returns the recognised text. The server constructs one
//! engine at startup and injects it into request handlers.
//!
//! # Engines
//!
//! ```text
//! SidecarTranscriber  file → multipart POST {base_url}/transcribe → JSON { text }
//! WhisperTranscriber  file → ffmpeg (16kHz mono f32le) → whisper.cpp greedy decode → text
//! ```
//!
//! The whisper engine is behind the `whisper` cargo feature because it
//! compiles whisper.cpp.

pub mod decoder;
pub mod engine;
pub mod sidecar;
pub mod types;

#[cfg(feature = "whisper")]
pub mod whisper;

pub use engine::Transcriber;
pub use sidecar::SidecarTranscriber;
pub use types::{ResultExt, TranscriptionError, TranscriptionResult};
#[cfg(feature = "whisper")]
pub use whisper::WhisperTranscriber;

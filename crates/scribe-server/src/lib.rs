//! # scribe-server
//!
//! Axum HTTP server for audio transcription.
//!
//! - `POST /transcribe`: multipart upload → temporary file → [`Transcriber`] → JSON
//! - `GET /health`: liveness plus the active engine
//! - `GET /`: browser recorder page that posts to `/transcribe/`
//! - Graceful shutdown via `CancellationToken`
//!
//! [`Transcriber`]: scribe_transcription::Transcriber

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod health;
pub mod server;
pub mod shutdown;
pub mod transcribe;
pub mod upload;

pub use config::ServerConfig;
pub use server::{AppState, ScribeServer};

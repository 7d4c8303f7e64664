//! # scribe-core
//!
//! Foundation utilities shared by the scribe crates:
//!
//! - **Logging**: [`logging::init_subscriber`] installs the global `tracing` subscriber
//! - **Text**: whitespace normalization and char-safe preview truncation

#![deny(unsafe_code)]

pub mod logging;
pub mod text;

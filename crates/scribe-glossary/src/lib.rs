//! # scribe-glossary
//!
//! Extracts a section → term → definition mapping from a Wikipedia glossary
//! page.
//!
//! - [`GlossaryClient`]: fetch the page with a descriptive `User-Agent`
//! - [`parse_glossary`]: walk `#mw-content-text` in document order
//! - [`Glossary`]: ordered mapping with search and section stripping
//! - [`render_preview`]: console preview
//! - [`save_glossary`] / [`load_glossary`]: pretty-printed UTF-8 JSON

#![deny(unsafe_code)]

pub mod errors;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod preview;
pub mod store;

pub use errors::GlossaryError;
pub use fetch::GlossaryClient;
pub use model::{Glossary, SearchHit, GENERAL_SECTION, NON_CONTENT_SECTIONS};
pub use parse::parse_glossary;
pub use preview::{render_preview, render_search_results};
pub use store::{load_glossary, save_glossary};

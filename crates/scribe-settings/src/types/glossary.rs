//! Glossary scraper settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Glossary fetch and output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlossarySettings {
    /// Page to scrape.
    pub url: String,
    /// `User-Agent` header sent with the fetch.
    pub user_agent: String,
    /// HTTP timeout in milliseconds.
    pub timeout_ms: u64,
    /// Where the JSON mapping is written.
    pub output_path: PathBuf,
    /// Terms shown per section in the console preview.
    pub preview_terms: usize,
}

impl Default for GlossarySettings {
    fn default() -> Self {
        Self {
            url: "https://en.wikipedia.org/wiki/Glossary_of_computer_science".to_string(),
            user_agent: concat!(
                "scribe-glossary/",
                env!("CARGO_PKG_VERSION"),
                " (wikipedia glossary export tool)"
            )
            .to_string(),
            timeout_ms: 30_000,
            output_path: PathBuf::from("cs_glossary.json"),
            preview_terms: 5,
        }
    }
}

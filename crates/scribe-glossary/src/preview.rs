//! Console rendering of a glossary and of search results.

use std::fmt::Write as _;

use scribe_core::text::preview;

use crate::model::{Glossary, SearchHit};

const BANNER_WIDTH: usize = 50;
const DEFINITION_PREVIEW_CHARS: usize = 200;
const SEARCH_PREVIEW_CHARS: usize = 150;

fn banner(out: &mut String, title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    let _ = write!(out, "\n{rule}\n{title}\n{rule}\n");
}

/// Per-section preview: the first `max_terms_per_section` terms with
/// definitions cut to 200 characters, then a `... and K more terms` line.
pub fn render_preview(glossary: &Glossary, max_terms_per_section: usize) -> String {
    let mut out = String::new();
    for (section, terms) in glossary.sections() {
        banner(&mut out, &format!("SECTION: {section}"));
        for (term, definition) in terms.iter().take(max_terms_per_section) {
            let _ = write!(
                out,
                "\n{term}:\n  {}\n",
                preview(definition, DEFINITION_PREVIEW_CHARS, "...")
            );
        }
        if terms.len() > max_terms_per_section {
            let _ = writeln!(
                out,
                "... and {} more terms",
                terms.len() - max_terms_per_section
            );
        }
    }
    out
}

/// Search report: match count and the first `limit` hits.
pub fn render_search_results(query: &str, hits: &[SearchHit], limit: usize) -> String {
    let mut out = String::new();
    banner(&mut out, "SEARCH RESULTS");
    if hits.is_empty() {
        let _ = writeln!(out, "No terms found containing '{query}'.");
        return out;
    }
    let _ = writeln!(out, "Found {} terms containing '{query}':", hits.len());
    for hit in hits.iter().take(limit) {
        let _ = write!(
            out,
            "\n{} (in {}):\n  {}\n",
            hit.term,
            hit.section,
            preview(&hit.description, SEARCH_PREVIEW_CHARS, "...")
        );
    }
    out
}

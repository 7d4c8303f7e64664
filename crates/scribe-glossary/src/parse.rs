//! DOM walk over a MediaWiki glossary page.
//!
//! Elements of `#mw-content-text` are visited in document order:
//!
//! - `h2` starts a section (label from `span.mw-headline`, else the heading
//!   text without edit links); the table-of-contents heading is skipped
//! - `dl` pairs its `dt` groups with the `dd`s that follow them
//! - a `dt` outside any `dl` pairs with its next sibling element if that is a `dd`

use scraper::{ElementRef, Html, Selector};
use scribe_core::text::collapse_whitespace;
use tracing::debug;

use crate::errors::GlossaryError;
use crate::model::{GENERAL_SECTION, Glossary};

const CONTENT_SELECTOR: &str = "div#mw-content-text";
const HEADLINE_SELECTOR: &str = "span.mw-headline";
const EDIT_SECTION_CLASS: &str = "mw-editsection";
const TOC_ID: &str = "toc";
const TOC_HEADING_ID: &str = "mw-toc-heading";

/// Parse a glossary page.
///
/// Non-content sections are not removed here; see
/// [`Glossary::strip_non_content`].
pub fn parse_glossary(html: &str) -> Result<Glossary, GlossaryError> {
    let document = Html::parse_document(html);
    let content_sel = selector(CONTENT_SELECTOR)?;
    let headline_sel = selector(HEADLINE_SELECTOR)?;

    let content = document
        .select(&content_sel)
        .next()
        .ok_or_else(|| GlossaryError::Parse("content container #mw-content-text not found".into()))?;

    let mut glossary = Glossary::new();
    let mut section: Option<String> = None;

    for element in content.descendants().filter_map(ElementRef::wrap) {
        match element.value().name() {
            "h2" => {
                if in_table_of_contents(element) {
                    continue;
                }
                let label = heading_label(element, &headline_sel);
                if label.is_empty() {
                    continue;
                }
                let _ = glossary.ensure_section(&label);
                section = Some(label);
            }
            "dl" => {
                let target = section.as_deref().unwrap_or(GENERAL_SECTION);
                for (term, definition) in definition_list_pairs(element) {
                    glossary.insert(target, term, definition);
                }
            }
            "dt" if !has_dl_parent(element) => {
                let target = section.as_deref().unwrap_or(GENERAL_SECTION);
                if let Some((term, definition)) = bare_pair(element) {
                    glossary.insert(target, term, definition);
                }
            }
            _ => {}
        }
    }

    debug!(
        sections = glossary.len(),
        terms = glossary.term_count(),
        "parsed glossary"
    );
    Ok(glossary)
}

fn selector(css: &str) -> Result<Selector, GlossaryError> {
    Selector::parse(css).map_err(|e| GlossaryError::Parse(format!("selector {css}: {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn heading_label(h2: ElementRef<'_>, headline_sel: &Selector) -> String {
    if let Some(span) = h2.select(headline_sel).next() {
        return element_text(span);
    }
    let text: String = h2
        .descendants()
        .filter(|node| {
            !node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|e| e.value().classes().any(|c| c == EDIT_SECTION_CLASS))
        })
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    collapse_whitespace(&text)
}

/// Legacy skins render the TOC as `<div id="toc" class="toc">` holding its
/// own `h2`.
fn in_table_of_contents(h2: ElementRef<'_>) -> bool {
    if h2.value().id() == Some(TOC_HEADING_ID) {
        return true;
    }
    h2.ancestors().filter_map(ElementRef::wrap).any(|e| {
        e.value().id() == Some(TOC_ID) || e.value().classes().any(|c| c == TOC_ID)
    })
}

fn has_dl_parent(element: ElementRef<'_>) -> bool {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|p| p.value().name() == "dl")
}

/// Pair the direct `dt`/`dd` children of a `dl`.
///
/// Consecutive `dt`s share the definition formed by the `dd`s that follow
/// them, joined by a space. A group without any `dd` is dropped.
fn definition_list_pairs(dl: ElementRef<'_>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut terms: Vec<String> = Vec::new();
    let mut definitions: Vec<String> = Vec::new();

    let mut flush = |terms: &mut Vec<String>, definitions: &mut Vec<String>| {
        if !terms.is_empty() && !definitions.is_empty() {
            let definition = definitions.join(" ");
            pairs.extend(terms.drain(..).map(|t| (t, definition.clone())));
        }
        terms.clear();
        definitions.clear();
    };

    for child in dl.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "dt" => {
                if !definitions.is_empty() {
                    flush(&mut terms, &mut definitions);
                }
                let term = element_text(child);
                if !term.is_empty() {
                    terms.push(term);
                }
            }
            "dd" => {
                let text = element_text(child);
                if !text.is_empty() {
                    definitions.push(text);
                }
            }
            _ => {}
        }
    }
    flush(&mut terms, &mut definitions);
    pairs
}

fn bare_pair(dt: ElementRef<'_>) -> Option<(String, String)> {
    let next = dt.next_siblings().find_map(ElementRef::wrap)?;
    if next.value().name() != "dd" {
        return None;
    }
    let term = element_text(dt);
    let definition = element_text(next);
    (!term.is_empty() && !definition.is_empty()).then_some((term, definition))
}

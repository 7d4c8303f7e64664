//! Ordered glossary mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Section used for terms that appear before the first heading.
pub const GENERAL_SECTION: &str = "General";

/// Section labels dropped by [`Glossary::strip_non_content`] (compared case-insensitively).
pub const NON_CONTENT_SECTIONS: &[&str] = &[
    "see also",
    "references",
    "external links",
    "notes",
    "bibliography",
];

/// Terms of one section, in document order.
pub type Terms = IndexMap<String, String>;

/// Section label → (term → definition), both levels in document order.
///
/// Serializes as a plain nested JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Glossary {
    sections: IndexMap<String, Terms>,
}

/// A search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Matching term.
    pub term: String,
    /// Section the term belongs to.
    pub section: String,
    /// Full definition.
    pub description: String,
}

impl Glossary {
    /// Create an empty glossary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section (keeps its position if it already exists).
    pub fn ensure_section(&mut self, section: &str) -> &mut Terms {
        self.sections.entry(section.to_string()).or_default()
    }

    /// Insert a definition. A repeated term keeps its position and takes the new definition.
    pub fn insert(&mut self, section: &str, term: impl Into<String>, definition: impl Into<String>) {
        let _ = self
            .ensure_section(section)
            .insert(term.into(), definition.into());
    }

    /// Terms of one section.
    pub fn section(&self, name: &str) -> Option<&Terms> {
        self.sections.get(name)
    }

    /// Sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Terms)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of terms across all sections.
    pub fn term_count(&self) -> usize {
        self.sections.values().map(IndexMap::len).sum()
    }

    /// Remove reference/navigation sections. Returns the labels removed.
    pub fn strip_non_content(&mut self) -> Vec<String> {
        let mut removed = Vec::new();
        self.sections.retain(|label, _| {
            let keep = !is_non_content(label);
            if !keep {
                removed.push(label.clone());
            }
            keep
        });
        removed
    }

    /// Case-insensitive substring search over terms and definitions, in document order.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.to_lowercase();
        self.sections
            .iter()
            .flat_map(|(section, terms)| {
                terms.iter().map(move |(term, description)| (section, term, description))
            })
            .filter(|(_, term, description)| {
                term.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
            })
            .map(|(section, term, description)| SearchHit {
                term: term.clone(),
                section: section.clone(),
                description: description.clone(),
            })
            .collect()
    }
}

fn is_non_content(label: &str) -> bool {
    let lower = label.to_lowercase();
    NON_CONTENT_SECTIONS.contains(&lower.as_str())
}

//! JSON persistence.

use std::path::Path;

use tracing::info;

use crate::errors::GlossaryError;
use crate::model::Glossary;

/// Write the glossary as pretty-printed UTF-8 JSON (non-ASCII kept verbatim).
pub fn save_glossary(glossary: &Glossary, path: &Path) -> Result<(), GlossaryError> {
    let json = serde_json::to_string_pretty(glossary)?;
    std::fs::write(path, json).map_err(|source| GlossaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "glossary saved");
    Ok(())
}

/// Read a glossary previously written by [`save_glossary`].
pub fn load_glossary(path: &Path) -> Result<Glossary, GlossaryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| GlossaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

//! JSON rendering for document outlines.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentOutline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 2-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON. Non-ASCII text is written as-is.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline to `path` as pretty-printed UTF-8 JSON.
pub fn write_json<P: AsRef<Path>>(outline: &DocumentOutline, path: P) -> Result<()> {
    let json = to_json(outline, JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

//! Outline types: heading candidates, heading records and the per-document result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block that survived filtering and may become a heading.
///
/// This is the `(text, font_size, is_bold, page)` tuple the leveler works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Combined block text
    pub text: String,
    /// Largest font size among the block's lines
    pub font_size: f32,
    /// Whether any line of the block is bold
    pub is_bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(text: impl Into<String>, font_size: f32, is_bold: bool, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold,
            page,
        }
    }
}

/// Heading level, most senior first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// All levels ordered from largest to smallest font.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Label used in the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }

    /// Numeric depth (1-3).
    pub fn depth(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leveled heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Heading {
    /// Create a new heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title and outline of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub title: String,
    pub outline: Vec<Heading>,
}

impl DocumentOutline {
    /// Create a new outline result.
    pub fn new(title: impl Into<String>, outline: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// The result reported for a document that could not be processed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of headings in the outline.
    pub fn heading_count(&self) -> usize {
        self.outline.len()
    }

    /// Check if neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }
}

//! Outline extraction pipeline.
//!
//! A document is processed in three passes over its page layouts:
//! title detection on the first page, heading candidate collection on every
//! page, and document-wide level assignment.

mod aggregate;
mod filter;
mod leveler;
mod title;

pub use aggregate::{aggregate_block, aggregate_line, page_candidates, BlockRecord, LineRecord};
pub use filter::is_likely_body_text;
pub use leveler::{determine_heading_levels, LevelMap};
pub use title::{detect_title, title_from_page};

use std::path::Path;

use crate::error::Result;
use crate::model::{Candidate, DocumentOutline};
use crate::parser::{LayoutSource, LopdfSource, OutlineOptions};

use leveler::normalize_key;

/// Extracts the title and heading outline of a document.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: OutlineOptions) -> Self {
        Self { options }
    }

    /// Get the extraction options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a PDF file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutline> {
        let source = LopdfSource::open(path)?.with_error_mode(self.options.error_mode);
        self.extract_source(&source)
    }

    /// Extract the outline of a PDF held in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<DocumentOutline> {
        let source = LopdfSource::from_bytes(data)?.with_error_mode(self.options.error_mode);
        self.extract_source(&source)
    }

    /// Extract the outline of a PDF file, logging failures and returning an
    /// empty outline instead.
    pub fn extract_file_or_empty<P: AsRef<Path>>(&self, path: P) -> DocumentOutline {
        let path = path.as_ref();
        match self.extract_file(path) {
            Ok(outline) => outline,
            Err(e) => {
                log::error!("Error processing {}: {}", path.display(), e);
                DocumentOutline::empty()
            }
        }
    }

    /// Extract the outline from any layout source.
    ///
    /// Title detection never fails; a page that cannot be read while
    /// collecting headings fails the whole extraction.
    pub fn extract_source<S: LayoutSource + ?Sized>(&self, source: &S) -> Result<DocumentOutline> {
        let title = detect_title(source, &self.options);

        let mut candidates: Vec<Candidate> = Vec::new();
        for index in 0..source.page_count() {
            let page = source.page(index)?;
            candidates.extend(page_candidates(&page, &self.options));
        }
        log::debug!(
            "Collected {} heading candidates from {} pages",
            candidates.len(),
            source.page_count()
        );

        let mut outline = determine_heading_levels(candidates);

        let title_key = normalize_key(&title);
        outline.retain(|heading| normalize_key(&heading.text) != title_key);

        Ok(DocumentOutline::new(title.trim(), outline))
    }
}

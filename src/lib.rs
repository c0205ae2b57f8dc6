//! # pdf-outline
//!
//! Title and H1/H2/H3 outline extraction from PDF documents.
//!
//! Headings are found with layout heuristics rather than bookmarks: blocks
//! that are larger or bolder than body text, and that do not look like
//! captions, URLs or page numbers, become candidates. The three largest
//! candidate font sizes in a document map to H1, H2 and H3.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_outline("document.pdf")?;
//!
//!     println!("Title: {}", outline.title);
//!     for heading in &outline.outline {
//!         println!("{} {} (page {})", heading.level, heading.text, heading.page);
//!     }
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Title detection**: largest centered lines of the first page
//! - **Heading levels**: document-wide font size ranking
//! - **Pluggable layouts**: any [`LayoutSource`] can feed the heuristics
//! - **Batch mode**: a folder of PDFs to a folder of JSON files, in parallel with Rayon

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{process_folder, process_folder_with, BatchReport, FileOutcome};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    BBox, Block, Candidate, DocumentOutline, Heading, HeadingLevel, Line, PageLayout, Span,
};
pub use outline::OutlineExtractor;
pub use parser::{ErrorMode, LayoutSource, LopdfSource, MemorySource, OutlineOptions};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the title and outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let outline = extract_outline("document.pdf").unwrap();
/// println!("Headings: {}", outline.heading_count());
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_file(path)
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{extract_outline_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_min_font_size(9.0).lenient();
/// let outline = extract_outline_with_options("document.pdf", options).unwrap();
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<DocumentOutline> {
    OutlineExtractor::with_options(options).extract_file(path)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<DocumentOutline> {
    OutlineExtractor::new().extract_bytes(data)
}

/// Extract the outline of a PDF file, or an empty outline if it cannot be
/// processed. The failure is logged.
pub fn extract_outline_or_empty<P: AsRef<Path>>(path: P) -> DocumentOutline {
    OutlineExtractor::new().extract_file_or_empty(path)
}

/// Extract a PDF file's outline straight to JSON.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let outline = extract_outline(path)?;
    render::to_json(&outline, format)
}

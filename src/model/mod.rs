//! Data model shared by the layout provider and the outline pipeline.
//!
//! Layout types describe what a PDF page looks like (blocks of lines of
//! styled spans); outline types describe what the pipeline produces.

mod layout;
mod outline;

pub use layout::{BBox, Block, Line, PageLayout, Span, FLAG_BOLD, FLAG_ITALIC};
pub use outline::{Candidate, DocumentOutline, Heading, HeadingLevel};

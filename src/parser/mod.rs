//! PDF layout extraction module.

mod backend;
mod layout;
mod options;

pub use backend::{LayoutSource, LopdfSource, MemorySource};
pub use layout::{flags_from_font_name, group_lines_into_blocks, group_spans_into_lines, LayoutAnalyzer};
pub use options::{ErrorMode, OutlineOptions, DEFAULT_MIN_FONT_SIZE, DEFAULT_MIN_TEXT_LENGTH};

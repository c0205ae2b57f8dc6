//! Span aggregation: spans → line records → block records → candidates.

use crate::model::{Block, Candidate, Line, PageLayout};
use crate::parser::OutlineOptions;

use super::filter::is_likely_body_text;

/// Blocks at or below this size only qualify when bold.
const HEADING_SIZE_FLOOR: f32 = 12.0;

/// Text of one line with its largest font size and combined bold flag.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub text: String,
    pub font_size: f32,
    pub is_bold: bool,
}

/// Text of one block with its largest font size and combined bold flag.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub text: String,
    pub font_size: f32,
    pub is_bold: bool,
}

/// Merge the non-empty spans of a line. Returns `None` when the line has no text.
pub fn aggregate_line(line: &Line) -> Option<LineRecord> {
    let mut parts: Vec<&str> = Vec::new();
    let mut font_size: f32 = 0.0;
    let mut is_bold = false;

    for span in &line.spans {
        let text = span.text.trim();
        if text.is_empty() {
            continue;
        }
        parts.push(text);
        font_size = font_size.max(span.font_size);
        is_bold |= span.is_bold();
    }

    if parts.is_empty() {
        return None;
    }

    Some(LineRecord {
        text: parts.join(" "),
        font_size,
        is_bold,
    })
}

/// Merge the qualifying lines of a block. Lines smaller than `min_font_size`
/// are left out; returns `None` when no line qualifies.
pub fn aggregate_block(block: &Block, min_font_size: f32) -> Option<BlockRecord> {
    let lines: Vec<LineRecord> = block
        .lines
        .iter()
        .filter_map(aggregate_line)
        .filter(|l| l.font_size >= min_font_size)
        .collect();

    if lines.is_empty() {
        return None;
    }

    let text = lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    let font_size = lines.iter().map(|l| l.font_size).fold(0.0, f32::max);
    let is_bold = lines.iter().any(|l| l.is_bold);

    Some(BlockRecord {
        text,
        font_size,
        is_bold,
    })
}

/// Heading candidates of a page, in block order.
pub fn page_candidates(page: &PageLayout, options: &OutlineOptions) -> Vec<Candidate> {
    page.blocks
        .iter()
        .filter_map(|block| aggregate_block(block, options.min_font_size))
        .filter(|record| {
            record.text.chars().count() >= options.min_text_length
                && !is_likely_body_text(&record.text)
                && (record.font_size > HEADING_SIZE_FLOOR || record.is_bold)
        })
        .map(|record| Candidate::new(record.text, record.font_size, record.is_bold, page.number))
        .collect()
}

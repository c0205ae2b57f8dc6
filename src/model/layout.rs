//! Page layout types: pages hold blocks, blocks hold lines, lines hold spans.

use serde::{Deserialize, Serialize};

/// Style flag bit marking an italic span.
pub const FLAG_ITALIC: u32 = 1 << 1;

/// Style flag bit marking a bold span.
pub const FLAG_BOLD: u32 = 1 << 4;

/// Axis-aligned bounding box in top-down page coordinates (points).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// Smallest text-with-style unit produced by a layout source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Style bitmask (see [`FLAG_BOLD`], [`FLAG_ITALIC`])
    pub flags: u32,
    /// Base font name, if known
    pub font_name: String,
    /// Position on the page
    pub bbox: BBox,
}

impl Span {
    /// Create a new span with no style flags.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            font_size,
            flags: 0,
            font_name: String::new(),
            bbox,
        }
    }

    /// Set the style flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Set the font name.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Mark the span as bold.
    pub fn bold(self) -> Self {
        let flags = self.flags | FLAG_BOLD;
        self.with_flags(flags)
    }

    /// Whether the bold bit is set.
    pub fn is_bold(&self) -> bool {
        self.flags & FLAG_BOLD != 0
    }

    /// Whether the italic bit is set.
    pub fn is_italic(&self) -> bool {
        self.flags & FLAG_ITALIC != 0
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Leftmost X coordinate.
    pub fn left(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.bbox.x0)
            .fold(f32::INFINITY, f32::min)
    }

    /// Largest span font size in the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans.iter().map(|s| s.font_size).fold(0.0, f32::max)
    }
}

/// A layout block: a group of consecutive lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub lines: Vec<Line>,
}

impl Block {
    /// Create a block from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }
}

/// Layout of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Blocks in reading order
    pub blocks: Vec<Block>,
}

impl PageLayout {
    /// Create an empty page layout.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create an empty Letter-sized page (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder-style variant of [`add_block`](Self::add_block).
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Iterate over every line on the page.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Check if the page has no text.
    pub fn is_empty(&self) -> bool {
        self.lines().all(|l| l.spans.iter().all(|s| s.text.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_flags() {
        let span = Span::new("Heading", 14.0, BBox::default());
        assert!(!span.is_bold());

        let span = span.bold();
        assert!(span.is_bold());
        assert!(!span.is_italic());
        assert_eq!(span.flags, 16);
    }

    #[test]
    fn test_bbox_center() {
        let bbox = BBox::new(100.0, 0.0, 300.0, 20.0);
        assert_eq!(bbox.center_x(), 200.0);
        assert_eq!(bbox.width(), 200.0);
    }

    #[test]
    fn test_page_is_empty() {
        let page = PageLayout::letter(1);
        assert!(page.is_empty());

        let page = page.with_block(Block::new(vec![Line::new(vec![Span::new(
            "text",
            12.0,
            BBox::default(),
        )])]));
        assert!(!page.is_empty());
        assert_eq!(page.lines().count(), 1);
    }
}

//! Title detection from the first page.

use crate::error::Result;
use crate::model::PageLayout;
use crate::parser::{LayoutSource, OutlineOptions};

/// A span is centered when its center lies within this fraction of the page
/// width from the page center.
const CENTER_TOLERANCE: f32 = 0.25;

/// Number of largest lines joined into the title.
const TITLE_LINES: usize = 2;

/// Detect the document title, returning an empty string on any failure.
pub fn detect_title<S: LayoutSource + ?Sized>(source: &S, options: &OutlineOptions) -> String {
    match try_detect_title(source, options) {
        Ok(title) => title,
        Err(e) => {
            log::warn!("Title detection failed: {}", e);
            String::new()
        }
    }
}

fn try_detect_title<S: LayoutSource + ?Sized>(source: &S, options: &OutlineOptions) -> Result<String> {
    if source.page_count() == 0 {
        return Ok(String::new());
    }
    let first_page = source.page(0)?;
    Ok(title_from_page(&first_page, options))
}

/// Compose a title from the largest centered lines of a page.
pub fn title_from_page(page: &PageLayout, options: &OutlineOptions) -> String {
    let page_center = page.width / 2.0;
    let mut title_lines: Vec<(f32, String)> = Vec::new();

    for line in page.lines() {
        let mut line_text = String::new();
        let mut line_centered = false;
        let mut max_font_size: f32 = 0.0;

        for span in &line.spans {
            let centered =
                (span.bbox.center_x() - page_center).abs() < page.width * CENTER_TOLERANCE;

            if centered && span.font_size >= options.min_font_size {
                line_centered = true;
                max_font_size = max_font_size.max(span.font_size);
                line_text.push_str(span.text.trim());
                line_text.push(' ');
            }
        }

        let line_text = line_text.trim();
        if line_centered && line_text.chars().count() >= options.min_text_length {
            title_lines.push((max_font_size, line_text.to_string()));
        }
    }

    // Stable: equal sizes keep page order
    title_lines.sort_by(|a, b| b.0.total_cmp(&a.0));

    title_lines
        .into_iter()
        .take(TITLE_LINES)
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, Block, Line, Span};
    use crate::parser::MemorySource;

    /// A single-span line centered on a Letter page.
    fn centered_line(text: &str, size: f32, top: f32) -> Line {
        let width = text.chars().count() as f32 * size * 0.5;
        let x0 = 306.0 - width / 2.0;
        Line::new(vec![Span::new(
            text,
            size,
            BBox::new(x0, top, x0 + width, top + size),
        )])
    }

    fn left_line(text: &str, size: f32, top: f32) -> Line {
        Line::new(vec![Span::new(
            text,
            size,
            BBox::new(20.0, top, 80.0, top + size),
        )])
    }

    #[test]
    fn test_single_centered_title() {
        let page = PageLayout::letter(1)
            .with_block(Block::new(vec![centered_line("Annual Report 2024", 24.0, 72.0)]));

        assert_eq!(
            title_from_page(&page, &OutlineOptions::default()),
            "Annual Report 2024"
        );
    }

    #[test]
    fn test_two_largest_lines_joined() {
        let page = PageLayout::letter(1)
            .with_block(Block::new(vec![
                centered_line("Understanding", 28.0, 72.0),
                centered_line("Distributed Systems", 22.0, 110.0),
            ]))
            .with_block(Block::new(vec![centered_line("Jane Author", 14.0, 160.0)]));

        assert_eq!(
            title_from_page(&page, &OutlineOptions::default()),
            "Understanding Distributed Systems"
        );
    }

    #[test]
    fn test_larger_line_first_regardless_of_position() {
        let page = PageLayout::letter(1).with_block(Block::new(vec![
            centered_line("Subtitle Here", 16.0, 72.0),
            centered_line("Main Title", 26.0, 110.0),
        ]));

        assert_eq!(
            title_from_page(&page, &OutlineOptions::default()),
            "Main Title Subtitle Here"
        );
    }

    #[test]
    fn test_off_center_and_small_lines_ignored() {
        let page = PageLayout::letter(1)
            .with_block(Block::new(vec![left_line("Left aligned header", 30.0, 20.0)]))
            .with_block(Block::new(vec![centered_line("small print", 8.0, 700.0)]))
            .with_block(Block::new(vec![centered_line("ab", 20.0, 300.0)]));

        assert_eq!(title_from_page(&page, &OutlineOptions::default()), "");
    }

    #[test]
    fn test_only_centered_spans_contribute() {
        let line = Line::new(vec![
            Span::new("Page 1", 12.0, BBox::new(20.0, 40.0, 60.0, 52.0)),
            Span::new("Project Plan", 20.0, BBox::new(246.0, 40.0, 366.0, 60.0)),
        ]);
        let page = PageLayout::letter(1).with_block(Block::new(vec![line]));

        assert_eq!(
            title_from_page(&page, &OutlineOptions::default()),
            "Project Plan"
        );
    }

    #[test]
    fn test_detect_title_no_pages() {
        let source = MemorySource::default();
        assert_eq!(detect_title(&source, &OutlineOptions::default()), "");
    }

    struct BrokenSource;

    impl LayoutSource for BrokenSource {
        fn page_count(&self) -> usize {
            1
        }

        fn page(&self, _index: usize) -> Result<PageLayout> {
            Err(Error::PdfParse("broken content stream".to_string()))
        }
    }

    #[test]
    fn test_detect_title_fails_soft() {
        assert_eq!(detect_title(&BrokenSource, &OutlineOptions::default()), "");
    }
}

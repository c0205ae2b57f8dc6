//! Layout analysis for PDF pages.
//!
//! Walks a page's content stream to recover positioned, styled spans, then
//! groups spans into lines and lines into blocks.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BBox, Block, Line, Span, FLAG_BOLD, FLAG_ITALIC};

/// Approximate glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// TJ adjustment (thousandths of text space) treated as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Extracts spans and block structure from the pages of a lopdf document.
pub struct LayoutAnalyzer<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create a new layout analyzer.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract the blocks of a page.
    pub fn page_blocks(&self, page_id: ObjectId, page_height: f32) -> Result<Vec<Block>> {
        let spans = self.extract_page_spans(page_id, page_height)?;
        log::debug!("Page {:?}: {} spans", page_id, spans.len());
        let lines = group_spans_into_lines(spans);
        Ok(group_lines_into_blocks(lines))
    }

    /// Extract text spans from a page with position and font information.
    pub fn extract_page_spans(&self, page_id: ObjectId, page_height: f32) -> Result<Vec<Span>> {
        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.get_page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        self.parse_content_stream(&content, &lopdf_fonts, page_height)
    }

    /// Get the decompressed page content stream. Pages without content yield no bytes.
    fn get_page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                // Unfiltered streams report an error from decompressed_content()
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match s.decompressed_content() {
                        Ok(data) => content.extend_from_slice(&data),
                        Err(_) => content.extend_from_slice(&s.content),
                    }
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Walk content stream operations, emitting one span per text-showing operator.
    fn parse_content_stream(
        &self,
        content: &[u8],
        lopdf_fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        page_height: f32,
    ) -> Result<Vec<Span>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let font_widths: BTreeMap<&[u8], FontWidths> = lopdf_fonts
            .iter()
            .filter_map(|(key, font)| {
                FontWidths::from_font(self.doc, font).map(|w| (key.as_slice(), w))
            })
            .collect();

        let mut spans = Vec::new();
        let mut state = TextState::default();
        let mut ctm_stack: Vec<Matrix> = Vec::new();

        for op in content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => ctm_stack.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = ctm_stack.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    if let Some(m) = matrix_from_operands(operands) {
                        state.ctm = m.concat(&state.ctm);
                    }
                }
                "BT" => {
                    state.in_text = true;
                    state.tm = Matrix::IDENTITY;
                    state.lm = Matrix::IDENTITY;
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if operands.len() >= 2 {
                        if let Object::Name(name) = &operands[0] {
                            state.font_key = name.clone();
                            state.font_name = lopdf_fonts
                                .get(name)
                                .and_then(|f| base_font_name(f))
                                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
                        }
                        state.font_size = get_number(&operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        state.move_line(tx, ty);
                    }
                }
                "TD" => {
                    if operands.len() >= 2 {
                        let tx = get_number(&operands[0]).unwrap_or(0.0);
                        let ty = get_number(&operands[1]).unwrap_or(0.0);
                        state.leading = -ty;
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_from_operands(operands) {
                        state.tm = m;
                        state.lm = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        state.next_line();
                    }
                    if !state.in_text {
                        continue;
                    }
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    let Some(operand) = operands.get(text_idx) else {
                        continue;
                    };
                    let metrics = font_widths.get(state.font_key.as_slice());
                    let shown = self.decode_operand(operand, &state, lopdf_fonts, metrics);
                    let text: String = shown.text.nfc().collect();
                    let width = shown.glyph_width.unwrap_or_else(|| {
                        text.chars().count() as f32 * AVG_CHAR_WIDTH * state.font_size
                    });
                    if !text.trim().is_empty() {
                        spans.push(state.make_span(text, width, page_height));
                    }
                    state.advance(width + shown.displacement);
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Decode a Tj string or TJ array.
    fn decode_operand(
        &self,
        operand: &Object,
        state: &TextState,
        lopdf_fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        metrics: Option<&FontWidths>,
    ) -> ShownText {
        let encoding = lopdf_fonts
            .get(&state.font_key)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        let decode = |bytes: &[u8]| -> String {
            match encoding {
                Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                    .unwrap_or_else(|_| decode_text_simple(bytes)),
                None => decode_text_simple(bytes),
            }
        };

        let glyph_width = |bytes: &[u8]| -> Option<f32> {
            metrics.map(|m| m.text_width(bytes) / 1000.0 * state.font_size)
        };

        match operand {
            Object::String(bytes, _) => ShownText {
                text: decode(bytes),
                glyph_width: glyph_width(bytes),
                displacement: 0.0,
            },
            Object::Array(items) => {
                let mut combined = String::new();
                let mut width = metrics.map(|_| 0.0);
                let mut displacement = 0.0;
                for item in items {
                    match item {
                        Object::String(bytes, _) => {
                            combined.push_str(&decode(bytes));
                            if let (Some(total), Some(w)) = (width.as_mut(), glyph_width(bytes)) {
                                *total += w;
                            }
                        }
                        Object::Integer(_) | Object::Real(_) => {
                            let adjustment = -get_number(item).unwrap_or(0.0);
                            displacement += adjustment / 1000.0 * state.font_size;
                            if adjustment > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                                && !combined.ends_with('\u{00A0}')
                            {
                                if let Some(c) = combined.chars().last() {
                                    if !is_spaceless_script_char(c) {
                                        combined.push(' ');
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                ShownText {
                    text: combined,
                    glyph_width: width,
                    displacement,
                }
            }
            _ => ShownText {
                text: String::new(),
                glyph_width: None,
                displacement: 0.0,
            },
        }
    }
}

/// Text decoded from one text-showing operator.
struct ShownText {
    text: String,
    /// Summed glyph advances (text space), when the font carries widths
    glyph_width: Option<f32>,
    /// Extra horizontal displacement (text space) from TJ adjustments
    displacement: f32,
}

/// Glyph advances of a simple font, in thousandths of text space.
#[derive(Debug, Clone, PartialEq)]
struct FontWidths {
    first_char: u32,
    widths: Vec<f32>,
    missing_width: f32,
}

impl FontWidths {
    /// Read `/FirstChar`, `/Widths` and the descriptor's `/MissingWidth`.
    /// Composite (Type0) fonts and fonts without widths yield `None`.
    fn from_font(doc: &LopdfDocument, font: &Dictionary) -> Option<Self> {
        if font.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Type0".as_slice()) {
            return None;
        }

        let widths: Vec<f32> = resolve(doc, font.get(b"Widths").ok()?)?
            .as_array()
            .ok()?
            .iter()
            .map(|w| resolve(doc, w).and_then(get_number).unwrap_or(0.0))
            .collect();
        if widths.is_empty() {
            return None;
        }

        let first_char = font
            .get(b"FirstChar")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(get_number)
            .unwrap_or(0.0)
            .max(0.0) as u32;

        let missing_width = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve(doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|d| d.get(b"MissingWidth").ok())
            .and_then(get_number)
            .unwrap_or(AVG_CHAR_WIDTH * 1000.0);

        Some(Self {
            first_char,
            widths,
            missing_width,
        })
    }

    /// Total advance of single-byte codes, in thousandths of text space.
    fn text_width(&self, bytes: &[u8]) -> f32 {
        bytes
            .iter()
            .map(|&code| {
                (code as u32)
                    .checked_sub(self.first_char)
                    .and_then(|i| self.widths.get(i as usize))
                    .copied()
                    .unwrap_or(self.missing_width)
            })
            .sum()
    }
}

/// Follow an indirect reference one level.
fn resolve<'d>(doc: &'d LopdfDocument, obj: &'d Object) -> Option<&'d Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Style flags derived from a base font name.
pub fn flags_from_font_name(font_name: &str) -> u32 {
    let lower = font_name.to_lowercase();
    let mut flags = 0;
    if lower.contains("bold") || lower.contains("black") || lower.contains("heavy") {
        flags |= FLAG_BOLD;
    }
    if lower.contains("italic") || lower.contains("oblique") {
        flags |= FLAG_ITALIC;
    }
    flags
}

fn base_font_name(font: &Dictionary) -> Option<String> {
    font.get(b"BaseFont")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).to_string())
}

/// Baseline of a span in top-down coordinates.
fn baseline(span: &Span) -> f32 {
    span.bbox.y1 - span.font_size * 0.2
}

/// Group spans into lines by baseline, top to bottom and left to right.
pub fn group_spans_into_lines(mut spans: Vec<Span>) -> Vec<Line> {
    if spans.is_empty() {
        return vec![];
    }

    spans.sort_by(|a, b| {
        baseline(a)
            .total_cmp(&baseline(b))
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y = baseline(&span);
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(line_y) if (y - line_y).abs() <= y_tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(finish_line(std::mem::take(&mut current)));
                }
                current_y = Some(y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(finish_line(current));
    }

    lines
}

/// Sort a line's spans left to right and join pieces of one word that were
/// shown by consecutive operators in the same font.
fn finish_line(mut spans: Vec<Span>) -> Line {
    spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(prev) if continues_word(prev, &span) => {
                prev.text.push_str(&span.text);
                prev.bbox = BBox::new(
                    prev.bbox.x0,
                    prev.bbox.y0.min(span.bbox.y0),
                    prev.bbox.x1.max(span.bbox.x1),
                    prev.bbox.y1.max(span.bbox.y1),
                );
            }
            _ => merged.push(span),
        }
    }

    Line::new(merged)
}

/// Whether `next` starts where `prev` ends, closer than a word space.
fn continues_word(prev: &Span, next: &Span) -> bool {
    if prev.font_name != next.font_name
        || prev.flags != next.flags
        || (prev.font_size - next.font_size).abs() > 0.01
    {
        return false;
    }

    let chars = prev.text.chars().count();
    let char_width = if chars > 0 && prev.bbox.width() > 0.0 {
        prev.bbox.width() / chars as f32
    } else {
        prev.font_size * AVG_CHAR_WIDTH
    };

    let gap = next.bbox.x0 - prev.bbox.x1;
    gap > -char_width && gap < char_width * 0.2
}

/// Group lines into blocks based on spacing, font size and indentation.
pub fn group_lines_into_blocks(lines: Vec<Line>) -> Vec<Block> {
    if lines.is_empty() {
        return vec![];
    }

    let avg_spacing = calculate_avg_line_spacing(&lines);
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(Block::new(std::mem::take(&mut current)));
            }
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(Block::new(current));
    }

    blocks
}

fn line_baseline(line: &Line) -> f32 {
    line.spans.first().map(baseline).unwrap_or(0.0)
}

fn calculate_avg_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (line_baseline(&w[1]) - line_baseline(&w[0])).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }

    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &Line, curr: &Line, avg_spacing: f32) -> bool {
    let spacing = (line_baseline(curr) - line_baseline(prev)).abs();
    if spacing > avg_spacing * 1.5 {
        return true;
    }

    if (prev.max_font_size() - curr.max_font_size()).abs() > 1.0 {
        return true;
    }

    (prev.left() - curr.left()).abs() > 20.0
}

/// Text and graphics state tracked while walking a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    tm: Matrix,
    lm: Matrix,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            tm: Matrix::IDENTITY,
            lm: Matrix::IDENTITY,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            leading: 12.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.lm = Matrix::translation(tx, ty).concat(&self.lm);
        self.tm = self.lm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn advance(&mut self, tx: f32) {
        self.tm = Matrix::translation(tx, 0.0).concat(&self.tm);
    }

    /// Place a span whose advance is `text_width` in unscaled text space.
    fn make_span(&self, text: String, text_width: f32, page_height: f32) -> Span {
        let trm = self.tm.concat(&self.ctm);
        let size = self.font_size * trm.vertical_scale();
        let x = trm.e;
        let y = trm.f;
        let width = text_width * trm.horizontal_scale();

        let bbox = BBox::new(
            x,
            page_height - (y + size * 0.8),
            x + width,
            page_height - (y - size * 0.2),
        );

        Span::new(text, size, bbox)
            .with_flags(flags_from_font_name(&self.font_name))
            .with_font_name(self.font_name.clone())
    }
}

/// Affine transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self × other`: apply `self` first, then `other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

fn matrix_from_operands(operands: &[Object]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    Some(Matrix {
        a: get_number(&operands[0]).unwrap_or(1.0),
        b: get_number(&operands[1]).unwrap_or(0.0),
        c: get_number(&operands[2]).unwrap_or(0.0),
        d: get_number(&operands[3]).unwrap_or(1.0),
        e: get_number(&operands[4]).unwrap_or(0.0),
        f: get_number(&operands[5]).unwrap_or(0.0),
    })
}

/// Helper to extract a number from a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

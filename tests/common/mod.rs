//! Shared helpers for integration tests: small real PDFs built with lopdf.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// One line of text placed at an absolute position (PDF user space).
pub struct TextLine {
    pub text: &'static str,
    pub size: i64,
    pub x: i64,
    pub y: i64,
    pub bold: bool,
}

pub fn text(text: &'static str, size: i64, x: i64, y: i64) -> TextLine {
    TextLine {
        text,
        size,
        x,
        y,
        bold: false,
    }
}

pub fn bold(text: &'static str, size: i64, x: i64, y: i64) -> TextLine {
    TextLine {
        bold: true,
        ..self::text(text, size, x, y)
    }
}

/// Build a Letter-sized PDF with one content stream per page.
///
/// `F1` is Helvetica and `F2` Helvetica-Bold, both without width tables.
/// `F3` is Courier with a `/Widths` table of 600 for codes 32..=126.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Document {
    build_pdf_from_operations(pages.iter().map(|lines| text_operations(lines)).collect())
}

/// Build a Letter-sized PDF from raw content-stream operations per page.
pub fn build_pdf_from_operations(pages: Vec<Vec<Operation>>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let mono_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "FirstChar" => 32,
        "LastChar" => 126,
        "Widths" => vec![Object::Integer(600); 95],
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
            "F3" => mono_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let page_id = add_page(&mut doc, pages_id, resources_id, operations);
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// One `BT .. ET` object per line.
fn text_operations(lines: &[TextLine]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for line in lines {
        let font = if line.bold { "F2" } else { "F1" };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
        operations.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    operations: Vec<Operation>,
) -> ObjectId {
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content encodes"),
    ));

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    })
}

/// Save a document to `path`.
pub fn save_pdf(doc: &mut Document, path: &Path) {
    doc.save(path).expect("pdf saves");
}

/// Serialize a document to bytes.
pub fn pdf_bytes(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("pdf serializes");
    buf
}

/// A two-page report: a centered title, two H2-sized sections and one
/// H3-sized subsection, with body text in between.
///
/// Estimated span width is `0.5 × size × chars`, so the title
/// (24pt, 18 chars = 216pt wide) starting at x=198 is centered on the page.
pub fn sample_report() -> Document {
    build_pdf(&[
        vec![
            text("Annual Report 2024", 24, 198, 700),
            text("Introduction Overview", 18, 50, 620),
            text("This page holds plain body text only.", 11, 40, 590),
        ],
        vec![
            text("Background Details", 18, 50, 700),
            text("Related Work Survey", 14, 50, 640),
            text("More ordinary paragraph content here.", 11, 40, 610),
        ],
    ])
}

//! Layout source abstraction.
//!
//! Provides a trait-based interface for per-page layout access, isolating
//! the concrete PDF library (lopdf) from the outline heuristics.

use std::io::Read;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::PageLayout;

use super::layout::{get_number, LayoutAnalyzer};
use super::options::ErrorMode;

/// Default page size (US Letter) used when a page has no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Abstract interface for reading page layouts from a document.
///
/// The underlying document handle is released when the source is dropped.
pub trait LayoutSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Layout of the page at `index` (0-based).
    fn page(&self, index: usize) -> Result<PageLayout>;
}

impl<T: LayoutSource + ?Sized> LayoutSource for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, index: usize) -> Result<PageLayout> {
        (**self).page(index)
    }
}

impl<T: LayoutSource + ?Sized> LayoutSource for Box<T> {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page(&self, index: usize) -> Result<PageLayout> {
        (**self).page(index)
    }
}

/// A layout source over pages that are already in memory.
///
/// Useful when layouts come from another PDF library or are built by hand.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageLayout>,
}

impl MemorySource {
    /// Create a source from page layouts in document order.
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }
}

impl LayoutSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<PageLayout> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index + 1, self.pages.len()))
    }
}

/// Concrete [`LayoutSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
    error_mode: ErrorMode,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(map_load_error)?;
        Ok(Self::from_document(doc))
    }

    /// Load from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(map_load_error)?;
        Ok(Self::from_document(doc))
    }

    /// Load from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self {
            doc,
            page_ids,
            error_mode: ErrorMode::default(),
        }
    }

    /// Set how unreadable pages are handled.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Page width and height from the MediaBox, following `Parent` links.
    fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        let mut current = Some(page_id);
        let mut depth = 0;

        while let Some(id) = current {
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };

            if let Ok(media_box) = dict.get(b"MediaBox") {
                if let Some(size) = self.media_box_size(media_box) {
                    return size;
                }
            }

            depth += 1;
            if depth > 32 {
                break;
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        DEFAULT_PAGE_SIZE
    }

    fn media_box_size(&self, obj: &Object) -> Option<(f32, f32)> {
        let obj = match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok()?,
            other => other,
        };
        let array = obj.as_array().ok()?;
        if array.len() < 4 {
            return None;
        }
        let x0 = get_number(&array[0])?;
        let y0 = get_number(&array[1])?;
        let x1 = get_number(&array[2])?;
        let y1 = get_number(&array[3])?;
        Some(((x1 - x0).abs(), (y1 - y0).abs()))
    }
}

impl LayoutSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<PageLayout> {
        let page_id = *self
            .page_ids
            .get(index)
            .ok_or(Error::PageOutOfRange(index + 1, self.page_ids.len()))?;

        let (width, height) = self.page_size(page_id);
        let mut layout = PageLayout::new(index as u32 + 1, width, height);

        match LayoutAnalyzer::new(&self.doc).page_blocks(page_id, height) {
            Ok(blocks) => layout.blocks = blocks,
            Err(e) => {
                if self.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                // In lenient mode, the page is treated as having no text
                log::warn!("Failed to read layout of page {}: {}", index + 1, e);
            }
        }

        Ok(layout)
    }
}

fn map_load_error(e: lopdf::Error) -> Error {
    match e {
        lopdf::Error::Decryption(_) => Error::Encrypted,
        _ => Error::from(e),
    }
}

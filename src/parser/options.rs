//! Extraction options and configuration.

/// Default minimum font size for a line to count toward headings or the title.
pub const DEFAULT_MIN_FONT_SIZE: f32 = 10.0;

/// Default minimum text length (in characters) for a heading or title line.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 3;

/// Options for extracting outlines.
#[derive(Debug, Clone)]
pub struct OutlineOptions {
    /// Lines smaller than this are ignored
    pub min_font_size: f32,

    /// Blocks and title lines shorter than this are ignored
    pub min_text_length: usize,

    /// Error handling mode while reading pages
    pub error_mode: ErrorMode,

    /// Whether batches may process documents in parallel
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum font size.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the minimum text length.
    pub fn with_min_text_length(mut self, len: usize) -> Self {
        self.min_text_length = len;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            error_mode: ErrorMode::Strict,
            parallel: true,
        }
    }
}

/// Error handling mode while reading pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Any unreadable page fails the whole document
    #[default]
    Strict,
    /// Unreadable pages are treated as empty
    Lenient,
}

//! Body-text filter.
//!
//! Decides whether an aggregated block of text is noise or body content
//! rather than a heading. The rules are conservative: real headings are
//! sometimes rejected, which is accepted.

/// Substrings (matched against lowercased text) that mark non-heading content.
const NOISE_PATTERNS: [&str; 8] = [
    "www.",
    "http",
    ".com",
    "appendix",
    "copyright",
    "©",
    "table",
    "figure",
];

/// Texts longer than this are paragraphs unless fully uppercase.
const MAX_HEADING_LEN: usize = 400;

/// Fully uppercase texts shorter than this are treated as noise.
const MIN_UPPERCASE_LEN: usize = 15;

/// Return `true` when `text` looks like body text and should be excluded.
pub fn is_likely_body_text(text: &str) -> bool {
    let len = text.chars().count();

    if len > MAX_HEADING_LEN && !is_upper(text) {
        return true;
    }

    // Short numbers are a subset of the digit check; both are kept so the
    // rules can diverge independently.
    if is_digits(text) || (len <= 3 && is_digits(text)) {
        return true;
    }

    let lower = text.to_lowercase();
    if NOISE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    if text.trim().chars().count() <= 1 {
        return true;
    }

    // URLs and emails. "http" overlaps with NOISE_PATTERNS.
    if text.contains('@') || lower.contains("http") {
        return true;
    }

    if is_upper(text) && len < MIN_UPPERCASE_LEN {
        return true;
    }

    count_char(text, '-') > 3 || count_char(text, ':') > 2
}

/// At least one cased character and no lowercase characters.
pub(crate) fn is_upper(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Non-empty and made only of numeric characters.
fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|&c| c == needle).count()
}

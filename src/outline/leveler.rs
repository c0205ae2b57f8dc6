//! Heading leveling.
//!
//! The distinct candidate font sizes of the whole document are ranked
//! largest first; the top three become H1, H2 and H3. Everything smaller
//! is dropped.

use std::collections::HashSet;

use crate::model::{Candidate, Heading, HeadingLevel};

/// Document-wide font size → heading level lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelMap {
    /// Font size for H1, H2 and H3, largest first.
    slots: [Option<f32>; 3],
}

impl LevelMap {
    /// Rank the distinct font sizes of `candidates`.
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let mut sizes: Vec<f32> = candidates.iter().map(|c| c.font_size).collect();
        sizes.sort_by(|a, b| b.total_cmp(a));
        sizes.dedup();

        let mut slots = [None; 3];
        for (slot, size) in slots.iter_mut().zip(sizes) {
            *slot = Some(size);
        }
        Self { slots }
    }

    /// Level assigned to `font_size`, if it ranks in the top three.
    pub fn level_for(&self, font_size: f32) -> Option<HeadingLevel> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(font_size))
            .map(|i| HeadingLevel::ALL[i])
    }

    /// Number of populated levels.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Check if no level is populated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Key used to detect duplicate headings.
pub(crate) fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Assign levels to candidates and return headings in document order.
///
/// Output is ordered by page, then by descending font size; candidates that
/// tie on both keep their input order. The first occurrence of each
/// (case-insensitive, trimmed) text wins.
pub fn determine_heading_levels(mut candidates: Vec<Candidate>) -> Vec<Heading> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let levels = LevelMap::from_candidates(&candidates);
    log::debug!("Heading sizes: {:?}", levels.slots);

    candidates.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then_with(|| b.font_size.total_cmp(&a.font_size))
    });

    let mut seen = HashSet::new();
    let mut headings = Vec::new();

    for candidate in candidates {
        let Some(level) = levels.level_for(candidate.font_size) else {
            continue;
        };

        let cleaned = candidate.text.trim();
        if !seen.insert(normalize_key(cleaned)) {
            continue;
        }

        headings.push(Heading::new(level, cleaned, candidate.page));
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(determine_heading_levels(Vec::new()).is_empty());
    }

    #[test]
    fn test_level_map_ranks_sizes() {
        let candidates = vec![
            Candidate::new("a", 14.0, false, 1),
            Candidate::new("b", 24.0, false, 1),
            Candidate::new("c", 18.0, false, 1),
            Candidate::new("d", 14.0, false, 2),
            Candidate::new("e", 13.0, false, 2),
        ];

        let map = LevelMap::from_candidates(&candidates);
        assert_eq!(map.len(), 3);
        assert_eq!(map.level_for(24.0), Some(HeadingLevel::H1));
        assert_eq!(map.level_for(18.0), Some(HeadingLevel::H2));
        assert_eq!(map.level_for(14.0), Some(HeadingLevel::H3));
        assert_eq!(map.level_for(13.0), None);
    }

    #[test]
    fn test_single_size_only_h1() {
        let candidates = vec![
            Candidate::new("First", 16.0, false, 1),
            Candidate::new("Second", 16.0, true, 2),
        ];

        let headings = determine_heading_levels(candidates);
        assert_eq!(
            headings,
            vec![
                Heading::new(HeadingLevel::H1, "First", 1),
                Heading::new(HeadingLevel::H1, "Second", 2),
            ]
        );
    }

    #[test]
    fn test_fourth_size_dropped() {
        let candidates = vec![
            Candidate::new("Huge", 30.0, false, 1),
            Candidate::new("Big", 20.0, false, 1),
            Candidate::new("Medium", 16.0, false, 1),
            Candidate::new("Small", 13.0, true, 1),
        ];

        let headings = determine_heading_levels(candidates);
        assert_eq!(headings.len(), 3);
        assert!(headings.iter().all(|h| h.text != "Small"));
    }

    #[test]
    fn test_order_page_then_size_desc() {
        let candidates = vec![
            Candidate::new("Sub on two", 14.0, false, 2),
            Candidate::new("Sub on one", 14.0, false, 1),
            Candidate::new("Chapter on two", 18.0, false, 2),
            Candidate::new("Chapter on one", 18.0, false, 1),
        ];

        let texts: Vec<String> = determine_heading_levels(candidates)
            .into_iter()
            .map(|h| h.text)
            .collect();
        assert_eq!(
            texts,
            vec!["Chapter on one", "Sub on one", "Chapter on two", "Sub on two"]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![
            Candidate::new("Section 1.1", 14.0, false, 2),
            Candidate::new("Section 1.2", 14.0, false, 2),
            Candidate::new("Section 1.3", 14.0, false, 2),
        ];

        let texts: Vec<String> = determine_heading_levels(candidates)
            .into_iter()
            .map(|h| h.text)
            .collect();
        assert_eq!(texts, vec!["Section 1.1", "Section 1.2", "Section 1.3"]);
    }

    #[test]
    fn test_dedup_case_insensitive_first_wins() {
        let candidates = vec![
            Candidate::new("Overview", 14.0, false, 1),
            Candidate::new("OVERVIEW ", 18.0, false, 3),
            Candidate::new("  overview", 18.0, false, 1),
        ];

        let headings = determine_heading_levels(candidates);
        // Page 1 at 18pt sorts before page 1 at 14pt.
        assert_eq!(headings, vec![Heading::new(HeadingLevel::H1, "overview", 1)]);
    }

    #[test]
    fn test_dropped_sizes_do_not_claim_text() {
        let candidates = vec![
            Candidate::new("A", 30.0, false, 1),
            Candidate::new("B", 25.0, false, 1),
            Candidate::new("C", 20.0, false, 1),
            Candidate::new("Shared Name", 12.0, true, 1),
            Candidate::new("Shared Name", 20.0, false, 2),
        ];

        let headings = determine_heading_levels(candidates);
        assert!(headings
            .iter()
            .any(|h| h.text == "Shared Name" && h.page == 2 && h.level == HeadingLevel::H3));
    }
}

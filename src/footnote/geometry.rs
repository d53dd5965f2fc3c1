//! Horizontal separator detection.

use serde::{Deserialize, Serialize};

use crate::model::{BBox, Page};

use super::FootnoteConfig;

/// A short horizontal rule that may divide body text from footnotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeparatorCandidate {
    /// Bounding box of the rule
    pub bbox: BBox,
    /// Whether the rule passed the separator filter
    pub is_separator: bool,
}

/// Scan a page's vector paths for footnote separator candidates.
///
/// A path qualifies when it is nearly flat, starts strictly below the
/// separator region and spans a band of the page width that excludes
/// full-width dividers and underline fragments. Candidates are returned
/// bottom-most first; an empty result is not an error.
pub fn find_separator_candidates(page: &Page, config: &FootnoteConfig) -> Vec<SeparatorCandidate> {
    if page.width <= 0.0 {
        return Vec::new();
    }

    let region_top = page.height * config.separator_region_ratio;
    let mut candidates: Vec<SeparatorCandidate> = page
        .paths
        .iter()
        .map(|path| path.bbox)
        .filter(|bbox| bbox.height().abs() <= config.separator_max_height)
        .filter(|bbox| bbox.y0 > region_top)
        .filter(|bbox| {
            let ratio = bbox.width() / page.width;
            (config.separator_min_width_ratio..=config.separator_max_width_ratio).contains(&ratio)
        })
        .map(|bbox| SeparatorCandidate {
            bbox,
            is_separator: true,
        })
        .collect();

    candidates.sort_by(|a, b| b.bbox.y0.total_cmp(&a.bbox.y0));

    log::debug!(
        "Page {}: found {} horizontal separator candidates",
        page.number,
        candidates.len()
    );
    candidates
}

//! Footnote section location.
//!
//! The located section is a diagnostic signal only; marker pairing works
//! from span fonts and positions and does not depend on it.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{BBox, Page};

use super::geometry::SeparatorCandidate;
use super::FootnoteConfig;

/// A separator whose text below looks like footnote definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteSection {
    /// Bounding box of the separator rule
    pub separator_line: BBox,
    /// Y coordinate where the footnote section starts
    pub section_start: f32,
    /// Text found in the window below the rule
    pub text_below: String,
}

fn footnote_format() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\s+[A-Z]").expect("valid footnote pattern"))
}

/// Check whether text starts like a footnote definition.
///
/// The expected form is a number, whitespace, then an upper-case letter,
/// e.g. `"12 See the appendix."`.
pub fn is_footnote_format(text: &str) -> bool {
    footnote_format().is_match(text.trim())
}

/// Pick the first candidate whose text window validates as footnotes.
///
/// `candidates` are tried in the order given (bottom-most first as
/// produced by the geometry scanner).
pub fn locate_footnote_section(
    page: &Page,
    candidates: &[SeparatorCandidate],
    config: &FootnoteConfig,
) -> Option<FootnoteSection> {
    if candidates.is_empty() {
        log::debug!("Page {}: no horizontal lines found", page.number);
        return None;
    }

    for candidate in candidates {
        let top = candidate.bbox.y0;
        let window = BBox::new(0.0, top, page.width, top + config.section_window_height);
        let text_below = page.text_in_region(&window);
        let text_below = text_below.trim();

        if !text_below.is_empty() && is_footnote_format(text_below) {
            return Some(FootnoteSection {
                separator_line: candidate.bbox,
                section_start: top,
                text_below: text_below.to_string(),
            });
        }
    }

    log::debug!(
        "Page {}: none of {} separator candidates precede footnote text",
        page.number,
        candidates.len()
    );
    None
}

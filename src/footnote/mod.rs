//! Footnote detection and content reconstruction.
//!
//! The per-page pipeline is [`extract_footnotes`] followed by
//! [`organize_content`]. Separator detection ([`find_separator_candidates`],
//! [`locate_footnote_section`]) is an independent diagnostic path; pairing
//! never depends on it.

mod config;
mod extract;
mod font;
mod geometry;
mod organize;
mod section;
mod validate;

pub use config::FootnoteConfig;
pub use extract::{extract_footnotes, Extraction, FootnoteMap, ReferenceMarker};
pub use font::is_smaller_font;
pub use geometry::{find_separator_candidates, SeparatorCandidate};
pub use organize::organize_content;
pub use section::{is_footnote_format, locate_footnote_section, FootnoteSection};
pub use validate::{validate_matching, MatchReport};

use serde::{Deserialize, Serialize};

use crate::model::{Page, RowSheet};

/// Run extraction and organization for one page, appending its rows.
pub fn process_page(page: &Page, config: &FootnoteConfig, rows: &mut RowSheet) -> Extraction {
    let extraction = extract_footnotes(page, config);
    organize_content(page, &extraction.footnotes, &extraction.references, rows);
    extraction
}

/// Everything the pipeline learned about one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDiagnostics {
    /// Page number in the source document
    pub page: u32,
    /// Horizontal rules that could separate footnotes
    pub separators: Vec<SeparatorCandidate>,
    /// The validated footnote section, if any
    pub section: Option<FootnoteSection>,
    /// Markers, definitions and bottom candidates
    pub extraction: Extraction,
    /// Reference/footnote matching summary
    pub report: MatchReport,
}

/// Collect diagnostics for one page without emitting rows.
pub fn inspect_page(page: &Page, config: &FootnoteConfig) -> PageDiagnostics {
    let separators = find_separator_candidates(page, config);
    let section = locate_footnote_section(page, &separators, config);
    let extraction = extract_footnotes(page, config);
    let report = validate_matching(&extraction.footnotes, &extraction.references);

    PageDiagnostics {
        page: page.number,
        separators,
        section,
        extraction,
        report,
    }
}

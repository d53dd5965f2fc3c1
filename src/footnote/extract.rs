//! Marker and definition extraction.
//!
//! Extraction runs in two passes over a page. The first pass collects
//! digit spans set in a smaller font than their line as marker candidates.
//! The second pass walks blocks top to bottom and assembles footnote bodies
//! from the lower part of the page, using candidate numbers as boundaries.
//! References still unresolved afterwards get one regex-based recovery
//! attempt over the page's plain text.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Page;

use super::font::is_smaller_font;
use super::FootnoteConfig;

/// A digit span classified as a footnote marker candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMarker {
    /// The footnote number (digits only)
    pub text: String,
    /// Top of the span on the page
    pub y: f32,
    /// Whether the owning block lies in the main text region
    pub is_main_text: bool,
}

/// Footnote numbers mapped to their body text, in discovery order.
///
/// Keys are append-once: the first body stored for a number is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteMap {
    entries: Vec<(String, String)>,
}

impl FootnoteMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `text` for `number` unless the number already has a body.
    ///
    /// Returns `true` if the entry was stored.
    pub fn insert_once(&mut self, number: impl Into<String>, text: impl Into<String>) -> bool {
        let number = number.into();
        if self.contains(&number) {
            return false;
        }
        self.entries.push((number, text.into()));
        true
    }

    /// Body text of a footnote number.
    pub fn get(&self, number: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == number)
            .map(|(_, text)| text.as_str())
    }

    /// Check whether a number has a body.
    pub fn contains(&self, number: &str) -> bool {
        self.get(number).is_some()
    }

    /// Iterate over `(number, text)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    /// Number of resolved footnotes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of marker and definition extraction for one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Resolved footnote bodies
    pub footnotes: FootnoteMap,
    /// Marker candidates in the main text region, in document order
    pub references: Vec<ReferenceMarker>,
    /// Marker candidates below the main text region
    pub bottom_candidates: Vec<ReferenceMarker>,
}

impl Extraction {
    /// Main-text reference numbers without a resolved footnote.
    pub fn unresolved(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .map(|r| r.text.as_str())
            .filter(|n| !self.footnotes.contains(n) && seen.insert(*n))
            .collect()
    }
}

/// Footnote body under construction during the second pass.
struct OpenFootnote {
    number: String,
    body: String,
}

impl OpenFootnote {
    fn new(number: &str) -> Self {
        Self {
            number: number.to_string(),
            body: String::new(),
        }
    }

    fn close_into(self, footnotes: &mut FootnoteMap) {
        let body = self.body.trim();
        if !body.is_empty() {
            footnotes.insert_once(self.number, body);
        }
    }
}

/// Extract footnote markers and definitions from a page.
pub fn extract_footnotes(page: &Page, config: &FootnoteConfig) -> Extraction {
    let candidates = collect_marker_candidates(page, config);
    let mut footnotes = assemble_definitions(page, &candidates, config);

    let (references, bottom_candidates): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|c| c.is_main_text);

    let missing: Vec<&str> = {
        let mut seen = HashSet::new();
        references
            .iter()
            .map(|r| r.text.as_str())
            .filter(|n| !footnotes.contains(n) && seen.insert(*n))
            .collect()
    };

    if !missing.is_empty() {
        log::warn!(
            "Page {}: missing footnotes for references: {:?}",
            page.number,
            missing
        );
        let page_text = page.plain_text();
        for number in missing {
            match recover_definition(&page_text, number) {
                Some(text) => {
                    log::info!(
                        "Page {}: recovered footnote {} from page text",
                        page.number,
                        number
                    );
                    footnotes.insert_once(number, text);
                }
                None => log::debug!(
                    "Page {}: no definition text found for reference {}",
                    page.number,
                    number
                ),
            }
        }
    }

    log::info!(
        "Page {}: found {} references and {} footnotes",
        page.number,
        references.len(),
        footnotes.len()
    );

    Extraction {
        footnotes,
        references,
        bottom_candidates,
    }
}

/// First pass: digit spans set smaller than the rest of their line.
fn collect_marker_candidates(page: &Page, config: &FootnoteConfig) -> Vec<ReferenceMarker> {
    let main_text_limit = page.height * config.main_text_ratio;
    let mut candidates = Vec::new();

    for block in page.blocks_in_reading_order() {
        let is_main_text = block.top() < main_text_limit;
        for line in &block.lines {
            for span in &line.spans {
                let Some(digits) = span.digits() else {
                    continue;
                };
                if is_smaller_font(span, &line.spans, config.marker_font_ratio) {
                    candidates.push(ReferenceMarker {
                        text: digits.to_string(),
                        y: span.bbox.y0,
                        is_main_text,
                    });
                }
            }
        }
    }

    log::debug!(
        "Page {}: {} marker candidates",
        page.number,
        candidates.len()
    );
    candidates
}

/// Second pass: assemble footnote bodies from the lower part of the page.
fn assemble_definitions(
    page: &Page,
    candidates: &[ReferenceMarker],
    config: &FootnoteConfig,
) -> FootnoteMap {
    let numbers: HashSet<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
    let definition_limit = page.height * config.definition_region_ratio;

    let mut footnotes = FootnoteMap::new();
    let mut open: Option<OpenFootnote> = None;

    for block in page.blocks_in_reading_order() {
        for span in block.spans() {
            let text = span.text.trim();

            if let Some(digits) = span.digits().filter(|d| numbers.contains(d)) {
                match open.take() {
                    None if block.top() > definition_limit => {
                        open = Some(OpenFootnote::new(digits));
                        continue;
                    }
                    Some(note) if !note.body.is_empty() => {
                        note.close_into(&mut footnotes);
                        open = Some(OpenFootnote::new(digits));
                        continue;
                    }
                    // Not a boundary; the digit is ordinary text.
                    other => open = other,
                }
            }

            if let Some(note) = open.as_mut() {
                note.body.push_str(text);
                note.body.push(' ');
            }
        }

        if let Some(note) = open.as_mut() {
            if !note.body.is_empty() {
                note.body.push(' ');
            }
        }
    }

    if let Some(note) = open {
        note.close_into(&mut footnotes);
    }

    footnotes
}

/// Search plain page text for `"<number> <text>"` and return the text.
///
/// The number must not continue a longer digit run on its left; the text
/// runs up to the next digit or the end of the page. Occurrences with no
/// text after them are skipped.
fn recover_definition(page_text: &str, number: &str) -> Option<String> {
    let pattern = format!(r"{}\s+([^0-9]*)", regex::escape(number));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Invalid recovery pattern for {}: {}", number, e);
            return None;
        }
    };

    let mut start = 0;
    while let Some(caps) = re.captures_at(page_text, start) {
        let whole = caps.get(0)?;
        let continues_run = page_text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());

        if !continues_run {
            let text = caps.get(1).map_or("", |m| m.as_str().trim());
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        // The number is ASCII digits, so one byte on is a char boundary.
        start = whole.start() + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Block, Line, Span};

    fn span(text: &str, x0: f32, y0: f32, size: f32) -> Span {
        let width = text.chars().count() as f32 * size * 0.5;
        Span::new(text, BBox::new(x0, y0, x0 + width, y0 + size), size)
    }

    fn block(lines: Vec<Vec<Span>>) -> Block {
        Block::new(lines.into_iter().map(Line::new).collect())
    }

    /// Page with a main-text marker and a matching bottom definition.
    fn footnoted_page() -> Page {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(block(vec![vec![
            span("Body text", 72.0, 100.0, 12.0),
            span("1", 126.0, 98.0, 7.0),
        ]]));
        page.add_block(block(vec![vec![
            span("1", 72.0, 700.0, 6.0),
            span("This is a footnote.", 78.0, 700.0, 9.0),
        ]]));
        page
    }

    #[test]
    fn test_footnote_map_append_once() {
        let mut map = FootnoteMap::new();
        assert!(map.insert_once("1", "first"));
        assert!(!map.insert_once("1", "second"));
        assert_eq!(map.get("1"), Some("first"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_extracts_marker_and_definition() {
        let extraction = extract_footnotes(&footnoted_page(), &FootnoteConfig::default());

        assert_eq!(extraction.footnotes.get("1"), Some("This is a footnote."));
        assert_eq!(extraction.references.len(), 1);
        assert!(extraction.references[0].is_main_text);
        assert_eq!(extraction.references[0].y, 98.0);
        assert_eq!(extraction.bottom_candidates.len(), 1);
        assert!(extraction.unresolved().is_empty());
    }

    #[test]
    fn test_multiple_definitions_split_on_numbers() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(block(vec![vec![
            span("Alpha", 72.0, 100.0, 12.0),
            span("1", 102.0, 98.0, 7.0),
            span("beta", 110.0, 100.0, 12.0),
            span("2", 134.0, 98.0, 7.0),
        ]]));
        page.add_block(block(vec![
            vec![
                span("1", 72.0, 680.0, 6.0),
                span("First note", 78.0, 680.0, 9.0),
            ],
            vec![span("continues here.", 72.0, 690.0, 9.0)],
        ]));
        page.add_block(block(vec![vec![
            span("2", 72.0, 720.0, 6.0),
            span("Second note.", 78.0, 720.0, 9.0),
        ]]));

        let extraction = extract_footnotes(&page, &FootnoteConfig::default());
        assert_eq!(
            extraction.footnotes.get("1"),
            Some("First note continues here.")
        );
        assert_eq!(extraction.footnotes.get("2"), Some("Second note."));
        let numbers: Vec<&str> = extraction.footnotes.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec!["1", "2"]);
    }

    #[test]
    fn test_definitions_do_not_open_in_upper_page() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(block(vec![vec![
            span("Text", 72.0, 100.0, 12.0),
            span("1", 98.0, 98.0, 7.0),
            span("more text", 104.0, 100.0, 12.0),
        ]]));

        let extraction = extract_footnotes(&page, &FootnoteConfig::default());
        // Recovery finds the text after the in-body marker.
        assert_eq!(extraction.footnotes.get("1"), Some("more text"));
    }

    #[test]
    fn test_unresolved_marker() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(block(vec![vec![
            span("Body text", 72.0, 100.0, 12.0),
            span("2", 126.0, 98.0, 7.0),
        ]]));

        let extraction = extract_footnotes(&page, &FootnoteConfig::default());
        assert!(extraction.footnotes.is_empty());
        assert_eq!(extraction.unresolved(), vec!["2"]);
    }

    #[test]
    fn test_same_size_digits_are_not_markers() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(block(vec![vec![
            span("In", 72.0, 100.0, 12.0),
            span("2024", 90.0, 100.0, 12.0),
            span("we", 120.0, 100.0, 12.0),
        ]]));

        let extraction = extract_footnotes(&page, &FootnoteConfig::default());
        assert!(extraction.references.is_empty());
        assert!(extraction.bottom_candidates.is_empty());
    }

    #[test]
    fn test_recover_definition() {
        let text = "Other 11 Eleven\n1 The recovered note. 2 Next";
        assert_eq!(
            recover_definition(text, "1"),
            Some("The recovered note.".to_string())
        );
        assert_eq!(
            recover_definition(text, "11"),
            Some("Eleven".to_string())
        );
        assert_eq!(recover_definition("Body text 2", "2"), None);
        assert_eq!(recover_definition("12 apples", "2"), None);
    }

    #[test]
    fn test_recover_skips_empty_occurrence() {
        // A marker span with trailing whitespace puts "1 " right before the
        // next line's digit.
        let text = "Body text1 \n1 This is a footnote.";
        assert_eq!(
            recover_definition(text, "1"),
            Some("This is a footnote.".to_string())
        );
    }

    #[test]
    fn test_recover_after_digit_run() {
        assert_eq!(
            recover_definition("Since 21 years\n1 Real note.", "1"),
            Some("Real note.".to_string())
        );
    }
}

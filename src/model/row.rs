//! Output rows.

use serde::{Deserialize, Serialize};

/// Column label of the body text.
pub const CONTENT_COLUMN: &str = "Content";

/// Column label of the footnote text.
pub const FOOTNOTES_COLUMN: &str = "Footnotes";

const PAGE_MARKER_PREFIX: &str = "****";

/// One emitted `(body, footnote)` pair.
///
/// Normally exactly one side is non-empty. Page-boundary rows carry the
/// reserved `**** Page N ****` form in the body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentRow {
    /// Body text
    #[serde(rename = "Content")]
    pub body: String,
    /// Footnote text
    #[serde(rename = "Footnotes")]
    pub footnote: String,
}

impl ContentRow {
    /// A body text row.
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            body: text.into(),
            footnote: String::new(),
        }
    }

    /// A footnote row in the `"<number>. <text>"` form.
    pub fn footnote(number: &str, text: &str) -> Self {
        Self {
            body: String::new(),
            footnote: format!("{}. {}", number, text),
        }
    }

    /// A page-boundary row carrying the running page counter.
    pub fn page_marker(counter: u32) -> Self {
        Self::body(format!("{} Page {} {}", PAGE_MARKER_PREFIX, counter, PAGE_MARKER_PREFIX))
    }

    /// Check if this row is a page-boundary row.
    pub fn is_page_marker(&self) -> bool {
        self.page_counter().is_some()
    }

    /// Check if this row carries a footnote.
    pub fn is_footnote(&self) -> bool {
        !self.footnote.is_empty()
    }

    /// Page counter of a page-boundary row.
    ///
    /// Only the exact `**** Page N ****` form counts; body text that merely
    /// starts with asterisks does not.
    pub fn page_counter(&self) -> Option<u32> {
        let digits = self
            .body
            .strip_prefix(PAGE_MARKER_PREFIX)?
            .strip_suffix(PAGE_MARKER_PREFIX)?
            .strip_prefix(" Page ")?
            .strip_suffix(' ')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

/// The ordered row sequence of one document run.
///
/// Rows are only ever appended; their order is the output contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSheet {
    rows: Vec<ContentRow>,
}

impl RowSheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn push(&mut self, row: ContentRow) {
        self.rows.push(row);
    }

    /// Append all rows of another batch, preserving their order.
    pub fn append(&mut self, other: RowSheet) {
        self.rows.extend(other.rows);
    }

    /// All rows in emission order.
    pub fn rows(&self) -> &[ContentRow] {
        &self.rows
    }

    /// Consume the sheet and return its rows.
    pub fn into_rows(self) -> Vec<ContentRow> {
        self.rows
    }

    /// Iterate over rows in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContentRow> {
        self.rows.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of footnote rows.
    pub fn footnote_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_footnote()).count()
    }

    /// Number of page-boundary rows.
    pub fn page_marker_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_page_marker()).count()
    }
}

impl<'a> IntoIterator for &'a RowSheet {
    type Item = &'a ContentRow;
    type IntoIter = std::slice::Iter<'a, ContentRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnote_row_format() {
        let row = ContentRow::footnote("3", "See chapter two.");
        assert_eq!(row.body, "");
        assert_eq!(row.footnote, "3. See chapter two.");
        assert!(row.is_footnote());
        assert!(!row.is_page_marker());
    }

    #[test]
    fn test_page_marker() {
        let row = ContentRow::page_marker(2);
        assert_eq!(row.body, "**** Page 2 ****");
        assert!(row.is_page_marker());
        assert_eq!(row.page_counter(), Some(2));
        assert_eq!(ContentRow::body("text").page_counter(), None);
    }

    #[test]
    fn test_asterisk_body_is_not_page_marker() {
        for text in ["**** Important ****", "****", "**** Page two ****", "**** Page 3 **** tail"] {
            let row = ContentRow::body(text);
            assert!(!row.is_page_marker(), "{text:?}");
            assert_eq!(row.page_counter(), None);
        }

        let mut sheet = RowSheet::new();
        sheet.push(ContentRow::body("**** Warning ****"));
        sheet.push(ContentRow::page_marker(4));
        assert_eq!(sheet.page_marker_count(), 1);
    }

    #[test]
    fn test_sheet_counts() {
        let mut sheet = RowSheet::new();
        sheet.push(ContentRow::body("Some text 1"));
        sheet.push(ContentRow::footnote("1", "A note."));
        sheet.push(ContentRow::page_marker(2));

        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.footnote_count(), 1);
        assert_eq!(sheet.page_marker_count(), 1);
    }

    #[test]
    fn test_row_serializes_with_column_labels() {
        let json = serde_json::to_string(&ContentRow::body("x")).unwrap();
        assert_eq!(json, r#"{"Content":"x","Footnotes":""}"#);
    }
}

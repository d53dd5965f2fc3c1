//! Content reconstruction with inline footnotes.

use std::collections::HashSet;

use crate::model::{ContentRow, Page, RowSheet};

use super::extract::{FootnoteMap, ReferenceMarker};

/// Body text waiting to be emitted as a row.
#[derive(Debug, Default)]
struct PendingBody {
    text: String,
}

impl PendingBody {
    fn push(&mut self, text: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    fn line_break(&mut self) {
        self.text.push(' ');
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Take the buffered text with whitespace runs collapsed.
    fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn flush_into(&mut self, rows: &mut RowSheet) {
        if !self.is_blank() {
            rows.push(ContentRow::body(self.take()));
        } else {
            self.text.clear();
        }
    }
}

/// Walk a page in reading order and append its content rows to `rows`.
///
/// When a span matches a main-text reference whose number resolves, the
/// buffered text up to and including the marker becomes one body row and
/// the footnote row follows it immediately. Each number emits its footnote
/// once per page; unresolved and repeated markers stay inline. Remaining
/// text is flushed at the end of every block.
pub fn organize_content(
    page: &Page,
    footnotes: &FootnoteMap,
    references: &[ReferenceMarker],
    rows: &mut RowSheet,
) {
    let reference_numbers: HashSet<&str> = references.iter().map(|r| r.text.as_str()).collect();
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut pending = PendingBody::default();

    for block in page.blocks_in_reading_order() {
        for line in &block.lines {
            for span in &line.spans {
                let marker = span
                    .digits()
                    .filter(|d| reference_numbers.contains(d) && !emitted.contains(d));

                pending.push(&span.text);
                let Some(number) = marker else {
                    continue;
                };

                match footnotes.get(number) {
                    Some(note) => {
                        rows.push(ContentRow::body(pending.take()));
                        rows.push(ContentRow::footnote(number, note));
                        emitted.insert(number);
                    }
                    None => log::warn!(
                        "Page {}: missing footnote for reference {}",
                        page.number,
                        number
                    ),
                }
            }

            if !line.is_empty() {
                pending.line_break();
            }
        }

        pending.flush_into(rows);
    }
}

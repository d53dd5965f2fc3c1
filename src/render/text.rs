//! Tab-separated rendering for row sheets.

use crate::model::{ContentRow, RowSheet, CONTENT_COLUMN, FOOTNOTES_COLUMN};

/// Convert a row sheet to tab-separated text with a header row.
///
/// Tabs, carriage returns and newlines inside cells are written as `\t`,
/// `\r` and `\n` escapes; backslashes are doubled.
pub fn to_tsv(rows: &RowSheet) -> String {
    let mut output = format!("{}\t{}\n", CONTENT_COLUMN, FOOTNOTES_COLUMN);
    for row in rows {
        write_row(&mut output, row);
    }
    output
}

fn write_row(output: &mut String, row: &ContentRow) {
    output.push_str(&escape_cell(&row.body));
    output.push('\t');
    output.push_str(&escape_cell(&row.footnote));
    output.push('\n');
}

fn escape_cell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

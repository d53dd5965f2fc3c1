//! JSON rendering for row sheets.

use crate::error::{Error, Result};
use crate::model::RowSheet;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a row sheet to a JSON array of `{"Content", "Footnotes"}` records.
pub fn to_json(rows: &RowSheet, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(rows),
        JsonFormat::Compact => serde_json::to_string(rows),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentRow;

    fn sheet() -> RowSheet {
        let mut rows = RowSheet::new();
        rows.push(ContentRow::body("Claim 1"));
        rows.push(ContentRow::footnote("1", "Source."));
        rows.push(ContentRow::page_marker(2));
        rows
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sheet(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"Content\""));
        assert!(json.contains("1. Source."));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sheet(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with(r#"[{"Content":"Claim 1","Footnotes":""}"#));
    }

    #[test]
    fn test_empty_sheet() {
        assert_eq!(to_json(&RowSheet::new(), JsonFormat::Compact).unwrap(), "[]");
    }
}

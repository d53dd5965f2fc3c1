//! Reference/footnote matching report.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::extract::{FootnoteMap, ReferenceMarker};

/// How well a page's references and footnotes line up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Reference numbers with a footnote
    pub matched: Vec<String>,
    /// Reference numbers without a footnote
    pub missing: Vec<String>,
    /// Footnote numbers no main-text reference points at
    pub orphaned: Vec<String>,
}

impl MatchReport {
    /// Check whether every reference and footnote found its counterpart.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.orphaned.is_empty()
    }
}

/// Compare main-text references against resolved footnotes.
pub fn validate_matching(footnotes: &FootnoteMap, references: &[ReferenceMarker]) -> MatchReport {
    let mut report = MatchReport::default();
    let mut seen = HashSet::new();

    for reference in references {
        let number = reference.text.as_str();
        if !seen.insert(number) {
            continue;
        }
        if footnotes.contains(number) {
            report.matched.push(number.to_string());
        } else {
            report.missing.push(number.to_string());
        }
    }

    report.orphaned = footnotes
        .iter()
        .map(|(number, _)| number)
        .filter(|number| !seen.contains(number))
        .map(str::to_string)
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(number: &str) -> ReferenceMarker {
        ReferenceMarker {
            text: number.to_string(),
            y: 0.0,
            is_main_text: true,
        }
    }

    #[test]
    fn test_report() {
        let mut footnotes = FootnoteMap::new();
        footnotes.insert_once("1", "One.");
        footnotes.insert_once("3", "Three.");

        let references = vec![reference("1"), reference("2"), reference("1")];
        let report = validate_matching(&footnotes, &references);

        assert_eq!(report.matched, vec!["1"]);
        assert_eq!(report.missing, vec!["2"]);
        assert_eq!(report.orphaned, vec!["3"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_complete_report() {
        let mut footnotes = FootnoteMap::new();
        footnotes.insert_once("4", "Four.");
        let report = validate_matching(&footnotes, &[reference("4")]);
        assert!(report.is_complete());
    }
}

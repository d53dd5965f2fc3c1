//! Font size comparison for marker detection.

use crate::model::Span;

/// Check whether `span` is rendered visibly smaller than its line.
///
/// The reference size is the mean font size of the spans on the line that
/// are not pure digit runs. A line without such spans cannot be compared
/// and yields `false`. The comparison is strict: a span at exactly
/// `ratio` times the mean is not distinct.
pub fn is_smaller_font(span: &Span, line_spans: &[Span], ratio: f32) -> bool {
    let (sum, count) = line_spans
        .iter()
        .filter(|s| !s.is_digit_run())
        .fold((0.0f32, 0usize), |(sum, count), s| (sum + s.font_size, count + 1));

    if count == 0 {
        return false;
    }

    let mean = sum / count as f32;
    span.font_size < mean * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn span(text: &str, size: f32) -> Span {
        Span::new(text, BBox::default(), size)
    }

    #[test]
    fn test_threshold_is_strict() {
        let line = vec![span("Body", 10.0), span("text", 10.0), span("1", 8.5)];
        assert!(!is_smaller_font(&line[2], &line, 0.85));

        let marker = span("1", 8.4999);
        assert!(is_smaller_font(&marker, &line, 0.85));
    }

    #[test]
    fn test_digit_spans_excluded_from_mean() {
        // The large digit span must not drag the mean upwards.
        let line = vec![span("Body", 10.0), span("2024", 30.0), span("1", 8.0)];
        assert!(is_smaller_font(&line[2], &line, 0.85));
    }

    #[test]
    fn test_no_reference_spans() {
        let line = vec![span("1", 6.0), span("23", 12.0)];
        assert!(!is_smaller_font(&line[0], &line, 0.85));
        assert!(!is_smaller_font(&line[0], &[], 0.85));
    }

    #[test]
    fn test_repeatable() {
        let line = vec![span("Some words", 11.0), span("3", 7.0)];
        let first = is_smaller_font(&line[1], &line, 0.85);
        let second = is_smaller_font(&line[1], &line, 0.85);
        assert!(first);
        assert_eq!(first, second);
    }
}

//! Heuristic thresholds for footnote detection.

/// Tunable thresholds used by the footnote pipeline.
///
/// All ratios are relative to the page or line they are applied to. The
/// defaults suit conventionally typeset documents; a document family with
/// different typography can adjust them independently.
#[derive(Debug, Clone, PartialEq)]
pub struct FootnoteConfig {
    /// A digit span is a marker when its size is below this fraction of the
    /// mean size of the other spans on its line.
    pub marker_font_ratio: f32,

    /// Minimum separator length as a fraction of page width (inclusive).
    pub separator_min_width_ratio: f32,

    /// Maximum separator length as a fraction of page width (inclusive).
    pub separator_max_width_ratio: f32,

    /// Maximum vertical extent of a path treated as a horizontal rule.
    pub separator_max_height: f32,

    /// Separators must start strictly below this fraction of page height.
    pub separator_region_ratio: f32,

    /// Height of the window below a separator whose text is validated.
    pub section_window_height: f32,

    /// Blocks whose top lies above this fraction of page height hold
    /// main text.
    pub main_text_ratio: f32,

    /// Footnote definitions may only open in blocks whose top lies strictly
    /// below this fraction of page height.
    pub definition_region_ratio: f32,

    /// Counter carried by the first page-boundary row.
    pub first_page_marker: u32,
}

impl FootnoteConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker font ratio.
    pub fn with_marker_font_ratio(mut self, ratio: f32) -> Self {
        self.marker_font_ratio = ratio;
        self
    }

    /// Set the accepted separator length band.
    pub fn with_separator_width_band(mut self, min: f32, max: f32) -> Self {
        self.separator_min_width_ratio = min;
        self.separator_max_width_ratio = max;
        self
    }

    /// Set the maximum separator height.
    pub fn with_separator_max_height(mut self, height: f32) -> Self {
        self.separator_max_height = height;
        self
    }

    /// Set the separator region ratio.
    pub fn with_separator_region(mut self, ratio: f32) -> Self {
        self.separator_region_ratio = ratio;
        self
    }

    /// Set the height of the validated window below a separator.
    pub fn with_section_window(mut self, height: f32) -> Self {
        self.section_window_height = height;
        self
    }

    /// Set the main-text region ratio.
    pub fn with_main_text_region(mut self, ratio: f32) -> Self {
        self.main_text_ratio = ratio;
        self
    }

    /// Set the definition region ratio.
    pub fn with_definition_region(mut self, ratio: f32) -> Self {
        self.definition_region_ratio = ratio;
        self
    }

    /// Set the counter of the first page-boundary row.
    pub fn with_first_page_marker(mut self, counter: u32) -> Self {
        self.first_page_marker = counter;
        self
    }
}

impl Default for FootnoteConfig {
    fn default() -> Self {
        Self {
            marker_font_ratio: 0.85,
            separator_min_width_ratio: 0.25,
            separator_max_width_ratio: 0.35,
            separator_max_height: 2.0,
            separator_region_ratio: 0.6,
            section_window_height: 50.0,
            main_text_ratio: 0.7,
            definition_region_ratio: 0.6,
            // Legacy numbering: the first processed page is labelled 2.
            first_page_marker: 2,
        }
    }
}

//! Page-level layout types.
//!
//! Coordinates follow the reading convention: the origin is the top-left
//! corner of the page and `y` grows downwards, so `y0` is the top edge of a
//! box and `y1` its bottom edge.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `(x0, y0, x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its four edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing all the given points.
    pub fn from_points(points: &[(f32, f32)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = BBox::new(first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            bbox.x0 = bbox.x0.min(x);
            bbox.y0 = bbox.y0.min(y);
            bbox.x1 = bbox.x1.max(x);
            bbox.y1 = bbox.y1.max(y);
        }
        Some(bbox)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Check whether two boxes overlap (touching edges count).
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }
}

/// A run of text with a uniform font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Raw text content
    pub text: String,
    /// Position on the page
    pub bbox: BBox,
    /// Font size in points
    pub font_size: f32,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, bbox: BBox, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
        }
    }

    /// The span text as a footnote number, if it is a pure digit run.
    ///
    /// Surrounding whitespace is ignored; anything else disqualifies it.
    pub fn digits(&self) -> Option<&str> {
        let text = self.text.trim();
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            Some(text)
        } else {
            None
        }
    }

    /// Check if the span is a pure digit run.
    pub fn is_digit_run(&self) -> bool {
        self.digits().is_some()
    }
}

/// Spans sharing a baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    /// Spans in this line
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from its spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Bounding box of all spans, if any.
    pub fn bbox(&self) -> Option<BBox> {
        self.spans
            .iter()
            .map(|s| s.bbox)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Combined text of the line.
    ///
    /// A space is inserted between two spans when there is a visible gap
    /// between them and neither side already carries whitespace.
    pub fn text(&self) -> String {
        let mut result = String::new();
        let mut prev: Option<&Span> = None;

        for span in &self.spans {
            if let Some(prev) = prev {
                let char_count = span.text.chars().count().max(1);
                let avg_char_width = if span.bbox.width() > 0.0 {
                    span.bbox.width() / char_count as f32
                } else {
                    span.font_size * 0.5
                };
                let gap = span.bbox.x0 - prev.bbox.x1;
                let has_space = prev.text.ends_with(char::is_whitespace)
                    || span.text.starts_with(char::is_whitespace);
                if gap > avg_char_width * 0.2 && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
            prev = Some(span);
        }

        result
    }

    /// Check if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// A group of lines with its own bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position on the page
    pub bbox: BBox,
    /// Lines in this block, top to bottom
    pub lines: Vec<Line>,
}

impl Block {
    /// Create a block whose bounding box encloses all of its lines.
    pub fn new(lines: Vec<Line>) -> Self {
        let bbox = lines
            .iter()
            .filter_map(Line::bbox)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();
        Self { bbox, lines }
    }

    /// Create a block with an explicit bounding box.
    pub fn with_bbox(bbox: BBox, lines: Vec<Line>) -> Self {
        Self { bbox, lines }
    }

    /// Top edge of the block.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Iterate over every span in the block in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }

    /// Combined text, one line per row.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A vector path, reduced to its bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    /// Bounding rectangle of the path
    pub bbox: BBox,
}

impl PathPrimitive {
    /// Create a path primitive from its bounding rectangle.
    pub fn new(bbox: BBox) -> Self {
        Self { bbox }
    }
}

/// A single page of layout data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number in the source document (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text blocks, in the order the source produced them
    pub blocks: Vec<Block>,

    /// Vector paths drawn on the page
    pub paths: Vec<PathPrimitive>,
}

impl Page {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter size.
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a text block.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Add a vector path.
    pub fn add_path(&mut self, path: PathPrimitive) {
        self.paths.push(path);
    }

    /// Blocks sorted top to bottom by their top edge.
    ///
    /// The sort is stable, so blocks sharing a top edge keep source order.
    pub fn blocks_in_reading_order(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks.iter().collect();
        blocks.sort_by(|a, b| a.top().total_cmp(&b.top()));
        blocks
    }

    /// Plain text of the whole page, one line per row.
    pub fn plain_text(&self) -> String {
        self.blocks_in_reading_order()
            .into_iter()
            .map(Block::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain text of the spans overlapping `region`.
    pub fn text_in_region(&self, region: &BBox) -> String {
        let mut rows = Vec::new();
        for block in self.blocks_in_reading_order() {
            for line in &block.lines {
                let clipped = Line::new(
                    line.spans
                        .iter()
                        .filter(|s| s.bbox.intersects(region))
                        .cloned()
                        .collect(),
                );
                if !clipped.is_empty() {
                    rows.push(clipped.text());
                }
            }
        }
        rows.join("\n")
    }

    /// Total number of spans on the page.
    pub fn span_count(&self) -> usize {
        self.blocks.iter().map(|b| b.spans().count()).sum()
    }

    /// Check if the page carries neither text nor paths.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x0: f32, y0: f32, x1: f32, size: f32) -> Span {
        Span::new(text, BBox::new(x0, y0, x1, y0 + size), size)
    }

    #[test]
    fn test_bbox_from_points() {
        let bbox = BBox::from_points(&[(10.0, 5.0), (2.0, 8.0), (6.0, 1.0)]).unwrap();
        assert_eq!(bbox, BBox::new(2.0, 1.0, 10.0, 8.0));
        assert!(BBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_bbox_intersects() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&BBox::new(5.0, 5.0, 15.0, 15.0)));
        assert!(a.intersects(&BBox::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!a.intersects(&BBox::new(11.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn test_span_digits() {
        assert_eq!(span("12", 0.0, 0.0, 10.0, 8.0).digits(), Some("12"));
        assert_eq!(span(" 3 ", 0.0, 0.0, 10.0, 8.0).digits(), Some("3"));
        assert_eq!(span("3a", 0.0, 0.0, 10.0, 8.0).digits(), None);
        assert_eq!(span("  ", 0.0, 0.0, 10.0, 8.0).digits(), None);
        assert!(!span("1.", 0.0, 0.0, 10.0, 8.0).is_digit_run());
    }

    #[test]
    fn test_line_text_inserts_gap_spaces() {
        let line = Line::new(vec![
            span("Hello", 0.0, 0.0, 30.0, 12.0),
            span("world", 40.0, 0.0, 70.0, 12.0),
            span("!", 70.0, 0.0, 74.0, 12.0),
        ]);
        assert_eq!(line.text(), "Hello world!");
    }

    #[test]
    fn test_block_bbox_and_reading_order() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(Block::new(vec![Line::new(vec![span(
            "bottom", 10.0, 700.0, 60.0, 10.0,
        )])]));
        page.add_block(Block::new(vec![Line::new(vec![span(
            "top", 10.0, 100.0, 40.0, 10.0,
        )])]));

        assert_eq!(page.blocks[0].bbox, BBox::new(10.0, 700.0, 60.0, 710.0));
        let order: Vec<String> = page
            .blocks_in_reading_order()
            .iter()
            .map(|b| b.text())
            .collect();
        assert_eq!(order, vec!["top", "bottom"]);
        assert_eq!(page.plain_text(), "top\nbottom");
    }

    #[test]
    fn test_text_in_region() {
        let mut page = Page::new(1, 600.0, 800.0);
        page.add_block(Block::new(vec![Line::new(vec![span(
            "Body", 10.0, 100.0, 40.0, 10.0,
        )])]));
        page.add_block(Block::new(vec![Line::new(vec![
            span("1", 10.0, 650.0, 14.0, 6.0),
            span("Note text", 20.0, 650.0, 80.0, 10.0),
        ])]));

        let text = page.text_in_region(&BBox::new(0.0, 640.0, 600.0, 690.0));
        assert_eq!(text, "1 Note text");
        assert_eq!(page.span_count(), 3);
    }
}

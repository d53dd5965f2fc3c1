//! Layout reconstruction from PDF content streams.
//!
//! This module interprets the text and path operators of a page's content
//! stream, producing positioned text spans and vector path bounding boxes,
//! then groups spans into lines and lines into blocks.

use crate::error::Result;
use crate::model::{BBox, Block, Line, Page, PathPrimitive, Span};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Default text leading when no `TL` operator was seen.
const DEFAULT_LEADING: f32 = 12.0;

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// TJ adjustment (thousandths of an em) treated as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A span in PDF user space (origin bottom-left, y grows upwards).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    /// Decoded text
    pub text: String,
    /// X of the text origin
    pub x: f32,
    /// Baseline Y
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    /// Effective font size after text and graphics scaling
    pub font_size: f32,
}

/// Everything painted on a page, before grouping.
#[derive(Debug, Clone, Default)]
pub struct PageMarks {
    /// Text spans in content stream order
    pub spans: Vec<RawSpan>,
    /// Bounding boxes of painted paths, in PDF user space
    pub paths: Vec<BBox>,
}

/// 2D affine transform in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::translate(0.0, 0.0)
    }
}

impl Matrix {
    fn from_op(op: &ContentOp) -> Option<Self> {
        Some(Self {
            a: op.number(0)?,
            b: op.number(1)?,
            c: op.number(2)?,
            d: op.number(3)?,
            e: op.number(4)?,
            f: op.number(5)?,
        })
    }

    fn translate(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// `self × other`
    fn multiply(&self, o: &Matrix) -> Matrix {
        Matrix {
            a: self.a * o.a + self.b * o.c,
            b: self.a * o.b + self.b * o.d,
            c: self.c * o.a + self.d * o.c,
            d: self.c * o.b + self.d * o.d,
            e: self.e * o.a + self.f * o.c + o.e,
            f: self.e * o.b + self.f * o.d + o.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    rise: f32,
    matrix: Matrix,
    line_matrix: Matrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
            rise: 0.0,
            matrix: Matrix::default(),
            line_matrix: Matrix::default(),
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).multiply(&self.line_matrix);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }
}

/// Interpret content stream operations into spans and paths.
///
/// `decode` turns a string operand into text given the active font
/// resource name.
pub fn interpret_operations<F>(ops: &[ContentOp], decode: F) -> PageMarks
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut marks = PageMarks::default();
    let mut ctm = Matrix::default();
    let mut ctm_stack: Vec<Matrix> = Vec::new();
    let mut text = TextState::default();
    let mut path_points: Vec<(f32, f32)> = Vec::new();

    for op in ops {
        match op.operator.as_str() {
            "q" => ctm_stack.push(ctm),
            "Q" => {
                if let Some(prev) = ctm_stack.pop() {
                    ctm = prev;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_op(op) {
                    ctm = m.multiply(&ctm);
                }
            }
            "m" | "l" => {
                if let (Some(x), Some(y)) = (op.number(0), op.number(1)) {
                    path_points.push(ctm.apply(x, y));
                }
            }
            "c" => {
                // Control points are enough for a bounding box estimate.
                for i in (0..6).step_by(2) {
                    if let (Some(x), Some(y)) = (op.number(i), op.number(i + 1)) {
                        path_points.push(ctm.apply(x, y));
                    }
                }
            }
            "v" | "y" => {
                for i in (0..4).step_by(2) {
                    if let (Some(x), Some(y)) = (op.number(i), op.number(i + 1)) {
                        path_points.push(ctm.apply(x, y));
                    }
                }
            }
            "re" => {
                if let (Some(x), Some(y), Some(w), Some(h)) =
                    (op.number(0), op.number(1), op.number(2), op.number(3))
                {
                    path_points.push(ctm.apply(x, y));
                    path_points.push(ctm.apply(x + w, y));
                    path_points.push(ctm.apply(x + w, y + h));
                    path_points.push(ctm.apply(x, y + h));
                }
            }
            "S" | "s" | "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                if let Some(bbox) = BBox::from_points(&path_points) {
                    marks.paths.push(bbox);
                }
                path_points.clear();
            }
            "n" => path_points.clear(),
            "BT" => {
                text.matrix = Matrix::default();
                text.line_matrix = Matrix::default();
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    text.font = name.clone();
                }
                text.font_size = op.number(1).unwrap_or(12.0);
            }
            "TL" => text.leading = op.number(0).unwrap_or(DEFAULT_LEADING),
            "Ts" => text.rise = op.number(0).unwrap_or(0.0),
            "Td" => {
                text.move_line(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0));
            }
            "TD" => {
                let ty = op.number(1).unwrap_or(0.0);
                text.leading = -ty;
                text.move_line(op.number(0).unwrap_or(0.0), ty);
            }
            "Tm" => {
                if let Some(m) = Matrix::from_op(op) {
                    text.matrix = m;
                    text.line_matrix = m;
                }
            }
            "T*" => text.next_line(),
            "Tj" => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    let shown = decode(&text.font, bytes);
                    show_text(&mut marks, &mut text, &ctm, shown, 0.0);
                }
            }
            "'" | "\"" => {
                text.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(PdfValue::Str(bytes)) = op.operands.get(index) {
                    let shown = decode(&text.font, bytes);
                    show_text(&mut marks, &mut text, &ctm, shown, 0.0);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    let mut combined = String::new();
                    let mut adjustment = 0.0;
                    for item in items {
                        match item {
                            PdfValue::Str(bytes) => combined.push_str(&decode(&text.font, bytes)),
                            other => {
                                // Negative values advance the pen to the right.
                                let adj = -other.as_number().unwrap_or(0.0);
                                adjustment += adj;
                                if adj > TJ_SPACE_THRESHOLD
                                    && !combined.is_empty()
                                    && !combined.ends_with(char::is_whitespace)
                                {
                                    combined.push(' ');
                                }
                            }
                        }
                    }
                    show_text(&mut marks, &mut text, &ctm, combined, adjustment);
                }
            }
            _ => {}
        }
    }

    marks
}

/// Record a span at the current text position and advance the pen.
fn show_text(
    marks: &mut PageMarks,
    text: &mut TextState,
    ctm: &Matrix,
    shown: String,
    adjustment: f32,
) {
    let char_count = shown.chars().count() as f32;
    // Advance in unscaled text space units.
    let advance = (char_count * AVG_GLYPH_WIDTH + adjustment / 1000.0) * text.font_size;

    if !shown.trim().is_empty() {
        let device = text.matrix.multiply(ctm);
        let (x, y) = device.apply(0.0, text.rise);
        marks.spans.push(RawSpan {
            text: shown,
            x,
            y,
            width: advance.max(0.0) * device.horizontal_scale(),
            font_size: text.font_size * device.vertical_scale(),
        });
    }

    text.matrix = Matrix::translate(advance, 0.0).multiply(&text.matrix);
}

/// Turn raw marks into a [`Page`] in top-down coordinates.
pub fn assemble_page(number: u32, width: f32, height: f32, marks: PageMarks) -> Page {
    let mut page = Page::new(number, width, height);

    let spans: Vec<Span> = marks
        .spans
        .into_iter()
        .map(|s| {
            let top = height - (s.y + s.font_size * 0.8);
            let bottom = height - (s.y - s.font_size * 0.2);
            Span::new(s.text, BBox::new(s.x, top, s.x + s.width, bottom), s.font_size)
        })
        .collect();

    for block in group_lines_into_blocks(group_spans_into_lines(spans)) {
        page.add_block(block);
    }

    for bbox in marks.paths {
        page.add_path(PathPrimitive::new(BBox::new(
            bbox.x0,
            height - bbox.y1,
            bbox.x1,
            height - bbox.y0,
        )));
    }

    page
}

/// Build one page through a backend.
pub fn build_page<B: PdfBackend>(backend: &B, number: u32, page_id: PageId) -> Result<Page> {
    let (width, height) = backend.page_size(page_id)?;
    let ops = backend.page_operations(page_id)?;
    let marks = interpret_operations(&ops, |font, bytes| {
        backend.decode_text(page_id, font, bytes)
    });

    log::debug!(
        "Page {}: {} spans, {} paths from {} operations",
        number,
        marks.spans.len(),
        marks.paths.len(),
        ops.len()
    );

    Ok(assemble_page(number, width, height, marks))
}

/// Group spans into lines by vertical overlap.
///
/// Raised or lowered spans (superscript markers) stay on the line they
/// overlap with.
fn group_spans_into_lines(mut spans: Vec<Span>) -> Vec<Line> {
    spans.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<(BBox, Vec<Span>)> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some((extent, members)) if same_line(extent, &span.bbox) => {
                *extent = extent.union(&span.bbox);
                members.push(span);
            }
            _ => lines.push((span.bbox, vec![span])),
        }
    }

    lines
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            Line::new(members)
        })
        .collect()
}

fn same_line(line: &BBox, span: &BBox) -> bool {
    let overlap = line.y1.min(span.y1) - line.y0.max(span.y0);
    let smaller = line.height().min(span.height());
    smaller > 0.0 && overlap >= smaller * 0.5
}

/// Dominant font size of a line, weighted by text length.
fn line_font_size(line: &Line) -> f32 {
    let total: usize = line.spans.iter().map(|s| s.text.len()).sum();
    if total == 0 {
        return line.spans.first().map(|s| s.font_size).unwrap_or(0.0);
    }
    line.spans
        .iter()
        .map(|s| s.font_size * s.text.len() as f32)
        .sum::<f32>()
        / total as f32
}

/// Group lines into blocks based on spacing and font size changes.
fn group_lines_into_blocks(lines: Vec<Line>) -> Vec<Block> {
    let tops: Vec<f32> = lines
        .iter()
        .filter_map(|l| l.bbox().map(|b| b.y0))
        .collect();
    let avg_spacing = calculate_avg_line_spacing(&tops);

    let mut blocks = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            if should_break_block(prev, &line, avg_spacing) {
                blocks.push(Block::new(std::mem::take(&mut current)));
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(Block::new(current));
    }

    blocks
}

fn calculate_avg_line_spacing(tops: &[f32]) -> f32 {
    let spacings: Vec<f32> = tops
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return DEFAULT_LEADING;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn should_break_block(prev: &Line, curr: &Line, avg_spacing: f32) -> bool {
    let (Some(prev_box), Some(curr_box)) = (prev.bbox(), curr.bbox()) else {
        return true;
    };

    // Large spacing indicates a new paragraph
    if (curr_box.y0 - prev_box.y0).abs() > avg_spacing * 1.5 {
        return true;
    }

    (line_font_size(prev) - line_font_size(curr)).abs() > 1.0
}

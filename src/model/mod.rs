//! Document model types.
//!
//! Pages are the input side: positioned text spans grouped into lines and
//! blocks, plus the bounding boxes of vector paths. Content rows are the
//! output side, consumed by whatever serializes the result.

mod page;
mod row;

pub use page::{BBox, Block, Line, Page, PathPrimitive, Span};
pub use row::{ContentRow, RowSheet, CONTENT_COLUMN, FOOTNOTES_COLUMN};

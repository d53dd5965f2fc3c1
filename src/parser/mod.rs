//! Page-layout source.
//!
//! Reads PDF pages into [`Page`](crate::model::Page) values: text spans with
//! bounding boxes and font sizes grouped into lines and blocks, and the
//! bounding boxes of vector paths.

mod backend;
mod layout;
mod options;
mod source;

pub use backend::{decode_text_simple, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue};
pub use layout::{assemble_page, build_page, interpret_operations, PageMarks, RawSpan};
pub use options::{PageSelection, ParseOptions};
pub use source::{MemorySource, PageSource, PdfSource};

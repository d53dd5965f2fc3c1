//! # footsplit
//!
//! Footnote-aware content extraction from PDF documents.
//!
//! This library reads the layout of each page, detects in-body footnote
//! reference markers and the footnote definitions near the page bottom, and
//! reconstructs the document as an ordered sheet of rows. Each row holds
//! either body text (`Content`) or a footnote placed right after the text
//! that references it (`Footnotes`). Every page closes with a
//! `**** Page N ****` boundary row.
//!
//! ## Quick Start
//!
//! ```no_run
//! use footsplit::{process_file, render};
//!
//! fn main() -> footsplit::Result<()> {
//!     let rows = process_file("paper.pdf")?;
//!
//!     let tsv = render::to_tsv(&rows);
//!     println!("{}", tsv);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Marker detection**: superscript digits found by font size relative to their line
//! - **Definition assembly**: footnote bodies collected from the lower page region
//! - **Regex recovery**: unresolved references searched in the page text
//! - **Diagnostics**: separator rules, footnote sections and match reports per page
//! - **Parallel processing**: optional Rayon page parallelism with stable output order

pub mod detect;
pub mod driver;
pub mod error;
pub mod footnote;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use driver::{PageDriver, RunContext};
pub use error::{Error, Result};
pub use footnote::{FootnoteConfig, MatchReport, PageDiagnostics};
pub use model::{BBox, Block, ContentRow, Line, Page, PathPrimitive, RowSheet, Span};
pub use parser::{MemorySource, PageSelection, PageSource, ParseOptions, PdfSource};
pub use render::{JsonFormat, RenderFormat};

use std::io::Read;
use std::path::Path;

/// Process a PDF file into a row sheet.
///
/// # Example
///
/// ```no_run
/// use footsplit::process_file;
///
/// let rows = process_file("paper.pdf").unwrap();
/// println!("{} footnotes", rows.footnote_count());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<RowSheet> {
    Footsplit::new().process_file(path)
}

/// Process a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use footsplit::{process_file_with_options, PageSelection, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_pages(PageSelection::Range(1..=10))
///     .with_parallel(true);
/// let rows = process_file_with_options("paper.pdf", options).unwrap();
/// ```
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<RowSheet> {
    Footsplit::new().with_options(options).process_file(path)
}

/// Process a PDF held in memory.
pub fn process_bytes(data: &[u8]) -> Result<RowSheet> {
    Footsplit::new().process_bytes(data)
}

/// Process a PDF from a reader.
pub fn process_reader<R: Read>(reader: R) -> Result<RowSheet> {
    Footsplit::new().process_reader(reader)
}

/// Process pages that were laid out elsewhere.
///
/// # Example
///
/// ```
/// use footsplit::{process_pages, Page};
///
/// let rows = process_pages(vec![Page::letter(1)]).unwrap();
/// assert_eq!(rows.rows()[0].body, "**** Page 2 ****");
/// ```
pub fn process_pages(pages: Vec<Page>) -> Result<RowSheet> {
    Footsplit::new().process_pages(pages)
}

/// Builder for processing documents.
///
/// # Example
///
/// ```no_run
/// use footsplit::{Footsplit, FootnoteConfig, PageSelection, RenderFormat};
///
/// let output = Footsplit::new()
///     .with_config(FootnoteConfig::default().with_marker_font_ratio(0.8))
///     .with_pages(PageSelection::parse("1-5")?)
///     .parallel()
///     .process_file("paper.pdf")?;
/// let tsv = footsplit::render::render(&output, RenderFormat::Tsv)?;
/// # Ok::<(), footsplit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Footsplit {
    config: FootnoteConfig,
    options: ParseOptions,
}

impl Footsplit {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heuristic thresholds.
    pub fn with_config(mut self, config: FootnoteConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace all parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Process pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Process pages one at a time.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Build the page driver for these settings.
    pub fn driver(&self) -> PageDriver {
        PageDriver::new(self.config.clone(), self.options.clone())
    }

    /// Process a PDF file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<RowSheet> {
        let path = path.as_ref();
        let source = PdfSource::open(path).map_err(|e| {
            log::error!("{}: failed to open document: {}", path.display(), e);
            e
        })?;
        self.process_source(&source)
    }

    /// Process a PDF from bytes.
    pub fn process_bytes(&self, data: &[u8]) -> Result<RowSheet> {
        let source = PdfSource::from_bytes(data).map_err(|e| {
            log::error!("<memory>: failed to open document: {}", e);
            e
        })?;
        self.process_source(&source)
    }

    /// Process a PDF from a reader.
    pub fn process_reader<R: Read>(&self, reader: R) -> Result<RowSheet> {
        let source = PdfSource::from_reader(reader).map_err(|e| {
            log::error!("<reader>: failed to open document: {}", e);
            e
        })?;
        self.process_source(&source)
    }

    /// Process in-memory pages.
    pub fn process_pages(&self, pages: Vec<Page>) -> Result<RowSheet> {
        self.process_source(&MemorySource::new("<pages>", pages))
    }

    /// Process any page source.
    pub fn process_source<S: PageSource>(&self, source: &S) -> Result<RowSheet> {
        self.driver().run(source)
    }

    /// Collect per-page diagnostics for a PDF file.
    pub fn inspect_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PageDiagnostics>> {
        let source = PdfSource::open(path)?;
        self.driver().inspect_source(&source)
    }
}

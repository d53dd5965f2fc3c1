//! Error types for footsplit library.

use std::io;
use thiserror::Error;

/// Result type alias for footsplit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while turning a document into content rows.
///
/// Only failures to obtain page data are errors. Footnote heuristics that
/// do not match degrade the output and are logged instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// The layout of a page could not be reconstructed.
    #[error("Layout error: {0}")]
    Layout(String),

    /// A page could not be materialized; aborts the whole run.
    #[error("{document}: page {page}: {source}")]
    Page {
        /// Identifier of the document being processed
        document: String,
        /// 1-based page index in the source document
        page: u32,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Error while rendering the row sequence.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error with the document and page it occurred on.
    pub fn at_page(self, document: impl Into<String>, page: u32) -> Self {
        Error::Page {
            document: document.into(),
            page,
            source: Box::new(self),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

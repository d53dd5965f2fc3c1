//! Page sources feeding the footnote pipeline.
//!
//! A [`PageSource`] materializes one [`Page`] at a time. [`PdfSource`] reads
//! pages out of a PDF through a [`PdfBackend`]; [`MemorySource`] serves pages
//! that were built elsewhere.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Page;

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::build_page;

/// Anything that can hand out pages of a document by number.
pub trait PageSource {
    /// Identifier used in logs and errors (usually the file name).
    fn document_id(&self) -> &str;

    /// Page numbers available from this source, ascending (1-indexed).
    fn page_numbers(&self) -> Vec<u32>;

    /// Materialize one page.
    fn load_page(&self, number: u32) -> Result<Page>;
}

/// Pages read from a PDF document.
pub struct PdfSource<B: PdfBackend = LopdfBackend> {
    backend: B,
    document_id: String,
}

impl PdfSource<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::new(backend, path.display().to_string()))
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::new(LopdfBackend::load_bytes(data)?, "<memory>"))
    }

    /// Read a PDF from a reader.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(Self::new(LopdfBackend::load_reader(reader)?, "<reader>"))
    }
}

impl<B: PdfBackend> PdfSource<B> {
    /// Wrap an existing backend.
    pub fn new(backend: B, document_id: impl Into<String>) -> Self {
        Self {
            backend,
            document_id: document_id.into(),
        }
    }

    /// Access the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: PdfBackend> PageSource for PdfSource<B> {
    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn page_numbers(&self) -> Vec<u32> {
        self.backend.pages().keys().copied().collect()
    }

    fn load_page(&self, number: u32) -> Result<Page> {
        let pages = self.backend.pages();
        let page_id = pages
            .get(&number)
            .ok_or(Error::PageOutOfRange(number, pages.len() as u32))?;
        build_page(&self.backend, number, *page_id)
    }
}

/// Pages already held in memory.
///
/// Pages are addressed by position: page `n` is the `n`-th page handed to
/// [`MemorySource::new`], whatever its own `number` says.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    document_id: String,
    pages: Vec<Page>,
}

impl MemorySource {
    /// Create a source over the given pages.
    pub fn new(document_id: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            document_id: document_id.into(),
            pages,
        }
    }
}

impl PageSource for MemorySource {
    fn document_id(&self) -> &str {
        &self.document_id
    }

    fn page_numbers(&self) -> Vec<u32> {
        (1..=self.pages.len() as u32).collect()
    }

    fn load_page(&self, number: u32) -> Result<Page> {
        number
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_is_positional() {
        let source = MemorySource::new("mem", vec![Page::letter(3), Page::letter(1)]);
        assert_eq!(source.document_id(), "mem");
        assert_eq!(source.page_numbers(), vec![1, 2]);
        assert_eq!(source.load_page(1).unwrap().number, 3);
        assert_eq!(source.load_page(2).unwrap().number, 1);
    }

    #[test]
    fn test_memory_source_keeps_duplicate_numbers() {
        let mut first = Page::letter(1);
        first.width = 500.0;
        let second = Page::letter(1);
        let source = MemorySource::new("mem", vec![first, second]);

        assert_eq!(source.page_numbers(), vec![1, 2]);
        assert_eq!(source.load_page(1).unwrap().width, 500.0);
        assert_eq!(source.load_page(2).unwrap().width, 612.0);
    }

    #[test]
    fn test_memory_source_missing_page() {
        let source = MemorySource::new("mem", vec![Page::letter(1)]);
        assert!(matches!(
            source.load_page(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
        assert!(matches!(
            source.load_page(0),
            Err(Error::PageOutOfRange(0, 1))
        ));
    }
}

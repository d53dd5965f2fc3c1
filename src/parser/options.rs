//! Parsing options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options controlling which pages are processed and how.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Page selection (which pages to process)
    pub pages: PageSelection,

    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            pages: PageSelection::All,
            parallel: false,
        }
    }
}

/// Page selection (1-indexed page numbers).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());
        let number = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (number(start)?, number(end)?);
                if start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(number(start)?..=number(end)?),
                None => pages.push(number(part)?),
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

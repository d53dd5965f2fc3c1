//! Page driver: runs the footnote pipeline over a document's pages.

use rayon::prelude::*;

use crate::error::Result;
use crate::footnote::{self, FootnoteConfig, PageDiagnostics};
use crate::model::{ContentRow, Page, RowSheet};
use crate::parser::{PageSource, ParseOptions};

/// Per-run state.
///
/// Created fresh for every call to [`PageDriver::run`], so nothing carries
/// over between documents processed by the same driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    next_marker: u32,
}

impl RunContext {
    /// Start a run whose first page-boundary row carries `first_marker`.
    pub fn new(first_marker: u32) -> Self {
        Self {
            next_marker: first_marker,
        }
    }

    /// Counter the next page-boundary row will carry.
    pub fn next_marker(&self) -> u32 {
        self.next_marker
    }

    /// Hand out the current counter and advance it.
    fn advance(&mut self) -> u32 {
        let counter = self.next_marker;
        self.next_marker += 1;
        counter
    }
}

/// Drives extraction and organization page by page.
///
/// # Example
///
/// ```
/// use footsplit::driver::PageDriver;
/// use footsplit::model::Page;
/// use footsplit::parser::MemorySource;
///
/// let source = MemorySource::new("blank", vec![Page::letter(1), Page::letter(2)]);
/// let rows = PageDriver::default().run(&source)?;
/// assert_eq!(rows.page_marker_count(), 2);
/// # Ok::<(), footsplit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageDriver {
    config: FootnoteConfig,
    options: ParseOptions,
}

impl PageDriver {
    /// Create a driver.
    pub fn new(config: FootnoteConfig, options: ParseOptions) -> Self {
        Self { config, options }
    }

    /// Heuristic thresholds in use.
    pub fn config(&self) -> &FootnoteConfig {
        &self.config
    }

    /// Page selection and execution mode in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Process every selected page of `source` and return the row sheet.
    ///
    /// A page that cannot be loaded aborts the run; no rows are returned.
    pub fn run<S: PageSource>(&self, source: &S) -> Result<RowSheet> {
        let numbers = self.selected_pages(source);
        log::debug!(
            "{}: processing {} pages{}",
            source.document_id(),
            numbers.len(),
            if self.options.parallel {
                " in parallel"
            } else {
                ""
            }
        );

        if self.options.parallel {
            self.run_parallel(source, &numbers)
        } else {
            self.run_sequential(source, &numbers)
        }
    }

    /// Extract and organize one page, closing it with a page-boundary row.
    pub fn process_page(&self, page: &Page, counter: u32) -> RowSheet {
        let mut rows = RowSheet::new();
        let extraction = footnote::process_page(page, &self.config, &mut rows);

        let report = footnote::validate_matching(&extraction.footnotes, &extraction.references);
        for number in &report.orphaned {
            log::warn!(
                "Page {}: footnote {} has no matching reference",
                page.number,
                number
            );
        }

        rows.push(ContentRow::page_marker(counter));
        rows
    }

    /// Collect diagnostics for one page without emitting rows.
    pub fn inspect(&self, page: &Page) -> PageDiagnostics {
        let diagnostics = footnote::inspect_page(page, &self.config);
        log::debug!(
            "Page {}: {} separator candidates, section {}",
            page.number,
            diagnostics.separators.len(),
            if diagnostics.section.is_some() {
                "found"
            } else {
                "not found"
            }
        );
        diagnostics
    }

    /// Load and inspect every selected page of `source`.
    pub fn inspect_source<S: PageSource>(&self, source: &S) -> Result<Vec<PageDiagnostics>> {
        let pages = self.load_pages(source, &self.selected_pages(source))?;
        Ok(pages.iter().map(|page| self.inspect(page)).collect())
    }

    fn selected_pages<S: PageSource>(&self, source: &S) -> Vec<u32> {
        source
            .page_numbers()
            .into_iter()
            .filter(|n| self.options.pages.includes(*n))
            .collect()
    }

    fn load_page<S: PageSource>(&self, source: &S, number: u32) -> Result<Page> {
        source.load_page(number).map_err(|e| {
            log::error!(
                "{}: failed to load page {}: {}",
                source.document_id(),
                number,
                e
            );
            e.at_page(source.document_id(), number)
        })
    }

    fn load_pages<S: PageSource>(&self, source: &S, numbers: &[u32]) -> Result<Vec<Page>> {
        numbers
            .iter()
            .map(|&number| self.load_page(source, number))
            .collect()
    }

    fn run_sequential<S: PageSource>(&self, source: &S, numbers: &[u32]) -> Result<RowSheet> {
        let mut context = RunContext::new(self.config.first_page_marker);
        let mut sheet = RowSheet::new();

        for &number in numbers {
            let page = self.load_page(source, number)?;
            sheet.append(self.process_page(&page, context.advance()));
        }

        Ok(sheet)
    }

    /// Pages are materialized up front, processed concurrently, then
    /// concatenated in index order. Counters come from the page index.
    fn run_parallel<S: PageSource>(&self, source: &S, numbers: &[u32]) -> Result<RowSheet> {
        let pages = self.load_pages(source, numbers)?;
        let first = self.config.first_page_marker;

        let batches: Vec<RowSheet> = pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| self.process_page(page, first + index as u32))
            .collect();

        let mut sheet = RowSheet::new();
        for batch in batches {
            sheet.append(batch);
        }
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{BBox, Block, Line, Span};
    use crate::parser::{MemorySource, PageSelection};

    fn text_page(number: u32, text: &str) -> Page {
        let mut page = Page::new(number, 600.0, 800.0);
        page.add_block(Block::new(vec![Line::new(vec![Span::new(
            text,
            BBox::new(72.0, 100.0, 300.0, 112.0),
            12.0,
        )])]));
        page
    }

    /// Source whose listed pages include one it cannot load.
    struct BrokenSource;

    impl PageSource for BrokenSource {
        fn document_id(&self) -> &str {
            "broken.pdf"
        }

        fn page_numbers(&self) -> Vec<u32> {
            vec![1, 2]
        }

        fn load_page(&self, number: u32) -> Result<Page> {
            if number == 2 {
                Err(Error::PdfParse("bad content stream".to_string()))
            } else {
                Ok(text_page(number, "fine"))
            }
        }
    }

    #[test]
    fn test_run_context_advances() {
        let mut context = RunContext::new(2);
        assert_eq!(context.advance(), 2);
        assert_eq!(context.advance(), 3);
        assert_eq!(context.next_marker(), 4);
    }

    #[test]
    fn test_counter_resets_per_run() {
        let driver = PageDriver::default();
        let source = MemorySource::new("doc", vec![text_page(1, "One")]);

        let first = driver.run(&source).unwrap();
        let second = driver.run(&source).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.rows().last().unwrap().page_counter(), Some(2));
    }

    #[test]
    fn test_page_marker_is_last_row() {
        let driver = PageDriver::default();
        let rows = driver.process_page(&text_page(1, "Hello"), 7);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[0].body, "Hello");
        assert_eq!(rows.rows()[1].page_counter(), Some(7));
    }

    #[test]
    fn test_selection_counts_processed_pages() {
        let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![2, 3]));
        let driver = PageDriver::new(FootnoteConfig::default(), options);
        let source = MemorySource::new(
            "doc",
            vec![text_page(1, "a"), text_page(2, "b"), text_page(3, "c")],
        );

        let rows = driver.run(&source).unwrap();
        let counters: Vec<u32> = rows.iter().filter_map(|r| r.page_counter()).collect();
        let bodies: Vec<&str> = rows
            .iter()
            .filter(|r| !r.is_page_marker())
            .map(|r| r.body.as_str())
            .collect();

        assert_eq!(counters, vec![2, 3]);
        assert_eq!(bodies, vec!["b", "c"]);
    }

    #[test]
    fn test_load_failure_aborts_run() {
        for parallel in [false, true] {
            let options = ParseOptions::new().with_parallel(parallel);
            let driver = PageDriver::new(FootnoteConfig::default(), options);

            let err = driver.run(&BrokenSource).unwrap_err();
            match err {
                Error::Page { document, page, .. } => {
                    assert_eq!(document, "broken.pdf");
                    assert_eq!(page, 2);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<Page> = (1..=6)
            .map(|n| text_page(n, &format!("Page body {n}")))
            .collect();
        let source = MemorySource::new("doc", pages);

        let sequential = PageDriver::default().run(&source).unwrap();
        let parallel = PageDriver::new(
            FootnoteConfig::default(),
            ParseOptions::new().with_parallel(true),
        )
        .run(&source)
        .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_custom_first_marker() {
        let config = FootnoteConfig::default().with_first_page_marker(1);
        let driver = PageDriver::new(config, ParseOptions::default());
        let source = MemorySource::new("doc", vec![Page::letter(1)]);

        let rows = driver.run(&source).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows()[0].page_counter(), Some(1));
    }

    #[test]
    fn test_inspect_source() {
        let driver = PageDriver::default();
        let source = MemorySource::new("doc", vec![text_page(1, "x"), text_page(2, "y")]);

        let diagnostics = driver.inspect_source(&source).unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].page, 2);
        assert!(diagnostics[0].separators.is_empty());
        assert!(diagnostics[0].report.is_complete());
    }
}

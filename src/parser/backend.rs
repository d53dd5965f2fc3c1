//! PDF backend abstraction layer.
//!
//! The layout builder only needs page enumeration, page geometry, content
//! stream operations and text decoding. [`PdfBackend`] exposes exactly that,
//! so the footnote pipeline never touches lopdf types directly.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, Stream};

use crate::detect::pdf_version_from_bytes;
use crate::error::{Error, Result};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page has no readable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Upper bound on `/Parent` hops when resolving inherited page attributes.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of an integer or real operand.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<PdfValue>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`, if present.
    pub fn number(&self, index: usize) -> Option<f32> {
        self.operands.get(index).and_then(PdfValue::as_number)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the page width and height in points.
    fn page_size(&self, page: PageId) -> Result<(f32, f32)>;

    /// Return the decoded content stream operations of a page.
    fn page_operations(&self, page: PageId) -> Result<Vec<ContentOp>>;

    /// Decode a text byte sequence using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        pdf_version_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text may not decode");
        }
        Ok(Self { doc })
    }

    /// Load from a reader.
    pub fn load_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_stream(&self, page_id: PageId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank, not broken.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(stream_content(s)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            content.extend_from_slice(&stream_content(s));
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    /// Look up a page attribute, following `/Parent` links for inherited
    /// values such as `/MediaBox`.
    fn inherited_attribute(&self, page_id: PageId, key: &[u8]) -> Option<&Object> {
        let mut dict: &Dictionary = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_PAGE_TREE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }
}

/// Stream bytes with filters applied. Unfiltered streams, and streams whose
/// filter lopdf cannot undo, yield their raw content.
fn stream_content(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_size(&self, page_id: PageId) -> Result<(f32, f32)> {
        self.doc.get_dictionary(page_id)?;
        let media_box = self
            .inherited_attribute(page_id, b"MediaBox")
            .and_then(|o| match o {
                Object::Reference(r) => self.doc.get_object(*r).ok(),
                other => Some(other),
            })
            .and_then(|o| o.as_array().ok());

        match media_box {
            Some(array) if array.len() >= 4 => {
                let coord = |i: usize| array[i].as_float().unwrap_or(0.0);
                Ok(((coord(2) - coord(0)).abs(), (coord(3) - coord(1)).abs()))
            }
            _ => {
                log::debug!("Page {:?} has no MediaBox, assuming Letter", page_id);
                Ok(DEFAULT_PAGE_SIZE)
            }
        }
    }

    fn page_operations(&self, page_id: PageId) -> Result<Vec<ContentOp>> {
        let data = self.page_stream(page_id)?;
        let content =
            lopdf::content::Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(lopdf_fonts) = self.doc.get_page_fonts(page) {
            if let Some(font_dict) = lopdf_fonts.get(font_name) {
                if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Convert a `lopdf::Object` to [`PdfValue`].
fn convert_object(obj: &Object) -> PdfValue {
    match obj {
        Object::Integer(i) => PdfValue::Integer(*i),
        Object::Real(r) => PdfValue::Real(*r),
        Object::Name(n) => PdfValue::Name(n.clone()),
        Object::String(b, _) => PdfValue::Str(b.clone()),
        Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        _ => PdfValue::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_operand_numbers() {
        let op = ContentOp::new(
            "Td",
            vec![PdfValue::Integer(72), PdfValue::Real(1.5), PdfValue::Other],
        );
        assert_eq!(op.number(0), Some(72.0));
        assert_eq!(op.number(1), Some(1.5));
        assert_eq!(op.number(2), None);
        assert_eq!(op.number(3), None);
    }

    #[test]
    fn test_load_rejects_non_pdf() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"plain text, not a document"),
            Err(Error::UnknownFormat)
        ));
    }
}

//! PDF header sniffing.
//!
//! Documents are checked before lopdf sees them so that a wrong input file
//! fails with [`Error::UnknownFormat`] instead of an opaque parse error.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // "1.7"

/// Read the header of a file and return its PDF version.
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = [0u8; 16];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    pdf_version_from_bytes(&header[..read])
}

/// Return the PDF version declared by the `%PDF-x.y` header.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    if rest.len() < VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&rest[..VERSION_LEN]).to_string();
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(version),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Check if bytes start with a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

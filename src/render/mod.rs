//! Rendering module for writing row sheets in output formats.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::to_tsv;

use crate::error::Result;
use crate::model::RowSheet;

/// Output format for a row sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    /// JSON array of records
    Json(JsonFormat),
    /// Tab-separated values with a header row
    #[default]
    Tsv,
}

impl RenderFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Json(_) => "json",
            RenderFormat::Tsv => "tsv",
        }
    }
}

/// Render a row sheet in the given format.
pub fn render(rows: &RowSheet, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Json(json) => to_json(rows, json),
        RenderFormat::Tsv => Ok(to_tsv(rows)),
    }
}

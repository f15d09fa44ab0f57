//! Run summary.

use std::path::PathBuf;

/// What a pipeline run produced.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct RunSummary {
    /// Source document
    pub document: PathBuf,
    /// Pages rendered
    pub page_count: usize,
    /// Glyph records written to the report
    pub glyph_count: usize,
    /// Span records per page, in page order
    pub spans_per_page: Vec<usize>,
    /// Images recognized by OCR; `None` when OCR is disabled
    pub ocr_pages_recognized: Option<usize>,
    /// Text runs from the metadata tool; `None` when disabled
    pub metadata_runs: Option<usize>,
    /// Files written, in the order they were written
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    /// Total span records across all pages.
    pub fn span_count(&self) -> usize {
        self.spans_per_page.iter().sum()
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

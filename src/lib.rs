// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Glyphmap
//!
//! Character-level PDF inspection: every glyph of a document gets a stable
//! fingerprint, every page gets a raster, and an HTML overlay puts hoverable
//! span metadata on top of the rasters.
//!
//! ## Artifacts
//!
//! - **Glyph report** (`unicode_characters.txt`): one line per glyph with its
//!   fingerprint, code point, font size and bottom-left anchored position
//! - **Layout text** (`output_text.txt`): text of the horizontal lines
//! - **Page rasters** (`images/page_{n}.png`): one image per page, 1-based
//! - **Overlay** (`output_text.html`): page rasters with one hoverable box per span
//! - **OCR text** (`ocr_text.txt`, optional): tesseract output per raster
//! - **Metadata** (`metadata.json`, optional): text runs from `pdftohtml -xml`
//!
//! ## Architecture
//!
//! The document is read through two capability interfaces that are never
//! reconciled: [`backend::LayoutSource`] yields the layout tree walked for
//! glyphs, [`backend::RenderEngine`] yields rasters and the span view used by
//! the overlay. The default backend is PDFium (feature `pdfium`).
//!
//! Positions carry their coordinate frame ([`geometry::Position`]) and move
//! between frames only through named conversions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_glyphmap::{Pipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::new()
//!     .with_document("pdfs/document.pdf")
//!     .with_ocr(false);
//! let summary = Pipeline::new(config).run()?;
//! println!("{} glyphs on {} pages", summary.glyph_count, summary.page_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and coordinate frames
pub mod geometry;

// Glyph identity
pub mod fingerprint;

// Document access
pub mod backend;

// Layout tree and glyph extraction
pub mod layout;

// Page rendering to images
pub mod rendering;

// Span projection from the rendering engine's text view
pub mod projection;

// Output converters (overlay)
pub mod converters;

// Text reports and atomic writes
pub mod report;

// External collaborators
pub mod metadata;
pub mod ocr;

// Pipeline orchestration
pub mod pipeline;

// Re-exports
pub use backend::{LayoutSource, RenderEngine};
pub use config::PipelineConfig;
pub use error::{Error, Result, Stage};
pub use fingerprint::fingerprint;
pub use layout::GlyphRecord;
pub use pipeline::{Pipeline, RunSummary};
pub use projection::SpanRecord;
pub use rendering::PageRaster;

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Compare two floats, ordering NaN after every number.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Output converters.
//!
//! - **Overlay**: HTML document with page images and hoverable span regions
//!
//! # Examples
//!
//! ```ignore
//! use pdf_glyphmap::converters::OverlayRenderer;
//!
//! let renderer = OverlayRenderer::new();
//! renderer.render(&rasters, &span_map, "output/output_text.html".as_ref())?;
//! ```

pub mod overlay;

// Re-export main types
pub use overlay::{OverlayRenderer, escape_html, unicode_list};

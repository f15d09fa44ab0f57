//! Page rendering module for converting document pages to images.
//!
//! Pages are rendered through a [`crate::backend::RenderEngine`] at a fixed
//! resolution and written to `page_{ordinal}.{ext}` with a 1-based ordinal.
//! Each [`PageRaster`] records the page's layout-space size next to the image
//! path; the overlay sizes its page containers from that, not from pixels.
//!
//! ## Example
//!
//! ```ignore
//! use pdf_glyphmap::rendering::{PageRasterizer, RenderOptions};
//!
//! let rasterizer = PageRasterizer::new(RenderOptions::with_dpi(150));
//! let rasters = rasterizer.rasterize(&document, "images".as_ref())?;
//! ```

mod page_renderer;

pub use page_renderer::{ImageFormat, PageRaster, PageRasterizer, RenderOptions, page_image_name};

use crate::backend::RenderEngine;
use crate::error::Result;
use std::path::Path;

/// Render all pages of a document into `output_dir`.
///
/// This is a convenience function that creates a [`PageRasterizer`].
pub fn rasterize(
    engine: &dyn RenderEngine,
    output_dir: &Path,
    options: &RenderOptions,
) -> Result<Vec<PageRaster>> {
    PageRasterizer::new(options.clone()).rasterize(engine, output_dir)
}

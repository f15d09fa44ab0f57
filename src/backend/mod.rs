//! Capability interfaces over the source document.
//!
//! The crate reads a document through two independent views:
//!
//! - [`LayoutSource`]: the layout parser. Pages of text containers, text lines
//!   and characters, positioned in the bottom-left anchored layout frame.
//! - [`RenderEngine`]: the rendering engine. Page rasters plus a structured
//!   text view (block → line → span) positioned in the top-left anchored frame.
//!
//! The two views are never reconciled; they may disagree in granularity and
//! in coordinate convention. A backend may implement both on the same document
//! as long as each view is produced by its own traversal.

pub mod structured;

#[cfg(feature = "pdfium")]
pub mod pdfium;

use crate::error::Result;
use crate::geometry::{PageSize, Rect};
use crate::layout::{LayoutBox, LayoutPage};
use crate::rendering::RenderOptions;

pub use structured::build_structured_page;

/// A character as reported by a backend, before any grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedChar {
    /// Unicode text of the glyph (may be empty or hold several code points)
    pub text: String,
    /// Glyph box, bottom-left anchored
    pub bbox: LayoutBox,
    /// Font name
    pub font_name: String,
    /// Font size in layout units
    pub font_size: f32,
}

/// A run of text sharing one font and size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Span text (may be empty)
    pub text: String,
    /// Bounding box, top-left anchored layout frame
    pub bbox: Rect,
    /// Font name
    pub font: String,
    /// Font size in layout units
    pub size: f32,
}

/// A line of spans.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredLine {
    /// Bounding box, top-left anchored layout frame
    pub bbox: Rect,
    /// Spans in engine order
    pub spans: Vec<TextSpan>,
}

/// A block of the structured text view.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredBlock {
    /// Block of text lines
    Text {
        /// Bounding box, top-left anchored layout frame
        bbox: Rect,
        /// Lines in engine order
        lines: Vec<StructuredLine>,
    },
    /// Image block; carries no lines
    Image {
        /// Bounding box, top-left anchored layout frame
        bbox: Rect,
    },
}

/// Structured text view of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPage {
    /// Layout-space page size
    pub size: PageSize,
    /// Blocks in engine order
    pub blocks: Vec<StructuredBlock>,
}

impl StructuredPage {
    /// Iterate over all spans in block → line → span order.
    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                StructuredBlock::Text { lines, .. } => Some(lines),
                StructuredBlock::Image { .. } => None,
            })
            .flatten()
            .flat_map(|line| line.spans.iter())
    }
}

/// Document-layout parser.
pub trait LayoutSource {
    /// Parse the layout tree of every page, in document order.
    ///
    /// Fails with [`crate::Error::DocumentAccess`] when the document cannot
    /// be read; no partial result is returned.
    fn layout_pages(&self) -> Result<Vec<LayoutPage>>;
}

/// Document rendering engine.
pub trait RenderEngine {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Layout-space size of a page.
    fn page_size(&self, page_index: usize) -> Result<PageSize>;

    /// Render a page to a raster image.
    fn render_page(&self, page_index: usize, options: &RenderOptions)
    -> Result<image::DynamicImage>;

    /// Structured text view (block → line → span) of a page.
    fn structured_text(&self, page_index: usize) -> Result<StructuredPage>;
}

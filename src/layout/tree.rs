//! Layout tree produced by the layout parser.
//!
//! A page holds a list of [`LayoutElement`]s. Text containers hold text lines,
//! text lines hold characters; everything else on the page is [`LayoutElement::Other`].
//! All boxes in this module use the bottom-left anchored layout frame.

use crate::geometry::{PageSize, Point, Position};

/// Axis-aligned box with a bottom-left origin (`y1 > y0` is the upper edge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    /// Left edge
    pub x0: f32,
    /// Lower edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Upper edge
    pub y1: f32,
}

impl LayoutBox {
    /// Create a box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Lower-left corner as a tagged position.
    pub fn origin(&self) -> Position {
        Position::LayoutBottomLeft(Point::new(self.x0, self.y0))
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &LayoutBox) -> LayoutBox {
        LayoutBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Length of the vertical overlap with `other` (0 when disjoint).
    pub fn vertical_overlap(&self, other: &LayoutBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Length of the horizontal overlap with `other` (0 when disjoint).
    pub fn horizontal_overlap(&self, other: &LayoutBox) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Horizontal gap to `other` (0 when overlapping).
    pub fn horizontal_distance(&self, other: &LayoutBox) -> f32 {
        (self.x0.max(other.x0) - self.x1.min(other.x1)).max(0.0)
    }

    /// Vertical gap to `other` (0 when overlapping).
    pub fn vertical_distance(&self, other: &LayoutBox) -> f32 {
        (self.y0.max(other.y0) - self.y1.min(other.y1)).max(0.0)
    }
}

/// Direction text flows within a line or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritingMode {
    /// Left to right along a horizontal baseline
    #[default]
    Horizontal,
    /// Top to bottom along a vertical baseline
    Vertical,
}

/// Non-text page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtherKind {
    /// Raster image
    Image,
    /// Vector path (curves, rules, rectangles)
    Curve,
    /// Form XObject or other grouped content
    Figure,
    /// Anything the backend could not classify
    Unknown,
}

/// A character-level element.
///
/// `text` may hold more than one code point (ligatures, multi-codepoint
/// mappings) or be empty when the font has no Unicode mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutChar {
    /// Extracted text
    pub text: String,
    /// Glyph box
    pub bbox: LayoutBox,
    /// Font name
    pub font_name: String,
    /// Font size in layout units
    pub font_size: f32,
}

/// A line of characters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Flow direction
    pub writing_mode: WritingMode,
    /// Bounding box
    pub bbox: LayoutBox,
    /// Children, normally [`LayoutElement::Character`]
    pub children: Vec<LayoutElement>,
}

/// A group of text lines (a paragraph-like box).
#[derive(Debug, Clone, PartialEq)]
pub struct TextContainer {
    /// Flow direction
    pub writing_mode: WritingMode,
    /// Bounding box
    pub bbox: LayoutBox,
    /// Children, normally [`LayoutElement::TextLine`]
    pub children: Vec<LayoutElement>,
}

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    /// Text box
    TextContainer(TextContainer),
    /// Text line
    TextLine(TextLine),
    /// Single character
    Character(LayoutChar),
    /// Image, curve or any other non-text content
    Other {
        /// What the element is
        kind: OtherKind,
        /// Where it is
        bbox: LayoutBox,
    },
}

impl LayoutElement {
    /// Bounding box of the element.
    pub fn bbox(&self) -> LayoutBox {
        match self {
            LayoutElement::TextContainer(c) => c.bbox,
            LayoutElement::TextLine(l) => l.bbox,
            LayoutElement::Character(ch) => ch.bbox,
            LayoutElement::Other { bbox, .. } => *bbox,
        }
    }
}

/// One page of the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    /// Zero-based page index
    pub index: usize,
    /// Layout-space page size
    pub size: PageSize,
    /// Top-level elements in document order
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Create an empty page.
    pub fn new(index: usize, size: PageSize) -> Self {
        Self {
            index,
            size,
            elements: Vec::new(),
        }
    }
}

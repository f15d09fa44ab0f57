//! Geometric primitives and coordinate frames.
//!
//! Two independent text views meet in this crate: the layout tree reports
//! positions with a bottom-left origin, while the structured text view and the
//! overlay use a top-left origin. Every position that crosses a module boundary
//! is carried as a [`Position`] tagged with its frame, and moves between frames
//! only through the named conversions below.

/// A 2D point, frame-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_glyphmap::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Layout-space size of a page, in points.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSize {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A rectangle anchored at its top-left corner (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its (left, top, right, bottom) edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_glyphmap::geometry::Rect;
    ///
    /// let rect = Rect::from_edges(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The four edges as (left, top, right, bottom).
    pub fn edges(&self) -> [f32; 4] {
        [self.left(), self.top(), self.right(), self.bottom()]
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }
}

/// Coordinate frame a position is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Page space, origin at the bottom-left corner, y grows upward
    LayoutBottomLeft,
    /// Page space, origin at the top-left corner, y grows downward
    LayoutTopLeft,
    /// Output pixel space, origin at the top-left corner
    Pixel,
}

/// Scale between layout units and output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapping {
    /// Pixels per layout unit
    pub scale: f32,
}

impl PixelMapping {
    /// One layout unit maps to one CSS pixel; used by the overlay.
    pub fn css_identity() -> Self {
        Self { scale: 1.0 }
    }

    /// Mapping for a raster rendered at `dpi` (layout space is 72 units per inch).
    pub fn from_dpi(dpi: u32) -> Self {
        Self {
            scale: dpi as f32 / 72.0,
        }
    }

    /// Pixel dimensions of a page rendered with this mapping.
    pub fn pixel_size(&self, page: PageSize) -> (u32, u32) {
        (
            (page.width * self.scale).ceil().max(0.0) as u32,
            (page.height * self.scale).ceil().max(0.0) as u32,
        )
    }
}

/// A position tagged with the frame it was measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Bottom-left anchored layout coordinates
    LayoutBottomLeft(Point),
    /// Top-left anchored layout coordinates
    LayoutTopLeft(Point),
    /// Pixel coordinates
    Pixel(Point),
}

impl Position {
    /// Frame of this position.
    pub fn frame(&self) -> Frame {
        match self {
            Position::LayoutBottomLeft(_) => Frame::LayoutBottomLeft,
            Position::LayoutTopLeft(_) => Frame::LayoutTopLeft,
            Position::Pixel(_) => Frame::Pixel,
        }
    }

    /// Raw coordinates in this position's own frame.
    pub fn point(&self) -> Point {
        match *self {
            Position::LayoutBottomLeft(p) | Position::LayoutTopLeft(p) | Position::Pixel(p) => p,
        }
    }

    /// Convert to top-left anchored layout coordinates.
    ///
    /// Pixel positions are mapped back with the identity mapping; use
    /// [`Position::from_pixel`] when the raster scale differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_glyphmap::geometry::{PageSize, Point, Position};
    ///
    /// let page = PageSize::new(612.0, 792.0);
    /// let glyph = Position::LayoutBottomLeft(Point::new(72.0, 700.0));
    /// let converted = glyph.to_layout_top_left(page);
    /// assert_eq!(converted, Position::LayoutTopLeft(Point::new(72.0, 92.0)));
    /// ```
    pub fn to_layout_top_left(self, page: PageSize) -> Position {
        match self {
            Position::LayoutBottomLeft(p) => {
                Position::LayoutTopLeft(Point::new(p.x, page.height - p.y))
            },
            Position::LayoutTopLeft(_) => self,
            Position::Pixel(p) => Position::LayoutTopLeft(p),
        }
    }

    /// Convert to bottom-left anchored layout coordinates.
    pub fn to_layout_bottom_left(self, page: PageSize) -> Position {
        match self.to_layout_top_left(page) {
            Position::LayoutTopLeft(p) => {
                Position::LayoutBottomLeft(Point::new(p.x, page.height - p.y))
            },
            other => other,
        }
    }

    /// Convert to pixel coordinates under `mapping`.
    pub fn to_pixel(self, page: PageSize, mapping: PixelMapping) -> Position {
        match self {
            Position::Pixel(_) => self,
            layout => {
                let p = layout.to_layout_top_left(page).point();
                Position::Pixel(Point::new(p.x * mapping.scale, p.y * mapping.scale))
            },
        }
    }

    /// Map a pixel position back into top-left layout coordinates.
    pub fn from_pixel(self, mapping: PixelMapping) -> Position {
        match self {
            Position::Pixel(p) if mapping.scale > 0.0 => {
                Position::LayoutTopLeft(Point::new(p.x / mapping.scale, p.y / mapping.scale))
            },
            other => other,
        }
    }
}

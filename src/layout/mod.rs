//! Layout tree, layout analysis and glyph extraction.
//!
//! - [`tree`]: tagged-variant layout elements (text container, text line, character, other)
//! - [`analyzer`]: groups positioned characters into lines and containers
//! - [`walker`]: walks horizontal text and yields one [`GlyphRecord`] per code point

pub mod analyzer;
pub mod tree;
pub mod walker;

// Re-export main types
pub use analyzer::{LayoutParams, analyze_page};
pub use tree::{
    LayoutBox, LayoutChar, LayoutElement, LayoutPage, OtherKind, TextContainer, TextLine,
    WritingMode,
};
pub use walker::{GlyphRecord, extract_glyphs, extract_text, glyphs_from_pages};

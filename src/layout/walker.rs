//! Glyph extraction from the layout tree.
//!
//! Only horizontal text containers and the horizontal text lines inside them
//! are visited. Vertical text, images, curves and any character that is not
//! nested in a horizontal line inside a horizontal container are skipped.
//!
//! A character element whose text spans several code points yields one glyph
//! per code point, all sharing the element's position and font size. Positions
//! are not subdivided within such an element.

use crate::backend::LayoutSource;
use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::geometry::Position;
use crate::layout::tree::{LayoutChar, LayoutElement, LayoutPage, WritingMode};

/// One occurrence of a Unicode character on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord {
    /// Fingerprint over (code point, x, y, page index)
    pub fingerprint: String,
    /// The character
    pub character: char,
    /// Code point of `character`
    pub unicode_value: u32,
    /// Font size in layout units
    pub font_size: f32,
    /// Lower-left corner of the character element (bottom-left frame)
    pub origin: Position,
    /// Zero-based page index
    pub page_index: usize,
}

impl GlyphRecord {
    /// X coordinate in the bottom-left layout frame.
    pub fn x(&self) -> f32 {
        self.origin.point().x
    }

    /// Y coordinate in the bottom-left layout frame.
    pub fn y(&self) -> f32 {
        self.origin.point().y
    }
}

/// Extract every glyph of the document, page by page.
///
/// Fails without partial results when the layout source cannot be read.
pub fn extract_glyphs(source: &dyn LayoutSource) -> Result<Vec<GlyphRecord>> {
    let pages = source.layout_pages()?;
    let glyphs = glyphs_from_pages(&pages);
    log::info!("Total glyphs extracted: {}", glyphs.len());
    Ok(glyphs)
}

/// Extract glyphs from an already parsed layout tree.
pub fn glyphs_from_pages(pages: &[LayoutPage]) -> Vec<GlyphRecord> {
    let mut glyphs = Vec::new();
    for (page_index, page) in pages.iter().enumerate() {
        let before = glyphs.len();
        for ch in horizontal_chars(page) {
            push_glyphs(&mut glyphs, ch, page_index);
        }
        log::debug!("Page {}: {} glyphs", page_index, glyphs.len() - before);
    }
    glyphs
}

fn push_glyphs(glyphs: &mut Vec<GlyphRecord>, ch: &LayoutChar, page_index: usize) {
    if ch.text.is_empty() {
        return;
    }
    let origin = ch.bbox.origin();
    let point = origin.point();
    for character in ch.text.chars() {
        let unicode_value = character as u32;
        glyphs.push(GlyphRecord {
            fingerprint: fingerprint(unicode_value, point.x, point.y, page_index),
            character,
            unicode_value,
            font_size: ch.font_size,
            origin,
            page_index,
        });
    }
}

/// Lines of horizontal text, in traversal order.
fn horizontal_lines(page: &LayoutPage) -> impl Iterator<Item = &[LayoutElement]> {
    page.elements
        .iter()
        .filter_map(|element| match element {
            LayoutElement::TextContainer(container)
                if container.writing_mode == WritingMode::Horizontal =>
            {
                Some(container.children.as_slice())
            },
            LayoutElement::TextContainer(_)
            | LayoutElement::TextLine(_)
            | LayoutElement::Character(_)
            | LayoutElement::Other { .. } => None,
        })
        .flatten()
        .filter_map(|child| match child {
            LayoutElement::TextLine(line) if line.writing_mode == WritingMode::Horizontal => {
                Some(line.children.as_slice())
            },
            LayoutElement::TextLine(_)
            | LayoutElement::TextContainer(_)
            | LayoutElement::Character(_)
            | LayoutElement::Other { .. } => None,
        })
}

fn horizontal_chars(page: &LayoutPage) -> impl Iterator<Item = &LayoutChar> {
    horizontal_lines(page).flat_map(|children| {
        children.iter().filter_map(|child| match child {
            LayoutElement::Character(ch) => Some(ch),
            LayoutElement::TextContainer(_)
            | LayoutElement::TextLine(_)
            | LayoutElement::Other { .. } => None,
        })
    })
}

/// Plain text of all horizontal lines, one output line per text line.
pub fn extract_text(pages: &[LayoutPage]) -> String {
    let mut output = String::new();
    for page in pages {
        for children in horizontal_lines(page) {
            for child in children {
                if let LayoutElement::Character(ch) = child {
                    output.push_str(&ch.text);
                }
            }
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PageSize;
    use crate::layout::tree::{LayoutBox, OtherKind, TextContainer, TextLine};

    fn ch(text: &str, x: f32, y: f32) -> LayoutElement {
        LayoutElement::Character(LayoutChar {
            text: text.to_string(),
            bbox: LayoutBox::new(x, y, x + 5.0, y + 10.0),
            font_name: "Times".to_string(),
            font_size: 10.0,
        })
    }

    fn line(mode: WritingMode, children: Vec<LayoutElement>) -> LayoutElement {
        LayoutElement::TextLine(TextLine {
            writing_mode: mode,
            bbox: LayoutBox::new(0.0, 0.0, 100.0, 10.0),
            children,
        })
    }

    fn container(mode: WritingMode, children: Vec<LayoutElement>) -> LayoutElement {
        LayoutElement::TextContainer(TextContainer {
            writing_mode: mode,
            bbox: LayoutBox::new(0.0, 0.0, 100.0, 100.0),
            children,
        })
    }

    fn page(index: usize, elements: Vec<LayoutElement>) -> LayoutPage {
        LayoutPage {
            index,
            size: PageSize::new(612.0, 792.0),
            elements,
        }
    }

    #[test]
    fn test_multi_codepoint_element_shares_position() {
        let pages = vec![page(
            0,
            vec![container(
                WritingMode::Horizontal,
                vec![line(WritingMode::Horizontal, vec![ch("Hi!", 56.8, 709.1)])],
            )],
        )];
        let glyphs = glyphs_from_pages(&pages);

        let codes: Vec<u32> = glyphs.iter().map(|g| g.unicode_value).collect();
        assert_eq!(codes, vec![72, 105, 33]);
        assert!(glyphs.iter().all(|g| g.x() == 56.8 && g.y() == 709.1));
        assert!(glyphs.iter().all(|g| g.page_index == 0 && g.font_size == 10.0));
        assert_ne!(glyphs[0].fingerprint, glyphs[1].fingerprint);
        assert_ne!(glyphs[1].fingerprint, glyphs[2].fingerprint);
        assert_ne!(glyphs[0].fingerprint, glyphs[2].fingerprint);
    }

    #[test]
    fn test_skipped_element_kinds() {
        let pages = vec![page(
            0,
            vec![
                container(
                    WritingMode::Vertical,
                    vec![line(WritingMode::Vertical, vec![ch("v", 0.0, 0.0)])],
                ),
                container(
                    WritingMode::Horizontal,
                    vec![
                        line(WritingMode::Vertical, vec![ch("w", 0.0, 0.0)]),
                        ch("stray", 0.0, 0.0),
                        line(WritingMode::Horizontal, vec![ch("ok", 1.0, 2.0), ch("", 3.0, 2.0)]),
                    ],
                ),
                line(WritingMode::Horizontal, vec![ch("top-level", 0.0, 0.0)]),
                ch("c", 0.0, 0.0),
                LayoutElement::Other {
                    kind: OtherKind::Image,
                    bbox: LayoutBox::new(0.0, 0.0, 1.0, 1.0),
                },
            ],
        )];
        let glyphs = glyphs_from_pages(&pages);
        let text: String = glyphs.iter().map(|g| g.character).collect();
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_page_index_follows_traversal_order() {
        let make = |text: &str| {
            container(
                WritingMode::Horizontal,
                vec![line(WritingMode::Horizontal, vec![ch(text, 10.0, 10.0)])],
            )
        };
        let pages = vec![page(0, vec![make("a")]), page(1, vec![]), page(2, vec![make("b")])];
        let glyphs = glyphs_from_pages(&pages);
        assert_eq!(glyphs.len(), 2);
        assert_eq!(glyphs[0].page_index, 0);
        assert_eq!(glyphs[1].page_index, 2);
        assert_ne!(glyphs[0].fingerprint, glyphs[1].fingerprint);
    }

    #[test]
    fn test_extract_text_joins_lines() {
        let pages = vec![page(
            0,
            vec![container(
                WritingMode::Horizontal,
                vec![
                    line(WritingMode::Horizontal, vec![ch("H", 0.0, 0.0), ch("i", 5.0, 0.0)]),
                    line(WritingMode::Horizontal, vec![ch("there", 0.0, -12.0)]),
                ],
            )],
        )];
        assert_eq!(extract_text(&pages), "Hi\nthere\n");
    }

    #[test]
    fn test_empty_document() {
        assert!(glyphs_from_pages(&[]).is_empty());
        assert_eq!(extract_text(&[]), "");
    }
}

//! Glyph extraction through a layout source.

mod common;

use common::{FixtureDocument, FixturePage, three_page_document};
use pdf_glyphmap::layout::{extract_glyphs, extract_text};
use pdf_glyphmap::{Error, LayoutSource};

#[test]
fn test_multi_codepoint_element_yields_one_glyph_per_code_point() {
    let doc = FixtureDocument::new(vec![FixturePage::letter().element("Hi!", 56.8, 709.1, "Times", 12.0)]);
    let glyphs = extract_glyphs(&doc).unwrap();

    assert_eq!(glyphs.len(), 3);
    let codes: Vec<u32> = glyphs.iter().map(|g| g.unicode_value).collect();
    assert_eq!(codes, vec![72, 105, 33]);

    for glyph in &glyphs {
        assert_eq!(glyph.x(), 56.8);
        assert_eq!(glyph.y(), 709.1);
        assert_eq!(glyph.page_index, 0);
        assert_eq!(glyph.font_size, 12.0);
    }

    let fingerprints: std::collections::HashSet<&str> =
        glyphs.iter().map(|g| g.fingerprint.as_str()).collect();
    assert_eq!(fingerprints.len(), 3);
}

#[test]
fn test_glyph_count_matches_code_points() {
    let doc = FixtureDocument::new(vec![
        FixturePage::letter()
            .text("Hello", 72.0, 700.0, "Times", 12.0)
            .text("world", 72.0, 686.0, "Times", 12.0),
        FixturePage::letter().element("ﬁ", 72.0, 700.0, "Times", 12.0).element("é", 80.0, 700.0, "Times", 12.0),
    ]);
    let glyphs = extract_glyphs(&doc).unwrap();

    // The ligature element carries one code point; "é" here is a single code point too
    assert_eq!(glyphs.len(), 5 + 5 + 2);
    assert!(glyphs.windows(2).all(|w| w[0].page_index <= w[1].page_index));
    assert_eq!(glyphs.iter().filter(|g| g.page_index == 1).count(), 2);
}

#[test]
fn test_unmapped_and_non_text_content_is_skipped() {
    let doc = FixtureDocument::new(vec![
        FixturePage::letter()
            .text("ab", 72.0, 700.0, "Times", 12.0)
            .element("", 84.0, 700.0, "Symbol", 12.0)
            .image(100.0, 100.0, 300.0, 300.0),
    ]);
    let glyphs = extract_glyphs(&doc).unwrap();
    let text: String = glyphs.iter().map(|g| g.character).collect();
    assert_eq!(text, "ab");
}

#[test]
fn test_positions_are_bottom_left_anchored() {
    let doc = FixtureDocument::new(vec![FixturePage::letter().text("A", 72.0, 20.0, "Times", 10.0)]);
    let glyphs = extract_glyphs(&doc).unwrap();

    // Near the bottom of the page in the layout frame
    assert_eq!(glyphs[0].y(), 20.0);
    assert_eq!(glyphs[0].origin.frame(), pdf_glyphmap::geometry::Frame::LayoutBottomLeft);
}

#[test]
fn test_layout_text_lines() {
    let doc = three_page_document();
    let pages = doc.layout_pages().unwrap();
    assert_eq!(extract_text(&pages), "one\ntwo\nthree\n");
}

#[test]
fn test_unreadable_document_returns_no_partial_result() {
    let mut doc = three_page_document();
    doc.fail_layout = true;
    let err = extract_glyphs(&doc).unwrap_err();
    assert!(matches!(err, Error::DocumentAccess { .. }));
}

#[test]
fn test_zero_pages() {
    let doc = FixtureDocument::new(Vec::new());
    assert!(extract_glyphs(&doc).unwrap().is_empty());
}

//! Structured text view built from characters in engine order.
//!
//! Consecutive characters with the same font and size on the same baseline
//! form a span. A baseline change, a backwards jump or a wide horizontal gap
//! starts a new line; a vertical gap larger than the previous line's height
//! starts a new block. Boxes are converted to the top-left anchored frame.

use crate::backend::{PositionedChar, StructuredBlock, StructuredLine, StructuredPage, TextSpan};
use crate::geometry::{PageSize, Rect};
use crate::layout::LayoutBox;

/// Gap, in multiples of the font size, that splits a line.
const LINE_GAP_FACTOR: f32 = 3.0;

/// Font sizes closer than this are the same size.
const SIZE_TOLERANCE: f32 = 0.01;

fn to_top_left(bbox: &LayoutBox, page: PageSize) -> Rect {
    Rect::from_edges(bbox.x0, page.height - bbox.y1, bbox.x1, page.height - bbox.y0)
}

fn same_style(span: &TextSpan, ch: &PositionedChar) -> bool {
    span.font == ch.font_name && (span.size - ch.font_size).abs() < SIZE_TOLERANCE
}

fn continues_line(line: &StructuredLine, last: &Rect, next: &Rect, font_size: f32) -> bool {
    let tolerance = last.height.max(next.height) * 0.5;
    let same_baseline = (last.bottom() - next.bottom()).abs() <= tolerance;
    let forward = next.left() >= last.left() - tolerance;
    let gap = next.left() - last.right();
    same_baseline && forward && gap <= font_size.max(1.0) * LINE_GAP_FACTOR && !line.spans.is_empty()
}

/// Accumulates lines into blocks.
#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<StructuredBlock>,
    lines: Vec<StructuredLine>,
}

impl BlockBuilder {
    fn push_line(&mut self, line: StructuredLine) {
        if let Some(prev) = self.lines.last() {
            let gap = line.bbox.top() - prev.bbox.bottom();
            if gap > prev.bbox.height {
                self.flush();
            }
        }
        self.lines.push(line);
    }

    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.lines);
        let bbox = lines
            .iter()
            .skip(1)
            .fold(lines[0].bbox, |acc, line| acc.union(&line.bbox));
        self.blocks.push(StructuredBlock::Text { bbox, lines });
    }

    fn finish(mut self) -> Vec<StructuredBlock> {
        self.flush();
        self.blocks
    }
}

/// Build the structured text view of one page.
///
/// `images` are emitted as image blocks after the text blocks.
pub fn build_structured_page(
    size: PageSize,
    chars: &[PositionedChar],
    images: &[LayoutBox],
) -> StructuredPage {
    let mut blocks = BlockBuilder::default();
    let mut line: Option<StructuredLine> = None;
    let mut last_char: Option<Rect> = None;

    for ch in chars {
        let rect = to_top_left(&ch.bbox, size);

        let same_line = match (&line, &last_char) {
            (Some(current), Some(last)) => continues_line(current, last, &rect, ch.font_size),
            _ => false,
        };

        if !same_line {
            if let Some(done) = line.take() {
                blocks.push_line(done);
            }
            line = Some(StructuredLine {
                bbox: rect,
                spans: Vec::new(),
            });
        }

        if let Some(current) = line.as_mut() {
            current.bbox = current.bbox.union(&rect);
            match current.spans.last_mut() {
                Some(span) if same_style(span, ch) => {
                    span.text.push_str(&ch.text);
                    span.bbox = span.bbox.union(&rect);
                },
                _ => current.spans.push(TextSpan {
                    text: ch.text.clone(),
                    bbox: rect,
                    font: ch.font_name.clone(),
                    size: ch.font_size,
                }),
            }
        }
        last_char = Some(rect);
    }

    if let Some(done) = line.take() {
        blocks.push_line(done);
    }

    let mut all_blocks = blocks.finish();
    all_blocks.extend(images.iter().map(|bbox| StructuredBlock::Image {
        bbox: to_top_left(bbox, size),
    }));

    StructuredPage {
        size,
        blocks: all_blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    fn glyph(text: &str, x: f32, y: f32, font: &str, size: f32) -> PositionedChar {
        PositionedChar {
            text: text.to_string(),
            bbox: LayoutBox::new(x, y, x + size * 0.5, y + size),
            font_name: font.to_string(),
            font_size: size,
        }
    }

    fn run(text: &str, x: f32, y: f32, font: &str, size: f32) -> Vec<PositionedChar> {
        text.chars()
            .enumerate()
            .map(|(i, c)| glyph(&c.to_string(), x + i as f32 * size * 0.5, y, font, size))
            .collect()
    }

    fn span_texts(page: &StructuredPage) -> Vec<String> {
        page.spans().map(|s| s.text.clone()).collect()
    }

    #[test]
    fn test_font_change_splits_span() {
        let mut chars = run("Bold", 72.0, 700.0, "Helvetica-Bold", 12.0);
        chars.extend(run(" text", 96.0, 700.0, "Helvetica", 12.0));
        let page = build_structured_page(PAGE, &chars, &[]);

        assert_eq!(span_texts(&page), vec!["Bold", " text"]);
        assert_eq!(page.blocks.len(), 1);
        match &page.blocks[0] {
            StructuredBlock::Text { lines, .. } => assert_eq!(lines.len(), 1),
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_bbox_is_top_left_anchored() {
        let chars = run("A", 100.0, 700.0, "Times", 10.0);
        let page = build_structured_page(PAGE, &chars, &[]);
        let span = page.spans().next().cloned().expect("one span");
        assert_eq!(span.bbox.edges(), [100.0, 82.0, 105.0, 92.0]);
    }

    #[test]
    fn test_lines_and_blocks() {
        let mut chars = run("one", 72.0, 700.0, "Times", 10.0);
        chars.extend(run("two", 72.0, 688.0, "Times", 10.0));
        chars.extend(run("far", 72.0, 500.0, "Times", 10.0));
        let page = build_structured_page(PAGE, &chars, &[]);

        assert_eq!(span_texts(&page), vec!["one", "two", "far"]);
        assert_eq!(page.blocks.len(), 2);
        match &page.blocks[0] {
            StructuredBlock::Text { lines, bbox } => {
                assert_eq!(lines.len(), 2);
                assert_eq!(bbox.top(), 82.0);
                assert_eq!(bbox.bottom(), 104.0);
            },
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_run_gives_empty_span() {
        let mut chars = run("ab", 72.0, 700.0, "Times", 10.0);
        chars.push(glyph("", 82.0, 700.0, "Symbol", 10.0));
        let page = build_structured_page(PAGE, &chars, &[]);
        assert_eq!(span_texts(&page), vec!["ab", ""]);
    }

    #[test]
    fn test_image_blocks_carry_no_spans() {
        let image = LayoutBox::new(0.0, 0.0, 100.0, 50.0);
        let page = build_structured_page(PAGE, &[], &[image]);
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.spans().count(), 0);
        assert!(matches!(page.blocks[0], StructuredBlock::Image { .. }));
    }
}

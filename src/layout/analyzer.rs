//! Layout analysis: positioned characters to text lines to text containers.
//!
//! Characters arrive in content-stream order. Consecutive characters that sit
//! on the same baseline and are close enough horizontally form a line; lines
//! that overlap horizontally and are separated by less than a line margin form
//! a text container. With `detect_vertical`, vertically stacked characters form
//! vertical lines instead.

use crate::backend::PositionedChar;
use crate::geometry::PageSize;
use crate::layout::tree::{
    LayoutBox, LayoutChar, LayoutElement, LayoutPage, OtherKind, TextContainer, TextLine,
    WritingMode,
};
use crate::utils::safe_float_cmp;

/// Thresholds controlling line and container grouping.
///
/// All margins are relative to character or line dimensions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Minimum overlap (fraction of the smaller height) for two characters to share a line
    pub line_overlap: f32,
    /// Maximum gap (multiple of the wider character) between characters on a line
    pub char_margin: f32,
    /// Maximum gap (multiple of the taller line) between lines of one container
    pub line_margin: f32,
    /// Build vertical lines from vertically stacked characters
    pub detect_vertical: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            char_margin: 2.0,
            line_margin: 0.5,
            detect_vertical: false,
        }
    }
}

/// Build the layout tree of one page.
///
/// Text containers come first (top to bottom, then left to right), followed by
/// the non-text elements in the order given.
pub fn analyze_page(
    index: usize,
    size: PageSize,
    chars: &[PositionedChar],
    others: &[(OtherKind, LayoutBox)],
    params: &LayoutParams,
) -> LayoutPage {
    let lines = group_lines(chars, params);
    let mut containers = group_containers(lines, params);

    containers.sort_by(|a, b| {
        safe_float_cmp(b.bbox.y1, a.bbox.y1).then_with(|| safe_float_cmp(a.bbox.x0, b.bbox.x0))
    });

    let mut page = LayoutPage::new(index, size);
    page.elements
        .extend(containers.into_iter().map(LayoutElement::TextContainer));
    page.elements.extend(
        others
            .iter()
            .map(|&(kind, bbox)| LayoutElement::Other { kind, bbox }),
    );
    page
}

struct LineBuilder {
    mode: WritingMode,
    bbox: LayoutBox,
    chars: Vec<LayoutChar>,
}

impl LineBuilder {
    fn start(mode: WritingMode, ch: &PositionedChar) -> Self {
        Self {
            mode,
            bbox: ch.bbox,
            chars: vec![to_layout_char(ch)],
        }
    }

    fn push(&mut self, ch: &PositionedChar) {
        self.bbox = self.bbox.union(&ch.bbox);
        self.chars.push(to_layout_char(ch));
    }

    fn finish(self) -> TextLine {
        TextLine {
            writing_mode: self.mode,
            bbox: self.bbox,
            children: self
                .chars
                .into_iter()
                .map(LayoutElement::Character)
                .collect(),
        }
    }
}

fn to_layout_char(ch: &PositionedChar) -> LayoutChar {
    LayoutChar {
        text: ch.text.clone(),
        bbox: ch.bbox,
        font_name: ch.font_name.clone(),
        font_size: ch.font_size,
    }
}

fn horizontally_aligned(a: &LayoutBox, b: &LayoutBox, params: &LayoutParams) -> bool {
    a.vertical_overlap(b) > a.height().min(b.height()) * params.line_overlap
        && a.horizontal_distance(b) < a.width().max(b.width()) * params.char_margin
}

fn vertically_aligned(a: &LayoutBox, b: &LayoutBox, params: &LayoutParams) -> bool {
    params.detect_vertical
        && a.horizontal_overlap(b) > a.width().min(b.width()) * params.line_overlap
        && a.vertical_distance(b) < a.height().max(b.height()) * params.char_margin
}

/// Group characters into lines, preserving content order.
pub fn group_lines(chars: &[PositionedChar], params: &LayoutParams) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Option<LineBuilder> = None;
    let mut prev: Option<&PositionedChar> = None;

    for ch in chars {
        if let Some(p) = prev {
            let halign = horizontally_aligned(&p.bbox, &ch.bbox, params);
            let valign = vertically_aligned(&p.bbox, &ch.bbox, params);

            let extends = match &current {
                Some(line) => match line.mode {
                    WritingMode::Horizontal => halign,
                    WritingMode::Vertical => valign,
                },
                None => false,
            };

            if extends {
                if let Some(line) = current.as_mut() {
                    line.push(ch);
                }
            } else if let Some(line) = current.take() {
                lines.push(line.finish());
            } else if valign && !halign {
                let mut line = LineBuilder::start(WritingMode::Vertical, p);
                line.push(ch);
                current = Some(line);
            } else if halign && !valign {
                let mut line = LineBuilder::start(WritingMode::Horizontal, p);
                line.push(ch);
                current = Some(line);
            } else {
                lines.push(LineBuilder::start(WritingMode::Horizontal, p).finish());
            }
        }
        prev = Some(ch);
    }

    match current {
        Some(line) => lines.push(line.finish()),
        None => {
            if let Some(p) = prev {
                lines.push(LineBuilder::start(WritingMode::Horizontal, p).finish());
            }
        },
    }

    lines
}

fn lines_are_neighbors(a: &TextLine, b: &TextLine, params: &LayoutParams) -> bool {
    if a.writing_mode != b.writing_mode {
        return false;
    }
    match a.writing_mode {
        WritingMode::Horizontal => {
            a.bbox.horizontal_overlap(&b.bbox) > 0.0
                && a.bbox.vertical_distance(&b.bbox)
                    <= a.bbox.height().max(b.bbox.height()) * params.line_margin
        },
        WritingMode::Vertical => {
            a.bbox.vertical_overlap(&b.bbox) > 0.0
                && a.bbox.horizontal_distance(&b.bbox)
                    <= a.bbox.width().max(b.bbox.width()) * params.line_margin
        },
    }
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Group lines into text containers.
///
/// Lines inside a horizontal container are ordered top to bottom; lines inside
/// a vertical container right to left.
pub fn group_containers(lines: Vec<TextLine>, params: &LayoutParams) -> Vec<TextContainer> {
    let n = lines.len();
    let mut parent: Vec<usize> = (0..n).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            if lines_are_neighbors(&lines[i], &lines[j], params) {
                let ri = find_root(&mut parent, i);
                let rj = find_root(&mut parent, j);
                if ri != rj {
                    parent[rj.max(ri)] = ri.min(rj);
                }
            }
        }
    }

    // Containers keep the order of their first line
    let mut slots: Vec<Option<usize>> = vec![None; n];
    let mut groups: Vec<Vec<TextLine>> = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        let root = find_root(&mut parent, i);
        let slot = match slots[root] {
            Some(slot) => slot,
            None => {
                groups.push(Vec::new());
                slots[root] = Some(groups.len() - 1);
                groups.len() - 1
            },
        };
        groups[slot].push(line);
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            let first = group.first()?;
            let writing_mode = first.writing_mode;
            let bbox = group
                .iter()
                .skip(1)
                .fold(first.bbox, |acc, line| acc.union(&line.bbox));
            match writing_mode {
                WritingMode::Horizontal => {
                    group.sort_by(|a, b| safe_float_cmp(b.bbox.y1, a.bbox.y1))
                },
                WritingMode::Vertical => group.sort_by(|a, b| safe_float_cmp(b.bbox.x1, a.bbox.x1)),
            }
            Some(TextContainer {
                writing_mode,
                bbox,
                children: group.into_iter().map(LayoutElement::TextLine).collect(),
            })
        })
        .collect()
}

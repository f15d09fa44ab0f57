//! Span projection.
//!
//! Re-walks each rendered page's structured text view and turns every span
//! into a [`SpanRecord`] carrying a fingerprint. This pass is independent of
//! the layout walk: span order and granularity come from the rendering engine
//! and are never reconciled with the glyph records.

use std::collections::BTreeMap;

use crate::backend::RenderEngine;
use crate::error::Result;
use crate::fingerprint::{EMPTY_SPAN_FINGERPRINT, fingerprint};
use crate::geometry::{Point, Position, Rect};
use crate::rendering::PageRaster;

/// One run of text sharing a font and size, as seen by the rendering engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SpanRecord {
    /// Span text (may be empty)
    pub text: String,
    /// Bounding box, top-left anchored layout frame
    pub bbox: Rect,
    /// Font name
    pub font: String,
    /// Font size in layout units
    pub size: f32,
    /// Fingerprint of the first character at (left, top), or `"N/A"`
    pub fingerprint: String,
    /// Zero-based page index
    pub page_index: usize,
}

impl SpanRecord {
    /// Width of the bounding box.
    pub fn width(&self) -> f32 {
        self.bbox.width
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f32 {
        self.bbox.height
    }

    /// Top-left corner of the span, tagged with its frame.
    pub fn origin(&self) -> Position {
        Position::LayoutTopLeft(Point::new(self.bbox.left(), self.bbox.top()))
    }
}

/// Fingerprint of a span: first character, left, top and page index.
pub fn span_fingerprint(text: &str, bbox: &Rect, page_index: usize) -> String {
    match text.chars().next() {
        Some(first) => fingerprint(first as u32, bbox.left(), bbox.top(), page_index),
        None => EMPTY_SPAN_FINGERPRINT.to_string(),
    }
}

/// Project the spans of every rendered page.
///
/// Pages are keyed by index; spans keep the engine's block → line → span order.
pub fn project_spans(
    engine: &dyn RenderEngine,
    rasters: &[PageRaster],
) -> Result<BTreeMap<usize, Vec<SpanRecord>>> {
    let mut span_map = BTreeMap::new();

    for raster in rasters {
        let page = engine.structured_text(raster.page_index)?;
        let spans: Vec<SpanRecord> = page
            .spans()
            .map(|span| SpanRecord {
                fingerprint: span_fingerprint(&span.text, &span.bbox, raster.page_index),
                text: span.text.clone(),
                bbox: span.bbox,
                font: span.font.clone(),
                size: span.size,
                page_index: raster.page_index,
            })
            .collect();

        log::debug!("Page {}: {} spans", raster.page_index, spans.len());
        span_map.insert(raster.page_index, spans);
    }

    Ok(span_map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_span_uses_sentinel() {
        let bbox = Rect::new(10.0, 20.0, 0.0, 0.0);
        assert_eq!(span_fingerprint("", &bbox, 0), "N/A");
    }

    #[test]
    fn test_span_fingerprint_uses_first_char_and_top_left() {
        let bbox = Rect::from_edges(72.0, 80.0, 120.0, 92.0);
        assert_eq!(span_fingerprint("Hello", &bbox, 2), fingerprint('H' as u32, 72.0, 80.0, 2));
        assert_eq!(span_fingerprint("H", &bbox, 2), span_fingerprint("Hello", &bbox, 2));
        assert_ne!(span_fingerprint("Hello", &bbox, 2), span_fingerprint("Hello", &bbox, 3));
    }

    #[test]
    fn test_record_dimensions() {
        let record = SpanRecord {
            text: "x".to_string(),
            bbox: Rect::from_edges(1.0, 2.0, 4.0, 8.0),
            font: "Times".to_string(),
            size: 6.0,
            fingerprint: String::new(),
            page_index: 0,
        };
        assert_eq!(record.width(), 3.0);
        assert_eq!(record.height(), 6.0);
        assert_eq!(record.origin().point(), Point::new(1.0, 2.0));
    }
}

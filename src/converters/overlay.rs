//! Hoverable HTML overlay over rendered page images.
//!
//! The overlay is one self-contained HTML document. Each page becomes a
//! `.container` sized to the page's layout-space dimensions plus one unit,
//! holding the page raster and one absolutely positioned `.text-box` per span.
//! Hovering a box reveals its `.info` panel: text, code points, fingerprint,
//! font, size, dimensions and edges.
//!
//! Layout units are placed as CSS pixels (see [`PixelMapping::css_identity`]);
//! the raster is scaled by the browser to the container, so any render DPI
//! lines up.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::fingerprint::format_float;
use crate::geometry::PixelMapping;
use crate::projection::SpanRecord;
use crate::rendering::PageRaster;
use crate::report::write_atomic;

const STYLE: &str = concat!(
    "body { font-family: Arial, sans-serif; margin: 0; padding: 0; }",
    ".container { position: relative; width: 100%; height: auto; overflow: hidden; margin-bottom: 20px; }",
    ".text-box { position: absolute; border: 1px solid red; padding: 2px; font-size: 12px;",
    "background: transparent; z-index: 1000; }",
    ".text-box:hover .info { display: block; }",
    ".info { display: none; background: rgba(0, 0, 0, 0.7); color: #fff; padding: 5px; border-radius: 3px;",
    "position: absolute; top: 100%; left: 0; white-space: nowrap; z-index: 1001; }",
);

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::converters::escape_html;
///
/// assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Code points of `text` as a comma separated `U+XXXX` list.
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::converters::unicode_list;
///
/// assert_eq!(unicode_list("Hi"), "U+0048, U+0069");
/// assert_eq!(unicode_list("\u{1F600}"), "U+1F600");
/// assert_eq!(unicode_list(""), "");
/// ```
pub fn unicode_list(text: &str) -> String {
    text.chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Path of `target` relative to the directory `base`, with `/` separators.
///
/// Falls back to `target` itself when the two cannot be related (one is
/// absolute and the other is not, or `base` climbs above its root).
fn relative_src(target: &Path, base: &Path) -> String {
    let to_slash = |p: &Path| p.to_string_lossy().replace('\\', "/");

    if target.is_absolute() != base.is_absolute() {
        return to_slash(target);
    }

    fn normal(p: &Path) -> Vec<Component<'_>> {
        p.components().filter(|c| !matches!(c, Component::CurDir)).collect()
    }
    let target_parts = normal(target);
    let base_parts = normal(base);

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if base_parts[common..].iter().any(|c| matches!(c, Component::ParentDir)) {
        return to_slash(target);
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    to_slash(&rel)
}

/// Renders rasters and projected spans into the overlay document.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    mapping: PixelMapping,
    title: String,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer {
    /// Create a renderer that places one layout unit per CSS pixel.
    pub fn new() -> Self {
        Self {
            mapping: PixelMapping::css_identity(),
            title: "PDF HTML Representation".to_string(),
        }
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Build the overlay markup.
    ///
    /// Image sources are written relative to `base_dir`, the directory the
    /// markup will live in. Pages appear in raster order; a page missing from
    /// `span_map` gets a container with no text boxes.
    pub fn render_to_string(
        &self,
        rasters: &[PageRaster],
        span_map: &BTreeMap<usize, Vec<SpanRecord>>,
        base_dir: &Path,
    ) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html><html><head><meta charset=\"UTF-8\">");
        html.push_str(&format!("<title>{}</title>", escape_html(&self.title)));
        html.push_str("<style>");
        html.push_str(STYLE);
        html.push_str("</style></head><body>");

        for raster in rasters {
            let spans = span_map
                .get(&raster.page_index)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            self.render_page(&mut html, raster, spans, base_dir);
        }

        html.push_str("</body></html>");
        html
    }

    fn render_page(&self, html: &mut String, raster: &PageRaster, spans: &[SpanRecord], base_dir: &Path) {
        let size = raster.page_size;
        let (width, height) = (size.width * self.mapping.scale, size.height * self.mapping.scale);

        html.push_str(&format!(
            "<div class=\"container\" style=\"width: {}px; height: {}px;\">",
            format_float(width + 1.0),
            format_float(height + 1.0)
        ));
        html.push_str(&format!(
            "<img src=\"{}\" style=\"position: absolute; left: 0; top: 0; width: {}px; height: {}px; border: 1px solid black\" />",
            escape_html(&relative_src(&raster.image_path, base_dir)),
            format_float(width),
            format_float(height)
        ));

        for span in spans {
            self.render_span(html, raster, span);
        }

        html.push_str("</div>");
    }

    fn render_span(&self, html: &mut String, raster: &PageRaster, span: &SpanRecord) {
        let [left, top, right, bottom] = span.bbox.edges();
        let (width, height) = (right - left, bottom - top);
        let at = span.origin().to_pixel(raster.page_size, self.mapping).point();

        let mut info = String::new();
        info.push_str(&format!("<strong>Text:</strong> {}<br>", escape_html(&span.text)));
        info.push_str(&format!("<strong>Unicode:</strong> {}<br>", unicode_list(&span.text)));
        info.push_str(&format!("<strong>Glyph Code:</strong> {}<br>", span.fingerprint));
        info.push_str(&format!("<strong>Font:</strong> {}<br>", escape_html(&span.font)));
        info.push_str(&format!("<strong>Size:</strong> {}<br>", format_float(span.size)));
        info.push_str(&format!("<strong>Width:</strong> {:.2}px<br>", width));
        info.push_str(&format!("<strong>Height:</strong> {:.2}px<br>", height));
        info.push_str(&format!(
            "<strong>Position:</strong> Left: {:.2}px, Top: {:.2}px, Right: {:.2}px, Bottom: {:.2}px<br>",
            left, top, right, bottom
        ));

        html.push_str(&format!(
            "<div class=\"text-box\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; font-size: {}px;\">",
            format_float(at.x),
            format_float(at.y),
            format_float(width * self.mapping.scale),
            format_float(height * self.mapping.scale),
            format_float(span.size)
        ));
        html.push_str("<span class=\"info\">");
        html.push_str(&info);
        html.push_str("</span></div>");
    }

    /// Render the overlay and write it to `output_path` in one step.
    pub fn render(
        &self,
        rasters: &[PageRaster],
        span_map: &BTreeMap<usize, Vec<SpanRecord>>,
        output_path: &Path,
    ) -> Result<()> {
        let base_dir = output_path.parent().unwrap_or_else(|| Path::new(""));
        let html = self.render_to_string(rasters, span_map, base_dir);
        write_atomic(output_path, html.as_bytes())?;
        log::info!("HTML representation saved to {}", output_path.display());
        Ok(())
    }
}

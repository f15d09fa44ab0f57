//! Text-run metadata from an external `pdftohtml` run.
//!
//! The tool is invoked with `-xml` and its output parsed into a flat list of
//! [`TextRunMetadata`]. A missing executable or a non-zero exit surfaces as
//! [`Error::Subprocess`]; callers recover from it with an empty list.
//!
//! The XML looks like:
//!
//! ```xml
//! <page number="1" position="absolute" top="0" left="0" height="792" width="612">
//!   <fontspec id="0" size="12" family="Times" color="#000000"/>
//!   <text top="72" left="56" width="120" height="14" font="0">Hello <b>world</b></text>
//! </page>
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Placeholder for missing font and size values.
pub const UNKNOWN: &str = "unknown";

/// One text run reported by the metadata tool.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextRunMetadata {
    /// Trimmed text content, including nested inline markup
    pub text: String,
    /// Font family, or `"unknown"`
    pub font: String,
    /// Font size as reported, or `"unknown"`
    pub size: String,
    /// Left, top, right, bottom
    pub bbox: [f32; 4],
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

#[derive(Debug, Clone)]
struct FontSpec {
    family: String,
    size: Option<String>,
}

fn get_attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return Some(
                attr.unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned()),
            );
        }
    }
    None
}

fn parse_number(value: Option<&String>) -> Option<f32> {
    value.and_then(|v| v.trim().parse::<f32>().ok())
}

/// A `<text>` element whose content is still being collected.
#[derive(Debug)]
struct PendingRun {
    attrs: HashMap<String, String>,
    text: String,
}

impl PendingRun {
    fn from_start(e: &BytesStart<'_>) -> Self {
        let mut attrs = HashMap::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            attrs.insert(key, value);
        }
        Self {
            attrs,
            text: String::new(),
        }
    }

    fn finish(self, fonts: &HashMap<String, FontSpec>) -> TextRunMetadata {
        let attrs = &self.attrs;
        let spec = attrs.get("font").and_then(|id| fonts.get(id));

        let font = match (attrs.get("font"), spec) {
            (_, Some(spec)) => spec.family.clone(),
            (Some(raw), None) => raw.clone(),
            (None, None) => UNKNOWN.to_string(),
        };
        let size = attrs
            .get("size")
            .cloned()
            .or_else(|| spec.and_then(|s| s.size.clone()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let x = parse_number(attrs.get("x"))
            .or_else(|| parse_number(attrs.get("left")))
            .unwrap_or(0.0);
        let y = parse_number(attrs.get("y"))
            .or_else(|| parse_number(attrs.get("top")))
            .unwrap_or(0.0);

        let bbox = match attrs.get("bbox") {
            Some(raw) => {
                let mut edges = [0.0f32; 4];
                for (slot, part) in edges.iter_mut().zip(raw.split_whitespace()) {
                    *slot = part.parse().unwrap_or(0.0);
                }
                edges
            },
            None => {
                let width = parse_number(attrs.get("width")).unwrap_or(0.0);
                let height = parse_number(attrs.get("height")).unwrap_or(0.0);
                [x, y, x + width, y + height]
            },
        };

        TextRunMetadata {
            text: self.text.trim().to_string(),
            font,
            size,
            bbox,
            x,
            y,
        }
    }
}

/// Parse `pdftohtml -xml` output.
///
/// Parsing is lenient: mismatched end tags are accepted so HTML output
/// (`<meta>` without a closing tag, undeclared entities) still yields its
/// `<text>` runs. On a syntax error the runs read so far are kept.
pub fn parse_pdftohtml_xml(xml: &str) -> Vec<TextRunMetadata> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut fonts: HashMap<String, FontSpec> = HashMap::new();
    let mut runs = Vec::new();
    let mut pending: Option<PendingRun> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"text" => {
                    if let Some(run) = pending.take() {
                        runs.push(run.finish(&fonts));
                    }
                    pending = Some(PendingRun::from_start(e));
                },
                b"fontspec" => register_font(&mut fonts, e),
                _ => {},
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"text" => {
                    runs.push(PendingRun::from_start(e).finish(&fonts));
                },
                b"fontspec" => register_font(&mut fonts, e),
                _ => {},
            },
            Ok(Event::Text(e)) => {
                if let Some(run) = pending.as_mut() {
                    match e.unescape() {
                        Ok(text) => run.text.push_str(&text),
                        Err(_) => run.text.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            },
            Ok(Event::CData(e)) => {
                if let Some(run) = pending.as_mut() {
                    run.text.push_str(&String::from_utf8_lossy(&e));
                }
            },
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"text" {
                    if let Some(run) = pending.take() {
                        runs.push(run.finish(&fonts));
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "Metadata markup error at position {}: {}; keeping {} runs",
                    reader.buffer_position(),
                    e,
                    runs.len()
                );
                break;
            },
            _ => {},
        }
    }

    if let Some(run) = pending.take() {
        runs.push(run.finish(&fonts));
    }

    runs
}

fn register_font(fonts: &mut HashMap<String, FontSpec>, e: &BytesStart<'_>) {
    if let Some(id) = get_attribute(e, "id") {
        let family = get_attribute(e, "family").unwrap_or_else(|| UNKNOWN.to_string());
        let size = get_attribute(e, "size");
        fonts.insert(id, FontSpec { family, size });
    }
}

/// `pdftohtml` invoked as a subprocess.
#[derive(Debug, Clone)]
pub struct PdfToHtml {
    program: PathBuf,
}

impl Default for PdfToHtml {
    fn default() -> Self {
        Self::new("pdftohtml")
    }
}

impl PdfToHtml {
    /// Use the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn subprocess_error(&self, reason: String) -> Error {
        Error::Subprocess {
            tool: self.program.display().to_string(),
            reason,
        }
    }

    /// Convert `pdf_path` into `work_dir` and parse the result.
    ///
    /// `work_dir` is created if needed; existing files in it are overwritten
    /// by the tool, other files are left alone.
    pub fn extract(&self, pdf_path: &Path, work_dir: &Path) -> Result<Vec<TextRunMetadata>> {
        log::info!("Extracting PDF metadata with {}...", self.program.display());
        std::fs::create_dir_all(work_dir)?;
        let stem = work_dir.join("document");

        let output = Command::new(&self.program)
            .args(["-meta", "-noframes", "-c", "-hidden", "-xml"])
            .arg(pdf_path)
            .arg(&stem)
            .output()
            .map_err(|e| self.subprocess_error(format!("failed to launch: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.subprocess_error(format!("{} ({})", output.status, stderr.trim())));
        }

        let candidates = [stem.with_extension("xml"), stem.with_extension("html")];
        let Some(xml_path) = candidates.iter().find(|p| p.exists()) else {
            log::warn!("Metadata file not found: {}", candidates[0].display());
            return Ok(Vec::new());
        };

        let bytes = std::fs::read(xml_path)?;
        let runs = parse_pdftohtml_xml(&String::from_utf8_lossy(&bytes));
        log::info!("Parsed {} text runs from {}", runs.len(), xml_path.display());
        Ok(runs)
    }
}

//! OCR over rendered page images.
//!
//! Recognition runs through an [`OcrEngine`]; the default engine shells out to
//! the `tesseract` command line tool. A failure on one image is logged and the
//! image skipped. OCR text is its own artifact and is never merged with glyph
//! or span data.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::rendering::PageRaster;

/// Text recognizer for a single image.
pub trait OcrEngine {
    /// Recognize the text of the image at `image_path`.
    fn recognize(&self, image_path: &Path, language: &str, page_segmentation_mode: u8)
    -> Result<String>;
}

/// `tesseract` invoked as a subprocess.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractCli {
    /// Use the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check whether the executable can be launched.
    pub fn is_available(&self) -> bool {
        let available = Command::new(&self.program).arg("--version").output().is_ok();
        if !available {
            log::debug!("{} not found - install tesseract-ocr for OCR support", self.program.display());
        }
        available
    }

    fn tool_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(
        &self,
        image_path: &Path,
        language: &str,
        page_segmentation_mode: u8,
    ) -> Result<String> {
        let output = Command::new(&self.program)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(page_segmentation_mode.to_string())
            .output()
            .map_err(|e| Error::Subprocess {
                tool: self.tool_name(),
                reason: format!("failed to launch: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Subprocess {
                tool: self.tool_name(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Text recognized over a set of rasters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrReport {
    /// Recognized text, one newline-terminated chunk per recognized image
    pub text: String,
    /// Images recognized
    pub recognized: usize,
    /// Images skipped after a failure
    pub skipped: usize,
}

/// Run OCR over every raster, in page order.
///
/// Each recognized text is followed by a newline. Images that fail are
/// skipped with a warning.
pub fn ocr_rasters(
    engine: &dyn OcrEngine,
    rasters: &[PageRaster],
    language: &str,
    page_segmentation_mode: u8,
) -> OcrReport {
    log::info!("Extracting text from images (OCR)...");
    let mut report = OcrReport::default();

    for raster in rasters {
        match engine.recognize(&raster.image_path, language, page_segmentation_mode) {
            Ok(recognized) => {
                report.text.push_str(&recognized);
                report.text.push('\n');
                report.recognized += 1;
                log::info!("Extracted text from {}", raster.image_path.display());
            },
            Err(e) => {
                report.skipped += 1;
                log::warn!("OCR failed for {}: {}", raster.image_path.display(), e);
            },
        }
    }

    report
}

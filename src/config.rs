//! Configuration for a glyph mapping run.
//!
//! Every path and tool location the pipeline touches is a field here; nothing
//! is read from process-wide state. Missing JSON fields take their defaults.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::LayoutParams;
use crate::rendering::RenderOptions;

/// OCR settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Run OCR over the rendered pages.
    pub enabled: bool,
    /// Tesseract executable.
    pub tesseract_path: PathBuf,
    /// Tesseract language tag.
    pub language: String,
    /// Tesseract page segmentation mode.
    pub page_segmentation_mode: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_path: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation_mode: 6,
        }
    }
}

/// External metadata extraction settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Run `pdftohtml`.
    pub enabled: bool,
    /// `pdftohtml` executable.
    pub pdftohtml_path: PathBuf,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pdftohtml_path: PathBuf::from("pdftohtml"),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source document.
    pub document_path: PathBuf,
    /// Directory for reports and the overlay.
    pub output_dir: PathBuf,
    /// Directory for page rasters.
    pub images_dir: PathBuf,
    /// Glyph report file name inside `output_dir`.
    pub glyph_report_name: String,
    /// Layout text file name inside `output_dir`.
    pub layout_text_name: String,
    /// Overlay file name inside `output_dir`.
    pub overlay_name: String,
    /// OCR text file name inside `output_dir`.
    pub ocr_text_name: String,
    /// Metadata JSON file name inside `output_dir`.
    pub metadata_name: String,
    /// Rasterization options.
    pub render: RenderOptions,
    /// Layout analysis parameters.
    pub layout: LayoutParams,
    /// OCR settings.
    pub ocr: OcrConfig,
    /// Metadata extraction settings.
    pub metadata: MetadataConfig,
    /// Directory holding the PDFium shared library; the system library is used when unset.
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            document_path: PathBuf::from("pdfs/document.pdf"),
            output_dir: PathBuf::from("output"),
            images_dir: PathBuf::from("images"),
            glyph_report_name: "unicode_characters.txt".to_string(),
            layout_text_name: "output_text.txt".to_string(),
            overlay_name: "output_text.html".to_string(),
            ocr_text_name: "ocr_text.txt".to_string(),
            metadata_name: "metadata.json".to_string(),
            render: RenderOptions::default(),
            layout: LayoutParams::default(),
            ocr: OcrConfig::default(),
            metadata: MetadataConfig::default(),
            pdfium_library_dir: None,
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.render.dpi == 0 {
            return Err(Error::Config("render.dpi must be positive".to_string()));
        }
        let names = [
            ("glyph_report_name", &self.glyph_report_name),
            ("layout_text_name", &self.layout_text_name),
            ("overlay_name", &self.overlay_name),
            ("ocr_text_name", &self.ocr_text_name),
            ("metadata_name", &self.metadata_name),
        ];
        for (field, value) in names {
            if value.is_empty() {
                return Err(Error::Config(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }

    /// Set the source document.
    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_path = path.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the images directory.
    pub fn with_images_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.images_dir = path.into();
        self
    }

    /// Set the rasterization resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.render.dpi = dpi;
        self
    }

    /// Enable or disable OCR.
    pub fn with_ocr(mut self, enable: bool) -> Self {
        self.ocr.enabled = enable;
        self
    }

    /// Enable or disable metadata extraction.
    pub fn with_metadata(mut self, enable: bool) -> Self {
        self.metadata.enabled = enable;
        self
    }

    /// Set the PDFium library directory.
    pub fn with_pdfium_library_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdfium_library_dir = Some(path.into());
        self
    }

    /// Path of the glyph report.
    pub fn glyph_report_path(&self) -> PathBuf {
        self.output_dir.join(&self.glyph_report_name)
    }

    /// Path of the layout text.
    pub fn layout_text_path(&self) -> PathBuf {
        self.output_dir.join(&self.layout_text_name)
    }

    /// Path of the overlay.
    pub fn overlay_path(&self) -> PathBuf {
        self.output_dir.join(&self.overlay_name)
    }

    /// Path of the OCR text.
    pub fn ocr_text_path(&self) -> PathBuf {
        self.output_dir.join(&self.ocr_text_name)
    }

    /// Path of the metadata JSON.
    pub fn metadata_path(&self) -> PathBuf {
        self.output_dir.join(&self.metadata_name)
    }

    /// Working directory for the metadata tool.
    pub fn metadata_work_dir(&self) -> PathBuf {
        self.output_dir.join("metadata")
    }
}

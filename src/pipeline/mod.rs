//! End-to-end glyph mapping pipeline.
//!
//! ```text
//! PDF File
//!     ↓ open
//! [LayoutSource] ──layout──→ output_text.txt, unicode_characters.txt
//! [RenderEngine] ──rasterize──→ images/page_{n}.png
//!     ├──ocr──→ ocr_text.txt            (optional, failures per image skipped)
//!     ├──metadata──→ metadata.json      (optional, tool failures give an empty list)
//!     └──project──→ spans per page
//!                      ↓ overlay
//!                output_text.html
//! ```
//!
//! Stages run strictly in order and each finishes before the next starts.
//! A fatal error is wrapped in [`Error::Stage`] naming the stage; files
//! written by earlier stages stay as they are.

mod summary;

pub use summary::RunSummary;

use crate::backend::{LayoutSource, RenderEngine};
use crate::config::PipelineConfig;
use crate::converters::OverlayRenderer;
use crate::error::{Error, Result, Stage};
use crate::layout::{extract_text, glyphs_from_pages};
use crate::metadata::PdfToHtml;
use crate::ocr::{OcrEngine, TesseractCli, ocr_rasters};
use crate::projection::project_spans;
use crate::rendering::rasterize;
use crate::report::{write_atomic, write_glyph_report, write_text};

/// Run `f` as pipeline stage `stage`, logging progress and tagging errors.
fn run_stage<T>(stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
    log::info!("Stage '{}' started", stage);
    match f() {
        Ok(value) => {
            log::info!("Stage '{}' finished", stage);
            Ok(value)
        },
        Err(e) => {
            log::error!("Stage '{}' failed: {}", stage, e);
            Err(e.in_stage(stage))
        },
    }
}

/// Glyph mapping pipeline over one document.
pub struct Pipeline {
    config: PipelineConfig,
    ocr_engine: Option<Box<dyn OcrEngine>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("custom_ocr_engine", &self.ocr_engine.is_some())
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ocr_engine: None,
        }
    }

    /// Use `engine` for OCR instead of the configured tesseract executable.
    pub fn with_ocr_engine(mut self, engine: Box<dyn OcrEngine>) -> Self {
        self.ocr_engine = Some(engine);
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Open the configured document with PDFium and run every stage.
    #[cfg(feature = "pdfium")]
    pub fn run(&self) -> Result<RunSummary> {
        use crate::backend::pdfium::PdfiumEngine;

        let engine = run_stage(Stage::Open, || {
            PdfiumEngine::bind(self.config.pdfium_library_dir.as_deref())
        })?;
        let document = run_stage(Stage::Open, || {
            engine.open(&self.config.document_path, self.config.layout)
        })?;

        self.run_with(&document, &document)
    }

    /// Run every stage after `open` against already opened views.
    pub fn run_with(&self, layout: &dyn LayoutSource, engine: &dyn RenderEngine) -> Result<RunSummary> {
        let config = &self.config;
        let mut summary = RunSummary {
            document: config.document_path.clone(),
            ..Default::default()
        };

        let glyph_count = run_stage(Stage::Layout, || {
            let pages = layout.layout_pages()?;

            let text = extract_text(&pages);
            write_text(&text, &config.layout_text_path())?;

            let glyphs = glyphs_from_pages(&pages);
            log::info!("Total glyphs extracted: {}", glyphs.len());
            write_glyph_report(&glyphs, &config.glyph_report_path())?;
            Ok(glyphs.len())
        })?;
        summary.glyph_count = glyph_count;
        summary.artifacts.push(config.layout_text_path());
        summary.artifacts.push(config.glyph_report_path());

        let rasters = run_stage(Stage::Rasterize, || {
            log::info!("Converting PDF pages to images...");
            rasterize(engine, &config.images_dir, &config.render)
        })?;
        summary.page_count = rasters.len();
        summary
            .artifacts
            .extend(rasters.iter().map(|raster| raster.image_path.clone()));

        if config.ocr.enabled {
            let recognized = run_stage(Stage::Ocr, || {
                let default_engine;
                let ocr: &dyn OcrEngine = match &self.ocr_engine {
                    Some(custom) => custom.as_ref(),
                    None => {
                        default_engine = TesseractCli::new(&config.ocr.tesseract_path);
                        if !default_engine.is_available() {
                            log::warn!(
                                "OCR skipped: {} cannot be launched",
                                config.ocr.tesseract_path.display()
                            );
                            write_text("", &config.ocr_text_path())?;
                            return Ok(0);
                        }
                        &default_engine
                    },
                };
                let report = ocr_rasters(
                    ocr,
                    &rasters,
                    &config.ocr.language,
                    config.ocr.page_segmentation_mode,
                );
                if report.skipped > 0 {
                    log::warn!("OCR skipped {} of {} images", report.skipped, rasters.len());
                }
                write_text(&report.text, &config.ocr_text_path())?;
                Ok(report.recognized)
            })?;
            summary.ocr_pages_recognized = Some(recognized);
            summary.artifacts.push(config.ocr_text_path());
        }

        if config.metadata.enabled {
            let runs = run_stage(Stage::Metadata, || {
                let tool = PdfToHtml::new(&config.metadata.pdftohtml_path);
                let runs = match tool.extract(&config.document_path, &config.metadata_work_dir()) {
                    Ok(runs) => runs,
                    Err(e) if !e.is_fatal() => {
                        log::warn!("Metadata extraction skipped: {}", e);
                        Vec::new()
                    },
                    Err(e) => return Err(e),
                };
                let json = serde_json::to_vec_pretty(&runs)
                    .map_err(|e| Error::Metadata(e.to_string()))?;
                write_atomic(&config.metadata_path(), &json)?;
                Ok(runs.len())
            })?;
            summary.metadata_runs = Some(runs);
            summary.artifacts.push(config.metadata_path());
        }

        let span_map = run_stage(Stage::Project, || project_spans(engine, &rasters))?;
        summary.spans_per_page = rasters
            .iter()
            .map(|raster| span_map.get(&raster.page_index).map_or(0, Vec::len))
            .collect();

        run_stage(Stage::Overlay, || {
            log::info!("Generating HTML representation...");
            OverlayRenderer::new().render(&rasters, &span_map, &config.overlay_path())
        })?;
        summary.artifacts.push(config.overlay_path());

        log::info!(
            "Done: {} pages, {} glyphs, {} spans",
            summary.page_count,
            summary.glyph_count,
            summary.span_count()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stage_tags_errors() {
        let result: Result<()> = run_stage(Stage::Rasterize, || {
            Err(Error::RenderingDependency("no backend".to_string()))
        });
        let err = result.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Rasterize));
        assert!(err.to_string().contains("rasterize"));
        assert!(err.to_string().contains("no backend"));
    }

    #[test]
    fn test_run_stage_passes_values() {
        assert_eq!(run_stage(Stage::Layout, || Ok(3)).unwrap(), 3);
    }
}

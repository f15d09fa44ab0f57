//! Glyph map a PDF
//!
//! Writes the glyph report, page rasters and hover overlay for one document.
//!
//! Usage:
//!   cargo run --release --bin pdf_glyphmap -- pdfs/document.pdf
//!   cargo run --release --bin pdf_glyphmap -- --config run.json --no-ocr
//!   RUST_LOG=debug cargo run --release --bin pdf_glyphmap -- --dpi 72 doc.pdf

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pdf_glyphmap::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "pdf_glyphmap")]
#[command(about = "Map every glyph of a PDF to a fingerprint and an HTML hover overlay")]
#[command(version)]
struct Cli {
    /// PDF to process (overrides the config file)
    document: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for reports and the overlay
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory for page images
    #[arg(short, long)]
    images_dir: Option<PathBuf>,

    /// Rasterization resolution
    #[arg(long)]
    dpi: Option<u32>,

    /// Skip OCR of the page images
    #[arg(long)]
    no_ocr: bool,

    /// Run pdftohtml for text-run metadata
    #[arg(long)]
    metadata: bool,

    /// pdftohtml executable
    #[arg(long)]
    pdftohtml: Option<PathBuf>,

    /// tesseract executable
    #[arg(long)]
    tesseract: Option<PathBuf>,

    /// OCR language
    #[arg(long)]
    lang: Option<String>,

    /// OCR page segmentation mode
    #[arg(long)]
    psm: Option<u8>,

    /// Directory holding the PDFium library
    #[arg(long)]
    pdfium_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> pdf_glyphmap::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(document) = self.document {
            config = config.with_document(document);
        }
        if let Some(dir) = self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(dir) = self.images_dir {
            config = config.with_images_dir(dir);
        }
        if let Some(dpi) = self.dpi {
            config = config.with_dpi(dpi);
        }
        if self.no_ocr {
            config = config.with_ocr(false);
        }
        if self.metadata {
            config = config.with_metadata(true);
        }
        if let Some(path) = self.pdftohtml {
            config.metadata.pdftohtml_path = path;
        }
        if let Some(path) = self.tesseract {
            config.ocr.tesseract_path = path;
        }
        if let Some(lang) = self.lang {
            config.ocr.language = lang;
        }
        if let Some(psm) = self.psm {
            config.ocr.page_segmentation_mode = psm;
        }
        if let Some(dir) = self.pdfium_dir {
            config = config.with_pdfium_library_dir(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    match Pipeline::new(config).run() {
        Ok(summary) => {
            println!(
                "Processed {} pages: {} glyphs, {} spans",
                summary.page_count,
                summary.glyph_count,
                summary.span_count()
            );
            match summary.to_json() {
                Ok(json) => log::debug!("Run summary:\n{}", json),
                Err(e) => log::warn!("Cannot serialize run summary: {}", e),
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

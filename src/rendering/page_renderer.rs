//! Page rasterizer - renders every page to an image file.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::backend::RenderEngine;
use crate::error::Result;
use crate::geometry::{PageSize, PixelMapping};
use crate::report::write_atomic;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless)
    #[default]
    Png,
    /// JPEG format (lossy, smaller file size)
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Options for page rendering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Dots per inch (default: 200)
    pub dpi: u32,
    /// Output image format
    pub format: ImageFormat,
    /// Whether to render annotations
    pub render_annotations: bool,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 200,
            format: ImageFormat::Png,
            render_annotations: true,
            jpeg_quality: 85,
        }
    }
}

impl RenderOptions {
    /// Create options with custom DPI.
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Set JPEG format with quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Mapping from layout units to raster pixels.
    pub fn pixel_mapping(&self) -> PixelMapping {
        PixelMapping::from_dpi(self.dpi)
    }
}

/// A rendered page on disk.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PageRaster {
    /// Zero-based page index
    pub page_index: usize,
    /// Location of the image file
    pub image_path: PathBuf,
    /// Layout-space page size (not the image's pixel size)
    pub page_size: PageSize,
}

/// File name of the raster for a 1-based page ordinal.
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::rendering::{ImageFormat, page_image_name};
///
/// assert_eq!(page_image_name(1, ImageFormat::Png), "page_1.png");
/// assert_eq!(page_image_name(12, ImageFormat::Jpeg), "page_12.jpg");
/// ```
pub fn page_image_name(ordinal: usize, format: ImageFormat) -> String {
    format!("page_{}.{}", ordinal, format.extension())
}

/// Renders pages through a [`RenderEngine`] and writes them to a directory.
#[derive(Debug, Clone)]
pub struct PageRasterizer {
    options: RenderOptions,
}

impl PageRasterizer {
    /// Create a rasterizer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render every page, in page order, into `output_dir`.
    ///
    /// Either all pages are written or the first failure is returned.
    pub fn rasterize(&self, engine: &dyn RenderEngine, output_dir: &Path) -> Result<Vec<PageRaster>> {
        std::fs::create_dir_all(output_dir)?;

        let page_count = engine.page_count();
        let mut rasters = Vec::with_capacity(page_count);

        for page_index in 0..page_count {
            let page_size = engine.page_size(page_index)?;
            let image = engine.render_page(page_index, &self.options)?;
            let data = self.encode(&image)?;

            let image_path =
                output_dir.join(page_image_name(page_index + 1, self.options.format));
            write_atomic(&image_path, &data)?;
            log::info!(
                "Saved image: {} ({}x{} px)",
                image_path.display(),
                image.width(),
                image.height()
            );

            rasters.push(PageRaster {
                page_index,
                image_path,
                page_size,
            });
        }

        Ok(rasters)
    }

    fn encode(&self, image: &image::DynamicImage) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        match self.options.format {
            ImageFormat::Png => {
                image.write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)?;
            },
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = image::DynamicImage::ImageRgb8(image.to_rgb8());
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut data,
                    self.options.jpeg_quality,
                );
                rgb.write_with_encoder(encoder)?;
            },
        }
        Ok(data)
    }
}

//! PDFium backend.
//!
//! [`PdfiumEngine`] binds the PDFium shared library; [`PdfiumDocument`]
//! implements both capability interfaces over one loaded document. The layout
//! view runs the characters through [`crate::layout::analyze_page`]; the
//! structured view groups the same characters in engine order with
//! [`build_structured_page`]. Neither view reads the other's output.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::*;

use crate::backend::{
    LayoutSource, PositionedChar, RenderEngine, StructuredPage, build_structured_page,
};
use crate::error::{Error, Result};
use crate::geometry::PageSize;
use crate::layout::{LayoutBox, LayoutPage, LayoutParams, OtherKind, analyze_page};
use crate::rendering::RenderOptions;

/// A bound PDFium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl std::fmt::Debug for PdfiumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumEngine").finish_non_exhaustive()
    }
}

impl PdfiumEngine {
    /// Bind PDFium from `library_dir`, falling back to the system library.
    ///
    /// Fails with [`Error::RenderingDependency`] when neither can be loaded.
    pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|e| {
                    log::warn!("PDFium not found in {}: {}; trying system library", dir.display(), e);
                    Pdfium::bind_to_system_library()
                }),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| Error::RenderingDependency(format!("cannot bind PDFium library: {}", e)))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Load a document.
    pub fn open(&self, path: &Path, params: LayoutParams) -> Result<PdfiumDocument<'_>> {
        if !path.exists() {
            return Err(Error::DocumentAccess {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::DocumentAccess {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::info!("Opened {} ({} pages)", path.display(), document.pages().len());
        Ok(PdfiumDocument {
            document,
            path: path.to_path_buf(),
            params,
        })
    }
}

/// A document loaded through PDFium.
#[derive(Debug)]
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
    params: LayoutParams,
}

impl PdfiumDocument<'_> {
    fn access_error(&self, reason: impl std::fmt::Display) -> Error {
        Error::DocumentAccess {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn page(&self, page_index: usize) -> Result<PdfPage<'_>> {
        let index = PdfPageIndex::try_from(page_index)
            .map_err(|_| self.access_error(format!("page index {} out of range", page_index)))?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| self.access_error(format!("page {}: {}", page_index, e)))
    }

    fn size_of(page: &PdfPage<'_>) -> PageSize {
        PageSize::new(page.width().value, page.height().value)
    }

    /// Characters of a page in engine order.
    ///
    /// Control characters (line breaks inserted by the engine) and characters
    /// without bounds are dropped. A character with no Unicode mapping keeps
    /// its box with empty text.
    fn chars_of(&self, page: &PdfPage<'_>, page_index: usize) -> Result<Vec<PositionedChar>> {
        let text = page
            .text()
            .map_err(|e| self.access_error(format!("page {} text: {}", page_index, e)))?;

        let mut chars = Vec::new();
        for ch in text.chars().iter() {
            let unicode = ch.unicode_string().unwrap_or_default();
            if !unicode.is_empty() && unicode.chars().all(char::is_control) {
                continue;
            }

            let bounds = match ch.loose_bounds() {
                Ok(bounds) => bounds,
                Err(e) => {
                    log::debug!("Page {}: skipping char without bounds: {}", page_index, e);
                    continue;
                },
            };

            chars.push(PositionedChar {
                text: unicode,
                bbox: LayoutBox::new(
                    bounds.left().value,
                    bounds.bottom().value,
                    bounds.right().value,
                    bounds.top().value,
                ),
                font_name: ch.font_name(),
                font_size: ch.scaled_font_size().value,
            });
        }
        Ok(chars)
    }

    /// Non-text page objects with their boxes.
    fn others_of(page: &PdfPage<'_>) -> Vec<(OtherKind, LayoutBox)> {
        page.objects()
            .iter()
            .filter_map(|object| {
                let kind = match object.object_type() {
                    PdfPageObjectType::Text => return None,
                    PdfPageObjectType::Image => OtherKind::Image,
                    PdfPageObjectType::Path => OtherKind::Curve,
                    PdfPageObjectType::XObjectForm => OtherKind::Figure,
                    _ => OtherKind::Unknown,
                };
                let bounds = object.bounds().ok()?;
                Some((
                    kind,
                    LayoutBox::new(
                        bounds.left().value,
                        bounds.bottom().value,
                        bounds.right().value,
                        bounds.top().value,
                    ),
                ))
            })
            .collect()
    }
}

impl LayoutSource for PdfiumDocument<'_> {
    fn layout_pages(&self) -> Result<Vec<LayoutPage>> {
        let page_count = self.page_count();
        let mut pages = Vec::with_capacity(page_count);

        for page_index in 0..page_count {
            let page = self.page(page_index)?;
            let chars = self.chars_of(&page, page_index)?;
            let others = Self::others_of(&page);
            pages.push(analyze_page(page_index, Self::size_of(&page), &chars, &others, &self.params));
        }

        Ok(pages)
    }
}

impl RenderEngine for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize> {
        Ok(Self::size_of(&self.page(page_index)?))
    }

    fn render_page(&self, page_index: usize, options: &RenderOptions) -> Result<image::DynamicImage> {
        let page = self.page(page_index)?;
        let (width, height) = options.pixel_mapping().pixel_size(Self::size_of(&page));

        let config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32)
            .render_form_data(true)
            .render_annotations(options.render_annotations);

        let bitmap = page.render_with_config(&config).map_err(|e| {
            Error::RenderingDependency(format!("failed to render page {}: {}", page_index + 1, e))
        })?;

        Ok(bitmap.as_image())
    }

    fn structured_text(&self, page_index: usize) -> Result<StructuredPage> {
        let page = self.page(page_index)?;
        let chars = self.chars_of(&page, page_index)?;
        let images: Vec<LayoutBox> = Self::others_of(&page)
            .into_iter()
            .filter(|(kind, _)| *kind == OtherKind::Image)
            .map(|(_, bbox)| bbox)
            .collect();

        Ok(build_structured_page(Self::size_of(&page), &chars, &images))
    }
}

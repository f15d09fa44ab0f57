#![allow(dead_code)]
//! In-memory document implementing both capability interfaces.
//!
//! Pages are described as runs of characters at fixed positions. The layout
//! view goes through the layout analyzer, the structured view through the
//! engine-order span builder, and rasters are blank pages of the right size.

use image::{DynamicImage, Rgb, RgbImage};
use pdf_glyphmap::backend::{
    LayoutSource, PositionedChar, RenderEngine, StructuredPage, build_structured_page,
};
use pdf_glyphmap::geometry::PageSize;
use pdf_glyphmap::layout::{LayoutBox, LayoutPage, LayoutParams, OtherKind, analyze_page};
use pdf_glyphmap::rendering::RenderOptions;
use pdf_glyphmap::{Error, Result};
use std::path::PathBuf;

/// One page of the fixture.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub size: PageSize,
    pub chars: Vec<PositionedChar>,
    pub images: Vec<LayoutBox>,
}

impl FixturePage {
    /// US Letter page.
    pub fn letter() -> Self {
        Self::sized(612.0, 792.0)
    }

    /// Page of the given size.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            size: PageSize::new(width, height),
            chars: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Add one character per code point of `text`, left to right from (x, y).
    pub fn text(mut self, text: &str, x: f32, y: f32, font: &str, size: f32) -> Self {
        let advance = size * 0.5;
        for (i, c) in text.chars().enumerate() {
            let x0 = x + i as f32 * advance;
            self.chars.push(PositionedChar {
                text: c.to_string(),
                bbox: LayoutBox::new(x0, y, x0 + advance, y + size),
                font_name: font.to_string(),
                font_size: size,
            });
        }
        self
    }

    /// Add a single character element whose text may hold several code points.
    pub fn element(mut self, text: &str, x: f32, y: f32, font: &str, size: f32) -> Self {
        self.chars.push(PositionedChar {
            text: text.to_string(),
            bbox: LayoutBox::new(x, y, x + size * 0.5, y + size),
            font_name: font.to_string(),
            font_size: size,
        });
        self
    }

    /// Add an image.
    pub fn image(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.images.push(LayoutBox::new(x0, y0, x1, y1));
        self
    }
}

/// In-memory document.
#[derive(Debug, Clone, Default)]
pub struct FixtureDocument {
    pub pages: Vec<FixturePage>,
    pub fail_layout: bool,
    pub fail_render_at: Option<usize>,
}

impl FixtureDocument {
    pub fn new(pages: Vec<FixturePage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    fn page(&self, page_index: usize) -> Result<&FixturePage> {
        self.pages.get(page_index).ok_or_else(|| Error::DocumentAccess {
            path: PathBuf::from("fixture.pdf"),
            reason: format!("no page {}", page_index),
        })
    }
}

impl LayoutSource for FixtureDocument {
    fn layout_pages(&self) -> Result<Vec<LayoutPage>> {
        if self.fail_layout {
            return Err(Error::DocumentAccess {
                path: PathBuf::from("fixture.pdf"),
                reason: "corrupt xref table".to_string(),
            });
        }

        let params = LayoutParams::default();
        Ok(self
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let others: Vec<(OtherKind, LayoutBox)> =
                    page.images.iter().map(|bbox| (OtherKind::Image, *bbox)).collect();
                analyze_page(index, page.size, &page.chars, &others, &params)
            })
            .collect())
    }
}

impl RenderEngine for FixtureDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page_index: usize) -> Result<PageSize> {
        Ok(self.page(page_index)?.size)
    }

    fn render_page(&self, page_index: usize, options: &RenderOptions) -> Result<DynamicImage> {
        if self.fail_render_at == Some(page_index) {
            return Err(Error::RenderingDependency("renderer crashed".to_string()));
        }
        let page = self.page(page_index)?;
        let (width, height) = options.pixel_mapping().pixel_size(page.size);
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))))
    }

    fn structured_text(&self, page_index: usize) -> Result<StructuredPage> {
        let page = self.page(page_index)?;
        Ok(build_structured_page(page.size, &page.chars, &page.images))
    }
}

/// Three pages of distinct sizes and contents.
pub fn three_page_document() -> FixtureDocument {
    FixtureDocument::new(vec![
        FixturePage::sized(100.0, 120.0).text("one", 10.0, 100.0, "Times", 10.0),
        FixturePage::sized(110.0, 130.0).text("two", 10.0, 100.0, "Times", 10.0),
        FixturePage::sized(120.0, 140.0)
            .text("three", 10.0, 100.0, "Times", 10.0)
            .image(10.0, 10.0, 60.0, 60.0),
    ])
}

/// Executable shell script at `dir/name` standing in for an external tool.
#[cfg(unix)]
pub fn fake_tool(dir: &std::path::Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

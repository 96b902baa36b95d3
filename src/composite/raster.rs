use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;
use image::{ImageFormat, Rgb, RgbImage, RgbaImage, imageops};
use rayon::prelude::*;

use crate::{
    assets::decode::SourceImage,
    composite::sink::{CompositeSink, check_sources},
    config::layout::DEFAULT_BACKGROUND,
    foundation::{core::Rgb8, error::PageStackResult},
    layout::planner::LayoutResult,
};

/// JPEG quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// CPU sink that paints every source onto an opaque RGB canvas.
///
/// Sources are flattened over the background, resized to the canvas width with the
/// configured filter (Lanczos3 by default) in parallel, then pasted at their planned `y`.
/// The footer band is left as background.
#[derive(Clone, Copy, Debug)]
pub struct RasterSink {
    background: Rgb8,
    filter: imageops::FilterType,
}

impl Default for RasterSink {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

impl RasterSink {
    /// Sink with the given background and Lanczos3 resampling.
    pub fn new(background: Rgb8) -> Self {
        Self {
            background,
            filter: imageops::FilterType::Lanczos3,
        }
    }

    /// Override the resampling filter.
    pub fn with_filter(mut self, filter: imageops::FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Canvas fill color.
    pub fn background(&self) -> Rgb8 {
        self.background
    }
}

impl CompositeSink for RasterSink {
    type Output = RgbImage;

    #[tracing::instrument(level = "debug", skip_all, fields(w = plan.canvas_width, h = plan.canvas_height))]
    fn composite(
        &mut self,
        plan: &LayoutResult,
        sources: &[SourceImage],
    ) -> PageStackResult<RgbImage> {
        check_sources(plan, sources)?;

        let bg = self.background;
        let filter = self.filter;
        let width = plan.canvas_width;

        let scaled: Vec<RgbImage> = plan
            .items
            .par_iter()
            .map(|item| {
                let flat = flatten_over(&sources[item.index].pixels, bg);
                if flat.dimensions() == (width, item.scaled_height) {
                    flat
                } else {
                    imageops::resize(&flat, width, item.scaled_height, filter)
                }
            })
            .collect();

        let mut canvas = RgbImage::from_pixel(width, plan.canvas_height, Rgb(bg));
        for (item, img) in plan.items.iter().zip(&scaled) {
            imageops::replace(&mut canvas, img, 0, i64::from(item.y));
            tracing::trace!(index = item.index, y = item.y, h = item.scaled_height, "placed");
        }

        if let Some((y, h)) = plan.footer_band() {
            tracing::debug!(y, h, "footer band left blank; text is drawn by the host");
        }
        Ok(canvas)
    }
}

/// Composite one straight-alpha pixel over an opaque background.
pub fn flatten_pixel(src: [u8; 4], bg: Rgb8) -> Rgb8 {
    let a = u16::from(src[3]);
    let inv = 255u16 - a;
    std::array::from_fn(|i| {
        mul_div255(u16::from(src[i]), a).saturating_add(mul_div255(u16::from(bg[i]), inv))
    })
}

/// Flatten an RGBA image over an opaque background.
pub fn flatten_over(src: &RgbaImage, bg: Rgb8) -> RgbImage {
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        Rgb(flatten_pixel(src.get_pixel(x, y).0, bg))
    })
}

/// Write a composed page. The format follows the extension; JPEG uses `jpeg_quality`.
///
/// Missing parent directories are created.
pub fn save_page(page: &RgbImage, path: &Path, jpeg_quality: u8) -> PageStackResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let format = ImageFormat::from_path(path)
        .with_context(|| format!("pick image format for '{}'", path.display()))?;

    match format {
        ImageFormat::Jpeg => {
            let file = File::create(path)
                .with_context(|| format!("create '{}'", path.display()))?;
            let mut w = BufWriter::new(file);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut w, jpeg_quality.clamp(1, 100))
                .encode_image(page)
                .with_context(|| format!("encode jpeg '{}'", path.display()))?;
            w.flush()
                .with_context(|| format!("flush '{}'", path.display()))?;
        }
        other => {
            page.save_with_format(path, other)
                .with_context(|| format!("write image '{}'", path.display()))?;
        }
    }

    tracing::info!(path = %path.display(), w = page.width(), h = page.height(), "wrote page");
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/raster.rs"]
mod tests;

use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::{DynamicImage, ImageDecoder, ImageReader, metadata::Orientation};

use crate::foundation::{core::ImageSize, error::PageStackResult};

#[derive(Clone, Debug)]
/// A decoded source image ready for compositing.
pub struct SourceImage {
    /// Display name (file name for files on disk).
    pub name: String,
    /// Straight-alpha RGBA8 pixels.
    pub pixels: image::RgbaImage,
}

impl SourceImage {
    /// Intrinsic size of the decoded pixels.
    pub fn size(&self) -> ImageSize {
        ImageSize::from_pixels(self.pixels.width(), self.pixels.height())
    }
}

/// Decode encoded image bytes into straight RGBA8, upright.
///
/// An EXIF orientation tag is applied, so phone photos stored sideways come out the way they
/// were shot.
pub fn decode_image(bytes: &[u8], name: impl Into<String>) -> PageStackResult<SourceImage> {
    let name = name.into();
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .with_context(|| format!("guess format of '{name}'"))?
        .into_decoder()
        .with_context(|| format!("decode image '{name}' from memory"))?;
    let orientation = read_orientation(&mut decoder, &name);
    let mut dyn_img = DynamicImage::from_decoder(decoder)
        .with_context(|| format!("decode image '{name}' from memory"))?;
    dyn_img.apply_orientation(orientation);
    Ok(SourceImage {
        name,
        pixels: dyn_img.to_rgba8(),
    })
}

/// EXIF orientation reported by `decoder`. Unreadable metadata counts as upright.
pub(crate) fn read_orientation(decoder: &mut impl ImageDecoder, name: &str) -> Orientation {
    match decoder.orientation() {
        Ok(o) => o,
        Err(err) => {
            tracing::warn!(image = name, %err, "ignoring unreadable orientation");
            Orientation::NoTransforms
        }
    }
}

/// `true` when `orientation` turns the stored image by a quarter turn.
pub(crate) fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Read and decode an image file. The file name becomes [`SourceImage::name`].
pub fn decode_source(path: &Path) -> PageStackResult<SourceImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    decode_image(&bytes, name)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

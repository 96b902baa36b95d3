use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::ImageDecoder;

use crate::{
    assets::decode::{read_orientation, swaps_axes},
    foundation::{
        core::ImageSize,
        error::{PageStackError, PageStackResult},
    },
};

/// File extensions (lowercase) picked up by [`collect_images`].
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Supplies intrinsic image dimensions to the planner.
pub trait SizeSource {
    /// Dimensions of the image at `path`.
    fn image_size(&self, path: &Path) -> PageStackResult<ImageSize>;
}

/// Reads dimensions from the image header without decoding pixels.
///
/// The EXIF orientation is honored, so the size matches what [`crate::decode_source`] returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderProbe;

impl SizeSource for HeaderProbe {
    fn image_size(&self, path: &Path) -> PageStackResult<ImageSize> {
        let mut decoder = image::ImageReader::open(path)
            .with_context(|| format!("open image '{}'", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("guess format of '{}'", path.display()))?
            .into_decoder()
            .with_context(|| format!("read image header '{}'", path.display()))?;
        let (w, h) = decoder.dimensions();
        let orientation = read_orientation(&mut decoder, &path.display().to_string());
        if swaps_axes(orientation) {
            Ok(ImageSize::from_pixels(h, w))
        } else {
            Ok(ImageSize::from_pixels(w, h))
        }
    }
}

/// Pre-known sizes, keyed by path.
impl SizeSource for HashMap<PathBuf, ImageSize> {
    fn image_size(&self, path: &Path) -> PageStackResult<ImageSize> {
        self.get(path).copied().ok_or_else(|| {
            PageStackError::invalid_input(format!("no size known for '{}'", path.display()))
        })
    }
}

/// `true` when the extension is one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// List image files directly inside `dir`, sorted by file name ignoring case.
///
/// Subdirectories are not descended into. Names that compare equal ignoring case fall back to
/// byte order so the result is deterministic.
pub fn collect_images(dir: &Path) -> PageStackResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read image dir '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list image dir '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_image_path(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (name.to_lowercase(), name)
    });
    tracing::debug!(dir = %dir.display(), count = files.len(), "collected images");
    Ok(files)
}

/// Query `source` for every path, preserving order.
pub fn probe_all<S: SizeSource + ?Sized>(
    source: &S,
    paths: &[PathBuf],
) -> PageStackResult<Vec<ImageSize>> {
    paths
        .iter()
        .map(|p| {
            let size = source.image_size(p)?;
            tracing::trace!(path = %p.display(), w = size.width, h = size.height, "probed");
            Ok(size)
        })
        .collect()
}

/// Refuse to write `out` over one of the `sources` being composed.
pub fn check_output_path(out: &Path, sources: &[PathBuf]) -> PageStackResult<()> {
    let target = comparable(out);
    if let Some(src) = sources.iter().find(|src| comparable(src) == target) {
        return Err(PageStackError::invalid_input(format!(
            "output '{}' would overwrite source image '{}'",
            out.display(),
            src.display()
        )));
    }
    Ok(())
}

/// Resolved form of `path` for equality checks; falls back to the lexical absolute path for
/// files that do not exist yet.
fn comparable(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

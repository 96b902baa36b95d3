use std::{
    fs::File,
    io::BufWriter,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;

use crate::{
    config::layout::PageSettings,
    foundation::{
        core::Rgb8,
        error::{PageStackError, PageStackResult},
    },
    layout::planner::LayoutResult,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Record of a composed page: the geometry used and where each image landed.
///
/// Field names follow the `job.json` files consumed by layer-based hosts, so a host script can
/// rebuild the page with one placed layer per image once [`JobManifest::with_source_paths`]
/// has filled in each image's `zip_filename`. The manifest also loads back as a
/// [`crate::JobDescription`].
pub struct JobManifest {
    /// Seconds since the Unix epoch when the page was composed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_unix: Option<u64>,
    /// Product name carried through from the job, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Page geometry.
    pub layout: ManifestLayout,
    /// One entry per placed image, top to bottom.
    pub images: Vec<ManifestImage>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Page geometry in whole pixels.
pub struct ManifestLayout {
    /// Canvas width.
    pub width: u32,
    /// Top margin.
    pub top: u32,
    /// Gap between images.
    pub gap: u32,
    /// Bottom margin.
    pub bottom: u32,
    /// Canvas height.
    pub total_height: u32,
    /// Footer anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_y: Option<u32>,
    /// Background as `#RRGGBB`.
    pub background: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Placement of one image.
pub struct ManifestImage {
    /// 1-based position.
    pub index: usize,
    /// Source file name.
    pub original_filename: String,
    /// Source path relative to the manifest's folder, `/`-separated. Hosts open the layer
    /// image from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_filename: Option<String>,
    /// Top edge.
    pub y: u32,
    /// Placed width (the canvas width).
    pub w: u32,
    /// Placed height.
    pub h: u32,
    /// Layer name for hosts that build one layer per image (`IMAGE_001`, ...).
    pub layer_name: String,
}

impl JobManifest {
    /// Build a manifest for `plan`. `names[i]` names the source of `plan.items[i]`.
    pub fn from_plan(
        plan: &LayoutResult,
        names: &[String],
        settings: &PageSettings,
        created_at_unix: Option<u64>,
    ) -> PageStackResult<Self> {
        if names.len() != plan.items.len() {
            return Err(PageStackError::invalid_input(format!(
                "plan has {} items but {} names were given",
                plan.items.len(),
                names.len()
            )));
        }

        let images = plan
            .items
            .iter()
            .zip(names)
            .map(|(item, name)| ManifestImage {
                index: item.index + 1,
                original_filename: name.clone(),
                zip_filename: None,
                y: item.y,
                w: plan.canvas_width,
                h: item.scaled_height,
                layer_name: format!("IMAGE_{:03}", item.index + 1),
            })
            .collect();

        let layout = &settings.layout;
        Ok(Self {
            created_at_unix,
            product_name: None,
            layout: ManifestLayout {
                width: plan.canvas_width,
                top: whole_px(layout.top_margin),
                gap: whole_px(layout.gap),
                bottom: whole_px(layout.bottom_margin),
                total_height: plan.canvas_height,
                footer_y: plan.footer_y,
                background: hex_rgb(settings.background),
            },
            images,
        })
    }

    /// Attach a product name.
    pub fn with_product_name(mut self, name: Option<String>) -> Self {
        self.product_name = name;
        self
    }

    /// Record where each source lives, relative to `base` (normally the manifest's folder).
    ///
    /// `paths[i]` is the file behind `images[i]`.
    pub fn with_source_paths(mut self, paths: &[PathBuf], base: &Path) -> PageStackResult<Self> {
        if paths.len() != self.images.len() {
            return Err(PageStackError::invalid_input(format!(
                "manifest has {} images but {} paths were given",
                self.images.len(),
                paths.len()
            )));
        }
        for (img, path) in self.images.iter_mut().zip(paths) {
            img.zip_filename = Some(portable_path(&relative_to(path, base)));
        }
        Ok(self)
    }

    /// Pretty JSON text.
    pub fn to_json_pretty(&self) -> PageStackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PageStackError::serde(e.to_string()))
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> PageStackResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create manifest dir '{}'", parent.display()))?;
        }
        let f = File::create(path)
            .with_context(|| format!("create manifest '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), self)
            .map_err(|e| PageStackError::serde(format!("write manifest: {e}")))?;
        tracing::info!(path = %path.display(), images = self.images.len(), "wrote manifest");
        Ok(())
    }
}

/// `path` expressed from `base`, walking up with `..` where needed. Paths on different roots
/// (or that cannot be made absolute) come back unchanged.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let (Ok(path_abs), Ok(base_abs)) = (std::path::absolute(path), std::path::absolute(base))
    else {
        return path.to_path_buf();
    };
    let mut path_parts = path_abs.components().peekable();
    let mut base_parts = base_abs.components().peekable();
    if path_parts.peek() != base_parts.peek() {
        return path_abs;
    }
    while let (Some(a), Some(b)) = (path_parts.peek(), base_parts.peek()) {
        if a != b {
            break;
        }
        path_parts.next();
        base_parts.next();
    }
    let mut out = PathBuf::new();
    for part in base_parts {
        if matches!(part, Component::Normal(_)) {
            out.push("..");
        }
    }
    out.extend(path_parts);
    out
}

fn portable_path(path: &Path) -> String {
    if path.is_absolute() {
        return path.to_string_lossy().into_owned();
    }
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn whole_px(v: f64) -> u32 {
    v.round() as u32
}

fn hex_rgb(c: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", c[0], c[1], c[2])
}

#[cfg(test)]
#[path = "../../tests/unit/composite/manifest.rs"]
mod tests;

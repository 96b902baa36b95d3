use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::layout::{FooterOverrides, LayoutOverrides, PageSettings},
    foundation::error::{PageStackError, PageStackResult},
};

/// Fallback file stem when nothing usable is left after sanitizing.
pub const DEFAULT_OUTPUT_STEM: &str = "detail_page";

/// Folder under the input directory that receives the page when no output path is given.
///
/// Folder scans do not descend into subdirectories, so pages written here are never picked up
/// as sources by a later run.
pub const DEFAULT_OUTPUT_DIR: &str = "pagestack_out";

const MAX_STEM_CHARS: usize = 80;

/// Default page path for a run over `in_dir`: `<in_dir>/pagestack_out/<stem>.jpg`.
pub fn default_output_path(in_dir: &Path, stem: &str) -> PathBuf {
    in_dir.join(DEFAULT_OUTPUT_DIR).join(format!("{stem}.jpg"))
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// External job record that overrides built-in page settings.
///
/// Loaded from JSON. Unknown fields are ignored, so manifests written by
/// [`crate::JobManifest`] (which carry `created_at`, `total_height`, ...) load as job files.
pub struct JobDescription {
    /// Product name; used for the output file stem.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Layout overrides.
    #[serde(default)]
    pub layout: LayoutOverrides,
    /// Footer overrides.
    #[serde(default)]
    pub footer: FooterOverrides,
    /// Explicit image order. Empty means "scan the input folder".
    #[serde(default)]
    pub images: Vec<JobImage>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// One image reference in a job. The first present of `file`, `zip_filename`,
/// `original_filename` wins.
pub struct JobImage {
    /// Path relative to the job's folder.
    #[serde(default)]
    pub file: Option<String>,
    /// Normalized packaged path, as written by the companion tool.
    #[serde(default)]
    pub zip_filename: Option<String>,
    /// Name of the file as originally uploaded.
    #[serde(default)]
    pub original_filename: Option<String>,
}

impl JobImage {
    /// Relative path this entry points at.
    pub fn rel_path(&self) -> Option<&str> {
        self.file
            .as_deref()
            .or(self.zip_filename.as_deref())
            .or(self.original_filename.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

impl JobDescription {
    /// Parse a job from JSON text.
    pub fn from_json_str(s: &str) -> PageStackResult<Self> {
        serde_json::from_str(s).map_err(|e| PageStackError::serde(format!("job JSON: {e}")))
    }

    /// Read and parse a job file.
    pub fn from_path(path: impl AsRef<Path>) -> PageStackResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        let job = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), images = job.images.len(), "loaded job");
        Ok(job)
    }

    /// Layer this job's overrides over `base`.
    pub fn effective_settings(&self, base: &PageSettings) -> PageStackResult<PageSettings> {
        base.with_overrides(&self.layout, &self.footer)
    }

    /// Sanitized stem from `product_name`, if one is set.
    pub fn output_stem(&self) -> Option<String> {
        self.product_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(safe_name)
    }

    /// Resolve the explicit image list against `root`. `None` when the job lists no images.
    pub fn image_paths(&self, root: &Path) -> PageStackResult<Option<Vec<PathBuf>>> {
        if self.images.is_empty() {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(self.images.len());
        for (idx, img) in self.images.iter().enumerate() {
            let rel = img.rel_path().ok_or_else(|| {
                PageStackError::config(format!("job image {idx} has no file name"))
            })?;
            out.push(root.join(rel));
        }
        Ok(Some(out))
    }
}

/// Turn free text into a portable file stem.
///
/// Spaces become `_`; only alphanumerics and `_ - . ( ) [ ]` survive; at most 80 chars.
pub fn safe_name(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|ch| {
            ch.is_alphanumeric() || matches!(*ch, '_' | '-' | '.' | '(' | ')' | '[' | ']')
        })
        .take(MAX_STEM_CHARS)
        .collect();
    if cleaned.is_empty() {
        DEFAULT_OUTPUT_STEM.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/job.rs"]
mod tests;

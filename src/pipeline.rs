use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    assets::{
        decode::{SourceImage, decode_source},
        source::{SizeSource, probe_all},
    },
    composite::sink::CompositeSink,
    config::layout::LayoutConfig,
    foundation::{
        core::ImageSize,
        error::{PageStackError, PageStackResult},
    },
    layout::planner::{LayoutResult, plan_layout},
};

/// Output of a compose run: the plan, the source names in plan order, and the sink's output.
#[derive(Clone, Debug)]
pub struct ComposedPage<T> {
    /// The layout the sink consumed.
    pub plan: LayoutResult,
    /// Source names, index-aligned with `plan.items`.
    pub names: Vec<String>,
    /// Whatever the sink produced.
    pub output: T,
}

/// Probe every path with `source`, then plan.
///
/// No pixels are decoded, so this is cheap enough for previews and dry runs.
#[tracing::instrument(skip_all, fields(images = paths.len()))]
pub fn plan_paths<S: SizeSource + ?Sized>(
    source: &S,
    paths: &[PathBuf],
    config: &LayoutConfig,
) -> PageStackResult<LayoutResult> {
    let sizes = probe_all(source, paths)?;
    plan_layout(&sizes, config)
}

/// Plan already-decoded sources and hand them to `sink`.
pub fn compose_sources<K: CompositeSink>(
    sources: &[SourceImage],
    config: &LayoutConfig,
    sink: &mut K,
) -> PageStackResult<ComposedPage<K::Output>> {
    let sizes: Vec<ImageSize> = sources.iter().map(SourceImage::size).collect();
    let plan = plan_layout(&sizes, config)?;
    let output = sink.composite(&plan, sources)?;
    Ok(ComposedPage {
        names: sources.iter().map(|s| s.name.clone()).collect(),
        plan,
        output,
    })
}

/// Decode `paths` (in parallel), plan, and composite through `sink`.
#[tracing::instrument(skip_all, fields(images = paths.len()))]
pub fn compose_paths<K: CompositeSink>(
    paths: &[PathBuf],
    config: &LayoutConfig,
    sink: &mut K,
) -> PageStackResult<ComposedPage<K::Output>> {
    if paths.is_empty() {
        return Err(PageStackError::invalid_input(
            "at least one image is required",
        ));
    }
    // fail on bad geometry before paying for decodes
    config.validate()?;

    let sources = paths
        .par_iter()
        .map(|p| decode_source(p))
        .collect::<PageStackResult<Vec<_>>>()?;
    tracing::debug!(decoded = sources.len(), "decoded sources");

    compose_sources(&sources, config, sink)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

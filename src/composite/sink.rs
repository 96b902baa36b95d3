use crate::{
    assets::decode::SourceImage,
    foundation::error::{PageStackError, PageStackResult},
    layout::planner::LayoutResult,
};

/// Turns a planned layout plus decoded sources into some output (pixels, layers, records).
///
/// `sources[i]` is the image planned as `plan.items[i]`.
pub trait CompositeSink {
    /// What the sink produces.
    type Output;

    /// Build the composite for `plan`.
    fn composite(
        &mut self,
        plan: &LayoutResult,
        sources: &[SourceImage],
    ) -> PageStackResult<Self::Output>;
}

/// Reject source lists that do not line up with `plan.items`.
pub fn check_sources(plan: &LayoutResult, sources: &[SourceImage]) -> PageStackResult<()> {
    if plan.items.len() != sources.len() {
        return Err(PageStackError::invalid_input(format!(
            "plan has {} items but {} sources were given",
            plan.items.len(),
            sources.len()
        )));
    }
    if let Some(item) = plan.items.iter().find(|it| it.index >= sources.len()) {
        return Err(PageStackError::invalid_input(format!(
            "plan item index {} is out of range",
            item.index
        )));
    }
    Ok(())
}

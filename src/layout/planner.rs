use crate::{
    config::layout::LayoutConfig,
    foundation::core::ImageSize,
    foundation::error::{PageStackError, PageStackResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Placement of one source image on the canvas.
pub struct PlacedItem {
    /// Position of the source in the input list.
    pub index: usize,
    /// Rendered height after scaling to the canvas width.
    pub scaled_height: u32,
    /// Top edge in canvas pixels.
    pub y: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Output of [`plan_layout`]: where every image goes and how big the canvas is.
pub struct LayoutResult {
    /// One entry per input size, in input order.
    pub items: Vec<PlacedItem>,
    /// Canvas width in whole pixels.
    pub canvas_width: u32,
    /// Canvas height in whole pixels, including margins and footer.
    pub canvas_height: u32,
    /// Footer anchor, present only when an enabled footer was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_y: Option<u32>,
    /// Height reserved for footer text below `footer_y` (0 without a footer).
    #[serde(default)]
    pub footer_text_height: u32,
}

impl LayoutResult {
    /// Bottom edge of the last item.
    pub fn content_bottom(&self) -> u32 {
        self.items
            .last()
            .map(|it| it.y + it.scaled_height)
            .unwrap_or(0)
    }

    /// `(y, height)` band reserved for footer text.
    pub fn footer_band(&self) -> Option<(u32, u32)> {
        self.footer_y.map(|y| (y, self.footer_text_height))
    }
}

/// Plan a vertical stack of images scaled to a fixed canvas width.
///
/// Every image is scaled to `canvas_width`, its height rounded once (half away from zero,
/// minimum 1px), and stacked top to bottom:
///
/// - `items[i].y = top_margin + sum(items[..i].scaled_height + gap)`
/// - `canvas_height = top_margin + sum(scaled_height) + gap * (n - 1) + bottom_margin
///   + footer.margin_top + footer.text_height_estimate` (footer terms only when enabled)
/// - `footer_y = last.y + last.scaled_height + footer.margin_top`
///
/// Lengths in `config` are rounded to whole pixels first, including `canvas_width`: the scale is
/// `round(canvas_width) / width`, so for a fractional width such as `100.4` the heights follow
/// the 100px canvas that is actually produced, and widths below `0.5` are rejected because
/// they round to an empty canvas.
///
/// Fails with [`PageStackError::InvalidInput`] for an empty list, non-positive image
/// dimensions, a canvas width that rounds below 1px, negative margins, or a canvas taller
/// than `u32::MAX`.
#[tracing::instrument(level = "debug", skip_all, fields(images = sizes.len()))]
pub fn plan_layout(sizes: &[ImageSize], config: &LayoutConfig) -> PageStackResult<LayoutResult> {
    if sizes.is_empty() {
        return Err(PageStackError::invalid_input(
            "at least one image is required",
        ));
    }
    config.validate()?;
    for (idx, size) in sizes.iter().enumerate() {
        size.validate().map_err(|e| match e {
            PageStackError::InvalidInput(msg) => {
                PageStackError::invalid_input(format!("image {idx}: {msg}"))
            }
            other => other,
        })?;
    }

    let canvas_width = px(config.canvas_width);
    let top = u64::from(px(config.top_margin));
    let gap = u64::from(px(config.gap));
    let bottom = u64::from(px(config.bottom_margin));

    let mut items = Vec::with_capacity(sizes.len());
    let mut y = top;
    for (index, size) in sizes.iter().enumerate() {
        let scale = f64::from(canvas_width) / size.width;
        let scaled = (size.height * scale).round().max(1.0);
        if scaled > f64::from(u32::MAX) {
            return Err(PageStackError::invalid_input(format!(
                "image {index}: scaled height exceeds {} px",
                u32::MAX
            )));
        }
        let scaled_height = scaled as u32;
        items.push(PlacedItem {
            index,
            scaled_height,
            y: to_u32(y, "image offset")?,
        });
        y += u64::from(scaled_height) + gap;
    }

    // `y` now carries a trailing gap after the last item; the canvas does not.
    let content_bottom = y - gap;

    let (footer_y, footer_text_height, footer_height) = match config.active_footer() {
        Some(f) => {
            let margin = u64::from(px(f.margin_top));
            let text = px(f.text_height_estimate);
            (
                Some(to_u32(content_bottom + margin, "footer offset")?),
                text,
                margin + u64::from(text),
            )
        }
        None => (None, 0, 0),
    };

    let canvas_height = to_u32(content_bottom + bottom + footer_height, "canvas height")?;

    tracing::debug!(
        canvas_width,
        canvas_height,
        footer_y = ?footer_y,
        "planned vertical layout"
    );

    Ok(LayoutResult {
        items,
        canvas_width,
        canvas_height,
        footer_y,
        footer_text_height,
    })
}

fn px(v: f64) -> u32 {
    // validated as finite, non-negative and within u32 range
    v.round() as u32
}

fn to_u32(v: u64, what: &str) -> PageStackResult<u32> {
    u32::try_from(v)
        .map_err(|_| PageStackError::invalid_input(format!("{what} exceeds {} px", u32::MAX)))
}

#[cfg(test)]
#[path = "../../tests/unit/layout/planner.rs"]
mod tests;

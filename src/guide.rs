//! # pagestack guide
//!
//! This module is a standalone walkthrough of pagestack's model and public API.
//! For command-line usage, run `pagestack --help`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`ImageSize`](crate::ImageSize): intrinsic width/height of one source image
//! - [`LayoutConfig`](crate::LayoutConfig): canvas width, margins, gap, optional footer
//! - [`LayoutResult`](crate::LayoutResult): per-image height and `y`, canvas size, footer anchor
//! - [`SizeSource`](crate::SizeSource): where sizes come from (image headers by default)
//! - [`CompositeSink`](crate::CompositeSink): what consumes a plan (pixels, layers, records)
//! - [`PageSettings`](crate::PageSettings): layout plus footer style and background
//! - [`JobDescription`](crate::JobDescription): JSON overrides layered over the defaults
//!
//! The work is staged so that only the first and last steps touch the filesystem:
//!
//! 1. Collect paths: [`collect_images`](crate::collect_images) or
//!    [`JobDescription::image_paths`](crate::JobDescription::image_paths)
//! 2. Probe sizes: [`probe_all`](crate::probe_all) with [`HeaderProbe`](crate::HeaderProbe)
//! 3. Plan: [`plan_layout`](crate::plan_layout)
//! 4. Composite: [`RasterSink`](crate::RasterSink), then [`save_page`](crate::save_page)
//!
//! [`plan_paths`](crate::plan_paths) and [`compose_paths`](crate::compose_paths) wrap these.
//!
//! ---
//!
//! ## Stacking rules
//!
//! Every image is scaled to the canvas width. Its height is rounded once, half away from zero,
//! with a floor of one pixel. Items are then stacked:
//!
//! ```text
//! top_margin
//! image 0          (scaled_height[0])
//! gap
//! image 1          (scaled_height[1])
//! ...
//! image n-1
//! footer.margin_top          <- footer_y is the end of this span
//! footer.text_height_estimate
//! bottom_margin
//! ```
//!
//! The gap only separates images; there is no gap after the last one. The canvas height is
//! `top + sum(heights) + gap * (n - 1) + bottom + footer.margin_top + footer.text_height_estimate`.
//!
//! ```rust
//! use pagestack::{ImageSize, LayoutConfig, plan_layout};
//!
//! # fn main() -> pagestack::PageStackResult<()> {
//! let config = LayoutConfig {
//!     canvas_width: 900.0,
//!     top_margin: 80.0,
//!     gap: 70.0,
//!     bottom_margin: 120.0,
//!     footer: None,
//! };
//! let sizes = [ImageSize::new(1000.0, 500.0)?, ImageSize::new(1000.0, 1000.0)?];
//! let plan = plan_layout(&sizes, &config)?;
//!
//! assert_eq!(plan.items[0].scaled_height, 450);
//! assert_eq!(plan.items[1].y, 600);
//! assert_eq!(plan.canvas_height, 1620);
//! # Ok(())
//! # }
//! ```
//!
//! Invalid geometry (no images, non-positive sizes, zero width, negative margins) is rejected
//! up front with [`PageStackError::InvalidInput`](crate::PageStackError::InvalidInput); there
//! are no partial plans.
//!
//! ---
//!
//! ## Settings and overrides
//!
//! Defaults come from [`PageSettings::default`](crate::PageSettings::default). Overrides are
//! partial records: [`LayoutOverrides`](crate::LayoutOverrides) and
//! [`FooterOverrides`](crate::FooterOverrides). Absent fields keep the base value.
//!
//! The CLI layers, in order: defaults, the `--job` file, then flags such as `--gap`.
//!
//! A job file accepts the short names written by the companion upload tool:
//!
//! ```json
//! {
//!   "product_name": "Linen shirt",
//!   "layout": { "width": 900, "top": 120, "gap": 80, "bottom": 120, "background": "#FFFFFF" },
//!   "footer": { "enabled": false }
//! }
//! ```
//!
//! ---
//!
//! ## Sinks
//!
//! [`RasterSink`](crate::RasterSink) paints an opaque RGB canvas: sources are flattened over the
//! background, resampled (Lanczos3) in parallel and pasted at their planned offsets. Footer text
//! is not rasterized; its band is left as background and reported through
//! [`LayoutResult::footer_band`](crate::LayoutResult::footer_band) for hosts that draw text.
//!
//! [`JobManifest`](crate::JobManifest) records the same plan as JSON: one `IMAGE_001`-style
//! entry per image with its `y`, width and height. A manifest loads back as a job.
//!
//! A custom sink only needs [`CompositeSink::composite`](crate::CompositeSink::composite); use
//! [`check_sources`](crate::check_sources) to reject mismatched inputs the same way the
//! built-in sink does.

//! pagestack composes a vertical "detail page": a stack of product images scaled to one width,
//! separated by fixed white space, with an optional footer band at the bottom.
//!
//! # Pipeline overview
//!
//! 1. **Collect**: list images in a folder ([`collect_images`]) or take an explicit job list
//! 2. **Probe**: read intrinsic sizes through a [`SizeSource`] (header only, no decode)
//! 3. **Plan**: [`plan_layout`] turns sizes + [`LayoutConfig`] into a [`LayoutResult`]
//! 4. **Composite**: a [`CompositeSink`] consumes the plan ([`RasterSink`] paints pixels)
//! 5. **Record** (optional): [`JobManifest`] writes placements for layer-based hosts
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure planning**: [`plan_layout`] does no IO and holds no state; equal inputs give equal
//!   outputs.
//! - **Whole pixels**: every planned coordinate is an integer, so stacked images never drift
//!   by accumulated fractions.
//! - **Explicit settings**: built-in defaults live in [`PageSettings::default`]; job files and
//!   flags are layered on top, never mutated in place.
//!
//! See [`crate::guide`] for a walkthrough.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composite;
mod config;
mod foundation;
mod layout;
mod pipeline;

/// Standalone walkthrough of pagestack's concepts and API.
pub mod guide;

pub use assets::decode::{SourceImage, decode_image, decode_source};
pub use assets::source::{
    HeaderProbe, IMAGE_EXTENSIONS, SizeSource, check_output_path, collect_images, is_image_path,
    probe_all,
};
pub use composite::manifest::{JobManifest, ManifestImage, ManifestLayout};
pub use composite::raster::{
    DEFAULT_JPEG_QUALITY, RasterSink, flatten_over, flatten_pixel, save_page,
};
pub use composite::sink::{CompositeSink, check_sources};
pub use config::job::{
    DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_STEM, JobDescription, JobImage, default_output_path,
    safe_name,
};
pub use config::layout::{
    DEFAULT_BACKGROUND, DEFAULT_BOTTOM_MARGIN, DEFAULT_CANVAS_WIDTH, DEFAULT_FOOTER_COLOR,
    DEFAULT_FOOTER_FONT_SIZE, DEFAULT_FOOTER_MARGIN_TOP, DEFAULT_FOOTER_TEXT, DEFAULT_GAP,
    DEFAULT_TOP_MARGIN, FooterConfig, FooterOverrides, FooterStyle, LayoutConfig,
    LayoutOverrides, PageSettings, parse_hex_rgb,
};
pub use foundation::core::{ImageSize, Rgb8};
pub use foundation::error::{PageStackError, PageStackResult};
pub use layout::planner::{LayoutResult, PlacedItem, plan_layout};
pub use pipeline::{ComposedPage, compose_paths, compose_sources, plan_paths};

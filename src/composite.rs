//! Sinks that consume a [`crate::LayoutResult`].

pub mod manifest;
pub mod raster;
pub mod sink;

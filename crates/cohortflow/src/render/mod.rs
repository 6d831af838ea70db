//! Output backends for rendered canvases.
//!
//! SVG serialization is always available through the facade re-exports;
//! file export and rasterization live in [`raster`] behind the `raster`
//! feature.

#[cfg(feature = "raster")]
pub mod raster;

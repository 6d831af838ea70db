#![forbid(unsafe_code)]

//! Headless layout and SVG writer for cohort flow diagrams.
//!
//! The planner ([`layout_flow_diagram`]) turns validated step records and a
//! resolved style configuration into absolute geometry; [`draw`] emits draw
//! ops onto a [`canvas::Surface`]; [`svg`] serializes a canvas to markup.

pub mod canvas;
pub mod draw;
pub mod layout;
pub mod model;
pub mod svg;
pub mod text;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cohortflow_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub use layout::{PaletteOverrides, layout_flow_diagram};

#![forbid(unsafe_code)]

//! Cohort flow diagram data model and style resolution (headless).
//!
//! Design goals:
//! - eager caller-input validation (no partial rendering downstream)
//! - copy-on-merge configuration: built-in style defaults are never mutated
//! - deterministic, testable color and layout inputs

pub mod color;
pub mod config;
pub mod error;
pub mod step;

pub use config::{StyleConfig, StyleOverrides, StyleTree, builtin_style_names, load_style_config};
pub use error::{Error, Result};
pub use step::{CohortStep, validate_steps};

//! Layout model produced by the geometry planner.
//!
//! Everything here is ephemeral: computed once per render pass, consumed by
//! the draw-op emitter, then discarded. The structs serialize so callers
//! (e.g. the CLI `layout` command) can inspect geometry without drawing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// One main cohort box, centered on the column axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainBoxLayout {
    pub index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub title_lines: Vec<String>,
    /// `(n = ...)` line, then an optional blank separator and the wrapped
    /// description.
    pub body_lines: Vec<String>,
    pub fill: String,
}

impl MainBoxLayout {
    pub fn top(&self) -> f64 {
        self.center_y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center_y + self.height / 2.0
    }
}

/// A side box for participants dropped between two consecutive steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionBoxLayout {
    /// Index of the step whose transition this box belongs to.
    pub step_index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// Wrapped exclusion label plus the trailing `(n = ...)` line.
    pub lines: Vec<String>,
    pub excluded: u64,
    pub fill: String,
}

/// Straight vertical arrow between two consecutive main boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectorLayout {
    pub from: LayoutPoint,
    pub to: LayoutPoint,
}

/// Horizontal branch from a connector midpoint to an exclusion box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchLayout {
    /// Junction dot on the vertical connector.
    pub junction: LayoutPoint,
    /// Arrow tip at the exclusion box edge.
    pub to: LayoutPoint,
    pub excluded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDiagramLayout {
    pub main_boxes: Vec<MainBoxLayout>,
    pub exclusion_boxes: Vec<ExclusionBoxLayout>,
    pub connectors: Vec<ConnectorLayout>,
    pub branches: Vec<BranchLayout>,
    pub bounds: Bounds,
}

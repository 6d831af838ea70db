//! Thin canvas/surface model the composer draws into.
//!
//! The engine treats 2D drawing as a capability: a [`Surface`] records draw
//! ops, a [`Canvas`] owns one or more surfaces plus figure-level state
//! (pixel size, dpi, background, optional title). Serialization to SVG and
//! rasterization live elsewhere; nothing here touches pixels.

use uuid::Uuid;

/// Identifies a surface within its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

impl SurfaceId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Vertical anchor for a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// `y` is the top of the block; lines flow downward.
    Top,
    /// `y` is the vertical center of the block.
    Middle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    RoundRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    TextBlock {
        /// Horizontal center of the block.
        x: f64,
        y: f64,
        anchor: TextAnchor,
        lines: Vec<String>,
        font_size: f64,
        line_height: f64,
        bold: bool,
        italic: bool,
    },
    Arrow {
        from: Point,
        to: Point,
        stroke_width: f64,
        head_scale: f64,
    },
    Dot {
        center: Point,
        radius: f64,
    },
}

/// A draw-op sink with its own background opacity.
#[derive(Debug, Clone)]
pub struct Surface {
    background_alpha: f32,
    ops: Vec<DrawOp>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        Self {
            background_alpha: 1.0,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn background_alpha(&self) -> f32 {
        self.background_alpha
    }

    pub fn set_background_alpha(&mut self, alpha: f32) {
        self.background_alpha = alpha;
    }
}

/// Figure-level title block drawn above the surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasTitle {
    pub text: String,
    pub font_size: f64,
    pub font_weight: String,
    /// Gap between the title and the diagram content, px.
    pub pad: f64,
}

/// The figure: identity, pixel extent, resolution and background, owning
/// the surfaces drawn into it.
#[derive(Debug, Clone)]
pub struct Canvas {
    id: Uuid,
    width: f64,
    height: f64,
    dpi: u32,
    background: String,
    background_alpha: f32,
    title: Option<CanvasTitle>,
    surfaces: Vec<Surface>,
}

impl Canvas {
    /// Creates a canvas with one root surface.
    pub fn new(width: f64, height: f64, dpi: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            dpi,
            background: "#ffffff".to_string(),
            background_alpha: 1.0,
            title: None,
            surfaces: vec![Surface::new()],
        }
    }

    /// Stable identity: survives drawing, never reassigned. The return
    /// contract for borrowed surfaces is checked against this.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn background_alpha(&self) -> f32 {
        self.background_alpha
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }

    pub fn set_background_alpha(&mut self, alpha: f32) {
        self.background_alpha = alpha;
    }

    pub fn title(&self) -> Option<&CanvasTitle> {
        self.title.as_ref()
    }

    pub fn set_title(&mut self, title: CanvasTitle) {
        self.title = Some(title);
    }

    /// The surface created with the canvas.
    pub fn root_surface(&self) -> SurfaceId {
        SurfaceId(0)
    }

    /// Adds an empty surface (e.g. for side-by-side embedding) and returns
    /// its id.
    pub fn add_surface(&mut self) -> SurfaceId {
        self.surfaces.push(Surface::new());
        SurfaceId(self.surfaces.len() - 1)
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(id.0)
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }
}

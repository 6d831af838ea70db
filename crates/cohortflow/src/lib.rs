#![forbid(unsafe_code)]

//! `cohortflow` renders vertical cohort-attrition flow diagrams: stacked
//! step boxes, side exclusion boxes, connecting arrows and a three-tier
//! cascading style configuration (built-in style ← TOML file ← keyword
//! overrides).
//!
//! The top-level operation is [`render_flow_diagram`]. It validates the
//! step sequence eagerly, resolves the style cascade, plans geometry and
//! issues draw ops onto a [`Surface`], either a freshly created one or one
//! the caller already owns.
//!
//! # Features
//!
//! - `raster`: enable PNG/JPG/TIFF/WebP/PDF file export via pure-Rust SVG
//!   rasterization/conversion (`cohortflow::render::raster`)

pub use cohortflow_core::{
    CohortStep, Error, StyleConfig, StyleOverrides, StyleTree, builtin_style_names, color,
    load_style_config, validate_steps,
};
pub use cohortflow_render::canvas::{Canvas, CanvasTitle, Surface, SurfaceId};
pub use cohortflow_render::layout::{PaletteOverrides, layout_flow_diagram};
pub use cohortflow_render::model::FlowDiagramLayout;
pub use cohortflow_render::svg::{SvgRenderOptions, render_canvas_svg};

pub mod render;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Core(#[from] cohortflow_core::Error),
    #[error(transparent)]
    Render(#[from] cohortflow_render::Error),
    #[error("drawing surface not found on the supplied canvas")]
    UnknownSurface,
}

pub type Result<T> = std::result::Result<T, FlowError>;

/// Options for one render call.
///
/// `style`, `style_config_path` and the keyword fields form the three-stage
/// style cascade; `main_palette`/`exclusion_palette` bypass gradient
/// generation entirely.
#[derive(Debug, Clone)]
pub struct FlowRenderOptions {
    /// Built-in style name (`white` or `colorful`).
    pub style: String,
    /// Optional TOML file merged over the built-in style.
    pub style_config_path: Option<std::path::PathBuf>,
    /// Optional title drawn above the diagram.
    pub figure_title: Option<String>,
    /// Fully transparent canvas and surface backgrounds.
    pub transparent: bool,
    /// Raster resolution override.
    pub dpi: Option<u32>,
    /// Canvas size minimum override, `(width, height)` px.
    pub figsize: Option<(f64, f64)>,
    /// Explicit per-box main colors (cycled when shorter than the steps).
    pub main_palette: Option<Vec<String>>,
    /// Explicit per-box exclusion colors.
    pub exclusion_palette: Option<Vec<String>>,
}

impl Default for FlowRenderOptions {
    fn default() -> Self {
        Self {
            style: "white".to_string(),
            style_config_path: None,
            figure_title: None,
            transparent: false,
            dpi: None,
            figsize: None,
            main_palette: None,
            exclusion_palette: None,
        }
    }
}

impl FlowRenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_style_config_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.style_config_path = Some(path.into());
        self
    }

    pub fn with_figure_title(mut self, title: impl Into<String>) -> Self {
        self.figure_title = Some(title.into());
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    pub fn with_figsize(mut self, width: f64, height: f64) -> Self {
        self.figsize = Some((width, height));
        self
    }
}

/// An externally owned drawing surface, by-value: the canvas moves through
/// the render call and comes back in [`RenderedFlow`] with the same
/// identity. The engine never resizes or destroys it.
#[derive(Debug)]
pub struct BorrowedSurface {
    pub canvas: Canvas,
    pub surface: SurfaceId,
}

/// Where the diagram is drawn.
#[derive(Debug, Default)]
pub enum SurfaceTarget {
    /// The engine creates a canvas+surface pair sized to fit the diagram.
    #[default]
    Owned,
    /// Draw into a surface the caller already owns.
    Borrowed(BorrowedSurface),
}

/// The (canvas, surface) return pair. For a borrowed target the canvas is
/// the surface's owner, not a new one.
#[derive(Debug)]
pub struct RenderedFlow {
    pub canvas: Canvas,
    pub surface: SurfaceId,
}

fn resolve_options(
    steps: &[CohortStep],
    options: &FlowRenderOptions,
) -> Result<(StyleConfig, FlowDiagramLayout)> {
    validate_steps(steps)?;

    let overrides = StyleOverrides {
        dpi: options.dpi,
        figsize: options.figsize,
    };
    let config = load_style_config(
        &options.style,
        options.style_config_path.as_deref(),
        &overrides,
    )?;

    let palettes = PaletteOverrides {
        main: options.main_palette.clone(),
        exclusion: options.exclusion_palette.clone(),
    };
    let layout = layout_flow_diagram(steps, &config, &palettes)?;
    Ok((config, layout))
}

/// Renders a cohort flow diagram.
///
/// Validation, style resolution and layout all happen before the first draw
/// op, so invalid input never leaves a partially drawn surface behind.
pub fn render_flow_diagram(
    steps: &[CohortStep],
    target: SurfaceTarget,
    options: &FlowRenderOptions,
) -> Result<RenderedFlow> {
    let (config, layout) = resolve_options(steps, options)?;

    let (mut canvas, surface_id) = match target {
        SurfaceTarget::Owned => {
            let width = config.figure.width.max(layout.bounds.width());
            let height = config.figure.height.max(layout.bounds.height());
            let canvas = Canvas::new(width, height, config.figure.dpi);
            let surface = canvas.root_surface();
            (canvas, surface)
        }
        SurfaceTarget::Borrowed(borrowed) => {
            if borrowed.canvas.surface(borrowed.surface).is_none() {
                return Err(FlowError::UnknownSurface);
            }
            (borrowed.canvas, borrowed.surface)
        }
    };

    if options.transparent {
        canvas.set_background_alpha(0.0);
    }
    if let Some(title) = &options.figure_title {
        canvas.set_title(CanvasTitle {
            text: title.clone(),
            font_size: config.figure.title_font_size,
            font_weight: config.figure.title_font_weight.clone(),
            pad: config.figure.title_pad,
        });
    }

    {
        let surface = canvas
            .surface_mut(surface_id)
            .ok_or(FlowError::UnknownSurface)?;
        if options.transparent {
            surface.set_background_alpha(0.0);
        }
        cohortflow_render::draw::draw_flow_diagram(surface, &layout, &config);
    }

    tracing::debug!(
        boxes = layout.main_boxes.len(),
        exclusions = layout.exclusion_boxes.len(),
        transparent = options.transparent,
        "flow diagram rendered"
    );

    Ok(RenderedFlow {
        canvas,
        surface: surface_id,
    })
}

/// Convenience wrapper: owned render straight to SVG markup.
pub fn render_flow_svg(steps: &[CohortStep], options: &FlowRenderOptions) -> Result<String> {
    let rendered = render_flow_diagram(steps, SurfaceTarget::Owned, options)?;
    Ok(render_canvas_svg(
        &rendered.canvas,
        &SvgRenderOptions::default(),
    ))
}

/// Plans geometry without drawing, for callers that only need coordinates.
pub fn plan_flow_diagram(
    steps: &[CohortStep],
    options: &FlowRenderOptions,
) -> Result<FlowDiagramLayout> {
    let (_, layout) = resolve_options(steps, options)?;
    Ok(layout)
}

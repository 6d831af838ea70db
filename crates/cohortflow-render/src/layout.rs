//! Geometry planner: converts validated step records plus a resolved style
//! configuration into absolute box geometry, connector paths and resolved
//! fills, in a single top-to-bottom pass. Coordinates are px with y growing
//! downward.

use crate::Result;
use crate::model::{
    Bounds, BranchLayout, ConnectorLayout, ExclusionBoxLayout, FlowDiagramLayout, LayoutPoint,
    MainBoxLayout,
};
use crate::text::wrap_lines;
use cohortflow_core::color::{gradient_palette, resolve_color};
use cohortflow_core::{CohortStep, StyleConfig, validate_steps};

/// Explicit per-box color lists overriding the configured gradients.
///
/// Entries cycle when shorter than the step list. An empty list counts as
/// absent.
#[derive(Debug, Clone, Default)]
pub struct PaletteOverrides {
    pub main: Option<Vec<String>>,
    pub exclusion: Option<Vec<String>>,
}

fn effective_palette(
    explicit: Option<&Vec<String>>,
    start: &str,
    end: &str,
    n: usize,
) -> Result<Vec<String>> {
    match explicit {
        Some(palette) if !palette.is_empty() => Ok(palette.clone()),
        _ => Ok(gradient_palette(start, end, n)?),
    }
}

fn palette_color(palette: &[String], index: usize) -> &str {
    &palette[index % palette.len()]
}

/// Lays out the whole diagram. Validates the step sequence first; no
/// geometry is produced for invalid input.
pub fn layout_flow_diagram(
    steps: &[CohortStep],
    config: &StyleConfig,
    palettes: &PaletteOverrides,
) -> Result<FlowDiagramLayout> {
    validate_steps(steps)?;

    let layout = &config.layout;
    let geom = &config.box_geometry;
    let colors = &config.colors;

    let main_palette = effective_palette(
        palettes.main.as_ref(),
        &colors.main_start,
        &colors.main_end,
        steps.len(),
    )?;
    let exclusion_palette = effective_palette(
        palettes.exclusion.as_ref(),
        &colors.exclusion_start,
        &colors.exclusion_end,
        steps.len(),
    )?;

    struct SizedStep {
        title_lines: Vec<String>,
        body_lines: Vec<String>,
        main_height: f64,
        exclusion: Option<SizedExclusion>,
        fill: String,
    }
    struct SizedExclusion {
        lines: Vec<String>,
        height: f64,
        excluded: u64,
        fill: String,
    }

    let mut sized: Vec<SizedStep> = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let title_lines = wrap_lines(&step.effective_heading(i), layout.main_title_width);
        let mut body_lines = vec![format!("(n = {})", step.count)];
        let description = step.description.as_deref().map(str::trim).unwrap_or("");
        if !description.is_empty() {
            body_lines.push(String::new());
            body_lines.extend(wrap_lines(description, layout.main_text_width));
        }

        let main_height_calc = geom.title_line_height * title_lines.len().max(1) as f64
            + geom.body_line_height * body_lines.len().max(1) as f64
            + geom.title_body_gap
            + 2.0 * geom.text_padding;
        let main_height = geom.min_main_height.max(main_height_calc);

        // A transition only carries an exclusion box when the count actually
        // dropped; supplied exclusion fields on a zero-delta step are ignored.
        let exclusion = if i > 0 && steps[i - 1].count > step.count {
            let excluded = steps[i - 1].count - step.count;
            let mut lines = wrap_lines(
                &step.effective_exclusion_label(),
                layout.exclusion_text_width,
            );
            lines.push(format!("(n = {excluded})"));
            let height_calc =
                geom.body_line_height * lines.len() as f64 + 2.0 * geom.text_padding;
            Some(SizedExclusion {
                lines,
                height: geom.min_exclusion_height.max(height_calc),
                excluded,
                fill: resolve_color(
                    step.exclusion_color.as_deref(),
                    palette_color(&exclusion_palette, i),
                    colors.allow_named,
                )?,
            })
        } else {
            None
        };

        sized.push(SizedStep {
            title_lines,
            body_lines,
            main_height,
            exclusion,
            fill: resolve_color(
                step.color.as_deref(),
                palette_color(&main_palette, i),
                colors.allow_named,
            )?,
        });
    }

    // Vertical stacking: the gap between consecutive boxes is the configured
    // minimum, widened when the transition has to fit an exclusion box.
    let mut centers_y = Vec::with_capacity(sized.len());
    centers_y.push(layout.top_margin + sized[0].main_height / 2.0);
    for i in 1..sized.len() {
        let gap = match &sized[i].exclusion {
            Some(excl) => layout.base_gap.max(excl.height + 2.0 * geom.clearance),
            None => layout.base_gap,
        };
        let prev_center = centers_y[i - 1];
        centers_y.push(
            prev_center + sized[i - 1].main_height / 2.0 + gap + sized[i].main_height / 2.0,
        );
    }
    let total_height =
        centers_y[sized.len() - 1] + sized[sized.len() - 1].main_height / 2.0 + layout.bottom_margin;

    // Horizontal centers. The exclusion column is always part of the content
    // width so single-column and side-branch diagrams share margins.
    let center_x = layout.x_padding + layout.main_box_width / 2.0;
    let exclusion_x = center_x
        + layout.main_box_width / 2.0
        + layout.side_gap
        + layout.exclusion_box_width / 2.0;
    let total_width = exclusion_x + layout.exclusion_box_width / 2.0 + layout.x_padding;

    let mut main_boxes = Vec::with_capacity(sized.len());
    let mut exclusion_boxes = Vec::new();
    let mut connectors = Vec::new();
    let mut branches = Vec::new();

    for (i, s) in sized.iter().enumerate() {
        main_boxes.push(MainBoxLayout {
            index: i,
            center_x,
            center_y: centers_y[i],
            width: layout.main_box_width,
            height: s.main_height,
            title_lines: s.title_lines.clone(),
            body_lines: s.body_lines.clone(),
            fill: s.fill.clone(),
        });

        if i == 0 {
            continue;
        }
        let prev_bottom = centers_y[i - 1] + sized[i - 1].main_height / 2.0;
        let curr_top = centers_y[i] - s.main_height / 2.0;
        connectors.push(ConnectorLayout {
            from: LayoutPoint {
                x: center_x,
                y: prev_bottom,
            },
            to: LayoutPoint {
                x: center_x,
                y: curr_top,
            },
        });

        if let Some(excl) = &s.exclusion {
            let mid_y = (prev_bottom + curr_top) / 2.0;
            let box_left = exclusion_x - layout.exclusion_box_width / 2.0;
            exclusion_boxes.push(ExclusionBoxLayout {
                step_index: i,
                center_x: exclusion_x,
                center_y: mid_y,
                width: layout.exclusion_box_width,
                height: excl.height,
                lines: excl.lines.clone(),
                excluded: excl.excluded,
                fill: excl.fill.clone(),
            });
            branches.push(BranchLayout {
                junction: LayoutPoint {
                    x: center_x,
                    y: mid_y,
                },
                to: LayoutPoint {
                    x: box_left,
                    y: mid_y,
                },
                excluded: excl.excluded,
            });
        }
    }

    tracing::debug!(
        boxes = main_boxes.len(),
        exclusions = exclusion_boxes.len(),
        "flow layout computed"
    );

    Ok(FlowDiagramLayout {
        main_boxes,
        exclusion_boxes,
        connectors,
        branches,
        bounds: Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: total_width,
            max_y: total_height,
        },
    })
}

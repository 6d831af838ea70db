//! Emits draw ops for a planned diagram onto a surface, in a single
//! top-to-bottom pass: boxes first, then connectors and branches, then text.

use crate::canvas::{DrawOp, Point, Surface, TextAnchor};
use crate::model::FlowDiagramLayout;
use cohortflow_core::StyleConfig;

const STROKE: &str = "#000000";

/// Issues every draw call for the diagram. The surface keeps whatever ops it
/// already carries; callers pass a fresh surface for a fresh figure.
pub fn draw_flow_diagram(surface: &mut Surface, layout: &FlowDiagramLayout, config: &StyleConfig) {
    let geom = &config.box_geometry;
    let text = &config.text;
    let lines = &config.lines;

    for connector in &layout.connectors {
        surface.push(DrawOp::Arrow {
            from: Point {
                x: connector.from.x,
                y: connector.from.y,
            },
            to: Point {
                x: connector.to.x,
                y: connector.to.y,
            },
            stroke_width: lines.connector_stroke_width,
            head_scale: lines.arrow_head_scale,
        });
    }

    for branch in &layout.branches {
        surface.push(DrawOp::Arrow {
            from: Point {
                x: branch.junction.x,
                y: branch.junction.y,
            },
            to: Point {
                x: branch.to.x,
                y: branch.to.y,
            },
            stroke_width: lines.connector_stroke_width,
            head_scale: lines.arrow_head_scale,
        });
        surface.push(DrawOp::Dot {
            center: Point {
                x: branch.junction.x,
                y: branch.junction.y,
            },
            radius: lines.junction_radius,
        });
    }

    for main_box in &layout.main_boxes {
        surface.push(DrawOp::RoundRect {
            x: main_box.center_x - main_box.width / 2.0,
            y: main_box.top(),
            width: main_box.width,
            height: main_box.height,
            corner_radius: geom.corner_radius,
            fill: main_box.fill.clone(),
            stroke: STROKE.to_string(),
            stroke_width: lines.box_stroke_width,
        });

        let title_top = main_box.top() + geom.text_padding;
        surface.push(DrawOp::TextBlock {
            x: main_box.center_x,
            y: title_top,
            anchor: TextAnchor::Top,
            lines: main_box.title_lines.clone(),
            font_size: text.font_size_title,
            line_height: geom.title_line_height,
            bold: true,
            italic: false,
        });

        let body_top = title_top
            + geom.title_line_height * main_box.title_lines.len().max(1) as f64
            + geom.title_body_gap;
        surface.push(DrawOp::TextBlock {
            x: main_box.center_x,
            y: body_top,
            anchor: TextAnchor::Top,
            lines: main_box.body_lines.clone(),
            font_size: text.font_size_main,
            line_height: geom.body_line_height,
            bold: false,
            italic: false,
        });
    }

    for excl in &layout.exclusion_boxes {
        surface.push(DrawOp::RoundRect {
            x: excl.center_x - excl.width / 2.0,
            y: excl.center_y - excl.height / 2.0,
            width: excl.width,
            height: excl.height,
            corner_radius: geom.corner_radius,
            fill: excl.fill.clone(),
            stroke: STROKE.to_string(),
            stroke_width: lines.box_stroke_width,
        });
        surface.push(DrawOp::TextBlock {
            x: excl.center_x,
            y: excl.center_y,
            anchor: TextAnchor::Middle,
            lines: excl.lines.clone(),
            font_size: text.font_size_exclusion,
            line_height: geom.body_line_height,
            bold: false,
            italic: true,
        });
    }
}

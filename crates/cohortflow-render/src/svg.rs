//! Serializes a canvas to SVG markup.

use crate::canvas::{Canvas, DrawOp, TextAnchor};
use std::fmt::Write as _;

const FONT_STACK: &str = "Helvetica, Arial, sans-serif";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Extra space added around the canvas extent.
    pub viewbox_padding: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 0.0,
        }
    }
}

fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn title_block_height(canvas: &Canvas) -> f64 {
    canvas
        .title()
        .map(|t| t.font_size * 1.4 + t.pad)
        .unwrap_or(0.0)
}

/// Renders the whole canvas (background, title, every surface's ops) as a
/// standalone SVG document.
pub fn render_canvas_svg(canvas: &Canvas, options: &SvgRenderOptions) -> String {
    let pad = options.viewbox_padding.max(0.0);
    let title_height = title_block_height(canvas);
    let width = canvas.width() + pad * 2.0;
    let height = canvas.height() + title_height + pad * 2.0;

    let mut out = String::new();
    let _ = writeln!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = fmt(width.max(1.0)),
        h = fmt(height.max(1.0)),
    );

    if canvas.background_alpha() > 0.0 {
        render_background_rect(
            &mut out,
            width,
            height,
            canvas.background(),
            canvas.background_alpha(),
        );
    }

    let _ = writeln!(&mut out, r#"<g transform="translate({p} {p})">"#, p = fmt(pad));

    if let Some(title) = canvas.title() {
        let _ = writeln!(
            &mut out,
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-family="{FONT_STACK}" font-size="{size}" font-weight="{weight}">{text}</text>"#,
            x = fmt(canvas.width() / 2.0),
            y = fmt(title.font_size * 1.1),
            size = fmt(title.font_size),
            weight = title.font_weight,
            text = escape_xml(&title.text),
        );
    }

    for surface in canvas.surfaces() {
        let _ = writeln!(
            &mut out,
            r#"<g class="surface" transform="translate(0 {y})">"#,
            y = fmt(title_height)
        );
        if surface.background_alpha() > 0.0 {
            render_background_rect(
                &mut out,
                canvas.width(),
                canvas.height(),
                canvas.background(),
                surface.background_alpha(),
            );
        }
        for op in surface.ops() {
            render_op(&mut out, op);
        }
        out.push_str("</g>\n");
    }

    out.push_str("</g>\n</svg>\n");
    out
}

fn render_background_rect(out: &mut String, width: f64, height: f64, fill: &str, alpha: f32) {
    let _ = write!(
        out,
        r#"<rect width="{w}" height="{h}" fill="{fill}""#,
        w = fmt(width),
        h = fmt(height),
    );
    if alpha < 1.0 {
        let _ = write!(out, r#" fill-opacity="{}""#, fmt(f64::from(alpha)));
    }
    out.push_str("/>\n");
}

fn render_op(out: &mut String, op: &DrawOp) {
    match op {
        DrawOp::RoundRect {
            x,
            y,
            width,
            height,
            corner_radius,
            fill,
            stroke,
            stroke_width,
        } => {
            let _ = writeln!(
                out,
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{rx}" fill="{fill}" stroke="{stroke}" stroke-width="{sw}"/>"#,
                x = fmt(*x),
                y = fmt(*y),
                w = fmt(*width),
                h = fmt(*height),
                rx = fmt(*corner_radius),
                sw = fmt(*stroke_width),
            );
        }
        DrawOp::TextBlock {
            x,
            y,
            anchor,
            lines,
            font_size,
            line_height,
            bold,
            italic,
        } => {
            let block_top = match anchor {
                TextAnchor::Top => *y,
                TextAnchor::Middle => *y - line_height * lines.len() as f64 / 2.0,
            };
            let _ = write!(
                out,
                r#"<text text-anchor="middle" font-family="{FONT_STACK}" font-size="{size}""#,
                size = fmt(*font_size),
            );
            if *bold {
                out.push_str(r#" font-weight="bold""#);
            }
            if *italic {
                out.push_str(r#" font-style="italic""#);
            }
            out.push('>');
            for (i, line) in lines.iter().enumerate() {
                // Baseline sits at roughly the ascent below each line's top.
                let baseline = block_top + line_height * i as f64 + font_size * 0.8;
                let _ = write!(
                    out,
                    r#"<tspan x="{x}" y="{y}">{text}</tspan>"#,
                    x = fmt(*x),
                    y = fmt(baseline),
                    text = escape_xml(line),
                );
            }
            out.push_str("</text>\n");
        }
        DrawOp::Arrow {
            from,
            to,
            stroke_width,
            head_scale,
        } => {
            let dx = to.x - from.x;
            let dy = to.y - from.y;
            let len = (dx * dx + dy * dy).sqrt();
            if len <= f64::EPSILON {
                return;
            }
            let (ux, uy) = (dx / len, dy / len);
            let head_len = 8.0 * head_scale;
            let head_half = 3.5 * head_scale;
            // The shaft stops at the head base so the tip stays crisp.
            let base_x = to.x - ux * head_len;
            let base_y = to.y - uy * head_len;
            let _ = writeln!(
                out,
                r##"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="#000000" stroke-width="{sw}"/>"##,
                x1 = fmt(from.x),
                y1 = fmt(from.y),
                x2 = fmt(base_x),
                y2 = fmt(base_y),
                sw = fmt(*stroke_width),
            );
            let (px, py) = (-uy, ux);
            let _ = writeln!(
                out,
                r##"<polygon points="{tx},{ty} {lx},{ly} {rx},{ry}" fill="#000000"/>"##,
                tx = fmt(to.x),
                ty = fmt(to.y),
                lx = fmt(base_x + px * head_half),
                ly = fmt(base_y + py * head_half),
                rx = fmt(base_x - px * head_half),
                ry = fmt(base_y - py * head_half),
            );
        }
        DrawOp::Dot { center, radius } => {
            let _ = writeln!(
                out,
                r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="#000000"/>"##,
                cx = fmt(center.x),
                cy = fmt(center.y),
                r = fmt(*radius),
            );
        }
    }
}

use cohortflow_core::{CohortStep, StyleOverrides, load_style_config};
use cohortflow_render::canvas::Canvas;
use cohortflow_render::draw::draw_flow_diagram;
use cohortflow_render::layout::{PaletteOverrides, layout_flow_diagram};
use cohortflow_render::svg::{SvgRenderOptions, render_canvas_svg};

fn render_svg(counts: &[u64], transparent: bool) -> String {
    let config = load_style_config("colorful", None, &StyleOverrides::default()).expect("style");
    let steps: Vec<CohortStep> = counts.iter().map(|&n| CohortStep::new(n)).collect();
    let layout =
        layout_flow_diagram(&steps, &config, &PaletteOverrides::default()).expect("layout");

    let mut canvas = Canvas::new(
        layout.bounds.width().max(config.figure.width),
        layout.bounds.height().max(config.figure.height),
        config.figure.dpi,
    );
    if transparent {
        canvas.set_background_alpha(0.0);
        let root = canvas.root_surface();
        canvas.surface_mut(root).unwrap().set_background_alpha(0.0);
    }
    let root = canvas.root_surface();
    draw_flow_diagram(canvas.surface_mut(root).unwrap(), &layout, &config);
    render_canvas_svg(&canvas, &SvgRenderOptions::default())
}

#[test]
fn svg_contains_one_rect_per_box() {
    let svg = render_svg(&[350, 150, 120, 115], true);
    // 4 main + 3 exclusion boxes; transparent render, so no background rects.
    assert_eq!(svg.matches("<rect ").count(), 7);
    assert_eq!(svg.matches("<circle").count(), 3);
    assert_eq!(svg.matches("<polygon").count(), 6);
}

#[test]
fn svg_has_root_viewbox_and_counts_text() {
    let svg = render_svg(&[350, 150], false);
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("viewBox=\"0 0 "));
    assert!(svg.contains("(n = 350)"));
    assert!(svg.contains("(n = 200)"));
    assert!(svg.contains("Excluded"));
}

#[test]
fn opaque_render_has_background_transparent_render_does_not() {
    let opaque = render_svg(&[350, 150], false);
    let transparent = render_svg(&[350, 150], true);
    assert!(opaque.contains("fill=\"#ffffff\""));
    assert!(!transparent.contains("fill=\"#ffffff\""));
}

use cohortflow::{
    BorrowedSurface, Canvas, CohortStep, Error, FlowError, FlowRenderOptions, SurfaceTarget,
    render_flow_diagram, render_flow_svg,
};

fn steps(counts: &[u64]) -> Vec<CohortStep> {
    counts.iter().map(|&n| CohortStep::new(n)).collect()
}

#[test]
fn owned_render_returns_canvas_sized_at_least_to_the_configured_minimums() {
    let rendered = render_flow_diagram(
        &steps(&[350, 150, 120, 115]),
        SurfaceTarget::Owned,
        &FlowRenderOptions::default(),
    )
    .expect("render");

    assert!(rendered.canvas.width() >= 900.0);
    assert!(rendered.canvas.height() >= 700.0);
    let surface = rendered.canvas.surface(rendered.surface).expect("surface");
    assert!(!surface.ops().is_empty());
}

#[test]
fn tall_diagrams_grow_the_canvas_beyond_the_minimum() {
    let counts: Vec<u64> = (0..12).map(|i| 1000 - i * 50).collect();
    let rendered = render_flow_diagram(
        &steps(&counts),
        SurfaceTarget::Owned,
        &FlowRenderOptions::default(),
    )
    .expect("render");
    assert!(rendered.canvas.height() > 700.0);
}

#[test]
fn borrowed_surface_comes_back_with_identical_canvas() {
    let mut canvas = Canvas::new(1400.0, 1600.0, 96);
    let surface = canvas.add_surface();
    let canvas_id = canvas.id();

    let rendered = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Borrowed(BorrowedSurface { canvas, surface }),
        &FlowRenderOptions::default(),
    )
    .expect("render");

    // Same canvas, same surface, no new canvas or surface created, no resize.
    assert_eq!(rendered.canvas.id(), canvas_id);
    assert_eq!(rendered.surface, surface);
    assert_eq!(rendered.canvas.surfaces().len(), 2);
    assert_eq!(rendered.canvas.width(), 1400.0);
    assert_eq!(rendered.canvas.height(), 1600.0);
    assert!(
        !rendered
            .canvas
            .surface(surface)
            .expect("surface")
            .ops()
            .is_empty()
    );
}

#[test]
fn transparent_option_zeroes_both_backgrounds_for_default_and_custom_styles() {
    for style in ["white", "colorful"] {
        let rendered = render_flow_diagram(
            &steps(&[350, 150]),
            SurfaceTarget::Owned,
            &FlowRenderOptions::new()
                .with_style(style)
                .with_transparent(true),
        )
        .expect("render");
        assert_eq!(rendered.canvas.background_alpha(), 0.0);
        let surface = rendered.canvas.surface(rendered.surface).expect("surface");
        assert_eq!(surface.background_alpha(), 0.0);
    }
}

#[test]
fn default_render_is_fully_opaque() {
    let rendered = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Owned,
        &FlowRenderOptions::default(),
    )
    .expect("render");
    assert_eq!(rendered.canvas.background_alpha(), 1.0);
    let surface = rendered.canvas.surface(rendered.surface).expect("surface");
    assert_eq!(surface.background_alpha(), 1.0);
}

#[test]
fn empty_input_fails_with_empty_input_error() {
    assert!(matches!(
        render_flow_diagram(&[], SurfaceTarget::Owned, &FlowRenderOptions::default()),
        Err(FlowError::Core(Error::EmptyInput))
    ));
}

#[test]
fn increasing_counts_fail_with_the_offending_index() {
    assert!(matches!(
        render_flow_diagram(
            &steps(&[100, 150]),
            SurfaceTarget::Owned,
            &FlowRenderOptions::default()
        ),
        Err(FlowError::Core(Error::InvalidSequence { index: 1, .. }))
    ));
}

#[test]
fn unknown_style_fails_before_drawing() {
    let mut canvas = Canvas::new(800.0, 600.0, 96);
    let surface = canvas.root_surface();
    let result = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Borrowed(BorrowedSurface { canvas, surface }),
        &FlowRenderOptions::new().with_style("neon"),
    );
    assert!(matches!(
        result,
        Err(FlowError::Core(Error::UnknownStyle { .. }))
    ));
}

#[test]
fn surface_id_from_another_canvas_is_rejected() {
    let mut other = Canvas::new(100.0, 100.0, 96);
    let foreign_surface = other.add_surface();

    let canvas = Canvas::new(800.0, 600.0, 96);
    let result = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Borrowed(BorrowedSurface {
            canvas,
            surface: foreign_surface,
        }),
        &FlowRenderOptions::default(),
    );
    assert!(matches!(result, Err(FlowError::UnknownSurface)));
}

#[test]
fn missing_style_file_fails() {
    let result = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Owned,
        &FlowRenderOptions::new().with_style_config_path("/nonexistent/style.toml"),
    );
    assert!(matches!(
        result,
        Err(FlowError::Core(Error::StyleFileMissing { .. }))
    ));
}

#[test]
fn figure_title_is_drawn_from_config_typography() {
    let rendered = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Owned,
        &FlowRenderOptions::new().with_figure_title("Study cohort"),
    )
    .expect("render");
    let title = rendered.canvas.title().expect("title set");
    assert_eq!(title.text, "Study cohort");
    assert_eq!(title.font_weight, "bold");
}

#[test]
fn keyword_figsize_and_dpi_overrides_apply_last() {
    let rendered = render_flow_diagram(
        &steps(&[350, 150]),
        SurfaceTarget::Owned,
        &FlowRenderOptions::new().with_figsize(2000.0, 2200.0).with_dpi(300),
    )
    .expect("render");
    assert_eq!(rendered.canvas.width(), 2000.0);
    assert_eq!(rendered.canvas.height(), 2200.0);
    assert_eq!(rendered.canvas.dpi(), 300);
}

#[test]
fn svg_convenience_renders_markup() {
    let svg = render_flow_svg(&steps(&[350, 150]), &FlowRenderOptions::default()).expect("svg");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains("(n = 350)"));
}

#[test]
fn explicit_main_palette_overrides_the_gradient() {
    let options = FlowRenderOptions {
        main_palette: Some(vec!["#123456".to_string()]),
        ..FlowRenderOptions::default()
    };
    let svg = render_flow_svg(&steps(&[350, 150]), &options).expect("svg");
    assert!(svg.contains("#123456"));
}

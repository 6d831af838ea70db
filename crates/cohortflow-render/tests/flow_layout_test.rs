use cohortflow_core::{CohortStep, Error, StyleOverrides, load_style_config};
use cohortflow_render::layout::{PaletteOverrides, layout_flow_diagram};

fn white_config() -> cohortflow_core::StyleConfig {
    load_style_config("white", None, &StyleOverrides::default()).expect("builtin style")
}

fn steps(counts: &[u64]) -> Vec<CohortStep> {
    counts.iter().map(|&n| CohortStep::new(n)).collect()
}

#[test]
fn four_steps_produce_three_exclusion_boxes_with_deltas() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150, 120, 115]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout ok");

    assert_eq!(layout.main_boxes.len(), 4);
    assert_eq!(layout.exclusion_boxes.len(), 3);
    assert_eq!(layout.connectors.len(), 3);
    assert_eq!(layout.branches.len(), 3);

    let deltas: Vec<u64> = layout.exclusion_boxes.iter().map(|b| b.excluded).collect();
    assert_eq!(deltas, vec![200, 30, 5]);
    let branch_deltas: Vec<u64> = layout.branches.iter().map(|b| b.excluded).collect();
    assert_eq!(branch_deltas, vec![200, 30, 5]);
}

#[test]
fn single_step_has_no_connectors_or_exclusions() {
    let config = white_config();
    let layout =
        layout_flow_diagram(&steps(&[350]), &config, &PaletteOverrides::default()).expect("layout");

    assert_eq!(layout.main_boxes.len(), 1);
    assert!(layout.exclusion_boxes.is_empty());
    assert!(layout.connectors.is_empty());
    assert!(layout.branches.is_empty());
}

#[test]
fn zero_delta_step_emits_no_exclusion_box_even_with_exclusion_fields() {
    let config = white_config();
    let data = vec![
        CohortStep::new(200),
        CohortStep::new(200)
            .with_exclusion_description("Withdrew consent")
            .with_exclusion_color("#ff0000"),
        CohortStep::new(150),
    ];
    let layout = layout_flow_diagram(&data, &config, &PaletteOverrides::default()).expect("layout");

    assert_eq!(layout.main_boxes.len(), 3);
    assert_eq!(layout.connectors.len(), 2);
    assert_eq!(layout.exclusion_boxes.len(), 1);
    assert_eq!(layout.exclusion_boxes[0].step_index, 2);
    assert_eq!(layout.exclusion_boxes[0].excluded, 50);
}

#[test]
fn empty_and_increasing_sequences_fail_before_any_geometry() {
    let config = white_config();
    assert!(matches!(
        layout_flow_diagram(&[], &config, &PaletteOverrides::default()),
        Err(cohortflow_render::Error::Core(Error::EmptyInput))
    ));
    assert!(matches!(
        layout_flow_diagram(&steps(&[100, 150]), &config, &PaletteOverrides::default()),
        Err(cohortflow_render::Error::Core(Error::InvalidSequence {
            index: 1,
            ..
        }))
    ));
}

#[test]
fn boxes_respect_minimum_heights_and_finite_positions() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150, 120, 115]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    for b in &layout.main_boxes {
        assert!(b.height >= config.box_geometry.min_main_height);
        assert!(b.center_x.is_finite() && b.center_y.is_finite());
    }
    for b in &layout.exclusion_boxes {
        assert!(b.height >= config.box_geometry.min_exclusion_height);
    }
}

#[test]
fn boxes_stack_downward_with_at_least_the_base_gap() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150, 120, 115]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    for pair in layout.main_boxes.windows(2) {
        let gap = pair[1].top() - pair[0].bottom();
        assert!(
            gap >= config.layout.base_gap - 1e-9,
            "gap {gap} below base gap"
        );
    }
}

#[test]
fn exclusion_boxes_sit_at_the_transition_midpoint_beside_the_column() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    let excl = &layout.exclusion_boxes[0];
    let prev_bottom = layout.main_boxes[0].bottom();
    let curr_top = layout.main_boxes[1].top();
    assert!((excl.center_y - (prev_bottom + curr_top) / 2.0).abs() < 1e-9);

    let expected_x = layout.main_boxes[0].center_x
        + config.layout.main_box_width / 2.0
        + config.layout.side_gap
        + config.layout.exclusion_box_width / 2.0;
    assert!((excl.center_x - expected_x).abs() < 1e-9);

    // The box fits inside the widened gap with clearance on both sides.
    assert!(excl.center_y - excl.height / 2.0 >= prev_bottom + config.box_geometry.clearance - 1e-9);
    assert!(excl.center_y + excl.height / 2.0 <= curr_top - config.box_geometry.clearance + 1e-9);
}

#[test]
fn long_descriptions_grow_the_box_beyond_the_minimum() {
    let config = white_config();
    let data = vec![
        CohortStep::new(350).with_description(
            "Participants recruited from twelve regional clinics between January and December, \
             screened against the inclusion criteria and consented by study staff",
        ),
        CohortStep::new(150),
    ];
    let layout = layout_flow_diagram(&data, &config, &PaletteOverrides::default()).expect("layout");
    assert!(layout.main_boxes[0].height > config.box_geometry.min_main_height);
    assert!(layout.main_boxes[0].body_lines.len() > 2);
}

#[test]
fn white_style_fills_every_box_white() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150, 120]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    assert!(layout.main_boxes.iter().all(|b| b.fill == "#ffffff"));
    assert!(layout.exclusion_boxes.iter().all(|b| b.fill == "#ffffff"));
}

#[test]
fn colorful_style_interpolates_between_gradient_endpoints() {
    let config = load_style_config("colorful", None, &StyleOverrides::default()).expect("style");
    let layout = layout_flow_diagram(
        &steps(&[350, 150, 120]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    assert_eq!(layout.main_boxes.first().unwrap().fill, config.colors.main_start);
    assert_eq!(layout.main_boxes.last().unwrap().fill, config.colors.main_end);
}

#[test]
fn per_step_color_overrides_win_and_named_colors_respect_the_gate() {
    let mut config = white_config();
    let data = vec![
        CohortStep::new(350).with_color("steelblue"),
        CohortStep::new(150),
    ];
    let layout = layout_flow_diagram(&data, &config, &PaletteOverrides::default()).expect("layout");
    assert_eq!(layout.main_boxes[0].fill, "#4682b4");

    config.colors.allow_named = false;
    assert!(matches!(
        layout_flow_diagram(&data, &config, &PaletteOverrides::default()),
        Err(cohortflow_render::Error::Core(Error::InvalidColor { .. }))
    ));
}

#[test]
fn explicit_palettes_cycle_over_the_steps() {
    let config = white_config();
    let palettes = PaletteOverrides {
        main: Some(vec!["#111111".to_string(), "#222222".to_string()]),
        exclusion: None,
    };
    let layout =
        layout_flow_diagram(&steps(&[350, 150, 120]), &config, &palettes).expect("layout");
    let fills: Vec<&str> = layout.main_boxes.iter().map(|b| b.fill.as_str()).collect();
    assert_eq!(fills, vec!["#111111", "#222222", "#111111"]);
}

#[test]
fn bounds_cover_both_columns_plus_padding() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    let excl = &layout.exclusion_boxes[0];
    let expected_width = excl.center_x + excl.width / 2.0 + config.layout.x_padding;
    assert!((layout.bounds.width() - expected_width).abs() < 1e-9);

    let last = layout.main_boxes.last().unwrap();
    assert!(
        (layout.bounds.height() - (last.bottom() + config.layout.bottom_margin)).abs() < 1e-9
    );
}

#[test]
fn layout_model_round_trips_through_json() {
    let config = white_config();
    let layout = layout_flow_diagram(
        &steps(&[350, 150]),
        &config,
        &PaletteOverrides::default(),
    )
    .expect("layout");

    let json = serde_json::to_string(&layout).expect("serialize");
    let back: cohortflow_render::model::FlowDiagramLayout =
        serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.main_boxes.len(), layout.main_boxes.len());
    assert_eq!(back.exclusion_boxes.len(), layout.exclusion_boxes.len());
}

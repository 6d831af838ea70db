use cohortflow::{CohortStep, FlowRenderOptions, render_flow_svg};

fn main() {
    let steps = vec![
        CohortStep::new(350).with_heading("Registered"),
        CohortStep::new(150)
            .with_heading("Screened")
            .with_exclusion_description("Not eligible"),
        CohortStep::new(120)
            .with_heading("Analysed")
            .with_description("Complete follow-up data available")
            .with_exclusion_description("Lost to follow-up"),
    ];

    let options = FlowRenderOptions::new()
        .with_style("colorful")
        .with_figure_title("Study cohort");
    let svg = render_flow_svg(&steps, &options).expect("render ok");
    print!("{svg}");
}

use approx::assert_relative_eq;
use graphs_rs::ChartError;
use graphs_rs::core::region::{RegionRules, validate_region};
use graphs_rs::core::{
    AxisId, AxisSpec, AxisType, AxisValue, CrossSpan, DEFAULT_GOAL_LINE_STROKE_WIDTH,
    DEFAULT_REGION_LINE_STROKE_WIDTH, LinearScale, Region, RegionInput, YAxisId, compute_rect,
};
use serde_json::json;

const FULL_WIDTH: CrossSpan = CrossSpan {
    start: 0.0,
    extent: 760.0,
};

fn y_scale() -> LinearScale {
    LinearScale::new(AxisType::Default, (0.0, 40.0), (385.0, 0.0)).expect("scale")
}

fn x_axis() -> AxisSpec {
    AxisSpec::numeric(0.0, 6.0)
        .expect("x")
        .with_ticks((1..=5).map(|v| AxisValue::Number(f64::from(v))).collect())
        .expect("ticks")
}

fn region(start: Option<f64>, end: Option<f64>) -> Region {
    Region {
        x: None,
        start,
        end,
        axis: AxisId::Y,
        color: None,
        stroke_width: None,
    }
}

fn input(value: serde_json::Value) -> RegionInput {
    serde_json::from_value(value).expect("region input")
}

fn rules(x_axis: &AxisSpec, bar: bool) -> RegionRules<'_> {
    RegionRules {
        series_axis: YAxisId::Y,
        x_axis,
        bar,
    }
}

#[test]
fn missing_start_opens_the_band_to_the_plot_bottom() {
    let rect = compute_rect(
        &region(None, Some(15.0)),
        y_scale(),
        FULL_WIDTH,
        DEFAULT_REGION_LINE_STROKE_WIDTH,
    );
    let top = y_scale().map(15.0);
    assert_relative_eq!(rect.y, top);
    assert_relative_eq!(rect.y + rect.height, 385.0);
    assert_relative_eq!(rect.width, 760.0);
}

#[test]
fn missing_end_opens_the_band_to_the_plot_top() {
    let rect = compute_rect(
        &region(Some(10.0), None),
        y_scale(),
        FULL_WIDTH,
        DEFAULT_REGION_LINE_STROKE_WIDTH,
    );
    assert_eq!(rect.y, 0.0);
    assert_relative_eq!(rect.height, y_scale().map(10.0));
}

#[test]
fn equal_bounds_draw_a_goal_line() {
    let goal = region(Some(15.0), Some(15.0));
    assert!(goal.is_goal_line());

    let bar = compute_rect(&goal, y_scale(), FULL_WIDTH, DEFAULT_GOAL_LINE_STROKE_WIDTH);
    assert_eq!(bar.height, DEFAULT_GOAL_LINE_STROKE_WIDTH);
    assert_relative_eq!(bar.y, y_scale().map(15.0));

    let line = compute_rect(&goal, y_scale(), FULL_WIDTH, DEFAULT_REGION_LINE_STROKE_WIDTH);
    assert_eq!(line.height, DEFAULT_REGION_LINE_STROKE_WIDTH);
}

#[test]
fn explicit_width_overrides_the_goal_line_stroke() {
    let mut goal = region(Some(15.0), Some(15.0));
    goal.stroke_width = Some(7.0);
    let rect = compute_rect(&goal, y_scale(), FULL_WIDTH, DEFAULT_GOAL_LINE_STROKE_WIDTH);
    assert_eq!(rect.height, 7.0);
}

#[test]
fn x_regions_span_the_plot_height() {
    let x_scale = LinearScale::new(AxisType::Default, (0.0, 6.0), (0.0, 600.0)).expect("x");
    let mut band = region(Some(2.0), None);
    band.axis = AxisId::X;
    let rect = compute_rect(
        &band,
        x_scale,
        CrossSpan {
            start: 0.0,
            extent: 385.0,
        },
        DEFAULT_REGION_LINE_STROKE_WIDTH,
    );
    assert_relative_eq!(rect.x, 200.0);
    assert_relative_eq!(rect.width, 400.0);
    assert_eq!(rect.height, 385.0);
}

#[test]
fn validation_rejects_malformed_regions() {
    let x_axis = x_axis();
    let cases = [
        (json!({"axis": "y"}), false, ChartError::RegionMissingBounds),
        (json!({"start": 1, "axis": "y2"}), false, ChartError::RegionInvalidAxis),
        (json!({"start": 1, "axis": "x"}), true, ChartError::RegionInvalidAxis),
        (json!({"start": "low"}), false, ChartError::RegionNonNumericBound),
        (json!({"start": 5, "end": 2}), false, ChartError::RegionStartAfterEnd),
        (json!({"x": 9, "start": 1}), true, ChartError::RegionTickMismatch),
        (json!({"x": "2016-01-01T00:00:00Z", "start": 1}), true, ChartError::RegionTypeMismatch),
    ];
    for (raw, bar, expected) in cases {
        assert_eq!(
            validate_region(&input(raw.clone()), rules(&x_axis, bar)),
            Err(expected),
            "{raw}"
        );
    }
}

#[test]
fn validation_defaults_to_the_series_axis() {
    let x_axis = x_axis();
    let region = validate_region(&input(json!({"end": 15})), rules(&x_axis, true)).expect("valid");
    assert_eq!(region.axis, AxisId::Y);
    assert_eq!(region.start, None);
    assert_eq!(region.end, Some(15.0));
}

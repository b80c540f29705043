//! Region and goal-line geometry.
//!
//! A region is a band between `start` and `end` on one axis. Either bound may
//! be omitted to leave the band open towards the plot edge; equal bounds turn
//! the band into a goal line of fixed stroke width.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::axis::AxisSpec;
use crate::core::path::{PathVertex, closed_path_data};
use crate::core::scale::LinearScale;
use crate::core::types::{AxisId, AxisType, AxisValue, YAxisId};
use crate::error::{ChartError, ChartResult};

/// Height of a bar goal line (`start == end`).
pub const DEFAULT_GOAL_LINE_STROKE_WIDTH: f64 = 4.0;
/// Height of a goal line on line, scatter and paired-result content.
pub const DEFAULT_REGION_LINE_STROKE_WIDTH: f64 = 2.0;
/// Share of a bar sub-band covered by a bar goal line.
pub const REGION_WIDTH_RATIO: f64 = 0.8;

/// Region as submitted in JSON, before validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInput {
    #[serde(default)]
    pub x: Option<Value>,
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
    #[serde(default)]
    pub axis: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
}

/// Point of a value region: the band between `start` and `end` at `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRegionInput {
    pub x: Value,
    pub start: Value,
    pub end: Value,
}

/// Validated region. Bounds are linear axis coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: Option<AxisValue>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub axis: AxisId,
    pub color: Option<String>,
    pub stroke_width: Option<f64>,
}

impl Region {
    /// `true` when both bounds exist and coincide.
    #[must_use]
    pub fn is_goal_line(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start == end)
    }
}

/// Validated value-region point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRegionPoint {
    pub x: AxisValue,
    pub start: f64,
    pub end: f64,
}

/// What a region is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RegionRules<'a> {
    pub series_axis: YAxisId,
    pub x_axis: &'a AxisSpec,
    /// Bar regions must sit on a configured tick and cannot target the X axis.
    pub bar: bool,
}

/// Validates a region definition.
pub fn validate_region(input: &RegionInput, rules: RegionRules<'_>) -> ChartResult<Region> {
    let axis = match input.axis.as_deref() {
        None => AxisId::from(rules.series_axis),
        Some("x") if !rules.bar => AxisId::X,
        Some("y") if rules.series_axis == YAxisId::Y => AxisId::Y,
        Some("y2") if rules.series_axis == YAxisId::Y2 => AxisId::Y2,
        Some(_) => return Err(ChartError::RegionInvalidAxis),
    };

    let start = input.start.as_ref().filter(|value| !value.is_null());
    let end = input.end.as_ref().filter(|value| !value.is_null());
    if start.is_none() && end.is_none() {
        return Err(ChartError::RegionMissingBounds);
    }

    let bound_type = if axis == AxisId::X {
        rules.x_axis.axis_type
    } else {
        AxisType::Default
    };
    let parse_bound = |value: Option<&Value>| -> ChartResult<Option<f64>> {
        value
            .map(|value| {
                AxisValue::from_json(value, bound_type)
                    .map(AxisValue::as_f64)
                    .ok_or(ChartError::RegionNonNumericBound)
            })
            .transpose()
    };
    let start = parse_bound(start)?;
    let end = parse_bound(end)?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ChartError::RegionStartAfterEnd);
        }
    }

    let x = match input.x.as_ref().filter(|value| !value.is_null()) {
        None => None,
        Some(value) => {
            let x = AxisValue::from_json(value, rules.x_axis.axis_type)
                .ok_or(ChartError::RegionTypeMismatch)?;
            if rules.bar && !rules.x_axis.has_tick(x) {
                return Err(ChartError::RegionTickMismatch);
            }
            Some(x)
        }
    };

    Ok(Region {
        x,
        start,
        end,
        axis,
        color: input.color.clone(),
        stroke_width: input.width,
    })
}

/// Validates a value-region point list.
pub fn validate_value_regions(
    inputs: &[ValueRegionInput],
    x_axis: &AxisSpec,
) -> ChartResult<Vec<ValueRegionPoint>> {
    if inputs.len() < 2 {
        return Err(ChartError::ValueRegionTooShort);
    }
    inputs
        .iter()
        .map(|input| {
            let x = AxisValue::from_json(&input.x, x_axis.axis_type)
                .ok_or(ChartError::RegionTypeMismatch)?;
            let start = input
                .start
                .as_f64()
                .filter(|value| value.is_finite())
                .ok_or(ChartError::RegionNonNumericBound)?;
            let end = input
                .end
                .as_f64()
                .filter(|value| value.is_finite())
                .ok_or(ChartError::RegionNonNumericBound)?;
            if start > end {
                return Err(ChartError::RegionStartAfterEnd);
            }
            Ok(ValueRegionPoint { x, start, end })
        })
        .collect()
}

/// Extent of a region across the axis it is not defined on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSpan {
    pub start: f64,
    pub extent: f64,
}

/// Pixel rectangle of a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Computes the rectangle of `region` on `scale`.
///
/// For Y/Y2 regions `cross` is the horizontal band (a bar sub-band or the full
/// plot width); for X regions it is the vertical extent of the plot. An absent
/// `end` opens the band to the top (or right) edge, an absent `start` to the
/// bottom (or left) edge. A goal line is drawn `line_width` thick.
#[must_use]
pub fn compute_rect(
    region: &Region,
    scale: LinearScale,
    cross: CrossSpan,
    line_width: f64,
) -> RegionRect {
    let line_width = region.stroke_width.unwrap_or(line_width);
    let (range_start, range_end) = scale.range();

    if region.axis == AxisId::X {
        let left = region.start.map_or(range_start.min(range_end), |v| scale.map(v));
        let right = region.end.map_or(range_start.max(range_end), |v| scale.map(v));
        let width = if region.is_goal_line() {
            line_width
        } else {
            (right - left).max(0.0)
        };
        return RegionRect {
            x: left,
            y: cross.start,
            width,
            height: cross.extent,
        };
    }

    let top = region.end.map_or(0.0, |v| scale.map(v));
    let bottom = region.start.map_or(range_start.max(range_end), |v| scale.map(v));
    let height = if region.is_goal_line() {
        line_width
    } else {
        (bottom - top).max(0.0)
    };
    RegionRect {
        x: cross.start,
        y: top,
        width: cross.extent,
        height,
    }
}

/// Closed area between the `end` curve and the `start` curve of a value region.
#[must_use]
pub fn compute_area_vertices(
    points: &[ValueRegionPoint],
    x_scale: LinearScale,
    y_scale: LinearScale,
) -> Vec<PathVertex> {
    let upper = points
        .iter()
        .map(|point| PathVertex::new(x_scale.map_value(point.x), y_scale.map(point.end)));
    let lower = points
        .iter()
        .rev()
        .map(|point| PathVertex::new(x_scale.map_value(point.x), y_scale.map(point.start)));
    upper.chain(lower).collect()
}

#[must_use]
pub fn compute_area_path(
    points: &[ValueRegionPoint],
    x_scale: LinearScale,
    y_scale: LinearScale,
) -> String {
    closed_path_data(&compute_area_vertices(points, x_scale, y_scale))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        CrossSpan, RegionInput, RegionRules, ValueRegionInput, compute_area_vertices,
        compute_rect, validate_region, validate_value_regions,
    };
    use crate::core::axis::AxisSpec;
    use crate::core::scale::LinearScale;
    use crate::core::types::{AxisId, AxisType, AxisValue, YAxisId};
    use crate::error::ChartError;

    fn x_axis() -> AxisSpec {
        AxisSpec::numeric(0.0, 6.0)
            .expect("axis")
            .with_ticks((1..=5).map(|v| AxisValue::Number(f64::from(v))).collect())
            .expect("ticks")
    }

    fn rules(x_axis: &AxisSpec, bar: bool) -> RegionRules<'_> {
        RegionRules {
            series_axis: YAxisId::Y,
            x_axis,
            bar,
        }
    }

    fn input(start: Option<serde_json::Value>, end: Option<serde_json::Value>) -> RegionInput {
        RegionInput {
            start,
            end,
            ..RegionInput::default()
        }
    }

    #[test]
    fn region_needs_a_bound() {
        let axis = x_axis();
        let err = validate_region(&input(None, None), rules(&axis, false)).expect_err("bounds");
        assert_eq!(err, ChartError::RegionMissingBounds);
    }

    #[test]
    fn region_rejects_reversed_and_non_numeric_bounds() {
        let axis = x_axis();
        let reversed = input(Some(json!(10)), Some(json!(2)));
        assert_eq!(
            validate_region(&reversed, rules(&axis, false)),
            Err(ChartError::RegionStartAfterEnd)
        );
        let text = input(Some(json!("ten")), None);
        assert_eq!(
            validate_region(&text, rules(&axis, false)),
            Err(ChartError::RegionNonNumericBound)
        );
    }

    #[test]
    fn region_axis_must_match_series_axis() {
        let axis = x_axis();
        let mut region = input(Some(json!(1)), None);
        region.axis = Some("y2".to_owned());
        assert_eq!(
            validate_region(&region, rules(&axis, false)),
            Err(ChartError::RegionInvalidAxis)
        );
        region.axis = Some("x".to_owned());
        assert_eq!(
            validate_region(&region, rules(&axis, true)),
            Err(ChartError::RegionInvalidAxis)
        );
        let accepted = validate_region(&region, rules(&axis, false)).expect("x region");
        assert_eq!(accepted.axis, AxisId::X);
    }

    #[test]
    fn bar_region_x_must_be_a_tick_of_matching_type() {
        let axis = x_axis();
        let mut region = input(Some(json!(1)), None);
        region.x = Some(json!(7));
        assert_eq!(
            validate_region(&region, rules(&axis, true)),
            Err(ChartError::RegionTickMismatch)
        );
        region.x = Some(json!("2016-03-03T12:00:00Z"));
        assert_eq!(
            validate_region(&region, rules(&axis, true)),
            Err(ChartError::RegionTypeMismatch)
        );
    }

    #[test]
    fn x_region_spans_full_plot_height() {
        let axis = x_axis();
        let mut region = input(Some(json!(2)), None);
        region.axis = Some("x".to_owned());
        let region = validate_region(&region, rules(&axis, false)).expect("region");
        let scale =
            LinearScale::new(AxisType::Default, (0.0, 6.0), (0.0, 600.0)).expect("scale");
        let rect = compute_rect(
            &region,
            scale,
            CrossSpan {
                start: 0.0,
                extent: 300.0,
            },
            2.0,
        );
        assert_eq!(rect.x, 200.0);
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 300.0);
    }

    #[test]
    fn value_region_area_walks_end_then_start() {
        let axis = x_axis();
        let points = validate_value_regions(
            &[
                ValueRegionInput {
                    x: json!(1),
                    start: json!(0),
                    end: json!(10),
                },
                ValueRegionInput {
                    x: json!(2),
                    start: json!(5),
                    end: json!(20),
                },
            ],
            &axis,
        )
        .expect("value regions");
        let x_scale =
            LinearScale::new(AxisType::Default, (0.0, 6.0), (0.0, 60.0)).expect("x scale");
        let y_scale =
            LinearScale::new(AxisType::Default, (0.0, 20.0), (200.0, 0.0)).expect("y scale");
        let vertices = compute_area_vertices(&points, x_scale, y_scale);
        let coords: Vec<(f64, f64)> = vertices.iter().map(|v| (v.x, v.y)).collect();
        assert_eq!(
            coords,
            vec![(10.0, 100.0), (20.0, 0.0), (20.0, 150.0), (10.0, 200.0)]
        );
    }

    #[test]
    fn value_regions_need_two_points() {
        let axis = x_axis();
        assert_eq!(
            validate_value_regions(&[], &axis),
            Err(ChartError::ValueRegionTooShort)
        );
    }
}

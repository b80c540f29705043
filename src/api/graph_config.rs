use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::axis::DEFAULT_TICKS_COUNT;
use crate::core::{AxisSpec, AxisType, AxisValue, Canvas, Padding, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::TransitionConfig;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;

/// Graph definition as submitted in JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfigInput {
    #[serde(default)]
    pub bind_to: Option<String>,
    #[serde(default)]
    pub axis: Option<AxesInput>,
    #[serde(default)]
    pub dimension: DimensionInput,
    #[serde(default)]
    pub padding: Option<Padding>,
    #[serde(default)]
    pub transition_duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxesInput {
    #[serde(default)]
    pub x: Option<AxisInput>,
    #[serde(default)]
    pub y: Option<AxisInput>,
    #[serde(default)]
    pub y2: Option<AxisInput>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisInput {
    #[serde(rename = "type", default)]
    pub axis_type: AxisType,
    #[serde(default)]
    pub lower_limit: Option<Value>,
    #[serde(default)]
    pub upper_limit: Option<Value>,
    #[serde(default)]
    pub ticks: TicksInput,
    #[serde(default = "default_ticks_count")]
    pub ticks_count: i64,
    #[serde(default)]
    pub allow_calibration: bool,
    #[serde(default)]
    pub pad_domain: bool,
    /// Only read for `y2`: the secondary axis exists when shown.
    #[serde(default)]
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicksInput {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionInput {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

fn default_ticks_count() -> i64 {
    DEFAULT_TICKS_COUNT
}

/// Validated graph configuration, immutable for the graph's lifetime except
/// for the canvas, which follows resizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub bind_to: String,
    pub x: AxisSpec,
    pub y: AxisSpec,
    pub y2: Option<AxisSpec>,
    pub canvas: Canvas,
    pub transition: TransitionConfig,
}

impl GraphConfig {
    /// Minimal numeric configuration with default canvas and padding.
    pub fn new(bind_to: impl Into<String>, x: AxisSpec, y: AxisSpec) -> ChartResult<Self> {
        let bind_to = bind_to.into();
        if bind_to.trim().is_empty() {
            return Err(ChartError::MissingBindTo);
        }
        let config = Self {
            bind_to,
            x,
            y,
            y2: None,
            canvas: Canvas::new(Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT), Padding::default()),
            transition: TransitionConfig::default(),
        };
        validate_canvas(config.canvas)?;
        Ok(config)
    }

    #[must_use]
    pub fn with_y2(mut self, y2: AxisSpec) -> Self {
        self.y2 = Some(y2);
        self
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> ChartResult<Self> {
        self.canvas = validate_canvas(canvas)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let parsed: GraphConfigInput =
            serde_json::from_str(input).map_err(|e| ChartError::InvalidJson(e.to_string()))?;
        parsed.validate()
    }
}

impl GraphConfigInput {
    pub fn validate(&self) -> ChartResult<GraphConfig> {
        let bind_to = self
            .bind_to
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ChartError::MissingBindTo)?;
        let axes = self.axis.as_ref().ok_or(ChartError::MissingAxis)?;
        let x = validate_axis(axes.x.as_ref().ok_or(ChartError::MissingAxis)?)?;
        let y_input = axes.y.as_ref().ok_or(ChartError::MissingAxis)?;
        if y_input.axis_type != AxisType::Default {
            return Err(ChartError::InvalidAxisType);
        }
        let y = validate_axis(y_input)?;
        let y2 = match axes.y2.as_ref().filter(|axis| axis.show) {
            Some(axis) if axis.axis_type != AxisType::Default => {
                return Err(ChartError::InvalidAxisType);
            }
            Some(axis) => Some(validate_axis(axis)?),
            None => None,
        };

        let viewport = Viewport::new(
            self.dimension.width.unwrap_or(DEFAULT_WIDTH),
            self.dimension.height.unwrap_or(DEFAULT_HEIGHT),
        );
        let canvas = validate_canvas(Canvas::new(viewport, self.padding.unwrap_or_default()))?;
        let transition = self
            .transition_duration
            .map_or_else(TransitionConfig::default, |duration_ms| TransitionConfig {
                duration_ms,
            });

        Ok(GraphConfig {
            bind_to: bind_to.to_owned(),
            x,
            y,
            y2,
            canvas,
            transition,
        })
    }
}

fn validate_axis(input: &AxisInput) -> ChartResult<AxisSpec> {
    let (Some(lower), Some(upper)) = (
        input.lower_limit.as_ref().filter(|v| !v.is_null()),
        input.upper_limit.as_ref().filter(|v| !v.is_null()),
    ) else {
        return Err(ChartError::MissingAxisLimits);
    };
    let lower = AxisValue::from_json(lower, input.axis_type).ok_or(ChartError::InvalidAxisType)?;
    let upper = AxisValue::from_json(upper, input.axis_type).ok_or(ChartError::InvalidAxisType)?;
    let ticks = input
        .ticks
        .values
        .iter()
        .map(|value| AxisValue::from_json(value, input.axis_type).ok_or(ChartError::InvalidAxisType))
        .collect::<ChartResult<Vec<_>>>()?;

    Ok(AxisSpec::new(input.axis_type, lower, upper)?
        .with_ticks(ticks)?
        .with_ticks_count(input.ticks_count)
        .with_calibration(input.allow_calibration)
        .with_pad_domain(input.pad_domain))
}

pub(crate) fn validate_canvas(canvas: Canvas) -> ChartResult<Canvas> {
    let padding = canvas.padding;
    let paddings_finite = [padding.top, padding.right, padding.bottom, padding.left]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0);
    if !paddings_finite || !canvas.is_valid() {
        return Err(ChartError::InvalidDimensions {
            width: f64::from(canvas.viewport.width),
            height: f64::from(canvas.viewport.height),
        });
    }
    Ok(canvas)
}

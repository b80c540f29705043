use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::primitives::{datetime_to_unix_millis, parse_datetime};

/// Outer canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 5.0,
            left: 30.0,
        }
    }
}

/// Canvas plus padding; resolves the plot area every scale maps into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub viewport: Viewport,
    pub padding: Padding,
}

impl Canvas {
    #[must_use]
    pub fn new(viewport: Viewport, padding: Padding) -> Self {
        Self { viewport, padding }
    }

    #[must_use]
    pub fn plot_width(self) -> f64 {
        (f64::from(self.viewport.width) - self.padding.left - self.padding.right).max(0.0)
    }

    #[must_use]
    pub fn plot_height(self) -> f64 {
        (f64::from(self.viewport.height) - self.padding.top - self.padding.bottom).max(0.0)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.viewport.is_valid() && self.plot_width() > 0.0 && self.plot_height() > 0.0
    }
}

/// Kind of values an axis carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisType {
    #[default]
    #[serde(rename = "default", alias = "Default")]
    Default,
    #[serde(rename = "timeseries", alias = "TimeSeries")]
    TimeSeries,
}

/// Vertical axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum YAxisId {
    #[default]
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "y2")]
    Y2,
}

/// Any axis of the graph; used by region definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisId {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "y2")]
    Y2,
}

impl From<YAxisId> for AxisId {
    fn from(value: YAxisId) -> Self {
        match value {
            YAxisId::Y => Self::Y,
            YAxisId::Y2 => Self::Y2,
        }
    }
}

/// A value placed on the X axis: a number or an instant in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Number(f64),
    Time(DateTime<Utc>),
}

impl AxisValue {
    #[must_use]
    pub fn axis_type(self) -> AxisType {
        match self {
            Self::Number(_) => AxisType::Default,
            Self::Time(_) => AxisType::TimeSeries,
        }
    }

    /// Linear coordinate used by scales; time values map to epoch milliseconds.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Number(value) => value,
            Self::Time(time) => datetime_to_unix_millis(time),
        }
    }

    /// Reads a raw JSON value as an axis value of the requested type.
    ///
    /// Returns `None` when the JSON kind does not match `axis_type`.
    #[must_use]
    pub fn from_json(value: &Value, axis_type: AxisType) -> Option<Self> {
        match (axis_type, value) {
            (AxisType::Default, Value::Number(number)) => {
                number.as_f64().filter(|v| v.is_finite()).map(Self::Number)
            }
            (AxisType::TimeSeries, Value::String(text)) => parse_datetime(text).map(Self::Time),
            _ => None,
        }
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Time(time) => write!(f, "{}", time.to_rfc3339()),
        }
    }
}

/// Internal datapoint annotated with stacking and series membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub x: AxisValue,
    pub y: Option<f64>,
    /// Stack base, mutated whenever stacking membership changes.
    pub y0: f64,
    pub key: String,
    pub group: String,
    pub y_axis: YAxisId,
    pub label: Option<String>,
}

impl Datapoint {
    #[must_use]
    pub fn new(x: AxisValue, y: Option<f64>, key: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            x,
            y,
            y0: 0.0,
            key: key.into(),
            group: group.into(),
            y_axis: YAxisId::Y,
            label: None,
        }
    }

    #[must_use]
    pub fn with_y_axis(mut self, y_axis: YAxisId) -> Self {
        self.y_axis = y_axis;
        self
    }

    /// Value plus stack base; `None` for gaps.
    #[must_use]
    pub fn stacked_y(&self) -> Option<f64> {
        self.y.map(|y| y + self.y0)
    }
}

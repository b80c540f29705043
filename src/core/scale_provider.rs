//! Axis domain/range resolution, outlier stretch and tick generation.

use serde::{Deserialize, Serialize};

use crate::core::primitives::clean_tick_value;
use crate::core::scale::LinearScale;
use crate::core::types::{AxisType, AxisValue, Canvas};
use crate::error::{ChartError, ChartResult};

/// Fraction of the domain span added on each side when domain padding is on.
pub const DEFAULT_PAD_DOMAIN_RATIO: f64 = 0.05;

/// Upper bound on interior Y ticks; larger requests are clamped.
pub const MAX_Y_TICKS_COUNT: u64 = 1_000;

/// Direction an axis runs along the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Observed data extent on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuesRange {
    pub min: f64,
    pub max: f64,
}

impl ValuesRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |acc, value| match acc {
                None => Some(Self::new(value, value)),
                Some(range) => Some(range.merge(Self::new(value, value))),
            })
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Widens the range so it always contains zero (bar baselines).
    #[must_use]
    pub fn including_zero(self) -> Self {
        Self {
            min: self.min.min(0.0),
            max: self.max.max(0.0),
        }
    }
}

/// Multipliers applied to each half of an axis domain so outliers stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierStretchFactor {
    pub lower: f64,
    pub upper: f64,
}

impl Default for OutlierStretchFactor {
    fn default() -> Self {
        Self {
            lower: 1.0,
            upper: 1.0,
        }
    }
}

impl OutlierStretchFactor {
    #[must_use]
    pub fn is_identity(self) -> bool {
        self.lower == 1.0 && self.upper == 1.0
    }
}

/// Validates and returns the configured axis domain.
pub fn compute_domain(
    axis_type: AxisType,
    lower: AxisValue,
    upper: AxisValue,
) -> ChartResult<(AxisValue, AxisValue)> {
    if lower.axis_type() != axis_type || upper.axis_type() != axis_type {
        return Err(ChartError::InvalidAxisType);
    }
    if !lower.as_f64().is_finite() || !upper.as_f64().is_finite() {
        return Err(ChartError::InvalidAxisLimits);
    }
    if lower.as_f64() >= upper.as_f64() {
        return Err(ChartError::InvalidAxisLimits);
    }
    Ok((lower, upper))
}

/// Pixel range for an axis inside the plot area. Vertical ranges are inverted
/// so larger values sit higher on the canvas.
#[must_use]
pub fn compute_range(orientation: Orientation, canvas: Canvas) -> (f64, f64) {
    match orientation {
        Orientation::Horizontal => (0.0, canvas.plot_width()),
        Orientation::Vertical => (canvas.plot_height(), 0.0),
    }
}

pub fn build_scale(
    domain: (f64, f64),
    range: (f64, f64),
    axis_type: AxisType,
) -> ChartResult<LinearScale> {
    LinearScale::new(axis_type, domain, range)
}

/// Computes how far the observed data escapes the configured domain.
///
/// Each factor is `|data extreme − mid| / |limit − mid|`, clamped to at least 1
/// so a domain is never shrunk. A side is only stretched when the data
/// actually crosses its limit.
#[must_use]
pub fn determine_outlier_stretch_factor(
    domain: (f64, f64),
    values: Option<ValuesRange>,
) -> OutlierStretchFactor {
    let Some(values) = values else {
        return OutlierStretchFactor::default();
    };
    let (lower, upper) = domain;
    let mid = (lower + upper) / 2.0;

    let factor = |extreme: f64, limit: f64| {
        let half = (limit - mid).abs();
        if half == 0.0 || !extreme.is_finite() {
            return 1.0;
        }
        ((extreme - mid).abs() / half).max(1.0)
    };

    OutlierStretchFactor {
        lower: if values.min < lower {
            factor(values.min, lower)
        } else {
            1.0
        },
        upper: if values.max > upper {
            factor(values.max, upper)
        } else {
            1.0
        },
    }
}

/// Stretches each half of `domain` about its midpoint.
#[must_use]
pub fn stretch_domain(domain: (f64, f64), factor: OutlierStretchFactor) -> (f64, f64) {
    let mid = (domain.0 + domain.1) / 2.0;
    (
        mid - (mid - domain.0) * factor.lower,
        mid + (domain.1 - mid) * factor.upper,
    )
}

#[must_use]
pub fn pad_domain(domain: (f64, f64), ratio: f64) -> (f64, f64) {
    let pad = (domain.1 - domain.0) * ratio;
    (domain.0 - pad, domain.1 + pad)
}

/// Generates Y tick values between `lower` and `upper`.
///
/// The result always contains both limits, zero when the domain straddles it,
/// and `|ticks_count|` equally spaced interior values, at most
/// [`MAX_Y_TICKS_COUNT`]. With calibration the limits are first rounded
/// outward to a nice step.
#[must_use]
pub fn generate_y_axes_tick_values(
    lower: f64,
    upper: f64,
    ticks_count: i64,
    allow_calibration: bool,
) -> Vec<f64> {
    if !lower.is_finite() || !upper.is_finite() {
        return Vec::new();
    }
    let count = ticks_count.unsigned_abs().min(MAX_Y_TICKS_COUNT);
    let (mut lower, mut upper) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };

    if allow_calibration && upper > lower {
        let step = nice_step((upper - lower) / (count + 1) as f64);
        if step > 0.0 {
            lower = (lower / step).floor() * step;
            upper = (upper / step).ceil() * step;
        }
    }

    let mut ticks = Vec::with_capacity(count as usize + 3);
    ticks.push(lower);
    ticks.push(upper);
    if lower < 0.0 && upper > 0.0 {
        ticks.push(0.0);
    }
    let interval = (upper - lower) / (count + 1) as f64;
    for index in 1..=count {
        ticks.push(lower + interval * index as f64);
    }

    let mut ticks: Vec<f64> = ticks.into_iter().map(clean_tick_value).collect();
    ticks.sort_by(f64::total_cmp);
    ticks.dedup();
    ticks
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

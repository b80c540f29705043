use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::core::scale_provider::{
    DEFAULT_PAD_DOMAIN_RATIO, Orientation, ValuesRange, build_scale, compute_domain,
    compute_range, determine_outlier_stretch_factor, generate_y_axes_tick_values, pad_domain,
    stretch_domain,
};
use crate::core::types::{AxisType, AxisValue, Canvas};
use crate::error::{ChartError, ChartResult};

/// Default number of interior Y ticks.
pub const DEFAULT_TICKS_COUNT: i64 = 0;

/// Validated, immutable axis definition taken from the graph config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub axis_type: AxisType,
    pub lower: AxisValue,
    pub upper: AxisValue,
    /// Explicit tick values; X ticks drive bar bands.
    pub ticks: Vec<AxisValue>,
    pub ticks_count: i64,
    pub allow_calibration: bool,
    pub pad_domain: bool,
}

impl AxisSpec {
    pub fn new(axis_type: AxisType, lower: AxisValue, upper: AxisValue) -> ChartResult<Self> {
        let (lower, upper) = compute_domain(axis_type, lower, upper)?;
        Ok(Self {
            axis_type,
            lower,
            upper,
            ticks: Vec::new(),
            ticks_count: DEFAULT_TICKS_COUNT,
            allow_calibration: false,
            pad_domain: false,
        })
    }

    pub fn numeric(lower: f64, upper: f64) -> ChartResult<Self> {
        Self::new(
            AxisType::Default,
            AxisValue::Number(lower),
            AxisValue::Number(upper),
        )
    }

    pub fn with_ticks(mut self, ticks: Vec<AxisValue>) -> ChartResult<Self> {
        if ticks.iter().any(|tick| tick.axis_type() != self.axis_type) {
            return Err(ChartError::InvalidAxisType);
        }
        self.ticks = ticks;
        Ok(self)
    }

    #[must_use]
    pub fn with_ticks_count(mut self, ticks_count: i64) -> Self {
        self.ticks_count = ticks_count;
        self
    }

    #[must_use]
    pub fn with_calibration(mut self, allow_calibration: bool) -> Self {
        self.allow_calibration = allow_calibration;
        self
    }

    #[must_use]
    pub fn with_pad_domain(mut self, pad_domain: bool) -> Self {
        self.pad_domain = pad_domain;
        self
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.lower.as_f64(), self.upper.as_f64())
    }

    /// Returns `true` when `value` is one of the explicit tick values.
    #[must_use]
    pub fn has_tick(&self, value: AxisValue) -> bool {
        let needle = OrderedFloat(value.as_f64());
        self.ticks
            .iter()
            .any(|tick| OrderedFloat(tick.as_f64()) == needle)
    }
}

/// Runtime state of one axis: effective domain, pixel range, ticks and scale.
///
/// Created once per graph and updated in place on every resize or content
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub axis_type: AxisType,
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub ticks: Vec<AxisValue>,
    pub orientation: Orientation,
    scale: LinearScale,
}

impl AxisConfig {
    pub fn new(
        spec: &AxisSpec,
        orientation: Orientation,
        canvas: Canvas,
        values: Option<ValuesRange>,
    ) -> ChartResult<Self> {
        let domain = spec.domain();
        let range = compute_range(orientation, canvas);
        let mut axis = Self {
            axis_type: spec.axis_type,
            domain,
            range,
            ticks: Vec::new(),
            orientation,
            scale: build_scale(domain, range, spec.axis_type)?,
        };
        axis.update(spec, canvas, values)?;
        Ok(axis)
    }

    /// Recomputes domain, range, ticks and scale in place.
    pub fn update(
        &mut self,
        spec: &AxisSpec,
        canvas: Canvas,
        values: Option<ValuesRange>,
    ) -> ChartResult<()> {
        let mut domain = spec.domain();
        if self.orientation == Orientation::Vertical {
            let factor = determine_outlier_stretch_factor(domain, values);
            domain = stretch_domain(domain, factor);
        }
        if spec.pad_domain {
            domain = pad_domain(domain, DEFAULT_PAD_DOMAIN_RATIO);
        }
        let range = compute_range(self.orientation, canvas);
        let scale = build_scale(domain, range, spec.axis_type)?;

        self.ticks = match self.orientation {
            Orientation::Horizontal => spec.ticks.clone(),
            Orientation::Vertical if !spec.ticks.is_empty() => spec.ticks.clone(),
            Orientation::Vertical => {
                let (lower, upper) = spec.domain();
                generate_y_axes_tick_values(
                    lower,
                    upper,
                    spec.ticks_count,
                    spec.allow_calibration,
                )
                .into_iter()
                .map(AxisValue::Number)
                .collect()
            }
        };
        self.domain = domain;
        self.range = range;
        self.scale = scale;
        Ok(())
    }

    #[must_use]
    pub fn scale(&self) -> LinearScale {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisConfig, AxisSpec};
    use crate::core::scale_provider::{Orientation, ValuesRange};
    use crate::core::types::{AxisValue, Canvas, Padding, Viewport};

    fn canvas() -> Canvas {
        Canvas::new(
            Viewport::new(440, 420),
            Padding {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 30.0,
            },
        )
    }

    #[test]
    fn vertical_axis_stretches_for_outliers() {
        let spec = AxisSpec::numeric(0.0, 40.0).expect("axis");
        let axis = AxisConfig::new(
            &spec,
            Orientation::Vertical,
            canvas(),
            Some(ValuesRange::new(0.0, 60.0)),
        )
        .expect("axis");
        assert_eq!(axis.domain, (0.0, 60.0));
        assert_eq!(axis.range, (400.0, 0.0));
    }

    #[test]
    fn horizontal_axis_keeps_configured_ticks() {
        let ticks = vec![AxisValue::Number(1.0), AxisValue::Number(2.0)];
        let spec = AxisSpec::numeric(0.0, 3.0)
            .expect("axis")
            .with_ticks(ticks.clone())
            .expect("ticks");
        let axis = AxisConfig::new(&spec, Orientation::Horizontal, canvas(), None).expect("axis");
        assert_eq!(axis.ticks, ticks);
        assert_eq!(axis.range, (0.0, 400.0));
        assert!(spec.has_tick(AxisValue::Number(2.0)));
        assert!(!spec.has_tick(AxisValue::Number(2.5)));
    }
}

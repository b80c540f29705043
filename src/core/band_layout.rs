//! Ordinal band layout for grouped and stacked bars.
//!
//! Every X tick owns an outer band (`x0`); the outer band is split into one
//! inner sub-band (`x1`) per visible bar group. Bars fill `WIDTH_RATIO` of
//! their sub-band and are centred inside it.

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::core::types::{AxisValue, Datapoint};

/// Outer padding expressed in half-bar units: outer padding is 2.5x the inner
/// padding, and inner padding is half a bar width.
pub const OUTER_PADDING_RATIO: f64 = 2.5;

/// Share of a sub-band occupied by its bar.
pub const WIDTH_RATIO: f64 = 2.0 / 3.0;

/// Padding ratio of the outer band scale for `visible_group_count` groups.
#[must_use]
pub fn compute_bandwidth_padding_ratio(visible_group_count: usize) -> f64 {
    OUTER_PADDING_RATIO / (3.0 * visible_group_count as f64 + OUTER_PADDING_RATIO)
}

/// Tick → band mapping with equal inner and outer padding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OuterScale {
    ticks: IndexMap<OrderedFloat<f64>, usize>,
    range: (f64, f64),
    padding_ratio: f64,
    step: f64,
    bandwidth: f64,
}

impl OuterScale {
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn padding_ratio(&self) -> f64 {
        self.padding_ratio
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Left edge of the band owned by `tick`.
    #[must_use]
    pub fn band_start(&self, tick: AxisValue) -> Option<f64> {
        let index = *self.ticks.get(&OrderedFloat(tick.as_f64()))?;
        Some(self.range.0 + self.step * self.padding_ratio + self.step * index as f64)
    }

    /// Centre of the band owned by `tick`; this is where the axis tick sits.
    #[must_use]
    pub fn position(&self, tick: AxisValue) -> Option<f64> {
        self.band_start(tick).map(|start| start + self.bandwidth / 2.0)
    }

    /// Shift from band centre back to band start.
    #[must_use]
    pub fn left_shift_offset(&self) -> f64 {
        self.bandwidth / 2.0
    }
}

/// Group name → sub-band offset inside one outer band.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InnerScale {
    groups: IndexSet<String>,
    bandwidth: f64,
}

impl InnerScale {
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Offset of `group` from the band start; `None` when the group is hidden.
    #[must_use]
    pub fn offset(&self, group: &str) -> Option<f64> {
        self.groups
            .get_index_of(group)
            .map(|index| index as f64 * self.bandwidth)
    }

    #[must_use]
    pub fn domain(&self) -> Vec<&str> {
        self.groups.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn build_outer_scale(ticks: &[AxisValue], pixel_range: (f64, f64), padding_ratio: f64) -> OuterScale {
    let mut indexed = IndexMap::with_capacity(ticks.len());
    for tick in ticks {
        let next = indexed.len();
        indexed.entry(OrderedFloat(tick.as_f64())).or_insert(next);
    }
    let count = indexed.len() as f64;
    let span = pixel_range.1 - pixel_range.0;
    let step = span / (count + padding_ratio).max(1.0);
    OuterScale {
        ticks: indexed,
        range: pixel_range,
        padding_ratio,
        step,
        bandwidth: step * (1.0 - padding_ratio),
    }
}

pub fn build_inner_scale<'a>(
    group_names: impl IntoIterator<Item = &'a str>,
    outer_bandwidth: f64,
) -> InnerScale {
    let groups: IndexSet<String> = group_names.into_iter().map(str::to_owned).collect();
    let bandwidth = if groups.is_empty() {
        0.0
    } else {
        outer_bandwidth / groups.len() as f64
    };
    InnerScale { groups, bandwidth }
}

/// Pair of ordinal scales shared by every bar content of a graph.
///
/// Mutated in place on resize and on every shown-series change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandScale {
    pub x0: OuterScale,
    pub x1: InnerScale,
}

impl BandScale {
    /// Rebuilds both scales for the current ticks, pixel range and visible groups.
    pub fn refresh<'a>(
        &mut self,
        ticks: &[AxisValue],
        pixel_range: (f64, f64),
        visible_groups: impl IntoIterator<Item = &'a str>,
    ) {
        let groups: Vec<&str> = visible_groups.into_iter().collect();
        let ratio = compute_bandwidth_padding_ratio(groups.len());
        self.x0 = build_outer_scale(ticks, pixel_range, ratio);
        self.x1 = build_inner_scale(groups, self.x0.bandwidth());
    }
}

/// Pixel rectangle of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarAttributes {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Horizontal placement (`x`, `width`) of a shape of `width_ratio` inside the
/// sub-band of `group` at `tick`.
#[must_use]
pub fn group_slot(
    tick: AxisValue,
    group: &str,
    outer: &OuterScale,
    inner: &InnerScale,
    width_ratio: f64,
) -> Option<(f64, f64)> {
    let position = outer.position(tick)?;
    let width = inner.bandwidth() * width_ratio;
    let inner_padding = (inner.bandwidth() - width) / 2.0;
    let offset = inner.offset(group).unwrap_or(0.0);
    Some((
        position + inner_padding + offset - outer.left_shift_offset(),
        width,
    ))
}

/// Computes the bar rectangle for a datapoint.
///
/// Returns `None` for gaps (`y == None`) and for ticks outside the band scale.
#[must_use]
pub fn compute_bar_attributes(
    datapoint: &Datapoint,
    outer: &OuterScale,
    inner: &InnerScale,
    y_scale: LinearScale,
) -> Option<BarAttributes> {
    let y = datapoint.y?;
    let (x, width) = group_slot(datapoint.x, &datapoint.group, outer, inner, WIDTH_RATIO)?;
    let top = if y < 0.0 {
        y_scale.map(datapoint.y0)
    } else {
        y_scale.map(y + datapoint.y0)
    };
    Some(BarAttributes {
        x,
        y: top,
        width,
        height: (y_scale.map(0.0) - y_scale.map(y)).abs(),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        BandScale, OUTER_PADDING_RATIO, WIDTH_RATIO, build_inner_scale, build_outer_scale,
        compute_bandwidth_padding_ratio,
    };
    use crate::core::types::AxisValue;

    fn ticks(values: &[f64]) -> Vec<AxisValue> {
        values.iter().copied().map(AxisValue::Number).collect()
    }

    #[test]
    fn single_group_padding_ratio() {
        assert_eq!(
            compute_bandwidth_padding_ratio(1),
            OUTER_PADDING_RATIO / (3.0 + OUTER_PADDING_RATIO)
        );
    }

    #[test]
    fn outer_bands_tile_the_range() {
        let outer = build_outer_scale(&ticks(&[1.0, 2.0, 3.0]), (0.0, 320.0), 0.25);
        let step = 320.0 / 3.25;
        assert_relative_eq!(outer.step(), step);
        assert_relative_eq!(outer.bandwidth(), step * 0.75);
        assert_relative_eq!(
            outer.band_start(AxisValue::Number(1.0)).expect("band"),
            step * 0.25
        );
        let last_end = outer.band_start(AxisValue::Number(3.0)).expect("band") + outer.bandwidth();
        assert_relative_eq!(320.0 - last_end, step * 0.25, epsilon = 1e-9);
        assert!(outer.position(AxisValue::Number(4.0)).is_none());
    }

    #[test]
    fn inner_scale_keeps_first_seen_order() {
        let inner = build_inner_scale(["b", "a", "b"], 90.0);
        assert_eq!(inner.domain(), vec!["b", "a"]);
        assert_eq!(inner.bandwidth(), 45.0);
        assert_eq!(inner.offset("a"), Some(45.0));
        assert_eq!(inner.offset("c"), None);
    }

    #[test]
    fn refresh_fits_sub_bands_inside_outer_band() {
        let mut band = BandScale::default();
        band.refresh(&ticks(&[1.0, 2.0]), (0.0, 400.0), ["g1", "g2", "g3"]);
        assert!(band.x1.bandwidth() * 3.0 <= band.x0.bandwidth() + 1e-9);
        assert!(band.x1.bandwidth() * WIDTH_RATIO < band.x1.bandwidth());
    }
}

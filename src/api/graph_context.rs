//! Per-graph shared state handed to every content lifecycle call.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::band_layout::group_slot;
use crate::core::region::CrossSpan;
use crate::core::series::SeriesRules;
use crate::core::{
    AxisConfig, AxisId, AxisValue, BandScale, BarAttributes, Canvas, ContentKind, Datapoint,
    GroupMembership, LinearScale, Orientation, SelectionBounds, TickShape, ValuesRange, YAxisId,
    compute_bar_attributes, compute_bounds, compute_offsets,
};
use crate::error::{ChartError, ChartResult};

use super::graph_config::{GraphConfig, validate_canvas};

/// Runtime X, Y and optional Y2 axes. Created once, updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    pub x: AxisConfig,
    pub y: AxisConfig,
    pub y2: Option<AxisConfig>,
}

impl AxisState {
    fn new(config: &GraphConfig) -> ChartResult<Self> {
        Ok(Self {
            x: AxisConfig::new(&config.x, Orientation::Horizontal, config.canvas, None)?,
            y: AxisConfig::new(&config.y, Orientation::Vertical, config.canvas, None)?,
            y2: config
                .y2
                .as_ref()
                .map(|spec| AxisConfig::new(spec, Orientation::Vertical, config.canvas, None))
                .transpose()?,
        })
    }

    fn update(
        &mut self,
        config: &GraphConfig,
        y_values: Option<ValuesRange>,
        y2_values: Option<ValuesRange>,
    ) -> ChartResult<()> {
        self.x.update(&config.x, config.canvas, None)?;
        self.y.update(&config.y, config.canvas, y_values)?;
        if let (Some(axis), Some(spec)) = (self.y2.as_mut(), config.y2.as_ref()) {
            axis.update(spec, config.canvas, y2_values)?;
        }
        Ok(())
    }

    /// Scale of `axis`; Y2 falls back to Y when the graph has no Y2 axis.
    #[must_use]
    pub fn scale(&self, axis: AxisId) -> LinearScale {
        match axis {
            AxisId::X => self.x.scale(),
            AxisId::Y => self.y.scale(),
            AxisId::Y2 => self.y2.as_ref().unwrap_or(&self.y).scale(),
        }
    }

    #[must_use]
    pub fn y_scale(&self, axis: YAxisId) -> LinearScale {
        self.scale(AxisId::from(axis))
    }
}

/// Keys of the currently shown series, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShownTargets {
    keys: IndexSet<String>,
}

impl ShownTargets {
    fn insert(&mut self, key: &str) {
        self.keys.insert(key.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.keys.shift_remove(key);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub shown: bool,
    pub selected: bool,
}

impl Default for LegendEntry {
    fn default() -> Self {
        Self {
            shown: true,
            selected: false,
        }
    }
}

/// In-memory legend state read by geometry and rendering alike.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendState {
    entries: IndexMap<String, LegendEntry>,
}

impl LegendState {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<LegendEntry> {
        self.entries.get(key).copied()
    }

    #[must_use]
    pub fn is_shown(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.shown)
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.selected)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owned sub-structures of one graph: config, axes, bands, shown targets,
/// legend state, stacking membership and the stacked bar values.
#[derive(Debug, Clone)]
pub struct GraphContext {
    config: GraphConfig,
    axes: AxisState,
    band: BandScale,
    shown: ShownTargets,
    legend: LegendState,
    membership: GroupMembership,
    /// Bar datapoints per key in load order; `y0` is kept current by `restack`.
    stacks: IndexMap<String, Vec<Datapoint>>,
    /// Y extent of non-bar series.
    value_ranges: IndexMap<String, (YAxisId, ValuesRange)>,
}

impl GraphContext {
    pub fn new(config: GraphConfig) -> ChartResult<Self> {
        let axes = AxisState::new(&config)?;
        let mut context = Self {
            config,
            axes,
            band: BandScale::default(),
            shown: ShownTargets::default(),
            legend: LegendState::default(),
            membership: GroupMembership::default(),
            stacks: IndexMap::new(),
            value_ranges: IndexMap::new(),
        };
        context.refresh_layout()?;
        Ok(context)
    }

    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    #[must_use]
    pub fn canvas(&self) -> Canvas {
        self.config.canvas
    }

    #[must_use]
    pub fn axes(&self) -> &AxisState {
        &self.axes
    }

    #[must_use]
    pub fn band(&self) -> &BandScale {
        &self.band
    }

    /// Horizontal pixel of `x`. While bars are shown, a configured tick maps
    /// to its band centre so points sit over the bars at that tick; otherwise
    /// the linear X scale applies.
    #[must_use]
    pub fn x_position(&self, x: AxisValue) -> f64 {
        let banded = if self.band.x1.is_empty() {
            None
        } else {
            self.band.x0.position(x)
        };
        banded.unwrap_or_else(|| self.axes.scale(AxisId::X).map_value(x))
    }

    #[must_use]
    pub fn shown(&self) -> &ShownTargets {
        &self.shown
    }

    #[must_use]
    pub fn legend(&self) -> &LegendState {
        &self.legend
    }

    #[must_use]
    pub fn membership(&self) -> &GroupMembership {
        &self.membership
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.legend.entries.contains_key(key)
    }

    #[must_use]
    pub fn series_rules(&self, kind: ContentKind) -> SeriesRules<'_> {
        SeriesRules {
            kind,
            x_axis: &self.config.x,
            y2_enabled: self.config.y2.is_some(),
        }
    }

    /// Registers a non-bar series and its Y extent.
    pub(crate) fn register_series(
        &mut self,
        key: &str,
        y_axis: YAxisId,
        values: Option<ValuesRange>,
    ) -> ChartResult<()> {
        self.register_key(key)?;
        self.set_values_range(key, y_axis, values);
        Ok(())
    }

    /// Registers a bar series at the end of its stacking group.
    pub(crate) fn register_bar(
        &mut self,
        key: &str,
        group: &str,
        values: Vec<Datapoint>,
    ) -> ChartResult<()> {
        self.register_key(key)?;
        self.membership.add(group, key);
        self.stacks.insert(key.to_owned(), values);
        Ok(())
    }

    fn register_key(&mut self, key: &str) -> ChartResult<()> {
        if self.contains_key(key) {
            return Err(ChartError::DuplicateKey);
        }
        self.legend
            .entries
            .insert(key.to_owned(), LegendEntry::default());
        self.shown.insert(key);
        Ok(())
    }

    pub(crate) fn set_values_range(
        &mut self,
        key: &str,
        y_axis: YAxisId,
        values: Option<ValuesRange>,
    ) {
        match values {
            Some(range) => {
                self.value_ranges.insert(key.to_owned(), (y_axis, range));
            }
            None => {
                self.value_ranges.shift_remove(key);
            }
        }
    }

    pub(crate) fn replace_bar_values(&mut self, key: &str, values: Vec<Datapoint>) {
        if let Some(slot) = self.stacks.get_mut(key) {
            *slot = values;
        }
    }

    /// Forgets every trace of `key`. Unknown keys are ignored.
    pub(crate) fn unregister(&mut self, key: &str) {
        self.legend.entries.shift_remove(key);
        self.shown.remove(key);
        self.membership.remove(key);
        self.stacks.shift_remove(key);
        self.value_ranges.shift_remove(key);
    }

    /// Updates the shown flag. Returns `true` when it changed.
    pub(crate) fn set_shown(&mut self, key: &str, shown: bool) -> ChartResult<bool> {
        let entry = self
            .legend
            .entries
            .get_mut(key)
            .ok_or(ChartError::UnknownKey)?;
        if entry.shown == shown {
            return Ok(false);
        }
        entry.shown = shown;
        if shown {
            // Re-insert at load position so shown order keeps following load order.
            let order: Vec<String> = self
                .legend
                .entries
                .iter()
                .filter(|(_, entry)| entry.shown)
                .map(|(key, _)| key.clone())
                .collect();
            self.shown.keys = order.into_iter().collect();
        } else {
            self.shown.remove(key);
        }
        Ok(true)
    }

    /// Flips the selected flag and returns the new value.
    pub(crate) fn toggle_selected(&mut self, key: &str) -> ChartResult<bool> {
        let entry = self
            .legend
            .entries
            .get_mut(key)
            .ok_or(ChartError::UnknownKey)?;
        entry.selected = !entry.selected;
        Ok(entry.selected)
    }

    pub(crate) fn set_canvas(&mut self, canvas: Canvas) -> ChartResult<()> {
        self.config.canvas = validate_canvas(canvas)?;
        Ok(())
    }

    /// Bar datapoints of `key` with current stack bases.
    #[must_use]
    pub fn stacked_values(&self, key: &str) -> &[Datapoint] {
        self.stacks.get(key).map_or(&[], Vec::as_slice)
    }

    /// Observed extent of the shown series plotted against `axis`.
    ///
    /// Bar extents use stacked values and always include zero.
    #[must_use]
    pub fn values_range(&self, axis: YAxisId) -> Option<ValuesRange> {
        let bars = self
            .stacks
            .iter()
            .filter(|(key, _)| self.shown.contains(key))
            .filter_map(|(_, values)| {
                let on_axis = values.iter().filter(|point| point.y_axis == axis);
                ValuesRange::from_values(on_axis.filter_map(Datapoint::stacked_y))
                    .map(ValuesRange::including_zero)
            });
        let others = self
            .value_ranges
            .iter()
            .filter(|(key, (y_axis, _))| *y_axis == axis && self.shown.contains(key))
            .map(|(_, (_, range))| *range);

        bars.chain(others).reduce(ValuesRange::merge)
    }

    /// Recomputes stack bases from load order and the shown set.
    fn restack(&mut self) {
        let groups: Vec<(String, Vec<String>)> = self
            .membership
            .visible_groups(|_| true)
            .into_iter()
            .map(|group| (group.to_owned(), self.membership.members(group).to_vec()))
            .collect();

        for (_, members) in groups {
            for (position, key) in members.iter().enumerate() {
                let Some(slot) = self.stacks.get_mut(key) else {
                    continue;
                };
                let mut current = std::mem::take(slot);
                {
                    let preceding: Vec<&[Datapoint]> = members[..position]
                        .iter()
                        .filter(|member| self.shown.contains(member))
                        .filter_map(|member| self.stacks.get(member).map(Vec::as_slice))
                        .collect();
                    compute_offsets(&mut current, &preceding);
                }
                if let Some(slot) = self.stacks.get_mut(key) {
                    *slot = current;
                }
            }
        }
    }

    /// Brings stacks, axes and bands in line with the current content, shown
    /// set and canvas. Every shape position is derived from this state.
    pub(crate) fn refresh_layout(&mut self) -> ChartResult<()> {
        self.restack();
        let y_values = self.values_range(YAxisId::Y);
        let y2_values = self.values_range(YAxisId::Y2);
        self.axes.update(&self.config, y_values, y2_values)?;

        let shown = &self.shown;
        let visible_groups = self.membership.visible_groups(|key| shown.contains(key));
        self.band
            .refresh(&self.config.x.ticks, self.axes.x.range, visible_groups);
        debug!(
            y_domain = ?self.axes.y.domain,
            bandwidth = self.band.x0.bandwidth(),
            groups = self.band.x1.domain().len(),
            shown = self.shown.len(),
            "graph layout refreshed"
        );
        Ok(())
    }

    /// Rectangle of a bar datapoint under the current bands and scales.
    #[must_use]
    pub fn bar_attributes(&self, point: &Datapoint) -> Option<BarAttributes> {
        compute_bar_attributes(
            point,
            &self.band.x0,
            &self.band.x1,
            self.axes.y_scale(point.y_axis),
        )
    }

    /// Horizontal slot of `width_ratio` within `group`'s sub-band at `tick`.
    #[must_use]
    pub fn bar_slot(&self, tick: AxisValue, group: &str, width_ratio: f64) -> Option<CrossSpan> {
        group_slot(tick, group, &self.band.x0, &self.band.x1, width_ratio)
            .map(|(start, extent)| CrossSpan { start, extent })
    }

    /// Full plot width, the cross span of Y regions on non-bar content.
    #[must_use]
    pub fn plot_width_span(&self) -> CrossSpan {
        CrossSpan {
            start: 0.0,
            extent: self.config.canvas.plot_width(),
        }
    }

    /// Full plot height, the cross span of X regions.
    #[must_use]
    pub fn plot_height_span(&self) -> CrossSpan {
        CrossSpan {
            start: 0.0,
            extent: self.config.canvas.plot_height(),
        }
    }

    /// Selection box around every shown bar at `tick`.
    #[must_use]
    pub fn selection_bounds(&self, tick: AxisValue) -> SelectionBounds {
        let needle = tick.as_f64();
        let shapes: Vec<TickShape> = self
            .stacks
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |point| (key, point)))
            .filter(|(_, point)| point.x.as_f64() == needle)
            .filter_map(|(key, point)| {
                let value = point.stacked_y()?;
                let attributes = self.bar_attributes(point)?;
                Some(TickShape {
                    key: key.clone(),
                    tick: point.x,
                    value,
                    attributes,
                })
            })
            .collect();
        let shown: SmallVec<[&str; 8]> = self.shown.keys().collect();
        trace!(tick = %tick, candidates = shapes.len(), "collect selection shapes");
        compute_bounds(tick, &shapes, shown.as_slice())
    }
}

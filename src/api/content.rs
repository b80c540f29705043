//! Content lifecycle contract shared by every chart-content variant.

use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::series::{PairedValueInput, validate_datapoint};
use crate::core::{AxisValue, ContentKind, Datapoint, DatapointInput, YAxisId};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    DEFAULT_SERIES_COLOR, DrawingSurface, Layer, ShapeHandle, ShapeSelector, ShapeStyle,
};

use super::graph_context::GraphContext;
use super::legend::SeriesSummary;
use super::transform_pipeline::TransformPipeline;

/// Where a content instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LifecycleState {
    #[default]
    Unloaded,
    Loaded,
    Resized,
    Reflowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleOp {
    Load,
    Resize,
    Reflow,
    Redraw,
    Unload,
}

impl LifecycleOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resize => "resize",
            Self::Reflow => "reflow",
            Self::Redraw => "redraw",
            Self::Unload => "unload",
        }
    }
}

impl LifecycleState {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Resized => "resized",
            Self::Reflowed => "reflowed",
        }
    }

    #[must_use]
    pub const fn is_loaded(self) -> bool {
        !matches!(self, Self::Unloaded)
    }

    /// State after `op`, or an error when `op` is not allowed from here.
    pub fn apply(self, op: LifecycleOp) -> ChartResult<Self> {
        match (self, op) {
            (Self::Unloaded, LifecycleOp::Load) => Ok(Self::Loaded),
            (Self::Unloaded, _) | (_, LifecycleOp::Load) => Err(ChartError::InvalidLifecycle {
                operation: op.name(),
                state: self.name(),
            }),
            (_, LifecycleOp::Resize) => Ok(Self::Resized),
            (_, LifecycleOp::Reflow) => Ok(Self::Reflowed),
            (state, LifecycleOp::Redraw) => Ok(state),
            (_, LifecycleOp::Unload) => Ok(Self::Unloaded),
        }
    }
}

/// Replacement values handed to [`ChartContent::reflow`].
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValues {
    Plain(Vec<DatapointInput>),
    Paired(Vec<PairedValueInput>),
}

impl SeriesValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(values) => values.len(),
            Self::Paired(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses the raw `values` array of a reflow request for `kind`.
    pub fn from_json(kind: ContentKind, values: serde_json::Value) -> ChartResult<Self> {
        let parsed = match kind {
            ContentKind::PairedResult => serde_json::from_value(values).map(Self::Paired),
            ContentKind::Bar | ContentKind::Line | ContentKind::Scatter => {
                serde_json::from_value(values).map(Self::Plain)
            }
        };
        parsed.map_err(|e| ChartError::InvalidJson(e.to_string()))
    }
}

/// One chart-content variant rendered into a graph.
///
/// Every call receives the graph's [`GraphContext`]; contents never hold a
/// reference to it. `load` and `reflow` validate before mutating anything, so
/// a failed call leaves the graph as it was.
pub trait ChartContent: fmt::Debug {
    fn key(&self) -> &str;

    fn kind(&self) -> ContentKind;

    fn state(&self) -> LifecycleState;

    fn summary(&self) -> SeriesSummary;

    /// Registers the series, refreshes the shared layout and draws it.
    fn load(&mut self, ctx: &mut GraphContext, surface: &mut dyn DrawingSurface)
    -> ChartResult<()>;

    /// Removes every shape and forgets the series.
    fn unload(
        &mut self,
        ctx: &mut GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()>;

    /// Pushes the current geometry of every drawn shape.
    fn resize(&mut self, ctx: &GraphContext, pipeline: &mut TransformPipeline) -> ChartResult<()>;

    /// Replaces the values wholesale, keeping shapes whose datapoint survives.
    /// Final placement happens in the `resize` that follows.
    fn reflow(
        &mut self,
        values: &SeriesValues,
        ctx: &mut GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()>;

    /// Re-emits every shape from scratch; hidden series end up with none.
    fn redraw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface)
    -> ChartResult<()>;
}

/// Identity of a drawn datapoint: its x value plus a slot for contents that
/// draw several shapes per x.
pub(crate) type PointKey = (OrderedFloat<f64>, u8);

pub(crate) fn point_key(x: AxisValue, slot: u8) -> PointKey {
    (OrderedFloat(x.as_f64()), slot)
}

/// Handles drawn for one datapoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PointShapes {
    pub(crate) data: ShapeHandle,
    pub(crate) label: Option<ShapeHandle>,
}

/// Drops the shapes of points missing from `keep`, or whose label presence
/// changed. `keep` maps a point to whether it carries a label.
pub(crate) fn retain_points(
    owner: &str,
    points: &mut IndexMap<PointKey, PointShapes>,
    keep: &IndexMap<PointKey, bool>,
    surface: &mut dyn DrawingSurface,
) -> usize {
    let before = points.len();
    points.retain(|key, shapes| {
        if keep.get(key) == Some(&shapes.label.is_some()) {
            return true;
        }
        surface.remove_shapes(&ShapeSelector::shape(owner, shapes.data));
        if let Some(label) = shapes.label {
            surface.remove_shapes(&ShapeSelector::shape(owner, label));
        }
        false
    });
    before - points.len()
}

/// Validates replacement values for a plain (bar, line, scatter) series.
pub(crate) fn validate_plain_values(
    values: &SeriesValues,
    kind: ContentKind,
    key: &str,
    group: &str,
    y_axis: YAxisId,
    ctx: &GraphContext,
) -> ChartResult<Vec<Datapoint>> {
    let SeriesValues::Plain(inputs) = values else {
        return Err(ChartError::InvalidData(format!(
            "paired values cannot reflow {} content",
            kind.name()
        )));
    };
    let rules = ctx.series_rules(kind);
    inputs
        .iter()
        .map(|input| validate_datapoint(input, key, group, y_axis, rules))
        .collect()
}

#[must_use]
pub(crate) fn series_color(color: Option<&str>) -> String {
    color.unwrap_or(DEFAULT_SERIES_COLOR).to_owned()
}

/// Style of a data shape filled with the series color.
#[must_use]
pub(crate) fn data_style(
    owner: &str,
    class: &str,
    color: &str,
    attributes: &IndexMap<String, String>,
) -> ShapeStyle {
    ShapeStyle::new(owner, Layer::Data, class)
        .with_fill(color)
        .with_attributes(attributes)
}

#[must_use]
pub(crate) fn label_style(owner: &str, color: &str) -> ShapeStyle {
    ShapeStyle::new(owner, Layer::Label, "datapoint-label").with_fill(color)
}

/// Style of a region band; goal lines are drawn opaque.
#[must_use]
pub(crate) fn region_style(owner: &str, class: &str, color: &str, goal_line: bool) -> ShapeStyle {
    let style = ShapeStyle::new(owner, Layer::Region, class).with_fill(color);
    if goal_line {
        return style;
    }
    let mut attributes = IndexMap::new();
    attributes.insert("fill-opacity".to_owned(), "0.2".to_owned());
    style.with_attributes(&attributes)
}

//! Bounding boxes drawn behind the bars of a selected X tick.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::band_layout::BarAttributes;
use crate::core::types::AxisValue;

/// Gap between the outermost bars of a tick and the selection box.
pub const SELECTION_PADDING: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionBounds {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// One rendered bar that may take part in a tick's selection box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickShape {
    pub key: String,
    pub tick: AxisValue,
    /// `y + y0` of the datapoint.
    pub value: f64,
    pub attributes: BarAttributes,
}

/// Bounding box of every shown bar at `tick`, padded on all sides.
///
/// Extremes are picked with `>=`/`<=`, so among equal candidates the last one
/// wins. Returns zero bounds when nothing at the tick is shown.
#[must_use]
pub fn compute_bounds<S: AsRef<str>>(
    tick: AxisValue,
    shapes: &[TickShape],
    shown_keys: &[S],
) -> SelectionBounds {
    let tick_value = tick.as_f64();
    let filtered: SmallVec<[&TickShape; 8]> = shapes
        .iter()
        .filter(|shape| shape.tick.as_f64() == tick_value)
        .filter(|shape| shown_keys.iter().any(|key| key.as_ref() == shape.key))
        .collect();
    if filtered.is_empty() {
        return SelectionBounds::default();
    }

    let (mut top, mut bottom, mut left, mut right) = (0, 0, 0, 0);
    for (index, shape) in filtered.iter().enumerate() {
        if shape.value >= filtered[top].value {
            top = index;
        }
        if shape.value <= filtered[bottom].value {
            bottom = index;
        }
        if shape.attributes.x <= filtered[left].attributes.x {
            left = index;
        }
        if shape.attributes.x >= filtered[right].attributes.x {
            right = index;
        }
    }

    let left_edge = filtered[left].attributes.x - SELECTION_PADDING;
    let top_edge = filtered[top].attributes.y - SELECTION_PADDING;
    let right_edge =
        filtered[right].attributes.x + filtered[right].attributes.width + SELECTION_PADDING;
    let bottom_edge =
        filtered[bottom].attributes.y + filtered[bottom].attributes.height + SELECTION_PADDING;

    let bounds = SelectionBounds {
        x: left_edge,
        y: top_edge,
        width: right_edge - left_edge,
        height: bottom_edge - top_edge,
    };
    trace!(tick = %tick, shapes = filtered.len(), ?bounds, "selection bounds");
    bounds
}

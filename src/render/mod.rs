mod layer_stack;
mod primitives;
mod recording_surface;
mod shape_store;
mod svg_surface;

pub use layer_stack::{Layer, LayerStack};
pub use primitives::{
    DEFAULT_SERIES_COLOR, PathPrimitive, RectPrimitive, ShapeGeometry, ShapeStyle, TextAnchor,
    TextPrimitive,
};
pub use recording_surface::{RecordingSurface, SurfaceOp};
pub use shape_store::StoredShape;
pub use svg_surface::SvgSurface;

use serde::{Deserialize, Serialize};

use crate::error::ChartResult;

/// Opaque identity of a drawn shape, stable across transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeHandle(pub u64);

/// Timing of an attribute transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub duration_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration_ms: 250 }
    }
}

/// Picks shapes by owning series and, optionally, by layer or handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeSelector {
    pub owner: String,
    pub layer: Option<Layer>,
    pub handle: Option<ShapeHandle>,
}

impl ShapeSelector {
    #[must_use]
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            layer: None,
            handle: None,
        }
    }

    /// Selects exactly one shape of `owner`.
    #[must_use]
    pub fn shape(owner: impl Into<String>, handle: ShapeHandle) -> Self {
        Self {
            owner: owner.into(),
            layer: None,
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = Some(layer);
        self
    }

    #[must_use]
    pub fn matches(&self, handle: ShapeHandle, style: &ShapeStyle) -> bool {
        style.owner == self.owner
            && self.layer.is_none_or(|layer| layer == style.layer)
            && self.handle.is_none_or(|wanted| wanted == handle)
    }
}

/// Contract implemented by any rendering backend.
///
/// Content lifecycles only ever talk to the drawing layer through this trait,
/// so geometry stays independent of the output technology. A transition on a
/// shape that is already transitioning supersedes the earlier one.
pub trait DrawingSurface {
    fn draw_rect(&mut self, rect: RectPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle>;

    fn draw_path(&mut self, path: PathPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle>;

    fn draw_text(&mut self, text: TextPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle>;

    /// Removes every shape matched by `selector`; returns how many were removed.
    fn remove_shapes(&mut self, selector: &ShapeSelector) -> usize;

    fn transition(
        &mut self,
        shape: ShapeHandle,
        target: ShapeGeometry,
        config: TransitionConfig,
    ) -> ChartResult<()>;
}

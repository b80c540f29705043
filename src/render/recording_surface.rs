use crate::error::ChartResult;
use crate::render::shape_store::{ShapeStore, StoredShape};
use crate::render::{
    DrawingSurface, Layer, PathPrimitive, RectPrimitive, ShapeGeometry, ShapeHandle,
    ShapeSelector, ShapeStyle, TextPrimitive, TransitionConfig,
};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Draw {
        handle: ShapeHandle,
        owner: String,
        layer: Layer,
    },
    Remove {
        owner: String,
        layer: Option<Layer>,
        removed: usize,
    },
    Transition {
        handle: ShapeHandle,
        layer: Layer,
        duration_ms: u32,
    },
}

/// Headless surface used by tests and server-side layout.
///
/// It still validates every geometry so tests catch non-finite coordinates
/// before a real backend would.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    store: ShapeStore,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn shape(&self, handle: ShapeHandle) -> Option<&StoredShape> {
        self.store.get(handle)
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.store.len()
    }

    /// Live shapes owned by `owner` on `layer`, in draw order.
    #[must_use]
    pub fn shapes_of(&self, owner: &str, layer: Layer) -> Vec<&StoredShape> {
        self.store
            .iter()
            .filter(|(_, shape)| shape.style.owner == owner && shape.style.layer == layer)
            .map(|(_, shape)| shape)
            .collect()
    }

    /// Layers of the recorded transitions, in call order.
    #[must_use]
    pub fn transition_layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Transition { layer, .. } => Some(*layer),
                _ => None,
            })
            .collect()
    }

    fn draw(&mut self, geometry: ShapeGeometry, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        let handle = self.store.insert(geometry, style)?;
        self.ops.push(SurfaceOp::Draw {
            handle,
            owner: style.owner.clone(),
            layer: style.layer,
        });
        Ok(handle)
    }
}

impl DrawingSurface for RecordingSurface {
    fn draw_rect(&mut self, rect: RectPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.draw(ShapeGeometry::Rect(rect), style)
    }

    fn draw_path(&mut self, path: PathPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.draw(ShapeGeometry::Path(path), style)
    }

    fn draw_text(&mut self, text: TextPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.draw(ShapeGeometry::Text(text), style)
    }

    fn remove_shapes(&mut self, selector: &ShapeSelector) -> usize {
        let removed = self.store.remove_matching(selector);
        self.ops.push(SurfaceOp::Remove {
            owner: selector.owner.clone(),
            layer: selector.layer,
            removed,
        });
        removed
    }

    fn transition(
        &mut self,
        shape: ShapeHandle,
        target: ShapeGeometry,
        config: TransitionConfig,
    ) -> ChartResult<()> {
        let layer = self.store.update(shape, target)?.style.layer;
        self.ops.push(SurfaceOp::Transition {
            handle: shape,
            layer,
            duration_ms: config.duration_ms,
        });
        Ok(())
    }
}

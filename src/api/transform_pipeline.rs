use tracing::{debug, trace};

use crate::error::ChartResult;
use crate::render::{DrawingSurface, Layer, ShapeGeometry, ShapeHandle, TransitionConfig};

/// Target geometry for an already drawn shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeUpdate {
    pub handle: ShapeHandle,
    pub layer: Layer,
    pub geometry: ShapeGeometry,
}

/// Collects geometry updates from every content of a graph and applies them
/// as transitions, layer by layer: selection boxes, data shapes, regions,
/// then labels. Within a layer, updates keep the order they were pushed in.
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    transition: TransitionConfig,
    updates: Vec<ShapeUpdate>,
}

impl TransformPipeline {
    #[must_use]
    pub fn new(transition: TransitionConfig) -> Self {
        Self {
            transition,
            updates: Vec::new(),
        }
    }

    pub fn push(&mut self, handle: ShapeHandle, layer: Layer, geometry: ShapeGeometry) {
        self.updates.push(ShapeUpdate {
            handle,
            layer,
            geometry,
        });
    }

    /// Drops queued updates outside `layers`.
    pub fn retain_layers(&mut self, layers: &[Layer]) {
        self.updates.retain(|update| layers.contains(&update.layer));
    }

    #[must_use]
    pub fn updates(&self) -> &[ShapeUpdate] {
        &self.updates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Applies every update and returns how many transitions were issued.
    pub fn apply(mut self, surface: &mut dyn DrawingSurface) -> ChartResult<usize> {
        self.updates.sort_by_key(|update| update.layer);
        let total = self.updates.len();
        let mut current: Option<Layer> = None;
        for update in self.updates {
            if current != Some(update.layer) {
                trace!(layer = update.layer.name(), "transform phase");
                current = Some(update.layer);
            }
            surface.transition(update.handle, update.geometry, self.transition)?;
        }
        debug!(
            transitions = total,
            duration_ms = self.transition.duration_ms,
            "transform pipeline applied"
        );
        Ok(total)
    }
}

use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};
use crate::render::{ShapeGeometry, ShapeHandle, ShapeSelector, ShapeStyle};

/// A shape retained by a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredShape {
    pub geometry: ShapeGeometry,
    pub style: ShapeStyle,
}

/// Retained shape table shared by the shipped surfaces.
#[derive(Debug, Default)]
pub(crate) struct ShapeStore {
    next_id: u64,
    shapes: IndexMap<ShapeHandle, StoredShape>,
}

impl ShapeStore {
    pub(crate) fn insert(
        &mut self,
        geometry: ShapeGeometry,
        style: &ShapeStyle,
    ) -> ChartResult<ShapeHandle> {
        geometry.validate()?;
        self.next_id += 1;
        let handle = ShapeHandle(self.next_id);
        self.shapes.insert(
            handle,
            StoredShape {
                geometry,
                style: style.clone(),
            },
        );
        Ok(handle)
    }

    pub(crate) fn remove_matching(&mut self, selector: &ShapeSelector) -> usize {
        let before = self.shapes.len();
        self.shapes
            .retain(|handle, shape| !selector.matches(*handle, &shape.style));
        before - self.shapes.len()
    }

    pub(crate) fn update(
        &mut self,
        handle: ShapeHandle,
        geometry: ShapeGeometry,
    ) -> ChartResult<&StoredShape> {
        geometry.validate()?;
        let shape = self.shapes.get_mut(&handle).ok_or_else(|| {
            ChartError::InvalidData(format!("unknown shape handle {}", handle.0))
        })?;
        shape.geometry = geometry;
        Ok(shape)
    }

    pub(crate) fn get(&self, handle: ShapeHandle) -> Option<&StoredShape> {
        self.shapes.get(&handle)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &StoredShape)> {
        self.shapes.iter().map(|(handle, shape)| (*handle, shape))
    }

    pub(crate) fn len(&self) -> usize {
        self.shapes.len()
    }
}

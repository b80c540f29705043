use tracing::debug;

use crate::core::{ContentKind, SeriesDescriptor, SeriesInput, ValuesRange};
use crate::error::ChartResult;
use crate::render::{DrawingSurface, ShapeSelector};

use super::content::{
    ChartContent, LifecycleOp, LifecycleState, SeriesValues, point_key, series_color,
    validate_plain_values,
};
use super::graph_context::GraphContext;
use super::legend::SeriesSummary;
use super::marker_layer::{AreaItem, Marker, MarkerLayer, Paint, RegionItem};
use super::transform_pipeline::TransformPipeline;

/// Scatter series: one unconnected marker per datapoint.
#[derive(Debug, Clone)]
pub struct ScatterContent {
    descriptor: SeriesDescriptor,
    color: String,
    state: LifecycleState,
    markers: MarkerLayer,
}

impl ScatterContent {
    #[must_use]
    pub fn new(descriptor: SeriesDescriptor) -> Self {
        let color = series_color(descriptor.color.as_deref());
        Self {
            descriptor,
            color,
            state: LifecycleState::Unloaded,
            markers: MarkerLayer::default(),
        }
    }

    pub fn from_input(input: &SeriesInput, ctx: &GraphContext) -> ChartResult<Self> {
        Ok(Self::new(input.validate(ctx.series_rules(ContentKind::Scatter))?))
    }

    #[must_use]
    pub fn descriptor(&self) -> &SeriesDescriptor {
        &self.descriptor
    }

    fn paint(&self) -> Paint<'_> {
        Paint {
            owner: &self.descriptor.key,
            color: &self.color,
            shape: self.descriptor.shape,
            attributes: &self.descriptor.style,
        }
    }

    fn markers(&self) -> Vec<Marker<'_>> {
        self.descriptor
            .values
            .iter()
            .map(|point| Marker {
                key: point_key(point.x, 0),
                point,
                class: "point",
            })
            .collect()
    }

    fn regions(&self) -> Vec<RegionItem<'_>> {
        self.descriptor
            .regions
            .iter()
            .map(|region| RegionItem {
                region,
                class: "region",
            })
            .collect()
    }

    fn area(&self) -> AreaItem<'_> {
        AreaItem {
            points: &self.descriptor.value_regions,
            y_axis: self.descriptor.y_axis,
        }
    }

    fn draw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        if !ctx.legend().is_shown(&self.descriptor.key) {
            return Ok(());
        }
        let mut layer = std::mem::take(&mut self.markers);
        let drawn = layer
            .draw_markers(ctx, surface, self.paint(), &self.markers())
            .and_then(|()| {
                layer.draw_regions(ctx, surface, self.paint(), &self.regions(), Some(self.area()))
            });
        self.markers = layer;
        drawn
    }
}

impl ChartContent for ScatterContent {
    fn key(&self) -> &str {
        &self.descriptor.key
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Scatter
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            key: self.descriptor.key.clone(),
            kind: ContentKind::Scatter,
            label: self.descriptor.label.clone(),
            color: self.color.clone(),
            shape: self.descriptor.shape,
            y_axis: self.descriptor.y_axis,
        }
    }

    fn load(
        &mut self,
        ctx: &mut GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()> {
        let next = self.state.apply(LifecycleOp::Load)?;
        ctx.register_series(
            &self.descriptor.key,
            self.descriptor.y_axis,
            ValuesRange::from_values(self.descriptor.y_values(false)),
        )?;
        ctx.refresh_layout()?;
        self.state = next;
        self.draw(ctx, surface)?;
        debug!(
            key = %self.descriptor.key,
            markers = self.markers.marker_count(),
            "scatter content loaded"
        );
        Ok(())
    }

    fn unload(
        &mut self,
        ctx: &mut GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Unload)?;
        let removed = surface.remove_shapes(&ShapeSelector::owner(&self.descriptor.key));
        self.markers.clear();
        ctx.unregister(&self.descriptor.key);
        ctx.refresh_layout()?;
        debug!(key = %self.descriptor.key, removed, "scatter content unloaded");
        Ok(())
    }

    fn resize(&mut self, ctx: &GraphContext, pipeline: &mut TransformPipeline) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Resize)?;
        self.markers.relayout(
            ctx,
            pipeline,
            self.descriptor.shape,
            &self.markers(),
            &self.regions(),
            Some(self.area()),
        );
        Ok(())
    }

    fn reflow(
        &mut self,
        values: &SeriesValues,
        ctx: &mut GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()> {
        let next = self.state.apply(LifecycleOp::Reflow)?;
        let values = validate_plain_values(
            values,
            ContentKind::Scatter,
            &self.descriptor.key,
            &self.descriptor.group,
            self.descriptor.y_axis,
            ctx,
        )?;
        self.descriptor.values = values;
        self.state = next;
        ctx.set_values_range(
            &self.descriptor.key,
            self.descriptor.y_axis,
            ValuesRange::from_values(self.descriptor.y_values(false)),
        );
        ctx.refresh_layout()?;

        let mut layer = std::mem::take(&mut self.markers);
        let markers = self.markers();
        let dropped = layer.retain(&self.descriptor.key, &markers, surface);
        let drawn = if ctx.legend().is_shown(&self.descriptor.key) {
            layer.draw_markers(ctx, surface, self.paint(), &markers)
        } else {
            Ok(())
        };
        self.markers = layer;
        drawn?;
        debug!(
            key = %self.descriptor.key,
            points = self.descriptor.values.len(),
            dropped,
            "scatter content reflowed"
        );
        Ok(())
    }

    fn redraw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Redraw)?;
        surface.remove_shapes(&ShapeSelector::owner(&self.descriptor.key));
        self.markers.clear();
        self.draw(ctx, surface)
    }
}

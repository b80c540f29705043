use tracing::debug;

use crate::core::path::line_path_data;
use crate::core::{
    ContentKind, PathVertex, SeriesDescriptor, SeriesInput, ValuesRange,
};
use crate::error::ChartResult;
use crate::render::{DrawingSurface, Layer, PathPrimitive, ShapeGeometry, ShapeHandle, ShapeSelector};

use super::content::{
    ChartContent, LifecycleOp, LifecycleState, SeriesValues, point_key, series_color,
    validate_plain_values,
};
use super::graph_context::GraphContext;
use super::legend::SeriesSummary;
use super::marker_layer::{
    AreaItem, Marker, MarkerLayer, Paint, RegionItem, line_style, marker_center,
};
use super::transform_pipeline::TransformPipeline;

/// Line series: a polyline through the datapoints plus a marker per point.
/// Gaps (`y == null`) split the polyline.
#[derive(Debug, Clone)]
pub struct LineContent {
    descriptor: SeriesDescriptor,
    color: String,
    state: LifecycleState,
    line: Option<ShapeHandle>,
    markers: MarkerLayer,
}

impl LineContent {
    #[must_use]
    pub fn new(descriptor: SeriesDescriptor) -> Self {
        let color = series_color(descriptor.color.as_deref());
        Self {
            descriptor,
            color,
            state: LifecycleState::Unloaded,
            line: None,
            markers: MarkerLayer::default(),
        }
    }

    /// Validates `input` against the graph's axes.
    pub fn from_input(input: &SeriesInput, ctx: &GraphContext) -> ChartResult<Self> {
        Ok(Self::new(input.validate(ctx.series_rules(ContentKind::Line))?))
    }

    #[must_use]
    pub fn descriptor(&self) -> &SeriesDescriptor {
        &self.descriptor
    }

    fn values_range(&self) -> Option<ValuesRange> {
        ValuesRange::from_values(self.descriptor.y_values(false))
    }

    fn path(&self, ctx: &GraphContext) -> PathPrimitive {
        let mut data = String::new();
        let mut segment: Vec<PathVertex> = Vec::new();
        for point in &self.descriptor.values {
            match marker_center(ctx, point) {
                Some((x, y)) => segment.push(PathVertex::new(x, y)),
                None => {
                    data.push_str(&line_path_data(&segment));
                    segment.clear();
                }
            }
        }
        data.push_str(&line_path_data(&segment));
        PathPrimitive::new(data)
    }

    fn draw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        if !ctx.legend().is_shown(&self.descriptor.key) {
            return Ok(());
        }
        let descriptor = &self.descriptor;
        let paint = Paint {
            owner: &descriptor.key,
            color: &self.color,
            shape: descriptor.shape,
            attributes: &descriptor.style,
        };
        self.line = Some(surface.draw_path(
            self.path(ctx),
            &line_style(&descriptor.key, &self.color, &descriptor.style),
        )?);
        self.markers
            .draw_markers(ctx, surface, paint, &markers(descriptor))?;
        self.markers.draw_regions(
            ctx,
            surface,
            paint,
            &regions(descriptor),
            area(descriptor),
        )
    }
}

fn markers(descriptor: &SeriesDescriptor) -> Vec<Marker<'_>> {
    descriptor
        .values
        .iter()
        .map(|point| Marker {
            key: point_key(point.x, 0),
            point,
            class: "point",
        })
        .collect()
}

fn regions(descriptor: &SeriesDescriptor) -> Vec<RegionItem<'_>> {
    descriptor
        .regions
        .iter()
        .map(|region| RegionItem {
            region,
            class: "region",
        })
        .collect()
}

fn area(descriptor: &SeriesDescriptor) -> Option<AreaItem<'_>> {
    Some(AreaItem {
        points: &descriptor.value_regions,
        y_axis: descriptor.y_axis,
    })
}

impl ChartContent for LineContent {
    fn key(&self) -> &str {
        &self.descriptor.key
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Line
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            key: self.descriptor.key.clone(),
            kind: ContentKind::Line,
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
            self.values_range(),
        )?;
        ctx.refresh_layout()?;
        self.state = next;
        self.draw(ctx, surface)?;
        debug!(
            key = %self.descriptor.key,
            points = self.descriptor.values.len(),
            markers = self.markers.marker_count(),
            "line content loaded"
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
        self.line = None;
        self.markers.clear();
        ctx.unregister(&self.descriptor.key);
        ctx.refresh_layout()?;
        debug!(key = %self.descriptor.key, removed, "line content unloaded");
        Ok(())
    }

    fn resize(&mut self, ctx: &GraphContext, pipeline: &mut TransformPipeline) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Resize)?;
        if let Some(handle) = self.line {
            pipeline.push(handle, Layer::Data, ShapeGeometry::Path(self.path(ctx)));
        }
        let descriptor = &self.descriptor;
        self.markers.relayout(
            ctx,
            pipeline,
            descriptor.shape,
            &markers(descriptor),
            &regions(descriptor),
            area(descriptor),
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
        let descriptor = &self.descriptor;
        let values = validate_plain_values(
            values,
            ContentKind::Line,
            &descriptor.key,
            &descriptor.group,
            descriptor.y_axis,
            ctx,
        )?;

        self.descriptor.values = values;
        self.state = next;
        ctx.set_values_range(&self.descriptor.key, self.descriptor.y_axis, self.values_range());
        ctx.refresh_layout()?;

        let descriptor = &self.descriptor;
        let markers = markers(descriptor);
        let dropped = self.markers.retain(&descriptor.key, &markers, surface);
        if ctx.legend().is_shown(&descriptor.key) {
            let paint = Paint {
                owner: &descriptor.key,
                color: &self.color,
                shape: descriptor.shape,
                attributes: &descriptor.style,
            };
            self.markers.draw_markers(ctx, surface, paint, &markers)?;
        }
        debug!(
            key = %descriptor.key,
            points = descriptor.values.len(),
            dropped,
            "line content reflowed"
        );
        Ok(())
    }

    fn redraw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Redraw)?;
        surface.remove_shapes(&ShapeSelector::owner(&self.descriptor.key));
        self.line = None;
        self.markers.clear();
        self.draw(ctx, surface)
    }
}

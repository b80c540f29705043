use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::{
    AxisValue, BarAttributes, ContentKind, CrossSpan, DEFAULT_GOAL_LINE_STROKE_WIDTH, Datapoint,
    REGION_WIDTH_RATIO, Region, SeriesDescriptor, SeriesInput, compute_rect,
};
use crate::error::ChartResult;
use crate::render::{
    DrawingSurface, Layer, RectPrimitive, ShapeGeometry, ShapeHandle, ShapeSelector, ShapeStyle,
};

use super::content::{
    ChartContent, LifecycleOp, LifecycleState, PointKey, PointShapes, SeriesValues, data_style,
    label_style, point_key, region_style, retain_points, series_color, validate_plain_values,
};
use super::graph_context::GraphContext;
use super::legend::SeriesSummary;
use super::marker_layer::{label_primitive, point_label};
use super::transform_pipeline::TransformPipeline;

const EMPTY_RECT: RectPrimitive = RectPrimitive::new(0.0, 0.0, 0.0, 0.0);

fn bar_rect(attributes: BarAttributes) -> RectPrimitive {
    RectPrimitive::new(
        attributes.x,
        attributes.y,
        attributes.width,
        attributes.height,
    )
}

fn bar_label(text: &str, attributes: BarAttributes) -> ShapeGeometry {
    ShapeGeometry::Text(label_primitive(
        text,
        attributes.x + attributes.width / 2.0,
        attributes.y,
    ))
}

fn selection_style(owner: &str, color: &str) -> ShapeStyle {
    ShapeStyle::new(owner, Layer::Selection, "selection-box")
        .with_fill("none")
        .with_stroke(color, 1.0)
}

/// Bar series drawn into the shared band layout.
///
/// Datapoints are handed to the [`GraphContext`] on load; every rectangle is
/// computed from the context's stacked copy, so bars loaded later in the same
/// group move this series' geometry on the next resize.
#[derive(Debug, Clone)]
pub struct BarContent {
    descriptor: SeriesDescriptor,
    color: String,
    state: LifecycleState,
    points: IndexMap<PointKey, PointShapes>,
    selection: IndexMap<OrderedFloat<f64>, (AxisValue, ShapeHandle)>,
    regions: Vec<ShapeHandle>,
}

impl BarContent {
    #[must_use]
    pub fn new(descriptor: SeriesDescriptor) -> Self {
        let color = series_color(descriptor.color.as_deref());
        Self {
            descriptor,
            color,
            state: LifecycleState::Unloaded,
            points: IndexMap::new(),
            selection: IndexMap::new(),
            regions: Vec::new(),
        }
    }

    pub fn from_input(input: &SeriesInput, ctx: &GraphContext) -> ChartResult<Self> {
        Ok(Self::new(input.validate(ctx.series_rules(ContentKind::Bar))?))
    }

    /// Descriptor as loaded; stack bases live in [`GraphContext::stacked_values`].
    #[must_use]
    pub fn descriptor(&self) -> &SeriesDescriptor {
        &self.descriptor
    }

    fn region_rect(&self, ctx: &GraphContext, region: &Region) -> RectPrimitive {
        let cross = match region.x {
            Some(tick) => ctx
                .bar_slot(tick, &self.descriptor.group, REGION_WIDTH_RATIO)
                .unwrap_or(CrossSpan {
                    start: 0.0,
                    extent: 0.0,
                }),
            None => ctx.plot_width_span(),
        };
        let rect = compute_rect(
            region,
            ctx.axes().y_scale(self.descriptor.y_axis),
            cross,
            DEFAULT_GOAL_LINE_STROKE_WIDTH,
        );
        RectPrimitive::new(rect.x, rect.y, rect.width, rect.height)
    }

    fn selection_rect(&self, ctx: &GraphContext, tick: AxisValue) -> RectPrimitive {
        if !ctx.legend().is_selected(&self.descriptor.key) {
            return EMPTY_RECT;
        }
        let bounds = ctx.selection_bounds(tick);
        RectPrimitive::new(bounds.x, bounds.y, bounds.width, bounds.height)
    }

    /// Draws bars and labels not drawn yet, plus a selection box per tick.
    fn draw_points(
        &mut self,
        ctx: &GraphContext,
        surface: &mut dyn DrawingSurface,
    ) -> ChartResult<()> {
        let key = &self.descriptor.key;
        let style = data_style(key, "bar", &self.color, &self.descriptor.style);
        for point in ctx.stacked_values(key) {
            let id = point_key(point.x, 0);
            if self.points.contains_key(&id) {
                continue;
            }
            let Some(attributes) = ctx.bar_attributes(point) else {
                continue;
            };
            let data = surface.draw_rect(bar_rect(attributes), &style)?;
            let label = match point_label(point) {
                Some(text) => Some(surface.draw_text(
                    label_primitive(text, attributes.x + attributes.width / 2.0, attributes.y),
                    &label_style(key, &self.color),
                )?),
                None => None,
            };
            self.points.insert(id, PointShapes { data, label });
        }

        let selection = selection_style(key, &self.color);
        for point in ctx.stacked_values(key) {
            let tick = OrderedFloat(point.x.as_f64());
            if self.selection.contains_key(&tick) {
                continue;
            }
            let handle = surface.draw_rect(self.selection_rect(ctx, point.x), &selection)?;
            self.selection.insert(tick, (point.x, handle));
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        if !ctx.legend().is_shown(&self.descriptor.key) {
            return Ok(());
        }
        self.draw_points(ctx, surface)?;
        for region in &self.descriptor.regions {
            let color = region.color.as_deref().unwrap_or(&self.color);
            let style = region_style(&self.descriptor.key, "region", color, region.is_goal_line());
            let handle = surface.draw_rect(self.region_rect(ctx, region), &style)?;
            self.regions.push(handle);
        }
        Ok(())
    }

    fn forget_shapes(&mut self) {
        self.points.clear();
        self.selection.clear();
        self.regions.clear();
    }

    /// Drops shapes of datapoints that disappeared, became gaps or changed
    /// label presence, and selection boxes of ticks no longer present.
    fn retain(&mut self, values: &[Datapoint], surface: &mut dyn DrawingSurface) -> usize {
        let keep: IndexMap<PointKey, bool> = values
            .iter()
            .filter(|point| point.y.is_some())
            .map(|point| (point_key(point.x, 0), point_label(point).is_some()))
            .collect();
        let dropped = retain_points(&self.descriptor.key, &mut self.points, &keep, surface);

        let key = &self.descriptor.key;
        self.selection.retain(|tick, (_, handle)| {
            if values.iter().any(|point| OrderedFloat(point.x.as_f64()) == *tick) {
                return true;
            }
            surface.remove_shapes(&ShapeSelector::shape(key.as_str(), *handle));
            false
        });
        dropped
    }
}

impl ChartContent for BarContent {
    fn key(&self) -> &str {
        &self.descriptor.key
    }

    fn kind(&self) -> ContentKind {
        ContentKind::Bar
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            key: self.descriptor.key.clone(),
            kind: ContentKind::Bar,
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
        ctx.register_bar(
            &self.descriptor.key,
            &self.descriptor.group,
            self.descriptor.values.clone(),
        )?;
        ctx.refresh_layout()?;
        self.state = next;
        self.draw(ctx, surface)?;
        debug!(
            key = %self.descriptor.key,
            group = %self.descriptor.group,
            bars = self.points.len(),
            regions = self.regions.len(),
            "bar content loaded"
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
        self.forget_shapes();
        ctx.unregister(&self.descriptor.key);
        ctx.refresh_layout()?;
        debug!(key = %self.descriptor.key, removed, "bar content unloaded");
        Ok(())
    }

    fn resize(&mut self, ctx: &GraphContext, pipeline: &mut TransformPipeline) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Resize)?;
        for (tick, handle) in self.selection.values() {
            pipeline.push(
                *handle,
                Layer::Selection,
                ShapeGeometry::Rect(self.selection_rect(ctx, *tick)),
            );
        }
        for point in ctx.stacked_values(&self.descriptor.key) {
            let (Some(shapes), Some(attributes)) = (
                self.points.get(&point_key(point.x, 0)),
                ctx.bar_attributes(point),
            ) else {
                continue;
            };
            pipeline.push(shapes.data, Layer::Data, ShapeGeometry::Rect(bar_rect(attributes)));
            if let (Some(handle), Some(text)) = (shapes.label, point_label(point)) {
                pipeline.push(handle, Layer::Label, bar_label(text, attributes));
            }
        }
        for (handle, region) in self.regions.iter().zip(&self.descriptor.regions) {
            pipeline.push(
                *handle,
                Layer::Region,
                ShapeGeometry::Rect(self.region_rect(ctx, region)),
            );
        }
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
            ContentKind::Bar,
            &self.descriptor.key,
            &self.descriptor.group,
            self.descriptor.y_axis,
            ctx,
        )?;
        self.descriptor.values = values;
        self.state = next;
        ctx.replace_bar_values(&self.descriptor.key, self.descriptor.values.clone());
        ctx.refresh_layout()?;

        let values = self.descriptor.values.clone();
        let dropped = self.retain(&values, surface);
        if ctx.legend().is_shown(&self.descriptor.key) {
            self.draw_points(ctx, surface)?;
        }
        debug!(
            key = %self.descriptor.key,
            bars = self.descriptor.values.len(),
            dropped,
            "bar content reflowed"
        );
        Ok(())
    }

    fn redraw(&mut self, ctx: &GraphContext, surface: &mut dyn DrawingSurface) -> ChartResult<()> {
        self.state = self.state.apply(LifecycleOp::Redraw)?;
        surface.remove_shapes(&ShapeSelector::owner(&self.descriptor.key));
        self.forget_shapes();
        self.draw(ctx, surface)
    }
}

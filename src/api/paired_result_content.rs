use tracing::debug;

use crate::core::series::{PairedDatapoint, validate_datapoint};
use crate::core::{
    ContentKind, PairType, PairedSeriesDescriptor, PairedSeriesInput, ValuesRange,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingSurface, ShapeSelector};

use super::content::{
    ChartContent, LifecycleOp, LifecycleState, SeriesValues, point_key, series_color,
};
use super::graph_context::GraphContext;
use super::legend::SeriesSummary;
use super::marker_layer::{AreaItem, Marker, MarkerLayer, Paint, RegionItem};
use super::transform_pipeline::TransformPipeline;

const fn slot(pair: PairType) -> u8 {
    match pair {
        PairType::High => 0,
        PairType::Mid => 1,
        PairType::Low => 2,
    }
}

const fn marker_class(pair: PairType) -> &'static str {
    match pair {
        PairType::High => "pair-high",
        PairType::Mid => "pair-mid",
        PairType::Low => "pair-low",
    }
}

const fn region_class(pair: PairType) -> &'static str {
    match pair {
        PairType::High => "region-high",
        PairType::Mid => "region-mid",
        PairType::Low => "region-low",
    }
}

/// Paired-result series: up to three markers (`high`, `mid`, `low`) per x.
#[derive(Debug, Clone)]
pub struct PairedResultContent {
    descriptor: PairedSeriesDescriptor,
    color: String,
    state: LifecycleState,
    markers: MarkerLayer,
}

impl PairedResultContent {
    #[must_use]
    pub fn new(descriptor: PairedSeriesDescriptor) -> Self {
        let color = series_color(descriptor.color.as_deref());
        Self {
            descriptor,
            color,
            state: LifecycleState::Unloaded,
            markers: MarkerLayer::default(),
        }
    }

    pub fn from_input(input: &PairedSeriesInput, ctx: &GraphContext) -> ChartResult<Self> {
        Ok(Self::new(
            input.validate(ctx.series_rules(ContentKind::PairedResult))?,
        ))
    }

    #[must_use]
    pub fn descriptor(&self) -> &PairedSeriesDescriptor {
        &self.descriptor
    }

    /// Range over every high, mid and low value.
    fn values_range(&self) -> Option<ValuesRange> {
        ValuesRange::from_values(self.descriptor.datapoints().filter_map(|(_, point)| point.y))
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
            .datapoints()
            .map(|(pair, point)| Marker {
                key: point_key(point.x, slot(pair)),
                point,
                class: marker_class(pair),
            })
            .collect()
    }

    fn regions(&self) -> Vec<RegionItem<'_>> {
        self.descriptor
            .regions
            .iter()
            .map(|(pair, region)| RegionItem {
                region,
                class: region_class(*pair),
            })
            .collect()
    }

    fn area(&self) -> AreaItem<'_> {
        AreaItem {
            points: &self.descriptor.value_regions,
            y_axis: self.descriptor.y_axis,
        }
    }

    fn validate_values(&self, values: &SeriesValues, ctx: &GraphContext) -> ChartResult<Vec<PairedDatapoint>> {
        let SeriesValues::Paired(inputs) = values else {
            return Err(ChartError::InvalidData(
                "paired-result content needs high/mid/low values".to_owned(),
            ));
        };
        let rules = ctx.series_rules(ContentKind::PairedResult);
        let key = &self.descriptor.key;
        let y_axis = self.descriptor.y_axis;
        inputs
            .iter()
            .map(|value| {
                if value.high.is_none() && value.mid.is_none() && value.low.is_none() {
                    return Err(ChartError::EmptyPairedValue);
                }
                let convert = |input: Option<&crate::core::DatapointInput>| {
                    input
                        .map(|input| validate_datapoint(input, key, key, y_axis, rules))
                        .transpose()
                };
                Ok(PairedDatapoint {
                    high: convert(value.high.as_ref())?,
                    mid: convert(value.mid.as_ref())?,
                    low: convert(value.low.as_ref())?,
                })
            })
            .collect()
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

impl ChartContent for PairedResultContent {
    fn key(&self) -> &str {
        &self.descriptor.key
    }

    fn kind(&self) -> ContentKind {
        ContentKind::PairedResult
    }

    fn state(&self) -> LifecycleState {
        self.state
    }

    fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            key: self.descriptor.key.clone(),
            kind: ContentKind::PairedResult,
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
        ctx.register_series(&self.descriptor.key, self.descriptor.y_axis, self.values_range())?;
        ctx.refresh_layout()?;
        self.state = next;
        self.draw(ctx, surface)?;
        debug!(
            key = %self.descriptor.key,
            pairs = self.descriptor.values.len(),
            markers = self.markers.marker_count(),
            "paired-result content loaded"
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
        debug!(key = %self.descriptor.key, removed, "paired-result content unloaded");
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
        let values = self.validate_values(values, ctx)?;
        self.descriptor.values = values;
        self.state = next;
        ctx.set_values_range(&self.descriptor.key, self.descriptor.y_axis, self.values_range());
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
            pairs = self.descriptor.values.len(),
            dropped,
            "paired-result content reflowed"
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

//! Markers, datapoint labels and regions shared by line, scatter and
//! paired-result content.

use indexmap::IndexMap;

use crate::core::region::compute_rect;
use crate::core::{
    AxisId, Datapoint, DEFAULT_REGION_LINE_STROKE_WIDTH, Region, Symbol, ValueRegionPoint,
    YAxisId, compute_area_path,
};
use crate::error::ChartResult;
use crate::render::{
    DrawingSurface, Layer, PathPrimitive, RectPrimitive, ShapeGeometry, ShapeHandle, ShapeStyle,
    TextAnchor, TextPrimitive,
};

use super::content::{
    PointKey, PointShapes, data_style, label_style, region_style, retain_points,
};
use super::graph_context::GraphContext;
use super::transform_pipeline::TransformPipeline;

/// Marker diameter in pixels.
pub const MARKER_SIZE: f64 = 8.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;
/// Gap between a datapoint and its label.
pub const LABEL_OFFSET: f64 = 6.0;

/// Presentation shared by every shape of one series.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paint<'a> {
    pub(crate) owner: &'a str,
    pub(crate) color: &'a str,
    pub(crate) shape: Symbol,
    pub(crate) attributes: &'a IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Marker<'a> {
    pub(crate) key: PointKey,
    pub(crate) point: &'a Datapoint,
    pub(crate) class: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RegionItem<'a> {
    pub(crate) region: &'a Region,
    pub(crate) class: &'static str,
}

/// Value-region area of a series.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AreaItem<'a> {
    pub(crate) points: &'a [ValueRegionPoint],
    pub(crate) y_axis: YAxisId,
}

/// Non-empty label text of a datapoint.
pub(crate) fn point_label(point: &Datapoint) -> Option<&str> {
    point.label.as_deref().filter(|text| !text.is_empty())
}

pub(crate) fn label_primitive(text: &str, anchor_x: f64, top: f64) -> TextPrimitive {
    TextPrimitive::new(text, anchor_x, top - LABEL_OFFSET, LABEL_FONT_SIZE, TextAnchor::Middle)
}

/// Pixel position of a datapoint; `None` for gaps.
pub(crate) fn marker_center(ctx: &GraphContext, point: &Datapoint) -> Option<(f64, f64)> {
    let y = point.y?;
    Some((
        ctx.x_position(point.x),
        ctx.axes().y_scale(point.y_axis).map(y),
    ))
}

fn marker_path(shape: Symbol, (cx, cy): (f64, f64)) -> PathPrimitive {
    PathPrimitive::new(shape.path_data(cx, cy, MARKER_SIZE))
}

/// Rectangle of a region on line-like content: Y regions span the plot
/// width, X regions the plot height.
pub(crate) fn region_rect(ctx: &GraphContext, region: &Region) -> RectPrimitive {
    let cross = if region.axis == AxisId::X {
        ctx.plot_height_span()
    } else {
        ctx.plot_width_span()
    };
    let rect = compute_rect(
        region,
        ctx.axes().scale(region.axis),
        cross,
        DEFAULT_REGION_LINE_STROKE_WIDTH,
    );
    RectPrimitive::new(rect.x, rect.y, rect.width, rect.height)
}

fn area_path(ctx: &GraphContext, area: AreaItem<'_>) -> PathPrimitive {
    PathPrimitive::new(compute_area_path(
        area.points,
        ctx.axes().scale(AxisId::X),
        ctx.axes().y_scale(area.y_axis),
    ))
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MarkerLayer {
    points: IndexMap<PointKey, PointShapes>,
    regions: Vec<ShapeHandle>,
    area: Option<ShapeHandle>,
}

impl MarkerLayer {
    pub(crate) fn marker_count(&self) -> usize {
        self.points.len()
    }

    /// Draws every marker not drawn yet. Gaps and repeated keys are skipped.
    pub(crate) fn draw_markers(
        &mut self,
        ctx: &GraphContext,
        surface: &mut dyn DrawingSurface,
        paint: Paint<'_>,
        markers: &[Marker<'_>],
    ) -> ChartResult<()> {
        for marker in markers {
            if self.points.contains_key(&marker.key) {
                continue;
            }
            let Some(center) = marker_center(ctx, marker.point) else {
                continue;
            };
            let data = surface.draw_path(
                marker_path(paint.shape, center),
                &data_style(paint.owner, marker.class, paint.color, paint.attributes),
            )?;
            let label = point_label(marker.point)
                .map(|text| {
                    surface.draw_text(
                        label_primitive(text, center.0, center.1),
                        &label_style(paint.owner, paint.color),
                    )
                })
                .transpose()?;
            self.points.insert(marker.key, PointShapes { data, label });
        }
        Ok(())
    }

    /// Draws region bands and the value-region area. Regions never change
    /// after load, so they are drawn once per redraw.
    pub(crate) fn draw_regions(
        &mut self,
        ctx: &GraphContext,
        surface: &mut dyn DrawingSurface,
        paint: Paint<'_>,
        regions: &[RegionItem<'_>],
        area: Option<AreaItem<'_>>,
    ) -> ChartResult<()> {
        for item in regions {
            let color = item.region.color.as_deref().unwrap_or(paint.color);
            let style = region_style(paint.owner, item.class, color, item.region.is_goal_line());
            let handle = surface.draw_rect(region_rect(ctx, item.region), &style)?;
            self.regions.push(handle);
        }
        if let Some(area) = area.filter(|area| !area.points.is_empty()) {
            let style = region_style(paint.owner, "value-region", paint.color, false);
            self.area = Some(surface.draw_path(area_path(ctx, area), &style)?);
        }
        Ok(())
    }

    /// Pushes current marker, label and region geometry.
    pub(crate) fn relayout(
        &self,
        ctx: &GraphContext,
        pipeline: &mut TransformPipeline,
        shape: Symbol,
        markers: &[Marker<'_>],
        regions: &[RegionItem<'_>],
        area: Option<AreaItem<'_>>,
    ) {
        for marker in markers {
            let (Some(shapes), Some(center)) =
                (self.points.get(&marker.key), marker_center(ctx, marker.point))
            else {
                continue;
            };
            pipeline.push(
                shapes.data,
                Layer::Data,
                ShapeGeometry::Path(marker_path(shape, center)),
            );
            if let (Some(handle), Some(text)) = (shapes.label, point_label(marker.point)) {
                pipeline.push(
                    handle,
                    Layer::Label,
                    ShapeGeometry::Text(label_primitive(text, center.0, center.1)),
                );
            }
        }
        for (handle, item) in self.regions.iter().zip(regions) {
            pipeline.push(
                *handle,
                Layer::Region,
                ShapeGeometry::Rect(region_rect(ctx, item.region)),
            );
        }
        if let (Some(handle), Some(area)) = (self.area, area) {
            pipeline.push(handle, Layer::Region, ShapeGeometry::Path(area_path(ctx, area)));
        }
    }

    /// Removes markers whose datapoint disappeared or became a gap.
    pub(crate) fn retain(
        &mut self,
        owner: &str,
        markers: &[Marker<'_>],
        surface: &mut dyn DrawingSurface,
    ) -> usize {
        let keep: IndexMap<PointKey, bool> = markers
            .iter()
            .filter(|marker| marker.point.y.is_some())
            .map(|marker| (marker.key, point_label(marker.point).is_some()))
            .collect();
        retain_points(owner, &mut self.points, &keep, surface)
    }

    /// Forgets every handle; callers remove the shapes themselves.
    pub(crate) fn clear(&mut self) {
        self.points.clear();
        self.regions.clear();
        self.area = None;
    }
}

/// Style of the connecting line of a line series.
pub(crate) fn line_style(owner: &str, color: &str, attributes: &IndexMap<String, String>) -> ShapeStyle {
    ShapeStyle::new(owner, Layer::Data, "line")
        .with_stroke(color, 2.0)
        .with_attributes(attributes)
}

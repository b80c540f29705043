use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{
    AxisValue, ContentKind, PairedSeriesInput, SelectionBounds, SeriesInput, ValuesRange,
    Viewport, YAxisId,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{DrawingSurface, Layer, ShapeSelector, SvgSurface};

use super::bar_content::BarContent;
use super::content::{ChartContent, SeriesValues};
use super::frame_scheduler::FrameScheduler;
use super::graph_config::GraphConfig;
use super::graph_context::GraphContext;
use super::invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic};
use super::legend::{LabelShapes, Legend};
use super::line_content::LineContent;
use super::paired_result_content::PairedResultContent;
use super::scatter_content::ScatterContent;
use super::transform_pipeline::TransformPipeline;

/// Main facade consumed by host applications.
///
/// A `Graph` owns its [`GraphContext`], the loaded contents in load order and
/// the drawing surface. Every public mutation either completes or leaves the
/// graph as it was.
pub struct Graph<S: DrawingSurface> {
    surface: S,
    context: GraphContext,
    contents: IndexMap<String, Box<dyn ChartContent>>,
    scheduler: FrameScheduler,
    pending_viewport: Option<Viewport>,
    legend: Option<Box<dyn Legend>>,
    labels: Option<Box<dyn LabelShapes>>,
}

impl<S: DrawingSurface> Graph<S> {
    pub fn new(config: GraphConfig, surface: S) -> ChartResult<Self> {
        let context = GraphContext::new(config)?;
        debug!(
            bind_to = %context.config().bind_to,
            width = context.canvas().viewport.width,
            height = context.canvas().viewport.height,
            "graph created"
        );
        Ok(Self {
            surface,
            context,
            contents: IndexMap::new(),
            scheduler: FrameScheduler::default(),
            pending_viewport: None,
            legend: None,
            labels: None,
        })
    }

    /// Builds a graph from its JSON definition.
    pub fn from_json(input: &str, surface: S) -> ChartResult<Self> {
        Self::new(GraphConfig::from_json_str(input)?, surface)
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Box<dyn Legend>) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_label_shapes(mut self, labels: Box<dyn LabelShapes>) -> Self {
        self.labels = Some(labels);
        self
    }

    #[must_use]
    pub fn context(&self) -> &GraphContext {
        &self.context
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }

    #[must_use]
    pub fn content(&self, key: &str) -> Option<&dyn ChartContent> {
        self.contents.get(key).map(Box::as_ref)
    }

    /// Keys of the loaded contents, in load order.
    pub fn content_keys(&self) -> impl Iterator<Item = &str> {
        self.contents.keys().map(String::as_str)
    }

    #[must_use]
    pub fn selection_bounds(&self, tick: AxisValue) -> SelectionBounds {
        self.context.selection_bounds(tick)
    }

    #[must_use]
    pub fn values_range(&self, axis: YAxisId) -> Option<ValuesRange> {
        self.context.values_range(axis)
    }

    /// Loads `content` and repositions everything already drawn.
    ///
    /// A failing load removes whatever the content registered or drew.
    pub fn load(&mut self, mut content: Box<dyn ChartContent>) -> ChartResult<()> {
        let key = content.key().to_owned();
        if self.contents.contains_key(&key) || self.context.contains_key(&key) {
            return Err(ChartError::DuplicateKey);
        }
        if let Err(err) = content.load(&mut self.context, &mut self.surface) {
            self.surface.remove_shapes(&ShapeSelector::owner(&key));
            self.context.unregister(&key);
            if let Err(refresh) = self.context.refresh_layout() {
                warn!(key = %key, error = %refresh, "layout refresh after failed load");
            }
            return Err(err);
        }

        let summary = content.summary();
        if let Some(legend) = self.legend.as_mut() {
            legend.register(&summary);
        }
        if let Some(labels) = self.labels.as_mut() {
            labels.add(&summary, summary.y_axis);
        }
        self.contents.insert(key, content);
        self.relayout()?;
        Ok(())
    }

    /// Parses a series definition for `kind` and loads it.
    pub fn load_json(&mut self, kind: ContentKind, input: &str) -> ChartResult<()> {
        let content: Box<dyn ChartContent> = match kind {
            ContentKind::PairedResult => {
                let input: PairedSeriesInput = parse_json(input)?;
                Box::new(PairedResultContent::from_input(&input, &self.context)?)
            }
            ContentKind::Bar | ContentKind::Line | ContentKind::Scatter => {
                let input: SeriesInput = parse_json(input)?;
                match kind {
                    ContentKind::Bar => Box::new(BarContent::from_input(&input, &self.context)?),
                    ContentKind::Line => Box::new(LineContent::from_input(&input, &self.context)?),
                    _ => Box::new(ScatterContent::from_input(&input, &self.context)?),
                }
            }
        };
        self.load(content)
    }

    /// Removes the content loaded under `key`.
    pub fn unload(&mut self, key: &str) -> ChartResult<()> {
        let mut content = self
            .contents
            .shift_remove(key)
            .ok_or(ChartError::UnknownKey)?;
        let summary = content.summary();
        content.unload(&mut self.context, &mut self.surface)?;
        if let Some(legend) = self.legend.as_mut() {
            legend.remove(key);
        }
        if let Some(labels) = self.labels.as_mut() {
            labels.remove(key, summary.y_axis);
        }
        self.relayout()?;
        Ok(())
    }

    /// Applies a new viewport immediately.
    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        let mut canvas = self.context.canvas();
        canvas.viewport = viewport;
        self.context.set_canvas(canvas)?;
        debug!(width = viewport.width, height = viewport.height, "graph resized");
        self.relayout()?;
        Ok(())
    }

    /// Records a viewport change for the next frame. Returns `true` when the
    /// host should schedule a frame callback.
    pub fn request_resize(&mut self, viewport: Viewport) -> bool {
        self.pending_viewport = Some(viewport);
        self.scheduler.request(InvalidationMask::new(
            InvalidationLevel::Layout,
            InvalidationTopic::Viewport,
        ))
    }

    /// Schedules a full redraw, e.g. after the host cleared its surface.
    pub fn request_redraw(&mut self) -> bool {
        self.scheduler.request(InvalidationMask::new(
            InvalidationLevel::Full,
            InvalidationTopic::Surface,
        ))
    }

    /// Whether a frame is waiting for [`Graph::run_pending_frame`].
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Runs the merged work of the current burst once. Returns the mask that
    /// was processed, or `None` when nothing was pending.
    ///
    /// A selection-only burst moves selection boxes and nothing else; a
    /// cleared surface rebuilds every shape before positions are refreshed.
    pub fn run_pending_frame(&mut self) -> ChartResult<Option<InvalidationMask>> {
        let Some(mask) = self.scheduler.take() else {
            return Ok(None);
        };
        if mask.has_topic(InvalidationTopic::Viewport) {
            if let Some(viewport) = self.pending_viewport.take() {
                let mut canvas = self.context.canvas();
                canvas.viewport = viewport;
                self.context.set_canvas(canvas)?;
            }
        }
        let transitions = match mask.level() {
            InvalidationLevel::None => 0,
            InvalidationLevel::Light => self.reposition(mask.affected_layers())?,
            InvalidationLevel::Layout => self.relayout()?,
            InvalidationLevel::Full => {
                self.context.refresh_layout()?;
                self.redraw_contents()?;
                self.relayout()?
            }
        };
        debug!(level = ?mask.level(), transitions, "pending frame applied");
        Ok(Some(mask))
    }

    /// Replaces the values of `key` and repositions the graph.
    pub fn reflow(&mut self, key: &str, values: &SeriesValues) -> ChartResult<()> {
        let content = self.contents.get_mut(key).ok_or(ChartError::UnknownKey)?;
        content.reflow(values, &mut self.context, &mut self.surface)?;
        self.relayout()?;
        Ok(())
    }

    /// Reflow from a `{ "key": ..., "values": [...] }` document.
    pub fn reflow_json(&mut self, input: &str) -> ChartResult<()> {
        let document: Value = parse_json(input)?;
        let key = document
            .get("key")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .ok_or(ChartError::MissingKey)?;
        let values = document.get("values").ok_or(ChartError::MissingValues)?;
        let kind = self
            .contents
            .get(key)
            .map(|content| content.kind())
            .ok_or(ChartError::UnknownKey)?;
        let values = SeriesValues::from_json(kind, values.clone())?;
        self.reflow(key, &values)
    }

    /// Re-emits every shape from scratch.
    pub fn redraw(&mut self) -> ChartResult<()> {
        self.context.refresh_layout()?;
        self.redraw_contents()
    }

    /// Shows or hides a series. Returns `true` when the flag changed.
    pub fn set_shown(&mut self, key: &str, shown: bool) -> ChartResult<bool> {
        if !self.context.set_shown(key, shown)? {
            return Ok(false);
        }
        self.context.refresh_layout()?;
        if let Some(content) = self.contents.get_mut(key) {
            content.redraw(&self.context, &mut self.surface)?;
        }
        if let Some(legend) = self.legend.as_mut() {
            legend.set_shown(key, shown);
        }
        self.scheduler.request(InvalidationMask::new(
            InvalidationLevel::Layout,
            InvalidationTopic::Legend,
        ));
        debug!(key, shown, "series visibility changed");
        Ok(true)
    }

    /// Flips the selected flag of `key`; the selection boxes follow on the
    /// next frame. Returns the new flag.
    pub fn toggle_selection(&mut self, key: &str) -> ChartResult<bool> {
        let selected = self.context.toggle_selected(key)?;
        self.scheduler.request(InvalidationMask::new(
            InvalidationLevel::Light,
            InvalidationTopic::Selection,
        ));
        debug!(key, selected, "series selection toggled");
        Ok(selected)
    }

    fn redraw_contents(&mut self) -> ChartResult<()> {
        for content in self.contents.values_mut() {
            content.redraw(&self.context, &mut self.surface)?;
        }
        Ok(())
    }

    /// Refreshes the shared layout and moves every drawn shape into place.
    fn relayout(&mut self) -> ChartResult<usize> {
        self.context.refresh_layout()?;
        self.reposition(&Layer::ALL)
    }

    /// Moves the shapes of `layers` to the geometry of the current layout.
    fn reposition(&mut self, layers: &[Layer]) -> ChartResult<usize> {
        let mut pipeline = TransformPipeline::new(self.context.config().transition);
        for content in self.contents.values_mut() {
            content.resize(&self.context, &mut pipeline)?;
        }
        pipeline.retain_layers(layers);
        pipeline.apply(&mut self.surface)
    }
}

impl Graph<SvgSurface> {
    /// Serialises the current scene as SVG markup.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        self.surface.to_svg_string(self.context.canvas())
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(input: &str) -> ChartResult<T> {
    serde_json::from_str(input).map_err(|e| ChartError::InvalidJson(e.to_string()))
}

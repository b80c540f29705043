use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use graphs_rs::api::{
    ChartContent, GraphContext, InvalidationLevel, InvalidationTopic, LabelShapes, Legend,
    LifecycleState, LineContent, SeriesSummary, SeriesValues, TransformPipeline,
};
use graphs_rs::core::{AxisId, AxisValue, ContentKind, SeriesInput, ValuesRange, Viewport, YAxisId};
use graphs_rs::render::{Layer, RecordingSurface, ShapeGeometry, SurfaceOp, TransitionConfig};
use graphs_rs::{ChartError, Graph, GraphConfig};
use serde_json::json;

const GRAPH: &str = r##"{
    "bindTo": "#lifecycle",
    "axis": {
        "x": {"lowerLimit": 0, "upperLimit": 6, "ticks": {"values": [1, 2, 3, 4, 5]}},
        "y": {"lowerLimit": 0, "upperLimit": 40},
        "y2": {"show": true, "lowerLimit": -10, "upperLimit": 10}
    }
}"##;

fn graph() -> Graph<RecordingSurface> {
    Graph::from_json(GRAPH, RecordingSurface::default()).expect("graph")
}

fn load(graph: &mut Graph<RecordingSurface>, kind: ContentKind, input: serde_json::Value) {
    graph
        .load_json(kind, &input.to_string())
        .expect("load content");
}

fn draws_on(ops: &[SurfaceOp], wanted: Layer) -> usize {
    ops.iter()
        .filter(|op| matches!(op, SurfaceOp::Draw { layer, .. } if *layer == wanted))
        .count()
}

fn label_x(graph: &Graph<RecordingSurface>, key: &str) -> f64 {
    let labels = graph.surface().shapes_of(key, Layer::Label);
    let ShapeGeometry::Text(text) = &labels[0].geometry else {
        panic!("label should be text");
    };
    text.x
}

#[derive(Debug, Default)]
struct Events(Vec<String>);

struct RecordingLegend(Rc<RefCell<Events>>);

impl Legend for RecordingLegend {
    fn register(&mut self, series: &SeriesSummary) {
        self.0.borrow_mut().0.push(format!("register {}", series.key));
    }

    fn remove(&mut self, key: &str) {
        self.0.borrow_mut().0.push(format!("remove {key}"));
    }

    fn set_shown(&mut self, key: &str, shown: bool) {
        self.0.borrow_mut().0.push(format!("shown {key} {shown}"));
    }
}

struct RecordingLabels(Rc<RefCell<Events>>);

impl LabelShapes for RecordingLabels {
    fn add(&mut self, series: &SeriesSummary, container: YAxisId) {
        self.0
            .borrow_mut()
            .0
            .push(format!("label {} {container:?}", series.key));
    }

    fn remove(&mut self, key: &str, container: YAxisId) {
        self.0
            .borrow_mut()
            .0
            .push(format!("unlabel {key} {container:?}"));
    }
}

#[test]
fn bar_values_range_includes_zero() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "values": [{"x": 1, "y": 13}, {"x": 2, "y": 10}, {"x": 3, "y": 15}]}),
    );
    assert_eq!(graph.values_range(YAxisId::Y), Some(ValuesRange::new(0.0, 15.0)));
    assert_eq!(graph.values_range(YAxisId::Y2), None);
    assert_eq!(graph.context().axes().y.domain, (0.0, 40.0));
}

#[test]
fn load_then_unload_restores_shared_state() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "group": "g1", "values": [{"x": 1, "y": 5}]}),
    );
    let shown: Vec<String> = graph.context().shown().keys().map(str::to_owned).collect();
    let groups: Vec<String> = graph
        .context()
        .band()
        .x1
        .domain()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let shapes = graph.surface().shape_count();

    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "b", "group": "g2", "values": [{"x": 1, "y": 7}]}),
    );
    assert_eq!(graph.context().band().x1.domain(), vec!["g1", "g2"]);
    graph.unload("b").expect("unload");

    let shown_after: Vec<&str> = graph.context().shown().keys().collect();
    assert_eq!(shown_after, shown);
    assert_eq!(graph.context().band().x1.domain(), groups);
    assert_eq!(graph.surface().shape_count(), shapes);
    assert!(graph.content("b").is_none());
}

#[test]
fn failed_load_leaves_the_graph_untouched() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "values": [{"x": 1, "y": 5}]}),
    );
    let shapes = graph.surface().shape_count();
    let domain = graph.context().axes().y.domain;

    let off_tick = json!({"key": "b", "values": [{"x": 9, "y": 500}]}).to_string();
    assert_eq!(
        graph.load_json(ContentKind::Bar, &off_tick),
        Err(ChartError::TickValueMismatch)
    );
    let duplicate = json!({"key": "a", "values": [{"x": 2, "y": 1}]}).to_string();
    assert_eq!(
        graph.load_json(ContentKind::Line, &duplicate),
        Err(ChartError::DuplicateKey)
    );

    assert_eq!(graph.content_keys().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(graph.context().shown().len(), 1);
    assert_eq!(graph.surface().shape_count(), shapes);
    assert_eq!(graph.context().axes().y.domain, domain);
}

#[test]
fn y2_series_need_an_enabled_axis() {
    let config = r##"{"bindTo": "#c", "axis": {
        "x": {"lowerLimit": 0, "upperLimit": 6},
        "y": {"lowerLimit": 0, "upperLimit": 40}}}"##;
    let mut graph = Graph::from_json(config, RecordingSurface::default()).expect("graph");
    let input = json!({"key": "a", "yAxis": "y2", "values": [{"x": 1, "y": 5}]}).to_string();
    assert_eq!(
        graph.load_json(ContentKind::Line, &input),
        Err(ChartError::Y2AxisNotEnabled)
    );

    let mut graph = self::graph();
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "a", "yAxis": "y2", "values": [{"x": 1, "y": 25}]}),
    );
    assert_eq!(graph.values_range(YAxisId::Y2), Some(ValuesRange::new(25.0, 25.0)));
    let y2 = graph.context().axes().y2.as_ref().expect("y2 axis");
    assert!(y2.domain.1 > 10.0);
    assert_eq!(graph.context().axes().y.domain, (0.0, 40.0));
}

#[test]
fn transitions_run_layer_by_layer() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({
            "key": "a",
            "values": [{"x": 1, "y": 5, "label": "five"}, {"x": 2, "y": 9}],
            "regions": [{"start": 10, "end": 10, "x": 1}]
        }),
    );
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "b", "values": [{"x": 1, "y": 3, "label": "three"}]}),
    );
    graph.surface_mut().clear_ops();
    graph.resize(Viewport::new(1000, 500)).expect("resize");

    let layers = graph.surface().transition_layers();
    assert!(layers.windows(2).all(|pair| pair[0] <= pair[1]));
    for layer in [Layer::Selection, Layer::Data, Layer::Region, Layer::Label] {
        assert!(layers.contains(&layer), "{layer:?}");
    }
    assert_eq!(draws_on(graph.surface().ops(), Layer::Data), 0);
}

#[test]
fn reflow_keeps_shapes_of_surviving_points() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "a", "values": [{"x": 1, "y": 5}, {"x": 2, "y": 6}, {"x": 3, "y": 7}]}),
    );
    graph.surface_mut().clear_ops();

    let values = SeriesValues::from_json(
        ContentKind::Line,
        json!([{"x": 2, "y": 16}, {"x": 3, "y": 17}, {"x": 4, "y": 18}]),
    )
    .expect("values");
    graph.reflow("a", &values).expect("reflow");

    let ops = graph.surface().ops();
    assert_eq!(draws_on(ops, Layer::Data), 1);
    let removed: usize = ops
        .iter()
        .map(|op| match op {
            SurfaceOp::Remove { removed, .. } => *removed,
            _ => 0,
        })
        .sum();
    assert_eq!(removed, 1);
    assert_eq!(graph.surface().shapes_of("a", Layer::Data).len(), 4);
    assert_eq!(
        graph.content("a").map(|content| content.state()),
        Some(LifecycleState::Resized)
    );
    assert_eq!(graph.values_range(YAxisId::Y), Some(ValuesRange::new(16.0, 18.0)));
}

#[test]
fn reflow_rejects_unknown_keys_and_bad_values() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "values": [{"x": 1, "y": 5}]}),
    );
    let values = SeriesValues::from_json(ContentKind::Bar, json!([{"x": 7, "y": 1}]))
        .expect("values");
    assert_eq!(graph.reflow("a", &values), Err(ChartError::TickValueMismatch));
    assert_eq!(graph.reflow("missing", &values), Err(ChartError::UnknownKey));
    assert_eq!(graph.context().stacked_values("a").len(), 1);
}

#[test]
fn content_lifecycle_is_enforced() {
    let config = GraphConfig::from_json_str(GRAPH).expect("config");
    let mut ctx = GraphContext::new(config).expect("context");
    let input: SeriesInput =
        serde_json::from_value(json!({"key": "a", "values": [{"x": 1, "y": 5}]})).expect("input");
    let mut content = LineContent::from_input(&input, &ctx).expect("content");
    let mut surface = RecordingSurface::default();
    let mut pipeline = TransformPipeline::new(TransitionConfig::default());

    assert_eq!(
        content.resize(&ctx, &mut pipeline),
        Err(ChartError::InvalidLifecycle {
            operation: "resize",
            state: "unloaded",
        })
    );
    content.load(&mut ctx, &mut surface).expect("load");
    assert_eq!(content.state(), LifecycleState::Loaded);
    assert!(ctx.contains_key("a"));

    content.resize(&ctx, &mut pipeline).expect("resize");
    assert_eq!(content.state(), LifecycleState::Resized);
    assert!(!pipeline.is_empty());

    content.unload(&mut ctx, &mut surface).expect("unload");
    assert_eq!(content.state(), LifecycleState::Unloaded);
    assert!(!ctx.contains_key("a"));
    assert_eq!(surface.shape_count(), 0);
    assert!(content.unload(&mut ctx, &mut surface).is_err());
}

#[test]
fn line_gaps_split_the_polyline() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "a", "values": [
            {"x": 1, "y": 5}, {"x": 2, "y": null}, {"x": 3, "y": 7}, {"x": 4, "y": 8}
        ]}),
    );
    let data = graph.surface().shapes_of("a", Layer::Data);
    let line = data
        .iter()
        .find(|shape| shape.style.class == "line")
        .expect("line shape");
    let ShapeGeometry::Path(path) = &line.geometry else {
        panic!("line should be a path");
    };
    assert_eq!(path.d.matches('M').count(), 2);
    assert_eq!(
        data.iter().filter(|shape| shape.style.class == "point").count(),
        3
    );
}

#[test]
fn scatter_draws_markers_and_labels() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Scatter,
        json!({"key": "s", "shape": "diamond", "values": [
            {"x": 1, "y": 5, "label": "first"}, {"x": 2, "y": 9}
        ]}),
    );
    let surface = graph.surface();
    assert_eq!(surface.shapes_of("s", Layer::Data).len(), 2);
    assert_eq!(surface.shapes_of("s", Layer::Label).len(), 1);
    assert!(graph.context().band().x1.is_empty());
}

#[test]
fn points_sit_over_the_bars_of_their_tick() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Scatter,
        json!({"key": "s", "values": [{"x": 1, "y": 5, "label": "one"}]}),
    );
    let linear_x = label_x(&graph, "s");
    assert_relative_eq!(
        linear_x,
        graph.context().axes().scale(AxisId::X).map_value(AxisValue::Number(1.0))
    );

    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "b", "values": [{"x": 1, "y": 10}]}),
    );
    let bars = graph.surface().shapes_of("b", Layer::Data);
    let ShapeGeometry::Rect(bar) = &bars[0].geometry else {
        panic!("bar should be a rect");
    };
    let bar_centre = bar.x + bar.width / 2.0;
    assert_relative_eq!(label_x(&graph, "s"), bar_centre, epsilon = 1e-9);
    assert_relative_eq!(
        bar_centre,
        graph
            .context()
            .band()
            .x0
            .position(AxisValue::Number(1.0))
            .expect("configured tick"),
        epsilon = 1e-9
    );
    assert!((linear_x - bar_centre).abs() > 1.0);
}

#[test]
fn paired_results_draw_one_marker_per_present_value() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::PairedResult,
        json!({"key": "p", "values": [
            {"high": {"x": 1, "y": 20}, "low": {"x": 1, "y": 5}},
            {"mid": {"x": 2, "y": 10}}
        ]}),
    );
    let classes: Vec<&str> = graph
        .surface()
        .shapes_of("p", Layer::Data)
        .into_iter()
        .map(|shape| shape.style.class.as_str())
        .collect();
    assert_eq!(classes, vec!["pair-high", "pair-low", "pair-mid"]);
    assert_eq!(graph.values_range(YAxisId::Y), Some(ValuesRange::new(5.0, 20.0)));

    let empty = json!({"key": "q", "values": [{}]}).to_string();
    assert_eq!(
        graph.load_json(ContentKind::PairedResult, &empty),
        Err(ChartError::EmptyPairedValue)
    );
}

#[test]
fn resize_requests_coalesce_into_one_frame() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "values": [{"x": 1, "y": 5}]}),
    );
    assert!(graph.request_resize(Viewport::new(900, 400)));
    assert!(!graph.request_resize(Viewport::new(1000, 500)));

    let mask = graph
        .run_pending_frame()
        .expect("frame")
        .expect("pending mask");
    assert!(mask.has_topic(InvalidationTopic::Viewport));
    assert_eq!(graph.context().canvas().viewport, Viewport::new(1000, 500));
    assert_eq!(graph.run_pending_frame().expect("idle frame"), None);
}

#[test]
fn selection_frames_move_only_selection_boxes() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Bar,
        json!({"key": "a", "values": [{"x": 1, "y": 5}, {"x": 2, "y": 7}]}),
    );
    graph.surface_mut().clear_ops();

    assert!(graph.toggle_selection("a").expect("toggle"));
    let mask = graph
        .run_pending_frame()
        .expect("frame")
        .expect("pending mask");
    assert_eq!(mask.level(), InvalidationLevel::Light);
    assert!(mask.has_topic(InvalidationTopic::Selection));
    assert_eq!(
        graph.surface().transition_layers(),
        vec![Layer::Selection, Layer::Selection]
    );

    // A resize in the same burst widens the frame to every layer.
    graph.surface_mut().clear_ops();
    assert!(!graph.toggle_selection("a").expect("toggle back"));
    graph.request_resize(Viewport::new(900, 400));
    let mask = graph
        .run_pending_frame()
        .expect("frame")
        .expect("pending mask");
    assert_eq!(mask.level(), InvalidationLevel::Layout);
    let layers = graph.surface().transition_layers();
    assert!(layers.contains(&Layer::Selection));
    assert!(layers.contains(&Layer::Data));
}

#[test]
fn full_redraw_requests_rebuild_every_shape() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Scatter,
        json!({"key": "s", "values": [{"x": 1, "y": 5}, {"x": 2, "y": 9}]}),
    );
    graph.surface_mut().clear_ops();
    assert!(graph.request_redraw());
    graph.run_pending_frame().expect("frame");
    assert_eq!(draws_on(graph.surface().ops(), Layer::Data), 2);
    assert_eq!(graph.surface().shapes_of("s", Layer::Data).len(), 2);
}

#[test]
fn hidden_series_redraw_to_nothing() {
    let mut graph = graph();
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "a", "values": [{"x": 1, "y": 5}]}),
    );
    assert!(graph.set_shown("a", false).expect("hide"));
    assert!(!graph.set_shown("a", false).expect("hide again"));
    graph.redraw().expect("redraw");
    assert!(graph.surface().shapes_of("a", Layer::Data).is_empty());
    assert!(!graph.context().shown().contains("a"));

    assert!(graph.set_shown("a", true).expect("show"));
    assert_eq!(graph.surface().shapes_of("a", Layer::Data).len(), 2);
}

#[test]
fn collaborators_hear_about_every_change() {
    let events = Rc::new(RefCell::new(Events::default()));
    let mut graph = graph()
        .with_legend(Box::new(RecordingLegend(Rc::clone(&events))))
        .with_label_shapes(Box::new(RecordingLabels(Rc::clone(&events))));
    load(
        &mut graph,
        ContentKind::Line,
        json!({"key": "a", "yAxis": "y2", "values": [{"x": 1, "y": 5}]}),
    );
    graph.set_shown("a", false).expect("hide");
    graph.unload("a").expect("unload");

    assert_eq!(
        events.borrow().0,
        vec![
            "register a",
            "label a Y2",
            "shown a false",
            "remove a",
            "unlabel a Y2",
        ]
    );
}

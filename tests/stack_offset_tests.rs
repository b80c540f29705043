use graphs_rs::Graph;
use graphs_rs::api::SeriesValues;
use graphs_rs::core::{AxisValue, ContentKind, Datapoint, DatapointInput, GroupMembership, compute_offsets};
use graphs_rs::render::RecordingSurface;
use serde_json::json;

const GRAPH: &str = r##"{
    "bindTo": "#stack",
    "axis": {
        "x": {"lowerLimit": 0, "upperLimit": 6, "ticks": {"values": [1, 2, 3, 4, 5]}},
        "y": {"lowerLimit": -20, "upperLimit": 40}
    }
}"##;

fn point(key: &str, x: f64, y: f64) -> Datapoint {
    Datapoint::new(AxisValue::Number(x), Some(y), key, "g")
}

fn bar_json(key: &str, values: &[(f64, f64)]) -> String {
    let values: Vec<_> = values.iter().map(|(x, y)| json!({"x": x, "y": y})).collect();
    json!({"key": key, "group": "g", "values": values}).to_string()
}

fn y0_of(graph: &Graph<RecordingSurface>, key: &str) -> Vec<f64> {
    graph
        .context()
        .stacked_values(key)
        .iter()
        .map(|point| point.y0)
        .collect()
}

#[test]
fn positives_and_negatives_stack_separately() {
    let a = vec![point("a", 1.0, 5.0)];
    let mut b = vec![point("b", 1.0, -3.0)];
    let mut c = vec![point("c", 1.0, 2.0)];

    compute_offsets(&mut b, &[a.as_slice()]);
    compute_offsets(&mut c, &[a.as_slice(), b.as_slice()]);

    assert_eq!(b[0].y0, 0.0);
    assert_eq!(c[0].y0, 5.0);
}

#[test]
fn negatives_accumulate_downwards() {
    let a = vec![point("a", 1.0, -4.0)];
    let mut b = vec![point("b", 1.0, -3.0), point("b", 2.0, -1.0)];
    compute_offsets(&mut b, &[a.as_slice()]);
    assert_eq!(b[0].y0, -4.0);
    assert_eq!(b[1].y0, 0.0);
}

#[test]
fn gaps_do_not_contribute_to_the_stack() {
    let a = vec![Datapoint::new(AxisValue::Number(1.0), None, "a", "g")];
    let mut b = vec![point("b", 1.0, 3.0)];
    compute_offsets(&mut b, &[a.as_slice()]);
    assert_eq!(b[0].y0, 0.0);
}

#[test]
fn membership_preceding_stops_at_the_key() {
    let mut membership = GroupMembership::default();
    membership.add("g", "a");
    membership.add("g", "b");
    membership.add("g", "c");
    assert_eq!(membership.preceding("b"), ["a".to_owned()]);
    assert!(membership.preceding("a").is_empty());

    assert_eq!(membership.remove("b"), Some("g".to_owned()));
    assert_eq!(membership.preceding("c"), ["a".to_owned()]);
}

#[test]
fn graph_stacks_by_load_order() {
    let mut graph = Graph::from_json(GRAPH, RecordingSurface::default()).expect("graph");
    graph
        .load_json(ContentKind::Bar, &bar_json("a", &[(1.0, 10.0)]))
        .expect("a");
    graph
        .load_json(ContentKind::Bar, &bar_json("b", &[(1.0, -5.0)]))
        .expect("b");
    graph
        .load_json(ContentKind::Bar, &bar_json("c", &[(1.0, 8.0)]))
        .expect("c");

    assert_eq!(y0_of(&graph, "a"), vec![0.0]);
    assert_eq!(y0_of(&graph, "b"), vec![0.0]);
    assert_eq!(y0_of(&graph, "c"), vec![10.0]);
}

#[test]
fn reflowing_an_earlier_series_moves_later_ones() {
    let mut graph = Graph::from_json(GRAPH, RecordingSurface::default()).expect("graph");
    graph
        .load_json(ContentKind::Bar, &bar_json("a", &[(1.0, 10.0)]))
        .expect("a");
    graph
        .load_json(ContentKind::Bar, &bar_json("b", &[(1.0, 4.0)]))
        .expect("b");

    let values = SeriesValues::Plain(vec![DatapointInput {
        x: json!(1),
        y: Some(3.0),
        label: None,
    }]);
    graph.reflow("a", &values).expect("reflow");
    assert_eq!(y0_of(&graph, "b"), vec![3.0]);
}

#[test]
fn hiding_a_series_removes_it_from_the_stack() {
    let mut graph = Graph::from_json(GRAPH, RecordingSurface::default()).expect("graph");
    graph
        .load_json(ContentKind::Bar, &bar_json("a", &[(1.0, 10.0)]))
        .expect("a");
    graph
        .load_json(ContentKind::Bar, &bar_json("b", &[(1.0, 4.0)]))
        .expect("b");

    assert!(graph.set_shown("a", false).expect("hide"));
    assert_eq!(y0_of(&graph, "b"), vec![0.0]);
    assert!(graph.set_shown("a", true).expect("show"));
    assert_eq!(y0_of(&graph, "b"), vec![10.0]);
}

#[test]
fn unloading_the_base_series_restacks_the_group() {
    let mut graph = Graph::from_json(GRAPH, RecordingSurface::default()).expect("graph");
    graph
        .load_json(ContentKind::Bar, &bar_json("a", &[(1.0, 10.0)]))
        .expect("a");
    graph
        .load_json(ContentKind::Bar, &bar_json("b", &[(1.0, 4.0)]))
        .expect("b");

    graph.unload("a").expect("unload");
    assert_eq!(y0_of(&graph, "b"), vec![0.0]);
    assert_eq!(graph.context().membership().members("g"), ["b".to_owned()]);
}

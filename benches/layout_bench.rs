use criterion::{Criterion, criterion_group, criterion_main};
use graphs_rs::Graph;
use graphs_rs::core::{
    AxisValue, ContentKind, Datapoint, Viewport, build_inner_scale, build_outer_scale,
    compute_bandwidth_padding_ratio, compute_offsets,
};
use graphs_rs::render::RecordingSurface;
use serde_json::json;
use std::hint::black_box;

fn bench_band_scale_500_ticks(c: &mut Criterion) {
    let ticks: Vec<AxisValue> = (0..500).map(|i| AxisValue::Number(f64::from(i))).collect();
    let groups: Vec<String> = (0..6).map(|g| format!("group-{g}")).collect();

    c.bench_function("band_scale_500_ticks", |b| {
        b.iter(|| {
            let ratio = compute_bandwidth_padding_ratio(groups.len());
            let outer = build_outer_scale(black_box(&ticks), (0.0, 1_600.0), ratio);
            let inner = build_inner_scale(groups.iter().map(String::as_str), outer.bandwidth());
            black_box((outer.band_start(AxisValue::Number(250.0)), inner.bandwidth()))
        })
    });
}

fn bench_stack_offsets_20_series(c: &mut Criterion) {
    let series: Vec<Vec<Datapoint>> = (0..20)
        .map(|s| {
            (0..500)
                .map(|i| {
                    let y = if (i + s) % 3 == 0 { -1.5 } else { 2.0 };
                    Datapoint::new(AxisValue::Number(f64::from(i)), Some(y), format!("s{s}"), "g")
                })
                .collect()
        })
        .collect();

    c.bench_function("stack_offsets_20_series", |b| {
        b.iter(|| {
            let mut last = series[19].clone();
            let preceding: Vec<&[Datapoint]> = series[..19].iter().map(Vec::as_slice).collect();
            compute_offsets(&mut last, black_box(&preceding));
            black_box(last)
        })
    });
}

fn bench_graph_resize_bars(c: &mut Criterion) {
    let ticks: Vec<i32> = (1..=100).collect();
    let config = json!({
        "bindTo": "#bench",
        "axis": {
            "x": {"lowerLimit": 0, "upperLimit": 101, "ticks": {"values": ticks}},
            "y": {"lowerLimit": 0, "upperLimit": 100}
        }
    });
    let mut graph =
        Graph::from_json(&config.to_string(), RecordingSurface::default()).expect("graph init");
    for s in 0..4 {
        let values: Vec<_> = ticks
            .iter()
            .map(|x| json!({"x": x, "y": f64::from((x * 7 + s) % 40)}))
            .collect();
        let series = json!({"key": format!("s{s}"), "group": format!("g{}", s % 2), "values": values});
        graph
            .load_json(ContentKind::Bar, &series.to_string())
            .expect("load bar");
    }

    let mut wide = false;
    c.bench_function("graph_resize_400_bars", |b| {
        b.iter(|| {
            wide = !wide;
            let width = if wide { 1_600 } else { 1_200 };
            graph
                .resize(black_box(Viewport::new(width, 600)))
                .expect("resize");
            graph.surface_mut().clear_ops();
        })
    });
}

criterion_group!(
    benches,
    bench_band_scale_500_ticks,
    bench_stack_offsets_20_series,
    bench_graph_resize_bars
);
criterion_main!(benches);

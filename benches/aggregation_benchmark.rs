use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gpx_heatmap::models::{HeatmapConfig, HeatmapData, RawPoint};
use gpx_heatmap::processors::{Grid, PointAggregator};
use gpx_heatmap::readers::TrackReader;
use gpx_heatmap::writers::GeoJsonWriter;
use std::path::Path;

// A wobbly out-and-back track sampled roughly every 3 meters
fn create_test_track(points: usize) -> Vec<RawPoint> {
    (0..points)
        .map(|i| {
            let t = (i % 2000) as f64;
            let lat = 47.0 + t * 0.00003 + (t * 0.1).sin() * 0.0002;
            let lon = 8.0 + t * 0.00002 + (t * 0.07).cos() * 0.0002;
            RawPoint::new(format!("{:.7}", lat), format!("{:.7}", lon))
        })
        .collect()
}

fn create_test_gpx(points: usize) -> String {
    let mut gpx = String::from("<gpx><trk><trkseg>\n");
    for p in create_test_track(points) {
        gpx.push_str(&format!(
            "<trkpt lat=\"{}\" lon=\"{}\"><ele>400.0</ele></trkpt>\n",
            p.latitude, p.longitude
        ));
    }
    gpx.push_str("</trkseg></trk></gpx>\n");
    gpx
}

fn benchmark_binning(c: &mut Criterion) {
    let grid = Grid::new(0.00015).unwrap();

    c.bench_function("grid_snap", |b| {
        b.iter(|| grid.snap(black_box(47.376912)));
    });
}

fn benchmark_aggregation(c: &mut Criterion) {
    let aggregator = PointAggregator::new(&HeatmapConfig::default()).unwrap();
    let mut group = c.benchmark_group("aggregation");

    for size in [1_000, 10_000, 100_000] {
        let track = create_test_track(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &track, |b, track| {
            b.iter(|| {
                let mut heatmap = HeatmapData::new();
                aggregator
                    .accept_points(
                        Path::new("bench.gpx"),
                        track.iter().cloned().map(Ok),
                        &mut heatmap,
                    )
                    .unwrap();
                black_box(heatmap.len())
            });
        });
    }

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let gpx = create_test_gpx(10_000);
    let reader = TrackReader::new();

    c.bench_function("scan_10k_trackpoints", |b| {
        b.iter(|| {
            reader
                .stream_from_reader(black_box(gpx.as_bytes()), Path::new("bench.gpx"))
                .count()
        });
    });
}

fn benchmark_writer(c: &mut Criterion) {
    let aggregator = PointAggregator::new(&HeatmapConfig {
        skip_distance: 0.0,
        ..HeatmapConfig::default()
    })
    .unwrap();
    let mut heatmap = HeatmapData::new();
    aggregator
        .accept_points(
            Path::new("bench.gpx"),
            create_test_track(50_000).into_iter().map(Ok),
            &mut heatmap,
        )
        .unwrap();
    let writer = GeoJsonWriter::new(aggregator.grid());

    c.bench_function("write_geojson", |b| {
        b.iter(|| {
            let (bytes, _) = writer
                .write_to(&heatmap, Vec::with_capacity(1 << 20))
                .unwrap();
            black_box(bytes.len())
        });
    });
}

criterion_group!(
    benches,
    benchmark_binning,
    benchmark_aggregation,
    benchmark_scan,
    benchmark_writer
);
criterion_main!(benches);

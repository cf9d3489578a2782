use gpx_heatmap::cli::generate;
use gpx_heatmap::models::{HeatmapConfig, InputSelection};
use gpx_heatmap::ProcessingError;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_gpx(path: &Path, points: &[(f64, f64)]) {
    let mut gpx = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<gpx version=\"1.1\">\n<trk><trkseg>\n",
    );
    for (i, (lat, lon)) in points.iter().enumerate() {
        gpx.push_str(&format!(
            "<trkpt lat=\"{:.7}\" lon=\"{:.7}\"><ele>400.0</ele><time>2021-05-01T08:{:02}:00Z</time></trkpt>\n",
            lat,
            lon,
            i % 60
        ));
    }
    gpx.push_str("</trkseg></trk>\n</gpx>\n");
    fs::write(path, gpx).unwrap();
}

struct Workspace {
    dir: TempDir,
    config: HeatmapConfig,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("gpx")).unwrap();
        let config = HeatmapConfig {
            output: dir.path().join("heatmap.geojson"),
            quiet: true,
            ..HeatmapConfig::default()
        };
        Self { dir, config }
    }

    fn track(&self, name: &str, points: &[(f64, f64)]) -> PathBuf {
        let path = self.dir.path().join("gpx").join(name);
        write_gpx(&path, points);
        path
    }

    fn input(&self) -> InputSelection {
        InputSelection {
            directories: vec![self.dir.path().join("gpx")],
            ..InputSelection::default()
        }
    }

    fn output(&self) -> Value {
        let text = fs::read_to_string(&self.config.output).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

fn counts(doc: &Value) -> Vec<u64> {
    doc["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["properties"]["count"].as_u64().unwrap())
        .collect()
}

#[test]
fn test_points_five_meters_apart_keep_first() {
    let ws = Workspace::new();
    // 0.000045 deg of latitude is ~5m
    ws.track("walk.gpx", &[(47.3769, 8.54175), (47.376945, 8.54175)]);

    let stats = generate(&ws.config, &ws.input(), io::empty()).unwrap();

    assert_eq!(stats.trackpoints_read, 2);
    assert_eq!(stats.distinct_locations, 1);
    assert_eq!(
        ws.output(),
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"count": 1},
                "geometry": {"type": "MultiPoint", "coordinates": [[8.54175, 47.3769]]}
            }]
        })
    );
}

#[test]
fn test_identical_trackpoints_collapse() {
    let ws = Workspace::new();
    let p = (51.5074, -0.1278);
    ws.track("still.gpx", &[p, p, p]);

    let stats = generate(&ws.config, &ws.input(), io::empty()).unwrap();

    assert_eq!(stats.trackpoints_read, 3);
    assert_eq!(stats.distinct_locations, 1);
    assert_eq!(stats.weighted_count, 1);
    assert_eq!(counts(&ws.output()), vec![1]);
}

#[test]
fn test_revisits_saturate_at_max_val() {
    let mut ws = Workspace::new();
    ws.config.max_val = 2;
    let a = (47.0, 8.0);
    let b = (47.01, 8.01);
    ws.track("laps.gpx", &[a, b, a, b, a]);

    let stats = generate(&ws.config, &ws.input(), io::empty()).unwrap();

    assert_eq!(stats.distinct_locations, 2);
    assert_eq!(stats.weighted_count, 4);

    let doc = ws.output();
    assert_eq!(counts(&doc), vec![2]);
    assert_eq!(
        doc["features"][0]["geometry"]["coordinates"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_empty_directory_is_discovery_error() {
    let ws = Workspace::new();

    let err = generate(&ws.config, &ws.input(), io::empty()).unwrap_err();

    assert!(matches!(err, ProcessingError::Discovery(_)));
    assert!(!ws.config.output.exists());
}

#[test]
fn test_counts_one_and_two_in_ascending_order() {
    let ws = Workspace::new();
    let home = (46.9480, 7.4474);
    let office = (46.9510, 7.4386);
    ws.track("monday.gpx", &[home, office]);
    ws.track("tuesday.gpx", &[office]);

    generate(&ws.config, &ws.input(), io::empty()).unwrap();

    let doc = ws.output();
    assert_eq!(counts(&doc), vec![1, 2]);
    assert_eq!(
        doc["features"][0]["geometry"]["coordinates"],
        json!([[7.44735, 46.94805]])
    );
    assert_eq!(
        doc["features"][1]["geometry"]["coordinates"],
        json!([[7.43865, 46.95105]])
    );
}

#[test]
fn test_features_strictly_ascending_and_bounded() {
    let mut ws = Workspace::new();
    ws.config.max_val = 4;

    // Ten laps over a loop of 12 well separated points, partial on some files
    for lap in 0..10 {
        let points: Vec<(f64, f64)> = (0..(3 + lap))
            .map(|i| {
                let angle = (i % 12) as f64 * std::f64::consts::PI / 6.0;
                (45.0 + 0.01 * angle.sin(), 9.0 + 0.01 * angle.cos())
            })
            .collect();
        ws.track(&format!("lap{:02}.gpx", lap), &points);
    }

    generate(&ws.config, &ws.input(), io::empty()).unwrap();

    let found = counts(&ws.output());
    assert!(!found.is_empty());
    assert!(found.windows(2).all(|w| w[0] < w[1]), "{:?}", found);
    assert!(found.iter().all(|&c| (1..=4).contains(&c)), "{:?}", found);
}

#[test]
fn test_coordinates_written_with_grid_precision() {
    let mut ws = Workspace::new();
    ws.config.bin_size = 0.001;
    ws.track("coarse.gpx", &[(47.37691, 8.54174)]);

    generate(&ws.config, &ws.input(), io::empty()).unwrap();

    let text = fs::read_to_string(&ws.config.output).unwrap();
    assert!(text.contains("[[8.5420,47.3770]]"), "{}", text);
}

#[test]
fn test_filenames_from_stdin() {
    let mut ws = Workspace::new();
    let elsewhere = ws.dir.path().join("elsewhere.track");
    write_gpx(&elsewhere, &[(10.0, 20.0)]);
    let stdin = Cursor::new(format!("{}\n", elsewhere.display()));

    let mut input = ws.input();
    input.read_stdin = true;
    ws.config.skip_distance = 0.0;
    let stats = generate(&ws.config, &input, stdin).unwrap();

    assert_eq!(stats.files_read, 1);
    assert_eq!(counts(&ws.output()), vec![1]);
}

#[test]
fn test_missing_stdin_file_names_path() {
    let ws = Workspace::new();
    let mut input = ws.input();
    input.read_stdin = true;

    let err = generate(&ws.config, &input, Cursor::new("nowhere/ride.gpx\n")).unwrap_err();

    assert!(err.to_string().contains("nowhere/ride.gpx"), "{}", err);
    assert!(!ws.config.output.exists());
}

#[test]
fn test_existing_output_is_replaced() {
    let ws = Workspace::new();
    fs::write(&ws.config.output, "stale").unwrap();
    ws.track("ride.gpx", &[(1.0, 1.0)]);

    generate(&ws.config, &ws.input(), io::empty()).unwrap();

    assert_eq!(counts(&ws.output()), vec![1]);
}

/// Track file conventions
pub const DEFAULT_GPX_DIR: &str = "gpx";
pub const DEFAULT_GPX_FILTER: &str = "*.gpx";
pub const TRACKPOINT_MARKER: &str = "<trkpt";

/// Output defaults
pub const DEFAULT_OUTPUT_FILE: &str = "heatmap.geojson";

/// Compression defaults
pub const DEFAULT_SKIP_DISTANCE_M: f64 = 10.0;
pub const DEFAULT_MAX_VAL: u32 = 20;
pub const DEFAULT_BIN_SIZE_DEG: f64 = 0.00015;

/// Beyond this many decimals an f64 degree value no longer holds the grid exactly
pub const MAX_DECIMAL_PRECISION: u32 = 15;

/// Mean earth radius used by the great-circle formula
pub const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// I/O
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Environment variable prefix for configuration overrides (HEATMAP_BIN_SIZE, ...)
pub const ENV_PREFIX: &str = "HEATMAP";

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DEFAULT_BIN_SIZE_DEG, DEFAULT_GPX_DIR, DEFAULT_GPX_FILTER, DEFAULT_MAX_VAL,
    DEFAULT_OUTPUT_FILE, DEFAULT_SKIP_DISTANCE_M, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Immutable parameters of one heatmap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Minimum movement in meters before another trackpoint is accepted
    #[validate(range(min = 0.0))]
    pub skip_distance: f64,

    /// Ceiling of the per-cell visit counter
    #[validate(range(min = 1))]
    pub max_val: u32,

    /// Grid cell size in degrees
    #[validate(range(exclusive_min = 0.0))]
    pub bin_size: f64,

    pub output: PathBuf,

    pub quiet: bool,

    /// Warn and skip malformed trackpoint lines instead of aborting
    pub skip_malformed: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            skip_distance: DEFAULT_SKIP_DISTANCE_M,
            max_val: DEFAULT_MAX_VAL,
            bin_size: DEFAULT_BIN_SIZE_DEG,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            quiet: false,
            skip_malformed: false,
        }
    }
}

/// Values given explicitly on the command line. `None`/`false` leaves the
/// lower configuration layers in charge.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub skip_distance: Option<f64>,
    pub max_val: Option<u32>,
    pub bin_size: Option<f64>,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub skip_malformed: bool,
}

impl HeatmapConfig {
    /// Build the run configuration from defaults, an optional config file,
    /// `HEATMAP_*` environment variables and command-line overrides, in
    /// increasing order of priority.
    pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("skip_distance", DEFAULT_SKIP_DISTANCE_M)?
            .set_default("max_val", i64::from(DEFAULT_MAX_VAL))?
            .set_default("bin_size", DEFAULT_BIN_SIZE_DEG)?
            .set_default("output", DEFAULT_OUTPUT_FILE)?
            .set_default("quiet", false)?
            .set_default("skip_malformed", false)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("skip_distance", overrides.skip_distance)?
            .set_override_option("max_val", overrides.max_val.map(i64::from))?
            .set_override_option("bin_size", overrides.bin_size)?
            .set_override_option(
                "output",
                overrides
                    .output
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("quiet", overrides.quiet.then_some(true))?
            .set_override_option("skip_malformed", overrides.skip_malformed.then_some(true))?
            .build()?;

        config.try_deserialize::<HeatmapConfig>()?.validated()
    }

    /// Reject values the pipeline cannot work with.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;

        // range() lets NaN through
        if !self.bin_size.is_finite() {
            return Err(ProcessingError::Config(format!(
                "bin size must be a finite number of degrees, got {}",
                self.bin_size
            )));
        }
        if !self.skip_distance.is_finite() {
            return Err(ProcessingError::Config(format!(
                "skip distance must be a finite number of meters, got {}",
                self.skip_distance
            )));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ProcessingError::Config(
                "output path must not be empty".to_string(),
            ));
        }

        Ok(self)
    }
}

/// Where to look for track files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    pub directories: Vec<PathBuf>,
    pub filters: Vec<String>,
    pub read_stdin: bool,
}

impl Default for InputSelection {
    fn default() -> Self {
        Self {
            directories: vec![PathBuf::from(DEFAULT_GPX_DIR)],
            filters: vec![DEFAULT_GPX_FILTER.to_string()],
            read_stdin: false,
        }
    }
}

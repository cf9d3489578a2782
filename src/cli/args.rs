use crate::models::{ConfigOverrides, InputSelection};
use crate::utils::constants::{DEFAULT_GPX_DIR, DEFAULT_GPX_FILTER};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gpx-heatmap")]
#[command(about = "Generate a local heatmap GeoJSON from GPX files")]
#[command(after_help = "Settings can also come from --config FILE or HEATMAP_* environment variables")]
#[command(version)]
pub struct Cli {
    #[arg(
        long = "gpx-dir",
        value_name = "DIR",
        default_value = DEFAULT_GPX_DIR,
        help = "Directory containing the GPX files (repeatable)"
    )]
    pub gpx_dirs: Vec<PathBuf>,

    #[arg(
        long = "gpx-filters",
        value_name = "FILTERS",
        default_value = DEFAULT_GPX_FILTER,
        help = "Glob filter(s) for the GPX files (repeatable)"
    )]
    pub gpx_filters: Vec<String>,

    #[arg(long, help = "Also read GPX filenames from standard input, one per line")]
    pub stdin: bool,

    #[arg(
        long,
        value_name = "N",
        help = "Compression: only keep points that moved this many meters [default: 10]"
    )]
    pub skip_distance: Option<f64>,

    #[arg(long, value_name = "N", help = "Maximum value for a heatmap point [default: 20]")]
    pub max_val: Option<u32>,

    #[arg(
        long,
        value_name = "N",
        help = "Compression: put each point into a bin of this size in degrees [default: 0.00015]"
    )]
    pub bin_size: Option<f64>,

    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Output GeoJSON file [default: heatmap.geojson]"
    )]
    pub output: Option<PathBuf>,

    #[arg(short, long, help = "Quiet output")]
    pub quiet: bool,

    #[arg(long, help = "Warn about and skip malformed trackpoints instead of failing")]
    pub skip_malformed: bool,

    #[arg(long, value_name = "FILE", help = "Configuration file (toml, json or yaml)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, value_name = "FILE", help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn input_selection(&self) -> InputSelection {
        InputSelection {
            directories: self.gpx_dirs.clone(),
            filters: self.gpx_filters.clone(),
            read_stdin: self.stdin,
        }
    }

    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            skip_distance: self.skip_distance,
            max_val: self.max_val,
            bin_size: self.bin_size,
            output: self.output.clone(),
            quiet: self.quiet,
            skip_malformed: self.skip_malformed,
        }
    }
}

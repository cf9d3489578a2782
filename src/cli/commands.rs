use crate::cli::args::Cli;
use crate::error::{ProcessingError, Result};
use crate::models::{HeatmapConfig, HeatmapData, InputSelection, RunStatistics};
use crate::processors::PointAggregator;
use crate::readers::{FileDiscovery, TrackReader};
use crate::utils::progress::ProgressReporter;
use crate::writers::GeoJsonWriter;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, Level};

pub fn run(cli: Cli) -> Result<RunStatistics> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = HeatmapConfig::load(cli.config.as_deref(), &cli.config_overrides())?;
    debug!(?config, "loaded configuration");

    let input = cli.input_selection();
    let stdin = io::stdin();
    generate(&config, &input, stdin.lock())
}

/// Discover track files, fold them into a heatmap and write the GeoJSON.
///
/// Configuration problems surface before any file is opened, and nothing is
/// written when no input file is found.
pub fn generate<R: BufRead>(
    config: &HeatmapConfig,
    input: &InputSelection,
    stdin: R,
) -> Result<RunStatistics> {
    let aggregator = PointAggregator::new(config)?;
    let files = FileDiscovery::new(input).discover(stdin)?;

    let progress = ProgressReporter::new(files.len() as u64, "Reading track files...", config.quiet);
    let reader = TrackReader::new();
    let mut heatmap = HeatmapData::new();
    let mut trackpoints_read = 0u64;

    for file in &files {
        progress.println(&format!("reading {}", file.display()));
        trackpoints_read += aggregator.accept_file(&reader, file, &mut heatmap)?;
        progress.increment(1);
    }
    progress.finish_with_message(&format!("Read {} files", files.len()));

    let stats = RunStatistics::new(files.len(), trackpoints_read, &heatmap);
    info!(
        files = stats.files_read,
        trackpoints = stats.trackpoints_read,
        weighted = stats.weighted_count,
        locations = stats.distinct_locations,
        "aggregation complete"
    );
    if !config.quiet {
        println!("{}", stats.summary());
    }

    let writer = GeoJsonWriter::new(aggregator.grid());
    writer.write_heatmap(&heatmap, &config.output)?;

    if !config.quiet {
        println!("saved {}", config.output.display());
    }

    Ok(stats)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| ProcessingError::Output {
                path: path.to_path_buf(),
                source,
            })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
    Ok(())
}

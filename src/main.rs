use anyhow::Context;
use clap::Parser;
use gpx_heatmap::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("heatmap generation failed")?;
    Ok(())
}

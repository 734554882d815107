//! aeroperf - Aircraft Performance Monitoring CLI
//!
//! Batch analysis of maintenance-event impact on fleet fuel performance.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a series + event log with the local aeroperf.toml
//! aeroperf --series data/perf.txt --events data/events.csv
//!
//! # Explicit config and output directory
//! aeroperf --series perf.txt --events events.csv \
//!     --config settings.toml --out-dir reports/
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aeroperf::config::AnalysisConfig;
use aeroperf::pipeline;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "aeroperf")]
#[command(about = "Aircraft performance maintenance-impact analysis")]
#[command(version)]
struct CliArgs {
    /// Path to the time-series table (delimited text)
    #[arg(long)]
    series: PathBuf,

    /// Path to the maintenance event table (delimited text)
    #[arg(long)]
    events: PathBuf,

    /// Path to the settings file (.toml or legacy .json).
    /// Falls back to ./aeroperf.toml, then built-in defaults.
    #[arg(long, env = "AEROPERF_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the exported output tables
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();

    let config = AnalysisConfig::load(args.config.as_deref())
        .context("failed to load analysis configuration")?;

    let output = pipeline::run(&args.series, &args.events, &config)
        .context("analysis pipeline failed")?;

    pipeline::export(&output, &args.out_dir).context("failed to export output tables")?;

    info!(
        metric = %output.metric,
        intervals = output.intervals.len(),
        valid_intervals = output.summary.valid_intervals,
        type_rates = output.type_rates.len(),
        projected_impacts = output.impacts.len(),
        scheduled_actions = output.schedule.len(),
        out_dir = %args.out_dir.display(),
        "Run complete"
    );
    Ok(())
}

//! Production-Time Report Utility
//!
//! Reads a project, folder or workspace snapshot (JSON) and prints its
//! production-time totals.
//!
//! **Usage:**
//! ```bash
//! prodtime-report snapshot.json [--format table|json] [--tiers]
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use prodtime_api::logging::init_tracing;
use prodtime_api::report::{render, OutputFormat};
use prodtime_common::config::TomlConfig;
use prodtime_common::tree::Snapshot;
use std::path::PathBuf;
use tracing::debug;

/// Production-time report utility
#[derive(Parser, Debug)]
#[clap(name = "prodtime-report")]
#[clap(about = "Print production-time totals for a project, folder or workspace snapshot")]
struct Args {
    /// Snapshot file (JSON with "kind": "project" | "folder" | "workspace")
    #[clap(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// Output format
    #[clap(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Append a breakdown of time by quality tier
    #[clap(long)]
    tiers: bool,

    /// Configuration file (only the [logging] section is used)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_source) = TomlConfig::load_with_source(args.config.as_deref());
    init_tracing(&config.logging)?;
    config_source.log();

    let snapshot = Snapshot::from_path(&args.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", args.snapshot.display()))?;
    debug!("Loaded snapshot from {}", args.snapshot.display());

    let report = prodtime_common::aggregate(&snapshot).context("Failed to aggregate snapshot")?;
    print!("{}", render(&report, args.format, args.tiers)?);

    Ok(())
}

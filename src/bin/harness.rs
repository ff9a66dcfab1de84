//! Differential test-and-bench harness entry point: loads a config file
//! (optionally overridden by flags), runs every enabled backend against the
//! scalar baseline over a fixed corpus plus fuzzed pairs, and reports the
//! result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tapedist::harness::config::HarnessConfig;
use tapedist::harness::Harness;
use tracing_subscriber::EnvFilter;

/// Differential harness for the tapedist batch kernels.
#[derive(Parser, Debug)]
#[command(name = "tapedist-harness", version, about)]
struct Args {
    /// TOML config file; see `HarnessConfig` for the schema.
    #[arg(long)]
    config: PathBuf,

    /// Overrides `dataset_path` from the config file.
    #[arg(long)]
    dataset_path: Option<PathBuf>,

    /// Overrides `stress_enabled` from the config file.
    #[arg(long)]
    stress: bool,

    /// Overrides `filter` from the config file.
    #[arg(long)]
    filter: Option<String>,

    /// Overrides `seed` from the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {:?}", args.config))?;
    let mut config = HarnessConfig::from_toml_str(&text)
        .with_context(|| format!("parsing config {:?}", args.config))?;

    if let Some(path) = args.dataset_path {
        config.dataset_path = path;
    }
    if args.stress {
        config.stress_enabled = true;
    }
    if let Some(filter) = args.filter {
        config.filter = Some(filter);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let report = Harness::new(config).run()?;
    println!(
        "checked {} pairs, {} differential failures",
        report.pairs_checked, report.failures
    );

    if report.failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

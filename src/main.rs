//! Taric-Harvest main entry point
//!
//! This is the command-line interface for the Taric-Harvest catalog enumerator.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use taric_harvest::config::{load_config_with_hash, validate, Config};
use taric_harvest::output::{print_statistics, write_csv_file};
use taric_harvest::Harvester;
use tracing_subscriber::EnvFilter;

/// Taric-Harvest: declarable commodity code enumerator
///
/// Walks every chapter of the UK Trade Tariff API, collects each declarable
/// commodity code, and writes them to a CSV file sorted by code.
#[derive(Parser, Debug)]
#[command(name = "taric-harvest")]
#[command(version)]
#[command(about = "Enumerates declarable tariff codes into a CSV file", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Number of concurrent chapter workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Base URL of the tariff API
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Print run statistics after the harvest
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Validate config and fetch the chapter list without traversing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_harvest(&config, cli.stats).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("taric_harvest=info,warn"),
            1 => EnvFilter::new("taric_harvest=debug,info"),
            2 => EnvFilter::new("taric_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers.count = workers;
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if cli.no_progress || cli.quiet {
        config.progress.enabled = false;
    }
}

/// Handles the --dry-run mode: shows the effective settings and the chapter count
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Taric-Harvest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Accept: {}", config.api.accept);
    println!("  Timeout: {}s", config.api.timeout_secs);

    println!("\nRequests:");
    println!("  Interval: {}ms", config.requests.interval_ms);
    println!("  Max attempts: {}", config.requests.max_attempts);
    println!("  Backoff base: {}ms", config.requests.backoff_base_ms);

    println!("\nWorkers: {}", config.workers.count);
    println!("Output: {}", config.output.path);

    let harvester = Harvester::from_config(config)?;
    let chapters = harvester.list_chapters().await?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would traverse {} chapters", chapters.len());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, show_stats: bool) -> anyhow::Result<()> {
    let harvester = Harvester::from_config(config)?;

    let report = match harvester.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    let output_path = Path::new(&config.output.path);
    write_csv_file(output_path, &report.entries)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    if show_stats {
        print_statistics(&report);
    }

    println!("Found {} unique codes.", report.unique_count());
    if report.is_partial() {
        println!(
            "Warning: {} nodes failed; the output may be incomplete.",
            report.failed_nodes
        );
    }
    println!("Results saved to: {}", output_path.display());

    Ok(())
}

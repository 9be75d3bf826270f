//! Listing-Scout main entry point
//!
//! This is the command-line interface for the Listing-Scout harvester.

use anyhow::Context;
use clap::Parser;
use listing_scout::config::{load_config_with_hash, Config, ConfigOverrides};
use listing_scout::crawler::{harvest_with, Coordinator};
use listing_scout::output::{ConsoleSink, RowSink, SheetsSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing-Scout: a listing sheet harvester
///
/// Crawls each listing URL and its detail page, extracts price, layout,
/// community plan, transit and amenity fields, and appends one row per
/// listing to a Google Sheets worksheet.
#[derive(Parser, Debug)]
#[command(name = "listing-scout")]
#[command(version)]
#[command(about = "Harvest listing pages into a spreadsheet", long_about = None)]
struct Cli {
    /// Listing URLs to harvest (query strings are ignored)
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Worksheet name, overriding the configuration
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Pause between worker launches in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Print rows to stdout instead of writing the spreadsheet
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Harvest failed: {:#}", e);
            Err(e)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so dry-run rows on stdout stay clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_scout=info,warn"),
            1 => EnvFilter::new("listing_scout=debug,info"),
            2 => EnvFilter::new("listing_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        launch_delay_ms: cli.delay_ms,
        sheet_name: cli.sheet.clone(),
    };

    let (config, config_hash) = load_config_with_hash(cli.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using built-in configuration defaults"),
    }

    let coordinator = Coordinator::new(&config).context("Failed to build HTTP client")?;

    if cli.dry_run {
        tracing::info!("Dry run: rows go to stdout");
        return handle_harvest(&coordinator, &config, &ConsoleSink::new(), &cli.urls).await;
    }

    let credentials = config
        .sheet
        .credentials()
        .context("Spreadsheet credentials are not configured")?;
    tracing::info!(
        "Writing to spreadsheet {} sheet '{}'",
        credentials.spreadsheet_id,
        config.sheet.sheet_name
    );

    let sink = SheetsSink::new(&config.sheet, credentials).context("Failed to set up Sheets sink")?;
    handle_harvest(&coordinator, &config, &sink, &cli.urls).await
}

/// Handles the main harvest operation against `sink`
async fn handle_harvest(
    coordinator: &Coordinator,
    config: &Config,
    sink: &dyn RowSink,
    urls: &[String],
) -> anyhow::Result<()> {
    tracing::info!("Harvesting {} listing urls", urls.len());

    let report = harvest_with(coordinator, config, sink, urls).await?;

    tracing::info!(
        "Harvest completed: header {:?}, {} rows written",
        report.header,
        report.rows_written
    );

    Ok(())
}

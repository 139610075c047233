//! Jobspider main entry point
//!
//! Command-line interface for the job-listing crawler.

use clap::Parser;
use jobspider::config::{load_config_with_hash, validate, Config};
use jobspider::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Jobspider: a job-listing crawler with resilient storage
///
/// Jobspider walks the category menu of a recruiting site in a headless
/// browser, extracts job listings, and persists them to SQLite with a CSV
/// fallback.
#[derive(Parser, Debug)]
#[command(name = "jobspider")]
#[command(version = "1.0.0")]
#[command(about = "A job-listing crawler with resilient storage", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply without one)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the database, CSV files and progress file
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Browser driver type
    #[arg(long, value_name = "TYPE")]
    driver_type: Option<String>,

    /// Run the browser without a visible window
    #[arg(long)]
    headless: bool,

    /// Resume from the saved progress index (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start from the first category, ignoring saved progress
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    // Apply command-line overrides
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.display().to_string();
    }
    if let Some(driver_type) = &cli.driver_type {
        config.browser.driver_type = driver_type.clone();
    }
    if cli.headless {
        config.browser.headless = true;
    }
    validate(&config)?;

    let output_dir = PathBuf::from(&config.output.directory);
    let resume = !cli.fresh;

    tracing::info!(
        "Starting crawl (output: {}, backend preference: {}, resume: {})",
        output_dir.display(),
        config.storage.backend.as_str(),
        resume
    );

    match run_crawl(&config, &output_dir, resume) {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {} categories attempted ({} failed), {} records written",
                summary.categories_attempted,
                summary.categories_failed,
                summary.records_written
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobspider=info,warn"),
            1 => EnvFilter::new("jobspider=debug,info"),
            2 => EnvFilter::new("jobspider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

//! Agency Insights - analytics CLI for a vehicle agency
//!
//! Loads a dataset snapshot of vehicles, clients and orders, runs the
//! selected queries and writes a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, unreadable dataset or config, etc.)

mod cli;
mod config;

use agency_insights::report::{self, Query};
use agency_insights::Dataset;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Agency Insights v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .agency-insights.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so that a report printed to stdout stays clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, run the selected queries and emit the report.
fn run(args: &Args) -> Result<()> {
    let data_path = args
        .data
        .as_deref()
        .context("A dataset file is required (--data)")?;

    let mut config = load_config(args, data_path)?;
    config.merge_with_args(args);

    let dataset = Dataset::load(data_path)?;
    let summary = dataset.summary();
    if summary.dangling_orders > 0 {
        warn!(
            "{} of {} orders reference an unknown client or vehicle and will be ignored",
            summary.dangling_orders, summary.orders
        );
    }

    let params = config.params();
    let queries: Vec<Query> = config.queries.run.clone();
    info!(
        "Running {} queries (top clients: {}, min average: {}, top vehicles: {})",
        Query::expand(&queries).len(),
        params.top_clients,
        params.min_average,
        params.top_vehicles
    );

    let report = report::build_report(
        &data_path.display().to_string(),
        &dataset,
        summary,
        &params,
        &queries,
    );

    let output = match config.general.format {
        OutputFormat::Json => {
            report::generate_json_report(&report).context("Failed to serialize report")?
        }
        OutputFormat::Markdown => report::generate_markdown_report(
            &report,
            &config.report.title,
            config.report.include_metadata,
        ),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Load configuration from an explicit path, next to the dataset, from the
/// current directory, or fall back to defaults.
///
/// A config file that exists but can't be parsed is always an error.
fn load_config(args: &Args, data_path: &Path) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::discover(data_path)? {
        Some((config, path)) => {
            info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

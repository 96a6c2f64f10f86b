//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use agency_insights::report::Query;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Agency Insights - analytics over an agency's vehicles, clients and orders
///
/// Loads a JSON or TOML dataset snapshot and reports sorted vehicle lists,
/// makes and body types, top-spending clients and most ordered vehicles.
///
/// Examples:
///   agency-insights --data agency.json
///   agency-insights --data agency.toml --query top-clients,most-ordered --top-clients 3
///   agency-insights --data agency.json --format json --output report.json
///   agency-insights --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset file to analyze (.json or .toml)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "AGENCY_INSIGHTS_DATA",
        required_unless_present = "init_config"
    )]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .agency-insights.toml next to the dataset,
    /// then in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Queries to run (comma-separated)
    ///
    /// Example: --query top-clients,most-ordered
    #[arg(short = 'q', long, value_name = "QUERIES", value_delimiter = ',')]
    pub query: Option<Vec<Query>>,

    /// Number of clients in the top-spend ranking
    #[arg(long, value_name = "COUNT")]
    pub top_clients: Option<usize>,

    /// Minimum average order price for the average-clients query
    #[arg(long, value_name = "PRICE", allow_negative_numbers = true)]
    pub min_average: Option<i64>,

    /// Number of vehicles in the most-ordered ranking
    #[arg(long, value_name = "COUNT")]
    pub top_vehicles: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(long)]
    pub quiet: bool,

    /// Generate a default .agency-insights.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let Some(ref data) = self.data else {
            return Err("A dataset file is required (--data)".to_string());
        };

        if !data.exists() {
            return Err(format!("Dataset file does not exist: {}", data.display()));
        }
        if data.is_dir() {
            return Err(format!("Dataset path is a directory: {}", data.display()));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            config: None,
            output: None,
            format: None,
            query: None,
            top_clients: None,
            min_average: None,
            top_vehicles: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_query_list() {
        let args = Args::try_parse_from([
            "agency-insights",
            "--data",
            "agency.json",
            "--query",
            "top-clients,sort-by-odometer",
            "--min-average",
            "-5",
        ])
        .unwrap();

        assert_eq!(
            args.query,
            Some(vec![Query::TopClients, Query::SortByOdometer])
        );
        assert_eq!(args.min_average, Some(-5));
    }

    #[test]
    fn test_data_required_unless_init_config() {
        assert!(Args::try_parse_from(["agency-insights", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_dataset() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("/nonexistent/agency.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_directory_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = make_args();
        args.data = Some(dir.path().to_path_buf());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

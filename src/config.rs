//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.agency-insights.toml` files.

use crate::cli::{Args, OutputFormat};
use agency_insights::report::{Query, QueryParams};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up by default.
pub const CONFIG_FILE_NAME: &str = ".agency-insights.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Query settings.
    #[serde(default)]
    pub queries: QueryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Query parameters and selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Size of the top-spend client ranking.
    #[serde(default = "default_top_count")]
    pub top_clients: usize,

    /// Threshold for the average order price filter.
    #[serde(default)]
    pub min_average: i64,

    /// Size of the most-ordered vehicle ranking.
    #[serde(default = "default_top_count")]
    pub top_vehicles: usize,

    /// Queries to run.
    #[serde(default = "default_run")]
    pub run: Vec<Query>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_clients: default_top_count(),
            min_average: 0,
            top_vehicles: default_top_count(),
            run: default_run(),
        }
    }
}

fn default_top_count() -> usize {
    5
}

fn default_run() -> Vec<Query> {
    vec![Query::All]
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Top-level heading of the Markdown report.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the metadata section.
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_metadata: true,
        }
    }
}

fn default_title() -> String {
    "Agency Insights Report".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Directories searched for a config file: the dataset's own directory,
    /// then the current one. A bare file name resolves to the current
    /// directory, so it is searched only once.
    pub fn search_dirs(data_path: &Path) -> Vec<PathBuf> {
        let current = PathBuf::from(".");
        let data_dir = data_path
            .parent()
            .filter(|d| !d.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.clone());

        let mut dirs = vec![data_dir];
        if dirs[0] != current {
            dirs.push(current);
        }
        dirs
    }

    /// Load the first config file found in [`Config::search_dirs`].
    ///
    /// Returns `Ok(None)` if none exists, `Err` if one exists but can't be parsed.
    pub fn discover(data_path: &Path) -> Result<Option<(Self, PathBuf)>> {
        for dir in Self::search_dirs(data_path) {
            if let Some(config) = Self::load_from_dir(&dir)? {
                return Ok(Some((config, dir.join(CONFIG_FILE_NAME))));
            }
        }
        Ok(None)
    }

    /// Try to load configuration from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only arguments given explicitly on the command line override the file.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(ref queries) = args.query {
            self.queries.run = queries.clone();
        }
        if let Some(top_clients) = args.top_clients {
            self.queries.top_clients = top_clients;
        }
        if let Some(min_average) = args.min_average {
            self.queries.min_average = min_average;
        }
        if let Some(top_vehicles) = args.top_vehicles {
            self.queries.top_vehicles = top_vehicles;
        }
    }

    /// Query parameters derived from the `[queries]` section.
    pub fn params(&self) -> QueryParams {
        QueryParams {
            top_clients: self.queries.top_clients,
            min_average: self.queries.min_average,
            top_vehicles: self.queries.top_vehicles,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.queries.top_clients, 5);
        assert_eq!(config.queries.run, vec![Query::All]);
        assert!(config.report.include_metadata);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "json"

[queries]
top_clients = 3
min_average = 1500
run = ["top-clients", "average-clients"]

[report]
title = "Weekly Sales"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.queries.top_clients, 3);
        assert_eq!(config.queries.min_average, 1500);
        assert_eq!(config.queries.top_vehicles, 5);
        assert_eq!(
            config.queries.run,
            vec![Query::TopClients, Query::AverageClients]
        );
        assert_eq!(config.report.title, "Weekly Sales");
        assert!(config.report.include_metadata);
    }

    #[test]
    fn test_merge_with_args_only_overrides_given_values() {
        let mut config = Config::default();
        config.queries.top_vehicles = 8;

        let args = Args::try_parse_from([
            "agency-insights",
            "--data",
            "agency.json",
            "--format",
            "json",
            "--top-clients",
            "2",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.params().top_clients, 2);
        assert_eq!(config.params().top_vehicles, 8);
        assert_eq!(config.queries.run, vec![Query::All]);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[queries]\ntop_vehicles = 1\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.queries.top_vehicles, 1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[queries]\nrun = [\"nope\"]\n")
            .unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_search_dirs_bare_and_dotted_names_match() {
        let bare = Config::search_dirs(Path::new("agency.json"));
        let dotted = Config::search_dirs(Path::new("./agency.json"));

        assert_eq!(bare, vec![PathBuf::from(".")]);
        assert_eq!(bare, dotted);
        assert_eq!(
            Config::search_dirs(Path::new("data/agency.json")),
            vec![PathBuf::from("data"), PathBuf::from(".")]
        );
    }

    #[test]
    fn test_discover_next_to_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[queries]
top_clients = 9
",
        )
        .unwrap();

        let (config, path) = Config::discover(&dir.path().join("agency.json"))
            .unwrap()
            .unwrap();
        assert_eq!(config.queries.top_clients, 9);
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[queries
").unwrap();

        assert!(Config::discover(&dir.path().join("agency.json")).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[queries]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.queries.run, vec![Query::All]);
    }
}

//! Error types for agency-insights.

use std::path::PathBuf;
use thiserror::Error;

/// An unrecognized body-type name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown body type: {0}")]
pub struct ParseBodyTypeError(pub String);

/// Errors raised while loading a dataset snapshot.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON dataset {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML dataset {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported dataset format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

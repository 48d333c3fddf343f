//! Error types for dataset loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or decoding the dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The HTTP request failed or returned an error status.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Reading the response body or a local file failed.
    #[error("cannot read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid JSON.
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but the top level is not an array of records.
    #[error("dataset must be a JSON array, got {0}")]
    NotAnArray(&'static str),
}

/// Errors that can occur while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

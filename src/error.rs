//! Error handling for record loading, configuration and reporting.
//!
//! The rate engine itself never fails; these errors belong to the layers
//! around it that read exported record files and drive the CLI.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("No record files matched input: {pattern}")]
    InputNotFound { pattern: String },

    #[error("Unsupported record file format: {path} (expected .csv or .parquet)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Required column '{column}' missing from file: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid input pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl MonitorError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for MonitorError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("invalid TOML: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

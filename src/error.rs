//! Error types for asset-constgen

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for asset-constgen
///
/// Missing scan roots and empty scans are not errors; generators report
/// them as [`crate::generators::Outcome::Skipped`].
#[derive(Error, Debug)]
pub enum ConstGenError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to parse config {}: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Watcher error: {0}")]
    Watch(String),
}

impl ConstGenError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for asset-constgen operations
pub type Result<T> = std::result::Result<T, ConstGenError>;

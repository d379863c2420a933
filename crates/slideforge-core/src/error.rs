//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while reading an operation list.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Malformed operation list: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

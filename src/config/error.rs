//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A numeric setting could not be parsed.
    #[error("failed to parse {name}='{value}' as a number")]
    InvalidNumber { name: &'static str, value: String },

    /// Aggregation weights would take the weighted total outside `[0, 10]`.
    #[error("invalid aggregation weights: {reason}")]
    InvalidWeights { reason: String },

    /// Worker count must be at least one.
    #[error("invalid worker count {value}: must be at least 1")]
    InvalidWorkers { value: usize },

    /// Recognition endpoint is not an absolute http(s) URL.
    #[error("invalid OCR endpoint '{value}'")]
    InvalidOcrUrl { value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

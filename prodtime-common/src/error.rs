//! Common error types for production-time calculations

use thiserror::Error;

/// Common result type for production-time operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by snapshot construction, aggregation and configuration
///
/// Per-lesson problems (bad completion time, unknown tier) are never errors;
/// they degrade to documented defaults inside the calculation.
#[derive(Error, Debug)]
pub enum Error {
    /// Folder is its own ancestor
    #[error("Folder cycle detected at folder {0}")]
    CycleDetected(i64),

    /// Referenced folder does not exist in the snapshot
    #[error("Not found: {0}")]
    NotFound(String),

    /// Structurally invalid snapshot
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be decoded
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

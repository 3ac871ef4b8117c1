//! Error types for nucanon

use thiserror::Error;

/// nucanon error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input-file configuration error (missing tree/spectrum, empty file).
    /// Fatal at handler construction; the file is unusable, not skippable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed on-disk object (bad binning, mismatched array lengths)
    #[error("Format error: {0}")]
    Format(String),

    /// Joint-input normalization inconsistency
    #[error("Normalization error: {0}")]
    Normalization(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for persisted-state access.

use thiserror::Error;

/// Errors that can occur while loading persisted histogram state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error while reading a data file.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// A data file could not be parsed.
    #[error("invalid data file: {0}")]
    Format(#[from] serde_json::Error),

    /// A record's axes do not line up with the expected shape.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Bin edges in a record failed validation.
    #[error("invalid bin edges: {0}")]
    Bins(#[from] wind_common::BinEdgesError),
}

impl StoreError {
    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

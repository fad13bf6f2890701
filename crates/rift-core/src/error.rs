//! Error types for the rift-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core index and pipeline operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Byte source error
    #[error("source error: {0}")]
    Source(#[from] rift_source::SourceError),

    /// Tree corruption detected
    #[error("tree corruption: {0}")]
    TreeCorruption(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Whether the byte source could not be opened at all
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CoreError::Source(e) if e.is_unavailable())
    }
}

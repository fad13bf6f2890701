//! Error types for the rift-source crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `SourceError`
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while opening or reading a byte source
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be opened
    #[error("source unavailable: {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failed after the source was opened
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SourceError {
    /// Whether this error means the source never produced a byte
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }
}

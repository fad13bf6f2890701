//! # Rift Source
//!
//! Byte source for the Rift duplex encoder.
//!
//! This crate provides:
//! - **Opening**: turn a path into a readable source, reporting unavailability
//! - **Chunking**: yield fixed-size blocks (4 KiB by default), each filled
//!   completely unless the stream ends
//!
//! ## Example
//!
//! ```rust,ignore
//! use rift_source::{ChunkReader, SourceConfig};
//!
//! let reader = ChunkReader::open("input.bin", SourceConfig::default())?;
//! for chunk in reader {
//!     let chunk = chunk?;
//!     // feed chunk to the encoder
//! }
//! ```

pub mod chunker;
pub mod error;

pub use chunker::{ChunkReader, SourceConfig};
pub use error::{Result, SourceError};

/// Default chunk size (4 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Maximum chunk size (1 MiB)
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

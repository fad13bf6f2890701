//! # Rift Core
//!
//! Core engine for the Rift 2-to-1 duplex encoder.
//!
//! This crate provides:
//! - **Balanced Index**: an AVL tree from output position to emitted byte,
//!   with confidence/polarity measurements and lazy pruning
//! - **Duplex Transform**: folds input pairs into single bytes and records
//!   each one in the index
//! - **Pipeline**: drives a byte source through the transform up to an
//!   output capacity
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         transform_file / reader         │
//! ├─────────────────────────────────────────┤
//! │   DuplexEncoder    │    RiftIndex       │
//! │  (pairs -> bytes)  │ (AVL + pruning)    │
//! ├─────────────────────────────────────────┤
//! │        rift-source (ChunkReader)        │
//! └─────────────────────────────────────────┘
//! ```

pub mod config;
pub mod duplex;
pub mod error;
pub mod index;
pub mod pipeline;

pub use config::{PipelineConfig, DEFAULT_OUTPUT_CAPACITY};
pub use duplex::{combine, conjugate, DuplexEncoder, EPSILON_PAD};
pub use error::{CoreError, Result};
pub use index::{IndexConfig, IndexEntry, IndexStats, Measurement, Polarity, RiftIndex};
pub use pipeline::{
    transform_file, transform_file_into, transform_reader, try_transform_file, TransformReport,
};

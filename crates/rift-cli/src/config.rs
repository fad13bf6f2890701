//! CLI configuration

use anyhow::Context;
use rift_core::{IndexConfig, PipelineConfig, DEFAULT_OUTPUT_CAPACITY};
use rift_source::{SourceConfig, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `RIFT_OUTPUT_CAPACITY`
pub const ENV_PREFIX: &str = "RIFT";

/// Encoder configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiftConfig {
    /// Bytes read from the source per chunk
    pub chunk_size: usize,
    /// Maximum number of output bytes
    pub output_capacity: usize,
    /// Confidence below which a measurement counts towards pruning
    pub prune_threshold: f32,
    /// Qualifying measurements per bucket before an entry is pruned
    pub prune_streak: u32,
    /// Output bytes shown in the hex preview
    pub preview_bytes: usize,
}

impl Default for RiftConfig {
    fn default() -> Self {
        let index = IndexConfig::default();
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            prune_threshold: index.prune_threshold,
            prune_streak: index.prune_streak,
            preview_bytes: 64,
        }
    }
}

impl RiftConfig {
    /// Load defaults, then an optional file, then `RIFT_*` environment variables
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&RiftConfig::default())?);

        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .context("failed to load configuration")
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            source: SourceConfig {
                chunk_size: self.chunk_size,
            },
            index: IndexConfig {
                prune_threshold: self.prune_threshold,
                prune_streak: self.prune_streak,
            },
            output_capacity: self.output_capacity,
        }
    }
}

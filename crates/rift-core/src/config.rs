//! Pipeline configuration

use crate::index::IndexConfig;
use crate::Result;
use rift_source::SourceConfig;
use serde::{Deserialize, Serialize};

/// Default output capacity (1 MiB)
pub const DEFAULT_OUTPUT_CAPACITY: usize = 1 << 20;

/// Configuration for a whole-file transform
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Chunking of the byte source
    pub source: SourceConfig,
    /// Pruning policy of the index built alongside the output
    pub index: IndexConfig,
    /// Maximum number of output bytes
    pub output_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            index: IndexConfig::default(),
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
        }
    }
}

impl PipelineConfig {
    /// Default configuration with a given output capacity
    pub fn with_capacity(output_capacity: usize) -> Self {
        Self {
            output_capacity,
            ..Default::default()
        }
    }

    /// Validate every section. A capacity of zero is allowed and simply
    /// produces no output.
    pub fn validate(&self) -> Result<()> {
        self.source.validate()?;
        self.index.validate()?;
        Ok(())
    }
}

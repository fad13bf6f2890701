//! Balanced measurement index
//!
//! An AVL tree keyed by 32-bit output position. Every node carries the
//! emitted byte together with a confidence and a polarity tag:
//! - O(log n) inserts, with height rebalancing on the path to the root
//! - Duplicate keys update the existing node in place
//! - Measurements may lower confidence or flip polarity, and entries that
//!   qualify are pruned lazily by tombstoning rather than unlinking
//!
//! Nodes live in an arena and are never removed, so the tree only needs
//! insert-side rebalancing.

mod measure;
mod node;
mod tree;

pub use measure::Measurement;
pub use node::{IndexEntry, Polarity};
pub use tree::{IndexStats, Iter, RiftIndex};

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Confidence below which a measurement counts towards pruning
pub const DEFAULT_PRUNE_THRESHOLD: f32 = 0.5;

/// Qualifying measurements needed before an entry is pruned
pub const DEFAULT_PRUNE_STREAK: u32 = 1;

/// Number of streak buckets; keys map to `key mod STREAK_BUCKETS`
pub const STREAK_BUCKETS: usize = 256;

/// Pruning policy for the index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Confidence below which a measurement qualifies
    pub prune_threshold: f32,
    /// Consecutive qualifying measurements per bucket that trigger pruning
    pub prune_streak: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            prune_streak: DEFAULT_PRUNE_STREAK,
        }
    }
}

impl IndexConfig {
    /// Check the policy values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.prune_threshold) {
            return Err(CoreError::Configuration(format!(
                "prune threshold must be within [0, 1], got {}",
                self.prune_threshold
            )));
        }
        if self.prune_streak == 0 {
            return Err(CoreError::Configuration(
                "prune streak must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

//! Measurement updates and lazy pruning

use super::node::Polarity;
use super::tree::RiftIndex;
use super::STREAK_BUCKETS;
use tracing::{debug, instrument};

/// Outcome of a measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Measurement {
    /// No entry with that key; nothing changed
    Missing,
    /// Qualifying measurement recorded, streak still below the policy
    Recorded { streak: u32 },
    /// Qualifying measurement pushed the streak to the policy; entry pruned
    Pruned { streak: u32 },
    /// Confident, non-negative measurement; bucket streak reset to zero
    Reset,
}

fn bucket(key: u32) -> usize {
    key as usize % STREAK_BUCKETS
}

impl RiftIndex {
    /// Record a measurement against `key`.
    ///
    /// Overwrites confidence, and polarity when one is given. A measurement
    /// below the prune threshold, or one that leaves the entry negative,
    /// extends the streak of bucket `key mod 256`; reaching the configured
    /// streak tombstones the entry. Any other measurement resets the bucket.
    #[instrument(level = "trace", skip(self))]
    pub fn mark_measurement(
        &mut self,
        key: u32,
        confidence: f32,
        polarity: Option<Polarity>,
    ) -> Measurement {
        let Some(slot) = self.slot_of(key) else {
            return Measurement::Missing;
        };

        let entry = &mut self.nodes[slot as usize].entry;
        entry.confidence = confidence;
        if let Some(polarity) = polarity {
            entry.polarity = polarity;
        }

        let bucket = bucket(key);
        if confidence < self.config.prune_threshold || entry.polarity == Polarity::Negative {
            let streak = self.streaks[bucket].saturating_add(1);
            self.streaks[bucket] = streak;
            if streak >= self.config.prune_streak {
                entry.prune();
                debug!(key, streak, "entry pruned");
                Measurement::Pruned { streak }
            } else {
                Measurement::Recorded { streak }
            }
        } else {
            self.streaks[bucket] = 0;
            Measurement::Reset
        }
    }

    /// Current streak count of the bucket that `key` falls in
    pub fn streak(&self, key: u32) -> u32 {
        self.streaks[bucket(key)]
    }

    /// Eagerly tombstone every live entry with negative polarity.
    ///
    /// Streak counters are left untouched. Returns the number of entries
    /// pruned by this call.
    #[instrument(skip(self))]
    pub fn prune_negative(&mut self) -> usize {
        let mut pruned = 0;
        for node in &mut self.nodes {
            let entry = &mut node.entry;
            if entry.polarity == Polarity::Negative && !entry.is_pruned() {
                entry.prune();
                pruned += 1;
            }
        }
        debug!(pruned, "negative entries pruned");
        pruned
    }
}

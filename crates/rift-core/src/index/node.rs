//! Index node types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel link for an absent child or parent
pub(crate) const NIL: u32 = u32::MAX;

/// Provenance tag for an encoding pass and for every index entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Polarity A: the second operand of each pair is conjugated
    Positive,
    /// Polarity B: the first operand of each pair is conjugated
    Negative,
}

impl Polarity {
    /// Map the encoder's "polarity A" flag to a polarity
    pub fn from_is_a(is_a: bool) -> Self {
        if is_a {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    /// Whether this is polarity A
    pub fn is_a(self) -> bool {
        self == Polarity::Positive
    }

    /// Single-byte tag: `'+'` or `'-'`
    pub fn as_byte(self) -> u8 {
        match self {
            Polarity::Positive => b'+',
            Polarity::Negative => b'-',
        }
    }

    /// Parse a single-byte tag
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(Polarity::Positive),
            b'-' => Some(Polarity::Negative),
            _ => None,
        }
    }

    /// Pass letter used on the command line: `A` or `B`
    pub fn letter(self) -> char {
        if self.is_a() {
            'A'
        } else {
            'B'
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// Payload stored at one output position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// 1-based output position
    pub key: u32,
    /// The emitted byte, 0 once pruned
    pub value: u8,
    /// Provenance tag
    pub polarity: Polarity,
    /// Trust in `value`, 0.0 once pruned
    pub confidence: f32,
    /// Tombstone flag; the key stays in the tree
    pub pruned: bool,
}

impl IndexEntry {
    /// Create a new entry
    pub fn new(key: u32, value: u8, confidence: f32, polarity: Polarity) -> Self {
        Self {
            key,
            value,
            polarity,
            confidence,
            pruned: false,
        }
    }

    /// Whether the entry has been logically deleted
    pub fn is_pruned(&self) -> bool {
        self.pruned
    }

    /// Tombstone the entry in place
    pub(crate) fn prune(&mut self) {
        self.value = 0;
        self.confidence = 0.0;
        self.pruned = true;
    }

    /// Overwrite the payload, clearing any tombstone
    pub(crate) fn overwrite(&mut self, value: u8, confidence: f32, polarity: Polarity) {
        self.value = value;
        self.confidence = confidence;
        self.polarity = polarity;
        self.pruned = false;
    }
}

/// Arena slot: an entry plus its tree links
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub entry: IndexEntry,
    pub height: u8,
    pub left: u32,
    pub right: u32,
    pub parent: u32,
}

impl Node {
    pub fn leaf(entry: IndexEntry, parent: u32) -> Self {
        Self {
            entry,
            height: 1,
            left: NIL,
            right: NIL,
            parent,
        }
    }
}

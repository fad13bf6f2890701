//! AVL tree over an arena of nodes

use super::node::{IndexEntry, Node, Polarity, NIL};
use super::{IndexConfig, STREAK_BUCKETS};
use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordered index from output position to measured byte.
///
/// The index is a plain owned value with no interior locking. Callers that
/// share one index across threads must wrap it in a single mutex (for
/// example `Arc<parking_lot::Mutex<RiftIndex>>`) or confine it to one thread.
#[derive(Clone)]
pub struct RiftIndex {
    pub(super) nodes: Vec<Node>,
    pub(super) root: u32,
    pub(super) config: IndexConfig,
    pub(super) streaks: [u32; STREAK_BUCKETS],
}

impl RiftIndex {
    /// Create an empty index with the default pruning policy
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Create with a custom pruning policy
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
            config,
            streaks: [0; STREAK_BUCKETS],
        }
    }

    /// The pruning policy in effect
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of entries, pruned ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Height of the tree (0 when empty)
    pub fn height(&self) -> u8 {
        self.height_of(self.root)
    }

    /// Entry stored at the root node
    pub fn root(&self) -> Option<&IndexEntry> {
        self.node(self.root).map(|n| &n.entry)
    }

    /// Insert an entry, or overwrite the payload if `key` already exists.
    ///
    /// A new node is attached as a leaf and every ancestor up to the root is
    /// rebalanced. Overwriting performs no structural change.
    pub fn insert(&mut self, key: u32, value: u8, confidence: f32, polarity: Polarity) {
        let entry = IndexEntry::new(key, value, confidence, polarity);
        if self.root == NIL {
            self.root = self.push(Node::leaf(entry, NIL));
            return;
        }

        let mut cur = self.root;
        loop {
            let node = &mut self.nodes[cur as usize];
            let next = match key.cmp(&node.entry.key) {
                Ordering::Equal => {
                    node.entry.overwrite(value, confidence, polarity);
                    return;
                }
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            if next == NIL {
                break;
            }
            cur = next;
        }

        let leaf = self.push(Node::leaf(entry, cur));
        let parent = &mut self.nodes[cur as usize];
        if key < parent.entry.key {
            parent.left = leaf;
        } else {
            parent.right = leaf;
        }
        self.rebalance_up(cur);
    }

    /// Look up an entry by key
    pub fn find(&self, key: u32) -> Option<&IndexEntry> {
        self.slot_of(key).map(|slot| &self.nodes[slot as usize].entry)
    }

    /// Check whether a key is present
    pub fn contains(&self, key: u32) -> bool {
        self.slot_of(key).is_some()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            stack: Vec::with_capacity(self.height() as usize),
            cur: self.root,
        }
    }

    /// Get statistics about the index
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            entries: self.nodes.len(),
            height: self.height(),
            pruned: 0,
            negative: 0,
        };
        for node in &self.nodes {
            if node.entry.is_pruned() {
                stats.pruned += 1;
            }
            if node.entry.polarity == Polarity::Negative {
                stats.negative += 1;
            }
        }
        stats
    }

    /// Verify ordering, balance, heights and parent links of the whole tree
    pub fn validate(&self) -> Result<()> {
        if self.root == NIL {
            if !self.nodes.is_empty() {
                return Err(corrupt(format!(
                    "{} nodes but no root",
                    self.nodes.len()
                )));
            }
            return Ok(());
        }
        let root = self
            .node(self.root)
            .ok_or_else(|| corrupt(format!("dangling root {}", self.root)))?;
        if root.parent != NIL {
            return Err(corrupt("root has a parent".to_string()));
        }

        let mut reached = 0usize;
        self.validate_subtree(self.root, None, None, &mut reached)?;
        if reached != self.nodes.len() {
            return Err(corrupt(format!(
                "{} of {} nodes reachable from root",
                reached,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    fn validate_subtree(
        &self,
        idx: u32,
        lower: Option<u32>,
        upper: Option<u32>,
        reached: &mut usize,
    ) -> Result<u8> {
        if idx == NIL {
            return Ok(0);
        }
        let node = self
            .node(idx)
            .ok_or_else(|| corrupt(format!("dangling link {}", idx)))?;
        *reached += 1;

        let key = node.entry.key;
        if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
            return Err(corrupt(format!("key {} out of order", key)));
        }
        for child in [node.left, node.right] {
            if child == NIL {
                continue;
            }
            let child_node = self
                .node(child)
                .ok_or_else(|| corrupt(format!("key {} links to slot {}", key, child)))?;
            if child_node.parent != idx {
                return Err(corrupt(format!("child of key {} has wrong parent", key)));
            }
        }

        let lh = self.validate_subtree(node.left, lower, Some(key), reached)?;
        let rh = self.validate_subtree(node.right, Some(key), upper, reached)?;
        if lh.abs_diff(rh) > 1 {
            return Err(corrupt(format!(
                "key {} unbalanced: left {} right {}",
                key, lh, rh
            )));
        }
        let height = 1 + lh.max(rh);
        if node.height != height {
            return Err(corrupt(format!(
                "key {} stores height {}, actual {}",
                key, node.height, height
            )));
        }
        Ok(height)
    }

    pub(super) fn slot_of(&self, key: u32) -> Option<u32> {
        let mut cur = self.root;
        while let Some(node) = self.node(cur) {
            match key.cmp(&node.entry.key) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => cur = node.left,
                Ordering::Greater => cur = node.right,
            }
        }
        None
    }

    fn push(&mut self, node: Node) -> u32 {
        // Running out of slots is treated like allocation failure.
        assert!(self.nodes.len() < NIL as usize, "index arena exhausted");
        let idx = self.nodes.len() as u32;
        self.nodes.push(node);
        idx
    }

    fn node(&self, idx: u32) -> Option<&Node> {
        if idx == NIL {
            None
        } else {
            self.nodes.get(idx as usize)
        }
    }

    fn height_of(&self, idx: u32) -> u8 {
        self.node(idx).map_or(0, |n| n.height)
    }

    fn balance_of(&self, idx: u32) -> i16 {
        match self.node(idx) {
            Some(n) => self.height_of(n.left) as i16 - self.height_of(n.right) as i16,
            None => 0,
        }
    }

    fn update_height(&mut self, idx: u32) {
        let node = &self.nodes[idx as usize];
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes[idx as usize].height = height;
    }

    /// Point `parent`'s link that referenced `old` at `new`, or move the root.
    fn replace_child(&mut self, parent: u32, old: u32, new: u32) {
        if parent == NIL {
            self.root = new;
            return;
        }
        let parent = &mut self.nodes[parent as usize];
        if parent.left == old {
            parent.left = new;
        } else {
            parent.right = new;
        }
    }

    fn rotate_left(&mut self, x: u32) -> u32 {
        let y = self.nodes[x as usize].right;
        if y == NIL {
            return x;
        }
        let inner = self.nodes[y as usize].left;
        let parent = self.nodes[x as usize].parent;

        self.nodes[x as usize].right = inner;
        if inner != NIL {
            self.nodes[inner as usize].parent = x;
        }
        self.nodes[y as usize].parent = parent;
        self.replace_child(parent, x, y);
        self.nodes[y as usize].left = x;
        self.nodes[x as usize].parent = y;

        self.update_height(x);
        self.update_height(y);
        y
    }

    fn rotate_right(&mut self, x: u32) -> u32 {
        let y = self.nodes[x as usize].left;
        if y == NIL {
            return x;
        }
        let inner = self.nodes[y as usize].right;
        let parent = self.nodes[x as usize].parent;

        self.nodes[x as usize].left = inner;
        if inner != NIL {
            self.nodes[inner as usize].parent = x;
        }
        self.nodes[y as usize].parent = parent;
        self.replace_child(parent, x, y);
        self.nodes[y as usize].right = x;
        self.nodes[x as usize].parent = y;

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Walk from `start` to the root, fixing heights and rotating where the
    /// balance factor leaves [-1, 1].
    fn rebalance_up(&mut self, start: u32) {
        let mut n = start;
        while n != NIL {
            self.update_height(n);
            let balance = self.balance_of(n);
            if balance > 1 {
                let left = self.nodes[n as usize].left;
                if self.balance_of(left) < 0 {
                    self.rotate_left(left);
                }
                n = self.rotate_right(n);
            } else if balance < -1 {
                let right = self.nodes[n as usize].right;
                if self.balance_of(right) > 0 {
                    self.rotate_right(right);
                }
                n = self.rotate_left(n);
            } else {
                n = self.nodes[n as usize].parent;
            }
        }
    }
}

impl Default for RiftIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RiftIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiftIndex")
            .field("entries", &self.nodes.len())
            .field("height", &self.height())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a> IntoIterator for &'a RiftIndex {
    type Item = &'a IndexEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over index entries
pub struct Iter<'a> {
    index: &'a RiftIndex,
    stack: Vec<u32>,
    cur: u32,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a IndexEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.index.node(self.cur) {
            self.stack.push(self.cur);
            self.cur = node.left;
        }
        let idx = self.stack.pop()?;
        let node = &self.index.nodes[idx as usize];
        self.cur = node.right;
        Some(&node.entry)
    }
}

/// Index statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Keys in the tree, pruned ones included
    pub entries: usize,
    /// Height of the root; 0 when empty
    pub height: u8,
    /// Entries carrying the tombstone flag
    pub pruned: usize,
    /// Entries tagged with polarity B
    pub negative: usize,
}

fn corrupt(msg: String) -> CoreError {
    CoreError::TreeCorruption(msg)
}

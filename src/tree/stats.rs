use std::cmp::Ordering;

use super::OrderedMap;
use super::node::{Link, is_red};
use crate::error::{Error, Result};
use crate::types::Key;

/// Shape of a validated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// Number of entries.
    pub entries: usize,
    /// Black links on every root-to-leaf path.
    pub black_height: usize,
    /// Longest root-to-leaf path, counted in nodes.
    pub depth: usize,
}

impl<K: Key, V> OrderedMap<K, V> {
    /// Walk the whole tree and check every structural invariant:
    ///
    /// * the root is black,
    /// * no node has a red right child,
    /// * no red node has a red left child,
    /// * every root-to-leaf path has the same number of black links,
    /// * keys are in strictly ascending in-order sequence,
    /// * the node count matches [`count`](OrderedMap::count).
    pub fn validate(&self) -> Result<Stats> {
        if is_red(self.root()) {
            return Err(Error::InvariantViolation("root node must be black".into()));
        }

        let mut stats = Stats::default();
        let mut previous: Option<&K> = None;
        stats.black_height = check(self.root(), 0, &mut stats, &mut previous)?;

        if stats.entries != self.count() {
            return Err(Error::InvariantViolation(format!(
                "counted {} nodes but count is {}",
                stats.entries,
                self.count()
            )));
        }
        Ok(stats)
    }
}

/// Returns the black height of the subtree.
fn check<'a, K: Key, V>(
    link: &'a Link<K, V>,
    depth: usize,
    stats: &mut Stats,
    previous: &mut Option<&'a K>,
) -> Result<usize> {
    let Some(node) = link.as_deref() else {
        stats.depth = stats.depth.max(depth);
        return Ok(0);
    };

    if is_red(&node.right) {
        return Err(Error::InvariantViolation("right-leaning red link".into()));
    }
    if node.is_red() && is_red(&node.left) {
        return Err(Error::InvariantViolation("two consecutive red links".into()));
    }

    let left = check(&node.left, depth + 1, stats, previous)?;

    if let Some(prev) = *previous {
        if prev.compared_to(&node.key) != Ordering::Less {
            return Err(Error::InvariantViolation("keys out of order".into()));
        }
    }
    *previous = Some(&node.key);
    stats.entries += 1;

    let right = check(&node.right, depth + 1, stats, previous)?;
    if left != right {
        return Err(Error::InvariantViolation(format!(
            "black height mismatch: {left} on the left, {right} on the right"
        )));
    }

    Ok(left + usize::from(!node.is_red()))
}

use std::cmp::Ordering as KeyOrdering;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Callback, MapIterator};
use crate::error::{Error, Result};
use crate::tree::node::{self, Link, Node};
use crate::types::Key;

/// Why a walk stopped before exhausting its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Halt {
    /// The context left the walking state; not an error.
    Closed,
    /// The map version moved on.
    Modified,
}

/// One end of a half-open range.
#[derive(Debug)]
pub(super) enum Bound<'a, K> {
    Included(&'a K),
    Excluded(&'a K),
}

// Not derived: the derive would demand `K: Copy`.
impl<K> Clone for Bound<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Bound<'_, K> {}

impl<K: Key> Bound<'_, K> {
    /// Whether `key` lies on the admitted side of the bound.
    fn admits(&self, key: &K, side: KeyOrdering) -> bool {
        match self {
            Bound::Included(bound) => key.compared_to(bound) != side.reverse(),
            Bound::Excluded(bound) => key.compared_to(bound) == side,
        }
    }
}

/// A single walk over a root snapshot.
pub(super) struct Walk<'a, K, V> {
    iterator: &'a MapIterator<K, V>,
    callback: &'a Callback<K, V>,
    version: &'a AtomicU64,
    snapshot: u64,
}

/// Resets the context to `Ready` even if the callback panics.
struct WalkGuard<'a, K, V>(&'a MapIterator<K, V>);

impl<K, V> Drop for WalkGuard<'_, K, V> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl<K, V> MapIterator<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    /// Enter the walking state, snapshot the map, run `walk` and convert its
    /// outcome into the public result.
    pub(super) fn run<F>(&self, operation: &'static str, walk: F) -> Result<usize>
    where
        F: FnOnce(&Walk<'_, K, V>, &Link<K, V>) -> std::result::Result<(), Halt>,
    {
        let (map, callback) = self.begin()?;
        let _guard = WalkGuard(self);

        let (root, version, snapshot) = {
            let map = map.read();
            (map.root().clone(), map.version_handle(), map.version())
        };
        drop(map);

        let context = Walk {
            iterator: self,
            callback: &callback,
            version: &version,
            snapshot,
        };
        match walk(&context, &root) {
            Ok(()) => {
                tracing::trace!(operation, count = self.current_count(), "walk complete");
                Ok(self.current_count())
            }
            Err(Halt::Closed) => {
                tracing::trace!(operation, count = self.current_count(), "walk stopped by close");
                Ok(self.current_count())
            }
            Err(Halt::Modified) => {
                tracing::debug!(
                    operation,
                    count = self.current_count(),
                    snapshot,
                    "map modified during walk"
                );
                Err(Error::ConcurrentModification)
            }
        }
    }
}

type Step = std::result::Result<(), Halt>;

impl<K: Key, V> Walk<'_, K, V> {
    fn checkpoint(&self) -> Step {
        if !self.iterator.in_walk() {
            return Err(Halt::Closed);
        }
        if self.version.load(Ordering::Acquire) != self.snapshot {
            return Err(Halt::Modified);
        }
        Ok(())
    }

    fn visit(&self, node: &Node<K, V>) -> Step {
        self.checkpoint()?;
        self.iterator.increment_count();
        (self.callback)(self.iterator, &node.key, &node.value);
        Ok(())
    }

    pub(super) fn all(&self, link: &Link<K, V>) -> Step {
        let Some(node) = link.as_deref() else {
            return Ok(());
        };
        self.checkpoint()?;
        self.all(&node.left)?;
        self.visit(node)?;
        self.all(&node.right)
    }

    /// Visit the single entry equal to `key`, if any.
    pub(super) fn point(&self, root: &Link<K, V>, key: &K) -> Step {
        self.checkpoint()?;
        match node::find(root, key) {
            Some(node) => self.visit(node),
            None => Ok(()),
        }
    }

    /// In-order walk of `lo <= key <= hi`, pruning subtrees outside the range.
    pub(super) fn between(&self, link: &Link<K, V>, lo: &K, hi: &K) -> Step {
        let Some(node) = link.as_deref() else {
            return Ok(());
        };
        self.checkpoint()?;

        let lo_side = lo.compared_to(&node.key);
        let hi_side = hi.compared_to(&node.key);
        if lo_side == KeyOrdering::Less {
            self.between(&node.left, lo, hi)?;
        }
        if lo_side != KeyOrdering::Greater && hi_side != KeyOrdering::Less {
            self.visit(node)?;
        }
        if hi_side == KeyOrdering::Greater {
            self.between(&node.right, lo, hi)?;
        }
        Ok(())
    }

    /// Entries below `bound`. The right subtree is entered only when the
    /// current node qualifies.
    pub(super) fn below(&self, link: &Link<K, V>, bound: Bound<'_, K>) -> Step {
        let Some(node) = link.as_deref() else {
            return Ok(());
        };
        self.checkpoint()?;

        self.below(&node.left, bound)?;
        if bound.admits(&node.key, KeyOrdering::Less) {
            self.visit(node)?;
            self.below(&node.right, bound)?;
        }
        Ok(())
    }

    /// Entries above `bound`. The left subtree is entered only when the
    /// current node qualifies; the right subtree is always entered.
    pub(super) fn above(&self, link: &Link<K, V>, bound: Bound<'_, K>) -> Step {
        let Some(node) = link.as_deref() else {
            return Ok(());
        };
        self.checkpoint()?;

        if bound.admits(&node.key, KeyOrdering::Greater) {
            self.above(&node.left, bound)?;
            self.visit(node)?;
        }
        self.above(&node.right, bound)
    }
}

pub mod iter;
pub(crate) mod node;
pub mod stats;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::options::Options;
use crate::types::Key;
use iter::Iter;
use node::Link;

/// A map shared between writers and iteration contexts.
///
/// Writers take the write lock; a [`MapIterator`](crate::MapIterator) takes
/// the read lock only for the instant it snapshots the root.
pub type SharedMap<K, V> = Arc<RwLock<OrderedMap<K, V>>>;

/// An ordered key-value map on a left-leaning red-black tree.
///
/// Every path from the root to a leaf crosses the same number of black
/// links and red links only lean left, so the height stays within
/// `2 * log2(n + 1)`:
///
/// ```text
///              (4)
///            //    \
///          (2)      (6)
///         /   \    /   \
///       (1)  (3) (5)   (7)        // = red link
/// ```
///
/// `insert`, `delete`, `get`, `floor` and `ceiling` are O(log n).
/// `count` and `is_empty` are O(1).
///
/// The map keeps a version stamp that every mutation bumps. Iteration
/// contexts compare it against the value they saw when their walk started.
pub struct OrderedMap<K, V> {
    root: Link<K, V>,
    count: usize,
    version: Arc<AtomicU64>,
    options: Options<K, V>,
}

impl<K, V> OrderedMap<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    /// Create an empty map with no merge callbacks.
    pub fn new() -> Self {
        Self::with_options(Options::new())
    }

    /// Create an empty map with the given configuration.
    pub fn with_options(options: Options<K, V>) -> Self {
        OrderedMap {
            root: None,
            count: 0,
            version: Arc::new(AtomicU64::new(0)),
            options,
        }
    }

    /// Create an empty map that resolves duplicate inserts with `on_insert`
    /// and consults `on_delete` before removing an entry.
    pub fn with_merge<I, D>(on_insert: I, on_delete: D) -> Self
    where
        I: Fn(&K, &V, V) -> V + Send + Sync + 'static,
        D: Fn(&K, &V) -> Option<V> + Send + Sync + 'static,
    {
        Self::with_options(Options::new().on_insert(on_insert).on_delete(on_delete))
    }

    /// Wrap the map for use with iteration contexts.
    pub fn into_shared(self) -> SharedMap<K, V> {
        Arc::new(RwLock::new(self))
    }

    /// Insert `key`, or merge `value` into the existing entry.
    ///
    /// The version is bumped on every call, including pure value updates.
    /// An existing key is resolved before any link is touched, so a
    /// panicking merge callback leaves the tree as it was.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(current) = node::find(&self.root, &key) {
            let value = match self.options.on_insert.as_ref() {
                Some(merge) => merge(&key, &current.value, value),
                None => value,
            };
            if let Some(slot) = node::find_mut(&mut self.root, &key) {
                *slot = value;
            }
            self.bump_version();
            return;
        }

        let mut root = node::insert(self.root.take(), key, value);
        Arc::make_mut(&mut root).color = node::Color::Black;
        self.root = Some(root);
        self.count += 1;
        self.bump_version();
    }

    /// Remove `key` and return its value.
    ///
    /// Returns `None` if the key is absent, or if the delete callback kept
    /// the entry by returning a replacement value.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let current = node::find(&self.root, key)?;

        if let Some(on_delete) = self.options.on_delete.as_ref() {
            if let Some(replacement) = on_delete(key, &current.value) {
                if let Some(value) = node::find_mut(&mut self.root, key) {
                    *value = replacement;
                }
                tracing::trace!("delete vetoed by merge callback");
                self.bump_version();
                return None;
            }
        }

        let mut removed = None;
        if let Some(root) = self.root.take() {
            self.root = node::delete(root, key, &mut removed);
        }
        if let Some(root) = self.root.as_mut() {
            Arc::make_mut(root).color = node::Color::Black;
        }

        if removed.is_some() {
            self.count -= 1;
            self.bump_version();
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.count = 0;
        self.bump_version();
        tracing::trace!("map cleared");
    }

    pub(crate) fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::Release);
    }
}

impl<K: Key, V> OrderedMap<K, V> {
    /// Look up the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        node::find(&self.root, key).map(|node| &node.value)
    }

    /// Whether `key` is stored.
    pub fn exists(&self, key: &K) -> bool {
        node::find(&self.root, key).is_some()
    }

    /// Smallest entry.
    pub fn min(&self) -> Option<(&K, &V)> {
        let node = node::min(self.root.as_deref()?);
        Some((&node.key, &node.value))
    }

    /// Largest entry.
    pub fn max(&self) -> Option<(&K, &V)> {
        let node = node::max(self.root.as_deref()?);
        Some((&node.key, &node.value))
    }

    /// Greatest entry with a key less than or equal to `key`.
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        node::floor(&self.root, key).map(|node| (&node.key, &node.value))
    }

    /// Least entry with a key greater than or equal to `key`.
    pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
        node::ceiling(&self.root, key).map(|node| (&node.key, &node.value))
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Current mutation stamp.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Ascending iterator over all entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root, self.count)
    }

    pub(crate) fn root(&self) -> &Link<K, V> {
        &self.root
    }

    pub(crate) fn version_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.version)
    }
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut map = OrderedMap::new();
        map.extend(entries);
        map
    }
}

impl<K, V> Extend<(K, V)> for OrderedMap<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Key, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Key + fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

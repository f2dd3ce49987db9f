/// Resolves a duplicate-key insert: `(key, old_value, new_value) -> stored value`.
pub type InsertMerge<K, V> = Box<dyn Fn(&K, &V, V) -> V + Send + Sync>;

/// Authorizes a delete: `(key, current_value) -> replacement`. Returning
/// `Some` keeps the entry with the replacement value instead of removing it.
pub type DeleteMerge<K, V> = Box<dyn Fn(&K, &V) -> Option<V> + Send + Sync>;

/// Configuration for an [`OrderedMap`](crate::OrderedMap).
///
/// Without callbacks an insert of an existing key replaces the value and a
/// delete always removes the entry.
///
/// ```rust
/// use llrb_map::{OrderedMap, Options};
///
/// let options = Options::new()
///     .on_insert(|_key: &u32, old: &u64, new: u64| old + new)
///     .on_delete(|_key: &u32, value: &u64| (*value > 1).then(|| value - 1));
///
/// let mut counts = OrderedMap::with_options(options);
/// counts.insert(7, 1);
/// counts.insert(7, 1);
/// assert_eq!(counts.get(&7), Some(&2));
///
/// counts.delete(&7);
/// assert_eq!(counts.get(&7), Some(&1));
/// ```
pub struct Options<K, V> {
    pub(crate) on_insert: Option<InsertMerge<K, V>>,
    pub(crate) on_delete: Option<DeleteMerge<K, V>>,
}

impl<K, V> Options<K, V> {
    /// Options with no merge callbacks.
    pub fn new() -> Self {
        Options {
            on_insert: None,
            on_delete: None,
        }
    }

    /// Set the callback used when an inserted key already exists.
    pub fn on_insert<F>(mut self, merge: F) -> Self
    where
        F: Fn(&K, &V, V) -> V + Send + Sync + 'static,
    {
        self.on_insert = Some(Box::new(merge));
        self
    }

    /// Set the callback consulted before a key is removed.
    pub fn on_delete<F>(mut self, merge: F) -> Self
    where
        F: Fn(&K, &V) -> Option<V> + Send + Sync + 'static,
    {
        self.on_delete = Some(Box::new(merge));
        self
    }
}

impl<K, V> Default for Options<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

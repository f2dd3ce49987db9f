use std::sync::Arc;

use super::{Callback, MapIterator};
use crate::error::{Error, Result};
use crate::tree::SharedMap;

/// Builder for a [`MapIterator`].
///
/// Both the map and the callback are required. `build` reports the first
/// missing one as [`Error::InvalidArgument`].
pub struct IteratorBuilder<K, V> {
    map: Option<SharedMap<K, V>>,
    callback: Option<Callback<K, V>>,
}

impl<K, V> IteratorBuilder<K, V> {
    pub fn new() -> Self {
        IteratorBuilder {
            map: None,
            callback: None,
        }
    }

    /// The map to walk. The context keeps only a weak handle to it.
    pub fn map(mut self, map: &SharedMap<K, V>) -> Self {
        self.map = Some(Arc::clone(map));
        self
    }

    /// The function invoked once per matching entry.
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MapIterator<K, V>, &K, &V) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Produce a context in the ready state.
    pub fn build(self) -> Result<MapIterator<K, V>> {
        let map = self.map.ok_or(Error::InvalidArgument("map"))?;
        let callback = self.callback.ok_or(Error::InvalidArgument("callback"))?;
        tracing::debug!("iterator created");
        Ok(MapIterator::ready(map, callback))
    }
}

impl<K, V> Default for IteratorBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

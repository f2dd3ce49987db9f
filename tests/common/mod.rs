// Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use llrb_map::{MapIterator, OrderedMap, SharedMap};
use parking_lot::Mutex;

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A map holding `key -> key * 10` for every key given.
pub fn map_of(keys: impl IntoIterator<Item = i32>) -> OrderedMap<i32, i32> {
    keys.into_iter().map(|key| (key, key * 10)).collect()
}

/// A shared map holding `key -> key * 10` for every key given.
pub fn shared_of(keys: impl IntoIterator<Item = i32>) -> SharedMap<i32, i32> {
    map_of(keys).into_shared()
}

/// An iterator that records every visited key, in visiting order.
pub fn recorder(map: &SharedMap<i32, i32>) -> (MapIterator<i32, i32>, Arc<Mutex<Vec<i32>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let iterator = MapIterator::new(map, move |_, key: &i32, _: &i32| {
        sink.lock().push(*key);
    })
    .unwrap();
    (iterator, seen)
}

/// Drain the recorded keys.
pub fn take(seen: &Mutex<Vec<i32>>) -> Vec<i32> {
    std::mem::take(&mut *seen.lock())
}

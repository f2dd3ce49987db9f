//! Versioned, restartable ordered walks over a [`SharedMap`].
//!
//! A [`MapIterator`] is a reusable walk context bound to one map and one
//! callback. Each walk (`all`, `between`, `less_than`, ...) visits the
//! matching entries in ascending key order and returns how many matched.
//!
//! ```text
//!                 build()              walk starts
//!  Uninitialized    ──►    Ready   ─────────────────►   Walking
//!  (Default)                 ▲                            │
//!                            └──────── walk ends ─────────┘
//!            close() from any state  ──►  Closed (terminal)
//! ```
//!
//! Before every visitation the walk checks two things: the context is still
//! walking (otherwise it stops and returns the partial count) and the map's
//! version still equals the one seen when the walk began (otherwise it
//! aborts with [`Error::ConcurrentModification`]).
//!
//! A walk holds the map's read lock only while it clones the root. The
//! descent itself runs over that snapshot, so a writer never blocks on a
//! long walk and the walk never sees a half-rotated tree.

pub mod builder;
mod walk;

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::error::{Error, Result};
use crate::tree::{OrderedMap, SharedMap};
use crate::types::Key;
pub use builder::IteratorBuilder;
use walk::Bound;

/// Visitation callback: receives the context, then the key and value.
pub type Callback<K, V> = Arc<dyn Fn(&MapIterator<K, V>, &K, &V) + Send + Sync>;

type Scratch = HashMap<String, Arc<dyn Any + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum State {
    Uninitialized = 0,
    Ready = 1,
    Walking = 2,
    Closed = 3,
}

impl State {
    fn from_u8(byte: u8) -> Self {
        match byte {
            1 => State::Ready,
            2 => State::Walking,
            3 => State::Closed,
            _ => State::Uninitialized,
        }
    }
}

struct Context<K, V> {
    map: Option<Weak<RwLock<OrderedMap<K, V>>>>,
    callback: Option<Callback<K, V>>,
    data: Option<Scratch>,
}

/// Walk context over a [`SharedMap`].
///
/// Share it through an `Arc` to close it from another thread while a walk
/// is running.
///
/// The context does not own the map: it holds a weak handle, and once every
/// [`SharedMap`] clone is dropped its walks fail with
/// [`Error::IteratorClosed`].
///
/// Each walk takes the map's read lock to snapshot the root. Starting a walk
/// on a thread that already holds that map's write lock deadlocks, and so
/// can holding its read lock while a writer is queued. Release any guard on
/// the map before calling a walk; taking locks inside the callback is fine.
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use llrb_map::{MapIterator, OrderedMap};
///
/// let map: OrderedMap<u32, &str> = [(5, "e"), (1, "a"), (3, "c")].into_iter().collect();
/// let map = map.into_shared();
///
/// let sum = Arc::new(AtomicU32::new(0));
/// let seen = Arc::clone(&sum);
/// let iterator = MapIterator::new(&map, move |_, key: &u32, _: &&str| {
///     seen.fetch_add(*key, Ordering::Relaxed);
/// })
/// .unwrap();
///
/// assert_eq!(iterator.greater_or_equal(&3), Ok(2));
/// assert_eq!(sum.load(Ordering::Relaxed), 8);
/// ```
pub struct MapIterator<K, V> {
    context: Mutex<Context<K, V>>,
    state: AtomicU8,
    count: AtomicUsize,
}

impl<K, V> MapIterator<K, V> {
    /// Start building a context.
    pub fn builder() -> IteratorBuilder<K, V> {
        IteratorBuilder::new()
    }

    /// Bind a context to `map` and `callback`.
    pub fn new<F>(map: &SharedMap<K, V>, callback: F) -> Result<Self>
    where
        F: Fn(&MapIterator<K, V>, &K, &V) + Send + Sync + 'static,
    {
        Self::builder().map(map).callback(callback).build()
    }

    pub(crate) fn ready(map: SharedMap<K, V>, callback: Callback<K, V>) -> Self {
        MapIterator {
            context: Mutex::new(Context {
                map: Some(Arc::downgrade(&map)),
                callback: Some(callback),
                data: Some(HashMap::new()),
            }),
            state: AtomicU8::new(State::Ready as u8),
            count: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn in_walk(&self) -> bool {
        self.state() == State::Walking
    }

    /// Whether [`close`](MapIterator::close) has been called.
    pub fn closed(&self) -> bool {
        self.state() == State::Closed
    }

    /// Matches counted by the current or most recent walk.
    pub fn current_count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub(crate) fn increment_count(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// The map this context walks, or `None` once closed or once the map
    /// itself has been dropped.
    pub fn tree(&self) -> Option<SharedMap<K, V>> {
        self.context.lock().map.as_ref().and_then(Weak::upgrade)
    }

    /// Stop any running walk and release the map. Idempotent.
    ///
    /// A walk in flight on another thread notices at its next visitation and
    /// returns the partial count without error.
    pub fn close(&self) {
        let mut context = self.context.lock();
        let previous = State::from_u8(self.state.swap(State::Closed as u8, Ordering::AcqRel));
        context.map = None;
        context.callback = None;
        context.data = None;
        if previous != State::Closed {
            tracing::debug!(?previous, count = self.current_count(), "iterator closed");
        }
    }

    /// Move `Ready` to `Walking` and hand out what the walk needs.
    fn begin(&self) -> Result<(SharedMap<K, V>, Callback<K, V>)> {
        let context = self.context.lock();
        match self.state() {
            State::Walking => return Err(Error::IteratorBusy),
            State::Closed => return Err(Error::IteratorClosed),
            State::Uninitialized => return Err(Error::IteratorUninitialized),
            State::Ready => {}
        }
        let map = context
            .map
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(Error::IteratorClosed)?;
        let callback = context.callback.clone().ok_or(Error::IteratorClosed)?;
        self.count.store(0, Ordering::Release);
        self.state.store(State::Walking as u8, Ordering::Release);
        Ok((map, callback))
    }

    /// Return to `Ready` unless the context was closed mid-walk.
    fn finish(&self) {
        let _ = self.state.compare_exchange(
            State::Walking as u8,
            State::Ready as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Look up scratch data stored under `key`.
    ///
    /// Returns `None` if nothing is stored, the stored value is not a `T`, or
    /// the context is closed.
    pub fn get_data<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.context.lock().data.as_ref()?.get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// Store scratch data under `key`, replacing any previous value.
    /// Ignored once the context is closed.
    pub fn set_data<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        if let Some(data) = self.context.lock().data.as_mut() {
            data.insert(key.into(), Arc::new(value));
        }
    }

    /// Drop the scratch data stored under `key`, if any.
    pub fn remove_data(&self, key: &str) {
        if let Some(data) = self.context.lock().data.as_mut() {
            data.remove(key);
        }
    }

    /// Drop all scratch data. The store stays usable.
    pub fn clear_data(&self) {
        if let Some(data) = self.context.lock().data.as_mut() {
            data.clear();
        }
    }
}

impl<K, V> MapIterator<K, V>
where
    K: Key + Clone,
    V: Clone,
{
    /// Visit every entry.
    pub fn all(&self) -> Result<usize> {
        self.run("all", |walk, root| walk.all(root))
    }

    /// Visit entries with `lo <= key <= hi`. Bounds given in the wrong order
    /// are swapped; equal bounds become a point lookup.
    pub fn between(&self, lo: &K, hi: &K) -> Result<usize> {
        let (lo, hi) = match lo.compared_to(hi) {
            std::cmp::Ordering::Greater => (hi, lo),
            _ => (lo, hi),
        };
        if lo.compared_to(hi) == std::cmp::Ordering::Equal {
            return self.run("between", |walk, root| walk.point(root, lo));
        }
        self.run("between", |walk, root| walk.between(root, lo, hi))
    }

    /// Visit entries with `key < bound`.
    pub fn less_than(&self, bound: &K) -> Result<usize> {
        self.run("less_than", |walk, root| walk.below(root, Bound::Excluded(bound)))
    }

    /// Visit entries with `key <= bound`.
    pub fn less_or_equal(&self, bound: &K) -> Result<usize> {
        self.run("less_or_equal", |walk, root| walk.below(root, Bound::Included(bound)))
    }

    /// Visit entries with `key > bound`.
    pub fn greater_than(&self, bound: &K) -> Result<usize> {
        self.run("greater_than", |walk, root| walk.above(root, Bound::Excluded(bound)))
    }

    /// Visit entries with `key >= bound`.
    pub fn greater_or_equal(&self, bound: &K) -> Result<usize> {
        self.run("greater_or_equal", |walk, root| walk.above(root, Bound::Included(bound)))
    }
}

impl<K, V> Default for MapIterator<K, V> {
    /// A context bound to nothing. Every walk fails with
    /// [`Error::IteratorUninitialized`].
    fn default() -> Self {
        MapIterator {
            context: Mutex::new(Context {
                map: None,
                callback: None,
                data: Some(HashMap::new()),
            }),
            state: AtomicU8::new(State::Uninitialized as u8),
            count: AtomicUsize::new(0),
        }
    }
}

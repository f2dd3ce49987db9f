//! # LLRB Map
//!
//! An in-memory ordered key-value map backed by a left-leaning red-black
//! tree, with restartable range walks that detect concurrent mutation.
//!
//! ## Core idea
//! The tree gives deterministic O(log n) insert, delete, lookup, floor and
//! ceiling. A [`MapIterator`] walks a snapshot of the tree under one of six
//! predicates (all, between, less than, less or equal, greater than, greater
//! or equal) and aborts as soon as the map's version stamp moves, so a scan
//! never reports a mix of old and new state.
//!
//! ```rust
//! use llrb_map::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! for key in [2, 4, 6] {
//!     map.insert(key, key * 100);
//! }
//!
//! assert_eq!(map.floor(&5), Some((&4, &400)));
//! assert_eq!(map.ceiling(&5), Some((&6, &600)));
//! assert_eq!(map.floor(&0), None);
//! ```

pub mod error;
pub mod hash;
pub mod iterator;
pub mod options;
pub mod tree;
pub mod types;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use iterator::{Callback, IteratorBuilder, MapIterator};
pub use options::Options;
pub use tree::stats::Stats;
pub use tree::{OrderedMap, SharedMap};
pub use types::{Key, NilKey};

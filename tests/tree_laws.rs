//! Property-based tests for OrderedMap.
//!
//! Random insert/delete sequences are replayed against `BTreeMap` as a model;
//! after every sequence the tree must agree with the model and pass
//! `validate()`.

use std::collections::BTreeMap;

use llrb_map::OrderedMap;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i16, i32),
    Delete(i16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<i16>(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => any::<i16>().prop_map(Op::Delete),
    ]
}

/// Narrow key space so deletes regularly hit existing keys.
fn dense_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i16..64, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (0i16..64).prop_map(Op::Delete),
    ]
}

fn replay(ops: &[Op]) -> (OrderedMap<i16, i32>, BTreeMap<i16, i32>) {
    let mut map = OrderedMap::new();
    let mut model = BTreeMap::new();
    for op in ops {
        match *op {
            Op::Insert(k, v) => {
                map.insert(k, v);
                model.insert(k, v);
            }
            Op::Delete(k) => {
                assert_eq!(map.delete(&k), model.remove(&k));
            }
        }
    }
    (map, model)
}

// =============================================================================
// Structural Invariants
// =============================================================================

proptest! {
    /// Law: any operation sequence leaves a valid LLRB tree.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 0..200)) {
        let (map, model) = replay(&ops);
        let stats = map.validate();
        prop_assert!(stats.is_ok(), "{:?}", stats);
        prop_assert_eq!(map.count(), model.len());
    }

    /// Law: invariants also hold when deletes mostly hit present keys.
    #[test]
    fn prop_invariants_hold_dense(ops in prop::collection::vec(dense_op(), 0..300)) {
        let (map, model) = replay(&ops);
        prop_assert!(map.validate().is_ok());
        prop_assert_eq!(map.count(), model.len());
    }
}

// =============================================================================
// Model Agreement
// =============================================================================

proptest! {
    /// Law: in-order iteration equals the model's ordered contents.
    #[test]
    fn prop_iteration_matches_model(ops in prop::collection::vec(dense_op(), 0..200)) {
        let (map, model) = replay(&ops);
        let entries: Vec<(i16, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(i16, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// Law: get after insert returns the inserted value.
    #[test]
    fn prop_get_insert_law(ops in prop::collection::vec(op(), 0..50), key: i16, value: i32) {
        let (mut map, _) = replay(&ops);
        map.insert(key, value);
        prop_assert_eq!(map.get(&key), Some(&value));
    }

    /// Law: get after delete returns None.
    #[test]
    fn prop_get_delete_law(ops in prop::collection::vec(op(), 0..50), key: i16) {
        let (mut map, _) = replay(&ops);
        map.delete(&key);
        prop_assert_eq!(map.get(&key), None);
    }

    /// Law: floor and ceiling agree with the model's range queries.
    #[test]
    fn prop_floor_ceiling_match_model(ops in prop::collection::vec(dense_op(), 0..100), probe in -4i16..68) {
        let (map, model) = replay(&ops);
        let floor = model.range(..=probe).next_back().map(|(k, _)| *k);
        let ceiling = model.range(probe..).next().map(|(k, _)| *k);
        prop_assert_eq!(map.floor(&probe).map(|(k, _)| *k), floor);
        prop_assert_eq!(map.ceiling(&probe).map(|(k, _)| *k), ceiling);
    }

    /// Law: min and max agree with the model.
    #[test]
    fn prop_min_max_match_model(ops in prop::collection::vec(dense_op(), 0..100)) {
        let (map, model) = replay(&ops);
        prop_assert_eq!(map.min().map(|(k, _)| *k), model.keys().next().copied());
        prop_assert_eq!(map.max().map(|(k, _)| *k), model.keys().next_back().copied());
    }
}

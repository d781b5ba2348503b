//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and check each
//! collection against a plain sorted `Vec` model after every step, along
//! with the structural invariants (heap property, skip list links).

use proptest::prelude::*;
use rust_ordered_collections::{
    NaturalOrder, PairKeyOrder, PriorityQueue, Reversed, SkipList, SkipListConfig,
};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
enum Op {
    Add(i32),
    Take,
    TakeLast,
    Remove(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-50i32..50).prop_map(Op::Add),
        1 => Just(Op::Take),
        1 => Just(Op::TakeLast),
        2 => (-50i32..50).prop_map(Op::Remove),
    ]
}

fn multiset(items: &[i32]) -> FxHashMap<i32, usize> {
    let mut counts = FxHashMap::default();
    for &x in items {
        *counts.entry(x).or_insert(0) += 1;
    }
    counts
}

/// Removes one occurrence of `x` from a sorted model
fn model_remove(model: &mut Vec<i32>, x: i32) -> bool {
    match model.binary_search(&x) {
        Ok(i) => {
            model.remove(i);
            true
        }
        Err(_) => false,
    }
}

/// Test that every operation keeps the heap property and returns the model's
/// answer. `TakeLast` has no heap counterpart and is treated as `Take`.
fn test_queue_against_model(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut queue = PriorityQueue::new();
    let mut model: Vec<i32> = Vec::new();

    for op in ops {
        match op {
            Op::Add(x) => {
                queue.add(x);
                let at = model.partition_point(|&m| m <= x);
                model.insert(at, x);
            }
            Op::Take | Op::TakeLast => match model.pop() {
                Some(expected) => prop_assert_eq!(queue.take(), Ok(expected)),
                None => prop_assert!(queue.take().is_err()),
            },
            Op::Remove(x) => {
                prop_assert_eq!(queue.remove(&x), model_remove(&mut model, x));
            }
        }

        prop_assert!(queue.verify_heap_property());
        prop_assert_eq!(queue.len(), model.len());
        prop_assert!(queue.capacity() >= queue.len());
        match model.last() {
            Some(max) => prop_assert_eq!(queue.peek(), Ok(max)),
            None => prop_assert!(queue.peek().is_err()),
        }
    }

    let descending: Vec<i32> = model.iter().rev().copied().collect();
    prop_assert_eq!(queue.to_vec(), descending);
    Ok(())
}

/// Test that N adds followed by N takes come out non-increasing and form a
/// permutation of the input
fn test_queue_take_order(values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut queue: PriorityQueue<i32> = values.iter().copied().collect();
    let mut taken = Vec::with_capacity(values.len());
    while let Ok(x) = queue.take() {
        taken.push(x);
    }

    prop_assert!(taken.windows(2).all(|w| w[0] >= w[1]));
    prop_assert_eq!(multiset(&taken), multiset(&values));
    Ok(())
}

/// Test that removing arbitrary positions keeps the heap property, whichever
/// direction the moved element has to travel
fn test_queue_remove_anywhere(
    values: Vec<i32>,
    removals: Vec<usize>,
) -> Result<(), TestCaseError> {
    let mut queue: PriorityQueue<i32> = values.iter().copied().collect();
    let mut model = values;
    model.sort_unstable();

    for pick in removals {
        if model.is_empty() {
            break;
        }
        let x = model[pick % model.len()];
        prop_assert!(queue.remove(&x));
        model_remove(&mut model, x);
        prop_assert!(queue.verify_heap_property());
    }
    model.reverse();
    prop_assert_eq!(queue.into_sorted_vec(), model);
    Ok(())
}

/// Test that every operation keeps the skip list links consistent and its
/// contents equal to the model
fn test_skiplist_against_model(ops: Vec<Op>, seed: u64) -> Result<(), TestCaseError> {
    let config = SkipListConfig::default().with_seed(seed);
    let mut list = SkipList::with_config(NaturalOrder, config).unwrap();
    let mut model: Vec<i32> = Vec::new();

    for op in ops {
        match op {
            Op::Add(x) => {
                list.add(x);
                let at = model.partition_point(|&m| m <= x);
                model.insert(at, x);
            }
            Op::Take => {
                if model.is_empty() {
                    prop_assert!(list.take().is_err());
                } else {
                    prop_assert_eq!(list.take(), Ok(model.remove(0)));
                }
            }
            Op::TakeLast => match model.pop() {
                Some(expected) => prop_assert_eq!(list.take_last(), Ok(expected)),
                None => prop_assert!(list.take_last().is_err()),
            },
            Op::Remove(x) => {
                prop_assert_eq!(list.remove(&x), model_remove(&mut model, x));
            }
        }

        prop_assert!(list.verify_links());
        prop_assert_eq!(list.len(), model.len());
        prop_assert_eq!(list.first().ok(), model.first());
        prop_assert_eq!(list.last().ok(), model.last());
    }

    prop_assert_eq!(list.to_vec(), model);
    Ok(())
}

/// Test floor, ceiling and contains against the model for every probe key
fn test_skiplist_queries(values: Vec<i32>, probes: Vec<i32>) -> Result<(), TestCaseError> {
    let list: SkipList<i32> = values.iter().copied().collect();
    let mut model = values;
    model.sort_unstable();

    for key in probes {
        let floor = model.iter().rev().find(|&&m| m <= key);
        let ceiling = model.iter().find(|&&m| m >= key);
        prop_assert_eq!(list.floor(&key), floor);
        prop_assert_eq!(list.ceiling(&key), ceiling);
        prop_assert_eq!(list.contains(&key), model.binary_search(&key).is_ok());
    }
    Ok(())
}

/// Test range against a filtered model for every combination of bounds
fn test_skiplist_range(
    values: Vec<i32>,
    from: i32,
    to: i32,
    include_from: bool,
    include_to: bool,
) -> Result<(), TestCaseError> {
    let list: SkipList<i32> = values.iter().copied().collect();
    let mut model = values;
    model.sort_unstable();

    let expected: Vec<i32> = model
        .into_iter()
        .filter(|&x| if include_from { x >= from } else { x > from })
        .filter(|&x| if include_to { x <= to } else { x < to })
        .collect();
    let actual: Vec<i32> = list.range(&from, &to, include_from, include_to).copied().collect();
    prop_assert_eq!(actual, expected);
    Ok(())
}

/// Test that copying out and rebuilding reproduces the same multiset
fn test_copy_round_trip(values: Vec<i32>, offset: usize) -> Result<(), TestCaseError> {
    let queue: PriorityQueue<i32> = values.iter().copied().collect();
    let list: SkipList<i32> = values.iter().copied().collect();

    let mut buffer = vec![0; offset + values.len()];
    queue.copy_to(&mut buffer, offset).unwrap();
    let rebuilt: SkipList<i32> = buffer[offset..].iter().copied().collect();
    prop_assert_eq!(multiset(&rebuilt.to_vec()), multiset(&values));

    list.copy_to(&mut buffer, offset).unwrap();
    let rebuilt: PriorityQueue<i32> = buffer[offset..].iter().copied().collect();
    prop_assert_eq!(multiset(&rebuilt.to_vec()), multiset(&values));
    Ok(())
}

/// Test that a reversed comparer turns the queue into a min-queue
fn test_min_queue_order(values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut queue = PriorityQueue::with_comparer(Reversed(NaturalOrder));
    queue.extend(values.iter().copied());
    prop_assert!(queue.verify_heap_property());

    let mut expected = values;
    expected.sort_unstable();
    prop_assert_eq!(queue.into_sorted_vec(), expected);
    Ok(())
}

/// Test that pairs with equal keys keep insertion order in the skip list
fn test_pair_insertion_order(keys: Vec<u8>) -> Result<(), TestCaseError> {
    let mut list = SkipList::with_comparer(PairKeyOrder::new());
    for (i, &k) in keys.iter().enumerate() {
        list.add((k, i));
    }

    let items = list.to_vec();
    for w in items.windows(2) {
        prop_assert!(w[0].0 <= w[1].0);
        if w[0].0 == w[1].0 {
            prop_assert!(w[0].1 < w[1].1);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_priority_queue_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        test_queue_against_model(ops)?;
    }

    #[test]
    fn test_priority_queue_take_order(values in prop::collection::vec(-1000i32..1000, 0..300)) {
        test_queue_take_order(values)?;
    }

    #[test]
    fn test_priority_queue_remove_anywhere(
        values in prop::collection::vec(-20i32..20, 1..120),
        removals in prop::collection::vec(0usize..1000, 0..120)
    ) {
        test_queue_remove_anywhere(values, removals)?;
    }

    #[test]
    fn test_priority_queue_min_order(values in prop::collection::vec(-100i32..100, 0..100)) {
        test_min_queue_order(values)?;
    }

    #[test]
    fn test_skiplist_model(ops in prop::collection::vec(op_strategy(), 0..200), seed in any::<u64>()) {
        test_skiplist_against_model(ops, seed)?;
    }

    #[test]
    fn test_skiplist_floor_ceiling(
        values in prop::collection::vec(-100i32..100, 0..100),
        probes in prop::collection::vec(-110i32..110, 1..50)
    ) {
        test_skiplist_queries(values, probes)?;
    }

    #[test]
    fn test_skiplist_ranges(
        values in prop::collection::vec(-30i32..30, 0..80),
        from in -35i32..35,
        to in -35i32..35,
        include_from in any::<bool>(),
        include_to in any::<bool>()
    ) {
        test_skiplist_range(values, from, to, include_from, include_to)?;
    }

    #[test]
    fn test_copy_to_round_trip(
        values in prop::collection::vec(-100i32..100, 0..100),
        offset in 0usize..10
    ) {
        test_copy_round_trip(values, offset)?;
    }

    #[test]
    fn test_skiplist_pair_order(keys in prop::collection::vec(0u8..8, 0..100)) {
        test_pair_insertion_order(keys)?;
    }
}

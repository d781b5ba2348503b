//! Ordered Collections for Rust
//!
//! This crate provides generic ordered collections, each in a single-threaded
//! and a thread-safe flavour, parameterised by a pluggable ordering policy.
//!
//! # Features
//!
//! - **Priority Queue**: resizable binary max-heap; O(log n) add and take, O(1) peek,
//!   capacity doubles when full and halves when a quarter full
//! - **Skip List**: probabilistic sorted list; expected O(log n) add, remove and contains,
//!   O(1) first/last, floor/ceiling and range queries, with a locality cache for nearby lookups
//! - **Concurrent variants**: both wrapped behind one reader/writer lock with upgradable
//!   reads, so search-then-mutate operations are atomic
//! - **Ordering policies**: natural order, closures, reversed order and key-only pair order
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::{PriorityQueue, Reversed, NaturalOrder, SkipList};
//!
//! let mut queue = PriorityQueue::new();
//! queue.add(3);
//! queue.add(7);
//! queue.add(5);
//! assert_eq!(queue.take(), Ok(7));
//!
//! let mut min_queue = PriorityQueue::with_comparer(Reversed(NaturalOrder));
//! min_queue.extend([3, 7, 5]);
//! assert_eq!(min_queue.take(), Ok(3));
//!
//! let list: SkipList<i32> = [1, 3, 5].into_iter().collect();
//! assert_eq!(list.floor(&4), Some(&3));
//! ```

pub mod concurrent_priority_queue;
pub mod concurrent_skiplist;
pub mod heap_ops;
pub mod ordering;
pub mod priority_queue;
pub mod skiplist;
pub mod traits;

pub use concurrent_priority_queue::ConcurrentPriorityQueue;
pub use concurrent_skiplist::ConcurrentSkipList;
pub use ordering::{Comparer, NaturalOrder, PairKeyOrder, Reversed};
pub use priority_queue::PriorityQueue;
pub use skiplist::{SkipList, SkipListConfig};
pub use traits::{Collection, CollectionError, ProducerConsumer};

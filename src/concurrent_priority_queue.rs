//! Thread-safe max-priority queue
//!
//! [`ConcurrentPriorityQueue`] wraps a [`PriorityQueue`] behind a single
//! `parking_lot` reader/writer lock with upgradable reads:
//!
//! | Operation                                      | Lock                                 |
//! |------------------------------------------------|--------------------------------------|
//! | `peek`, `contains`, `copy_to`, `to_array`, `iter` | shared                            |
//! | `add`, `take`, `clear`                         | exclusive                            |
//! | `remove`, `try_take`                           | upgradable, escalated to exclusive only to mutate |
//!
//! An upgradable reader excludes writers and other upgradable readers but not
//! plain readers, so `remove` can run its O(n) search while `peek` calls
//! proceed, and nothing can change the queue between the search and the
//! removal. Locks are only ever taken in the order upgradable → exclusive,
//! and every guard is released by scope exit.
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::ConcurrentPriorityQueue;
//! use std::thread;
//!
//! let queue = ConcurrentPriorityQueue::new();
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let queue = &queue;
//!         s.spawn(move || {
//!             for i in 0..100 {
//!                 queue.add(t * 100 + i);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(queue.len(), 400);
//! assert_eq!(queue.take(), Ok(399));
//! assert_eq!(queue.try_take(), Some(398));
//! ```

use crate::ordering::{Comparer, NaturalOrder};
use crate::priority_queue::PriorityQueue;
use crate::traits::{CollectionError, ProducerConsumer};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;

/// A thread-safe heap-based resizable max-priority queue
pub struct ConcurrentPriorityQueue<T, C = NaturalOrder> {
    inner: RwLock<PriorityQueue<T, C>>,
}

impl<T: Ord> ConcurrentPriorityQueue<T> {
    /// Creates an empty queue with the default capacity using the natural
    /// order of `T`.
    pub fn new() -> Self {
        Self::from_queue(PriorityQueue::new())
    }

    /// Creates an empty queue with the given initial capacity.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, CollectionError> {
        PriorityQueue::with_capacity(capacity).map(Self::from_queue)
    }
}

impl<T, C: Comparer<T>> ConcurrentPriorityQueue<T, C> {
    /// Creates an empty queue ordered by `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self::from_queue(PriorityQueue::with_comparer(comparer))
    }

    /// Creates an empty queue with the given capacity ordered by `comparer`.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `capacity` is zero.
    pub fn with_capacity_and_comparer(
        capacity: usize,
        comparer: C,
    ) -> Result<Self, CollectionError> {
        PriorityQueue::with_capacity_and_comparer(capacity, comparer).map(Self::from_queue)
    }

    /// Wraps an existing queue.
    pub fn from_queue(queue: PriorityQueue<T, C>) -> Self {
        Self {
            inner: RwLock::new(queue),
        }
    }

    /// Unwraps the underlying single-threaded queue.
    pub fn into_inner(self) -> PriorityQueue<T, C> {
        self.inner.into_inner()
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the current capacity
    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Inserts an element under the exclusive lock.
    pub fn add(&self, item: T) {
        self.inner.write().add(item);
    }

    /// Inserts an element. The queue is unbounded, so this always succeeds.
    pub fn try_add(&self, item: T) -> bool {
        self.add(item);
        true
    }

    /// Removes and returns the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the queue is empty.
    pub fn take(&self) -> Result<T, CollectionError> {
        self.inner.write().take()
    }

    /// Removes and returns the greatest element, or `None` if the queue is
    /// empty.
    ///
    /// The emptiness check runs under an upgradable lock, so a concurrent
    /// taker cannot empty the queue between the check and the removal.
    pub fn try_take(&self) -> Option<T> {
        let guard = self.inner.upgradable_read();
        if guard.is_empty() {
            return None;
        }
        let mut queue = RwLockUpgradableReadGuard::upgrade(guard);
        queue.take().ok()
    }

    /// Returns a copy of the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the queue is empty.
    pub fn peek(&self) -> Result<T, CollectionError>
    where
        T: Clone,
    {
        self.inner.read().peek().cloned()
    }

    /// Returns true if some element compares equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.inner.read().contains(item)
    }

    /// Removes one element comparing equal to `item`.
    ///
    /// The linear search runs under an upgradable lock; the lock is escalated
    /// to exclusive only once a match is found. A match at the root is
    /// removed exactly as [`take`](Self::take) would remove it.
    pub fn remove(&self, item: &T) -> bool {
        let guard = self.inner.upgradable_read();
        let Some(index) = guard.position(item) else {
            return false;
        };
        let mut queue = RwLockUpgradableReadGuard::upgrade(guard);
        queue.remove_at(index);
        true
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Copies every element into `dest[offset..]`, greatest first, under the
    /// shared lock.
    ///
    /// # Errors
    /// See [`PriorityQueue::copy_to`].
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        self.inner.read().copy_to(dest, offset)
    }

    /// Returns a sorted snapshot, greatest first, taken under one shared lock.
    pub fn to_array(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read().to_vec()
    }

    /// Returns an iterator over a sorted snapshot of the queue.
    pub fn iter(&self) -> std::vec::IntoIter<T>
    where
        T: Clone,
    {
        self.to_array().into_iter()
    }

    /// Checks the heap property under the shared lock.
    pub fn verify_heap_property(&self) -> bool {
        self.inner.read().verify_heap_property()
    }
}

impl<T, C> ProducerConsumer<T> for ConcurrentPriorityQueue<T, C>
where
    T: Clone + Send + Sync,
    C: Comparer<T> + Send + Sync,
{
    fn len(&self) -> usize {
        ConcurrentPriorityQueue::len(self)
    }

    fn add(&self, item: T) {
        ConcurrentPriorityQueue::add(self, item)
    }

    fn take(&self) -> Result<T, CollectionError> {
        ConcurrentPriorityQueue::take(self)
    }

    fn peek(&self) -> Result<T, CollectionError> {
        ConcurrentPriorityQueue::peek(self)
    }

    fn contains(&self, item: &T) -> bool {
        ConcurrentPriorityQueue::contains(self, item)
    }

    fn remove(&self, item: &T) -> bool {
        ConcurrentPriorityQueue::remove(self, item)
    }

    fn clear(&self) {
        ConcurrentPriorityQueue::clear(self)
    }

    fn try_take(&self) -> Option<T> {
        ConcurrentPriorityQueue::try_take(self)
    }

    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError> {
        ConcurrentPriorityQueue::copy_to(self, dest, offset)
    }

    fn to_array(&self) -> Vec<T> {
        ConcurrentPriorityQueue::to_array(self)
    }
}

impl<T: Ord> Default for ConcurrentPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparer<T>> From<PriorityQueue<T, C>> for ConcurrentPriorityQueue<T, C> {
    fn from(queue: PriorityQueue<T, C>) -> Self {
        Self::from_queue(queue)
    }
}

impl<T: Ord> FromIterator<T> for ConcurrentPriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_queue(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for ConcurrentPriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentPriorityQueue")
            .field("inner", &*self.inner.read())
            .finish()
    }
}

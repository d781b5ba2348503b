//! Resizable array-backed max-priority queue
//!
//! [`PriorityQueue`] is a binary max-heap stored in a contiguous buffer. The
//! element that compares greatest under the queue's [`Comparer`] is served
//! first; equal elements are all kept.
//!
//! # Capacity policy
//!
//! The queue tracks an explicit capacity rather than relying on `Vec`'s
//! amortised growth:
//!
//! - When an insert finds the buffer full, capacity doubles.
//! - After a removal, if the remaining count is at most a quarter of the
//!   capacity **and** still above [`DEFAULT_CAPACITY`], capacity halves. The
//!   lower bound keeps small queues from thrashing between sizes.
//!
//! # Time Complexity
//!
//! | Operation            | Complexity          |
//! |----------------------|---------------------|
//! | `add`                | O(log n) amortized  |
//! | `take`               | O(log n) amortized  |
//! | `peek`               | O(1)                |
//! | `contains`, `remove` | O(n)                |
//! | `copy_to`, `to_vec`  | O(n log n)          |
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::PriorityQueue;
//!
//! let mut queue = PriorityQueue::with_capacity(3).unwrap();
//! queue.add(1);
//! queue.add(2);
//! queue.add(3);
//! assert_eq!(queue.capacity(), 3);
//!
//! queue.add(4);
//! assert_eq!(queue.capacity(), 6);
//! assert_eq!(queue.to_vec(), vec![4, 3, 2, 1]);
//!
//! assert_eq!(queue.take(), Ok(4));
//! assert_eq!(queue.peek(), Ok(&3));
//! ```

use crate::heap_ops;
use crate::ordering::{Comparer, NaturalOrder};
use crate::traits::{check_destination, Collection, CollectionError};
use std::fmt;

/// Capacity used by [`PriorityQueue::new`] and restored by
/// [`PriorityQueue::clear`]. Shrinking never happens at or below this count.
pub const DEFAULT_CAPACITY: usize = 10;

/// The queue shrinks once it is at most `1 / SHRINK_RATIO` full.
const SHRINK_RATIO: usize = 4;

/// Growth and shrink factor.
const RESIZE_FACTOR: usize = 2;

/// A heap-based resizable max-priority queue
///
/// Priority is defined by comparing the elements themselves. To separate a
/// priority from a payload, store `(priority, payload)` pairs and order them
/// with [`PairKeyOrder`](crate::ordering::PairKeyOrder).
///
/// Iteration order (and the order produced by [`copy_to`](Self::copy_to) and
/// [`to_vec`](Self::to_vec)) is fully sorted, greatest first, not the raw
/// heap layout.
#[derive(Clone)]
pub struct PriorityQueue<T, C = NaturalOrder> {
    /// Live elements in heap order; `data[0]` is the maximum
    data: Vec<T>,
    /// Logical capacity, independent of the allocator's rounding
    capacity: usize,
    comparer: C,
}

impl<T: Ord> PriorityQueue<T> {
    /// Creates an empty queue with [`DEFAULT_CAPACITY`] using the natural
    /// order of `T`.
    pub fn new() -> Self {
        Self::with_comparer(NaturalOrder)
    }

    /// Creates an empty queue with the given initial capacity.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, CollectionError> {
        Self::with_capacity_and_comparer(capacity, NaturalOrder)
    }
}

impl<T, C: Comparer<T>> PriorityQueue<T, C> {
    /// Creates an empty queue with [`DEFAULT_CAPACITY`] ordered by `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            data: Vec::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
            comparer,
        }
    }

    /// Creates an empty queue with the given capacity ordered by `comparer`.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `capacity` is zero.
    pub fn with_capacity_and_comparer(
        capacity: usize,
        comparer: C,
    ) -> Result<Self, CollectionError> {
        if capacity == 0 {
            return Err(CollectionError::InvalidConfiguration(
                "capacity must be greater than zero",
            ));
        }
        Ok(Self {
            data: Vec::with_capacity(capacity),
            capacity,
            comparer,
        })
    }

    /// Returns the number of elements in the queue
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the queue's ordering policy
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Inserts an element.
    ///
    /// Doubles the capacity first if the queue is full, then sifts the new
    /// element up from the first free slot.
    pub fn add(&mut self, item: T) {
        if self.data.len() == self.capacity {
            self.grow();
        }
        self.data.push(item);
        let position = self.data.len();
        heap_ops::sift_up(&mut self.data, position, &self.comparer);
    }

    /// Removes and returns the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the queue is empty.
    pub fn take(&mut self) -> Result<T, CollectionError> {
        if self.data.is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        Ok(self.remove_at(0))
    }

    /// Returns the greatest element without removing it.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the queue is empty.
    pub fn peek(&self) -> Result<&T, CollectionError> {
        self.data.first().ok_or(CollectionError::EmptyCollection)
    }

    /// Returns true if some element compares equal to `item`. O(n).
    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Removes the first element (in heap order) comparing equal to `item`.
    ///
    /// Returns false if there is no such element. O(n).
    pub fn remove(&mut self, item: &T) -> bool {
        match self.position(item) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Removes every element and resets capacity to [`DEFAULT_CAPACITY`].
    pub fn clear(&mut self) {
        self.data = Vec::with_capacity(DEFAULT_CAPACITY);
        self.capacity = DEFAULT_CAPACITY;
    }

    /// Copies every element into `dest[offset..]`, greatest first.
    ///
    /// # Errors
    /// Returns [`CollectionError::OffsetOutOfRange`] if `offset` lies past the
    /// end of `dest`, or [`CollectionError::InsufficientSpace`] if fewer than
    /// `len()` slots remain after it.
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        check_destination(dest, offset, self.data.len())?;
        let target = &mut dest[offset..offset + self.data.len()];
        target.clone_from_slice(&self.data);
        // The copied range is itself a valid heap, so it can be sorted in place.
        heap_ops::heap_sort(target, &self.comparer);
        Ok(())
    }

    /// Returns the elements sorted greatest first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items = self.data.clone();
        heap_ops::heap_sort(&mut items, &self.comparer);
        items
    }

    /// Consumes the queue, returning its elements sorted greatest first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        let mut items = self.data;
        heap_ops::heap_sort(&mut items, &self.comparer);
        items
    }

    /// Returns a snapshot iterator over the elements, greatest first.
    ///
    /// The iterator owns copies of the elements; it does not observe later
    /// changes to the queue.
    pub fn iter(&self) -> std::vec::IntoIter<T>
    where
        T: Clone,
    {
        self.to_vec().into_iter()
    }

    /// Checks that every element compares greater than or equal to both of
    /// its children.
    pub fn verify_heap_property(&self) -> bool {
        heap_ops::is_heap(&self.data, &self.comparer)
    }

    /// Index (0-based, heap order) of the first element equal to `item`
    pub(crate) fn position(&self, item: &T) -> Option<usize> {
        self.data
            .iter()
            .position(|candidate| self.comparer.compare(candidate, item).is_eq())
    }

    /// Removes the element at a 0-based heap index and restores the heap.
    ///
    /// The last element is moved into the vacated slot. Only one heap
    /// direction can be violated by that single move: if the moved element
    /// is at least its new parent it can only need to rise, otherwise it can
    /// only need to sink.
    pub(crate) fn remove_at(&mut self, index: usize) -> T {
        let item = self.data.swap_remove(index);
        let count = self.data.len();

        if index < count {
            let position = index + 1;
            let parent = position / 2;
            if parent >= 1
                && self
                    .comparer
                    .greater_or_equal(&self.data[position - 1], &self.data[parent - 1])
            {
                heap_ops::sift_up(&mut self.data, position, &self.comparer);
            } else {
                heap_ops::sink(&mut self.data, position, count, &self.comparer);
            }
        }

        self.shrink_if_sparse();
        item
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * RESIZE_FACTOR;
        self.data.reserve_exact(new_capacity - self.data.len());
        tracing::trace!(
            old_capacity = self.capacity,
            new_capacity,
            len = self.data.len(),
            "grew priority queue"
        );
        self.capacity = new_capacity;
    }

    fn shrink_if_sparse(&mut self) {
        let count = self.data.len();
        if count <= self.capacity / SHRINK_RATIO && count > DEFAULT_CAPACITY {
            let new_capacity = self.capacity / RESIZE_FACTOR;
            self.data.shrink_to(new_capacity);
            tracing::trace!(
                old_capacity = self.capacity,
                new_capacity,
                len = count,
                "shrank priority queue"
            );
            self.capacity = new_capacity;
        }
    }
}

impl<T, C: Comparer<T>> Collection<T> for PriorityQueue<T, C> {
    fn len(&self) -> usize {
        PriorityQueue::len(self)
    }

    fn add(&mut self, item: T) {
        PriorityQueue::add(self, item)
    }

    fn take(&mut self) -> Result<T, CollectionError> {
        PriorityQueue::take(self)
    }

    fn peek(&self) -> Result<&T, CollectionError> {
        PriorityQueue::peek(self)
    }

    fn contains(&self, item: &T) -> bool {
        PriorityQueue::contains(self, item)
    }

    fn remove(&mut self, item: &T) -> bool {
        PriorityQueue::remove(self, item)
    }

    fn clear(&mut self) {
        PriorityQueue::clear(self)
    }

    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        PriorityQueue::copy_to(self, dest, offset)
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        PriorityQueue::to_vec(self)
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.data.len())
            .field("capacity", &self.capacity)
            .field("heap", &self.data)
            .finish()
    }
}

impl<T, C: Comparer<T>> Extend<T> for PriorityQueue<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for PriorityQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T, C: Comparer<T>> IntoIterator for PriorityQueue<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_sorted_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::{PairKeyOrder, Reversed};

    #[test]
    fn test_basic_operations() {
        let mut queue = PriorityQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.add(3);
        queue.add(1);
        queue.add(2);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek(), Ok(&3));
        assert_eq!(queue.take(), Ok(3));
        assert_eq!(queue.take(), Ok(2));
        assert_eq!(queue.take(), Ok(1));
        assert_eq!(queue.take(), Err(CollectionError::EmptyCollection));
        assert_eq!(queue.peek(), Err(CollectionError::EmptyCollection));
    }

    #[test]
    fn test_interleaved_take() {
        let mut queue = PriorityQueue::new();
        queue.add(1);
        assert_eq!(queue.take(), Ok(1));
        assert_eq!(queue.len(), 0);

        queue.add(0);
        queue.add(1);
        queue.add(2);
        assert_eq!(queue.take(), Ok(2));
        assert_eq!(queue.take(), Ok(1));
        queue.add(3);
        assert_eq!(queue.take(), Ok(3));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take(), Ok(0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capacity_doubles_when_full() {
        let mut queue = PriorityQueue::with_capacity(3).unwrap();
        for i in 1..=3 {
            queue.add(i);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.capacity(), 3);

        queue.add(4);
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.capacity(), 6);
        assert_eq!(queue.to_vec(), vec![4, 3, 2, 1]);

        queue.add(0);
        assert_eq!(queue.to_vec(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            PriorityQueue::<i32>::with_capacity(0),
            Err(CollectionError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_capacity_shrinks_when_sparse() {
        let mut queue = PriorityQueue::new();
        for i in 0..100 {
            queue.add(i);
        }
        assert_eq!(queue.capacity(), 160);

        while queue.len() > 30 {
            queue.take().unwrap();
        }
        assert_eq!(queue.capacity(), 80);

        while queue.len() > DEFAULT_CAPACITY {
            queue.take().unwrap();
        }
        assert_eq!(queue.capacity(), 40);

        // At or below the default floor the capacity stays put
        while !queue.is_empty() {
            queue.take().unwrap();
        }
        assert_eq!(queue.capacity(), 40);
    }

    #[test]
    fn test_clear_resets_capacity() {
        let mut queue = PriorityQueue::with_capacity(2).unwrap();
        queue.extend(0..20);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
        assert!(!queue.contains(&1));
    }

    #[test]
    fn test_remove_root_and_inner() {
        let mut queue: PriorityQueue<i32> = (0..10).collect();
        assert!(queue.remove(&9));
        assert_eq!(queue.peek(), Ok(&8));
        assert!(queue.remove(&4));
        assert!(!queue.remove(&4));
        assert!(!queue.remove(&42));
        assert!(queue.verify_heap_property());
        assert_eq!(queue.to_vec(), vec![8, 7, 6, 5, 3, 2, 1, 0]);
    }

    #[test]
    fn test_remove_moved_element_sifts_up() {
        // Heap layout [10, 9, 3, 8, 7, 2, 1, 6]: removing 2 moves 6 under 3
        let mut queue = PriorityQueue::new();
        for x in [10, 9, 3, 8, 7, 2, 1, 6] {
            queue.add(x);
        }
        assert!(queue.remove(&2));
        assert!(queue.verify_heap_property());
        assert_eq!(queue.to_vec(), vec![10, 9, 8, 7, 6, 3, 1]);
    }

    #[test]
    fn test_remove_moved_element_sinks() {
        let mut queue = PriorityQueue::new();
        for x in [10, 9, 8, 7, 6, 5, 4, 1] {
            queue.add(x);
        }
        assert!(queue.remove(&9));
        assert!(queue.verify_heap_property());
        assert_eq!(queue.to_vec(), vec![10, 8, 7, 6, 5, 4, 1]);
    }

    #[test]
    fn test_remove_last_element() {
        let mut queue: PriorityQueue<i32> = [5, 1].into_iter().collect();
        assert!(queue.remove(&1));
        assert_eq!(queue.to_vec(), vec![5]);
    }

    #[test]
    fn test_duplicates() {
        let mut queue = PriorityQueue::new();
        queue.add(1);
        queue.add(1);
        queue.add(1);
        assert_eq!(queue.len(), 3);
        assert!(queue.remove(&1));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(), Ok(1));
        assert_eq!(queue.take(), Ok(1));
    }

    #[test]
    fn test_copy_to() {
        let queue: PriorityQueue<i32> = (0..10).collect();

        assert_eq!(
            queue.copy_to(&mut [0; 10], 11),
            Err(CollectionError::OffsetOutOfRange { offset: 11, len: 10 })
        );
        assert_eq!(
            queue.copy_to(&mut [0; 1], 0),
            Err(CollectionError::InsufficientSpace {
                needed: 10,
                available: 1
            })
        );

        let mut result = [0; 10];
        queue.copy_to(&mut result, 0).unwrap();
        assert_eq!(result, [9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);

        let mut result = [-1; 11];
        queue.copy_to(&mut result, 1).unwrap();
        assert_eq!(result[0], -1);
        assert_eq!(&result[1..], &[9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);

        // The queue itself is untouched
        assert_eq!(queue.len(), 10);
        assert!(queue.verify_heap_property());
    }

    #[test]
    fn test_iteration_is_sorted_snapshot() {
        let mut queue: PriorityQueue<i32> = [5, 3, 8, 1].into_iter().collect();
        let snapshot = queue.iter();
        queue.add(100);
        assert_eq!(snapshot.collect::<Vec<_>>(), vec![8, 5, 3, 1]);
        assert_eq!(queue.into_iter().collect::<Vec<_>>(), vec![100, 8, 5, 3, 1]);
    }

    #[test]
    fn test_min_queue_with_reversed_comparer() {
        let mut queue = PriorityQueue::with_comparer(Reversed(NaturalOrder));
        queue.extend([5, 2, 9, 1]);
        assert_eq!(queue.take(), Ok(1));
        assert_eq!(queue.take(), Ok(2));
    }

    #[test]
    fn test_pair_key_priorities() {
        let mut queue = PriorityQueue::with_comparer(PairKeyOrder::new());
        queue.add((2, "two"));
        queue.add((7, "seven"));
        queue.add((4, "four"));

        assert!(queue.contains(&(4, "anything")));
        assert_eq!(queue.take(), Ok((7, "seven")));
        assert!(queue.remove(&(2, "")));
        assert_eq!(queue.take(), Ok((4, "four")));
    }
}

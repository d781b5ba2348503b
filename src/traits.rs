//! Common traits for the ordered collections
//!
//! This module provides a two-tier contract:
//!
//! - [`Collection`]: single-threaded collections mutated through `&mut self`
//!   ([`PriorityQueue`](crate::priority_queue::PriorityQueue),
//!   [`SkipList`](crate::skiplist::SkipList))
//! - [`ProducerConsumer`]: thread-safe collections shared through `&self`
//!   ([`ConcurrentPriorityQueue`](crate::concurrent_priority_queue::ConcurrentPriorityQueue),
//!   [`ConcurrentSkipList`](crate::concurrent_skiplist::ConcurrentSkipList))
//!
//! Both share one error type, [`CollectionError`].

use thiserror::Error;

/// Error type for collection operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A take, peek or last-element query was made on an empty collection
    #[error("collection is empty")]
    EmptyCollection,
    /// The destination offset lies outside the destination buffer
    #[error("destination offset {offset} is out of range for a buffer of length {len}")]
    OffsetOutOfRange {
        /// Requested start offset
        offset: usize,
        /// Length of the destination buffer
        len: usize,
    },
    /// The destination buffer cannot hold every element after the offset
    #[error("insufficient space in destination: need {needed}, have {available}")]
    InsufficientSpace {
        /// Number of elements to copy
        needed: usize,
        /// Slots available after the offset
        available: usize,
    },
    /// A constructor received parameters it cannot honour
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Checks that `len` elements fit into `dest` starting at `offset`.
pub(crate) fn check_destination<T>(
    dest: &[T],
    offset: usize,
    len: usize,
) -> Result<(), CollectionError> {
    if offset > dest.len() {
        return Err(CollectionError::OffsetOutOfRange {
            offset,
            len: dest.len(),
        });
    }
    let available = dest.len() - offset;
    if available < len {
        return Err(CollectionError::InsufficientSpace {
            needed: len,
            available,
        });
    }
    Ok(())
}

/// Base trait for the single-threaded collections
///
/// The "front" of a collection is whatever [`take`](Collection::take) removes:
/// the maximum for a priority queue, the minimum for a skip list.
///
/// # Example
///
/// ```rust
/// use rust_ordered_collections::{Collection, PriorityQueue, SkipList};
///
/// fn drain<C: Collection<i32>>(mut c: C) -> Vec<i32> {
///     let mut out = Vec::new();
///     while let Ok(item) = c.take() {
///         out.push(item);
///     }
///     out
/// }
///
/// let queue: PriorityQueue<i32> = [3, 1, 2].into_iter().collect();
/// let list: SkipList<i32> = [3, 1, 2].into_iter().collect();
/// assert_eq!(drain(queue), vec![3, 2, 1]);
/// assert_eq!(drain(list), vec![1, 2, 3]);
/// ```
pub trait Collection<T> {
    /// Returns the number of elements
    fn len(&self) -> usize;

    /// Returns true if the collection holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an element. Equal elements are kept side by side.
    fn add(&mut self, item: T);

    /// Removes and returns the front element
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if there is nothing to take.
    fn take(&mut self) -> Result<T, CollectionError>;

    /// Returns the front element without removing it
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if there is nothing to peek.
    fn peek(&self) -> Result<&T, CollectionError>;

    /// Returns true if an element comparing equal to `item` is present
    fn contains(&self, item: &T) -> bool;

    /// Removes one element comparing equal to `item`
    ///
    /// Returns false if no such element exists.
    fn remove(&mut self, item: &T) -> bool;

    /// Removes every element
    fn clear(&mut self);

    /// Copies every element into `dest[offset..]` in the collection's
    /// iteration order
    ///
    /// # Errors
    /// Returns [`CollectionError::OffsetOutOfRange`] or
    /// [`CollectionError::InsufficientSpace`] if `dest` is too small; `dest`
    /// is left untouched in that case.
    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone;

    /// Returns a snapshot of the elements in iteration order
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone;
}

/// Thread-safe producer/consumer contract
///
/// Every method takes `&self`; implementations serialise access internally,
/// and every call is atomic with respect to every other call on the same
/// instance.
pub trait ProducerConsumer<T: Clone>: Send + Sync {
    /// Returns the number of elements
    fn len(&self) -> usize;

    /// Returns true if the collection holds no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an element
    fn add(&self, item: T);

    /// Removes and returns the front element
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if there is nothing to take.
    fn take(&self) -> Result<T, CollectionError>;

    /// Returns a copy of the front element
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if there is nothing to peek.
    fn peek(&self) -> Result<T, CollectionError>;

    /// Returns true if an element comparing equal to `item` is present
    fn contains(&self, item: &T) -> bool;

    /// Removes one element comparing equal to `item`
    fn remove(&self, item: &T) -> bool;

    /// Removes every element
    fn clear(&self);

    /// Inserts an element. These collections are unbounded, so this always
    /// succeeds.
    fn try_add(&self, item: T) -> bool {
        self.add(item);
        true
    }

    /// Removes and returns the front element, or `None` if empty
    fn try_take(&self) -> Option<T>;

    /// Copies every element into `dest[offset..]` under one consistent view
    ///
    /// # Errors
    /// See [`Collection::copy_to`].
    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>;

    /// Returns a consistent snapshot of the elements in iteration order
    fn to_array(&self) -> Vec<T>;
}

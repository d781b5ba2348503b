//! Thread-safe skip list
//!
//! [`ConcurrentSkipList`] wraps a [`SkipList`] behind one `parking_lot`
//! reader/writer lock, following the same discipline as
//! [`ConcurrentPriorityQueue`](crate::ConcurrentPriorityQueue):
//!
//! | Operation                                                  | Lock                                  |
//! |------------------------------------------------------------|---------------------------------------|
//! | `peek`, `first`, `last`, `floor`, `ceiling`, `range`, `to_array` | shared                          |
//! | `take`, `take_last`, `clear`                               | exclusive                             |
//! | `add`, `remove`, `try_take`                                | upgradable, escalated to mutate       |
//! | `contains`                                                 | shared search, brief exclusive to cache |
//!
//! The locality cache is mutable state even for lookups. `contains` searches
//! under the shared lock and then takes the exclusive lock only to record the
//! node it found. Another thread may unlink that node in between; the cache
//! update is skipped in that case because arena keys are generational.
//!
//! Readers never see a live cursor: `range`, `to_array` and `iter` all copy
//! the elements out under a single shared lock.
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::ConcurrentSkipList;
//! use std::thread;
//!
//! let list = ConcurrentSkipList::new();
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let list = &list;
//!         s.spawn(move || {
//!             for i in 0..50 {
//!                 list.add(i * 4 + t);
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(list.len(), 200);
//! assert_eq!(list.first(), Ok(0));
//! assert_eq!(list.last(), Ok(199));
//! assert_eq!(list.range(&10, &13, true, true), vec![10, 11, 12, 13]);
//! ```

use crate::ordering::{Comparer, NaturalOrder};
use crate::skiplist::{SkipList, SkipListConfig};
use crate::traits::{CollectionError, ProducerConsumer};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;

/// A thread-safe sorted multi-level linked list
pub struct ConcurrentSkipList<T, C = NaturalOrder> {
    inner: RwLock<SkipList<T, C>>,
}

impl<T: Ord> ConcurrentSkipList<T> {
    /// Creates an empty list using the natural order of `T`.
    pub fn new() -> Self {
        Self::from_list(SkipList::new())
    }
}

impl<T, C: Comparer<T>> ConcurrentSkipList<T, C> {
    /// Creates an empty list ordered by `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self::from_list(SkipList::with_comparer(comparer))
    }

    /// Creates an empty list ordered by `comparer` with explicit parameters.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `config` is
    /// rejected by [`SkipListConfig::validate`].
    pub fn with_config(comparer: C, config: SkipListConfig) -> Result<Self, CollectionError> {
        SkipList::with_config(comparer, config).map(Self::from_list)
    }

    /// Wraps an existing list.
    pub fn from_list(list: SkipList<T, C>) -> Self {
        Self {
            inner: RwLock::new(list),
        }
    }

    /// Unwraps the underlying single-threaded list.
    pub fn into_inner(self) -> SkipList<T, C> {
        self.inner.into_inner()
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the number of levels searches currently start from
    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    /// Inserts an element after any equal elements already present.
    ///
    /// The insertion point is found under an upgradable lock, which is
    /// escalated only to link the new node.
    pub fn add(&self, item: T) {
        let guard = self.inner.upgradable_read();
        let prev = guard.insertion_point(&item);
        let mut list = RwLockUpgradableReadGuard::upgrade(guard);
        list.insert_after(prev, item);
    }

    /// Inserts an element. The list is unbounded, so this always succeeds.
    pub fn try_add(&self, item: T) -> bool {
        self.add(item);
        true
    }

    /// Removes one element comparing equal to `item`.
    ///
    /// Returns false, without ever taking the exclusive lock, if there is no
    /// such element.
    pub fn remove(&self, item: &T) -> bool {
        let guard = self.inner.upgradable_read();
        let node = guard.locate(item);
        if !guard.is_match(node, item) {
            return false;
        }
        let mut list = RwLockUpgradableReadGuard::upgrade(guard);
        list.unlink(node).is_some()
    }

    /// Returns true if some element compares equal to `item`, and records
    /// the search position for the next lookup.
    pub fn contains(&self, item: &T) -> bool {
        let (node, found) = {
            let list = self.inner.read();
            let node = list.locate(item);
            (node, list.is_match(node, item))
        };
        if !self.inner.write().remember(node) {
            tracing::trace!("located node was unlinked before the cache update");
        }
        found
    }

    /// Returns a copy of the smallest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn first(&self) -> Result<T, CollectionError>
    where
        T: Clone,
    {
        self.inner.read().first().cloned()
    }

    /// Returns a copy of the smallest element. Same as
    /// [`first`](Self::first).
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn peek(&self) -> Result<T, CollectionError>
    where
        T: Clone,
    {
        self.first()
    }

    /// Returns a copy of the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn last(&self) -> Result<T, CollectionError>
    where
        T: Clone,
    {
        self.inner.read().last().cloned()
    }

    /// Removes and returns the smallest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn take(&self) -> Result<T, CollectionError> {
        self.inner.write().take()
    }

    /// Removes and returns the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn take_last(&self) -> Result<T, CollectionError> {
        self.inner.write().take_last()
    }

    /// Removes and returns the smallest element, or `None` if the list is
    /// empty.
    pub fn try_take(&self) -> Option<T> {
        let guard = self.inner.upgradable_read();
        let first = guard.first_node();
        if guard.is_empty() {
            return None;
        }
        let mut list = RwLockUpgradableReadGuard::upgrade(guard);
        list.unlink(first)
    }

    /// Returns a copy of the greatest element less than or equal to `key`.
    pub fn floor(&self, key: &T) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().floor(key).cloned()
    }

    /// Returns a copy of the smallest element greater than or equal to `key`.
    pub fn ceiling(&self, key: &T) -> Option<T>
    where
        T: Clone,
    {
        self.inner.read().ceiling(key).cloned()
    }

    /// See [`SkipList::floor_or_default`].
    pub fn floor_or_default(&self, key: &T) -> T
    where
        T: Default + Clone,
    {
        self.inner.read().floor_or_default(key)
    }

    /// See [`SkipList::ceiling_or_default`].
    pub fn ceiling_or_default(&self, key: &T) -> T
    where
        T: Default + Clone,
    {
        self.inner.read().ceiling_or_default(key)
    }

    /// Returns a snapshot of the elements between `from` and `to`.
    ///
    /// See [`SkipList::range`] for the meaning of the inclusivity flags.
    pub fn range(&self, from: &T, to: &T, include_from: bool, include_to: bool) -> Vec<T>
    where
        T: Clone,
    {
        self.inner
            .read()
            .range(from, to, include_from, include_to)
            .cloned()
            .collect()
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Copies every element into `dest[offset..]` in ascending order under
    /// the shared lock.
    ///
    /// # Errors
    /// See [`SkipList::copy_to`].
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        self.inner.read().copy_to(dest, offset)
    }

    /// Returns an ascending snapshot taken under one shared lock.
    pub fn to_array(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.read().to_vec()
    }

    /// Returns an iterator over an ascending snapshot of the list.
    pub fn iter(&self) -> std::vec::IntoIter<T>
    where
        T: Clone,
    {
        self.to_array().into_iter()
    }

    /// Checks the link structure under the shared lock.
    pub fn verify_links(&self) -> bool {
        self.inner.read().verify_links()
    }
}

impl<T, C> ProducerConsumer<T> for ConcurrentSkipList<T, C>
where
    T: Clone + Send + Sync,
    C: Comparer<T> + Send + Sync,
{
    fn len(&self) -> usize {
        ConcurrentSkipList::len(self)
    }

    fn add(&self, item: T) {
        ConcurrentSkipList::add(self, item)
    }

    fn take(&self) -> Result<T, CollectionError> {
        ConcurrentSkipList::take(self)
    }

    fn peek(&self) -> Result<T, CollectionError> {
        ConcurrentSkipList::peek(self)
    }

    fn contains(&self, item: &T) -> bool {
        ConcurrentSkipList::contains(self, item)
    }

    fn remove(&self, item: &T) -> bool {
        ConcurrentSkipList::remove(self, item)
    }

    fn clear(&self) {
        ConcurrentSkipList::clear(self)
    }

    fn try_take(&self) -> Option<T> {
        ConcurrentSkipList::try_take(self)
    }

    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError> {
        ConcurrentSkipList::copy_to(self, dest, offset)
    }

    fn to_array(&self) -> Vec<T> {
        ConcurrentSkipList::to_array(self)
    }
}

impl<T: Ord> Default for ConcurrentSkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> From<SkipList<T, C>> for ConcurrentSkipList<T, C>
where
    C: Comparer<T>,
{
    fn from(list: SkipList<T, C>) -> Self {
        Self::from_list(list)
    }
}

impl<T: Ord> FromIterator<T> for ConcurrentSkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_list(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug, C: Comparer<T>> fmt::Debug for ConcurrentSkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentSkipList")
            .field("list", &*self.inner.read())
            .finish()
    }
}

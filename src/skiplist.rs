//! Probabilistic ordered list
//!
//! [`SkipList`] keeps its elements sorted (smallest first) in a multi-level
//! doubly linked list. Each node is promoted to a random height, so searches
//! skip over long runs of nodes on the upper levels and descend one level at a
//! time until they reach the exact match or its predecessor.
//!
//! # Layout
//!
//! Nodes live in a `slotmap` arena and refer to each other by generational
//! [`NodeKey`]s. Two permanent sentinels bound every level: `head` compares
//! less than every element and `tail` greater than every element. Sentinels
//! carry no element; a node's `item` is `None` exactly when it is a sentinel.
//!
//! # Locality cache
//!
//! The list remembers the last node it located. A search for a key at or past
//! that node starts from it (at the node's own height) instead of from the
//! top of `head`. The cache is a plain key into the arena and owns nothing.
//! Whoever unlinks the cached node resets the cache to `head`, and a stale
//! key is also rejected by the arena's generation check.
//!
//! # Time Complexity
//!
//! | Operation                              | Complexity (expected) |
//! |----------------------------------------|-----------------------|
//! | `add`, `remove`, `contains`            | O(log n)              |
//! | `floor`, `ceiling`                     | O(log n)              |
//! | `first`, `last`, `take`, `take_last`   | O(1)                  |
//! | `range`                                | O(log n + k)          |
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::SkipList;
//!
//! let list: SkipList<i32> = [5, 1, 3].into_iter().collect();
//! assert_eq!(list.to_vec(), vec![1, 3, 5]);
//!
//! assert_eq!(list.floor(&4), Some(&3));
//! assert_eq!(list.ceiling(&4), Some(&5));
//! assert_eq!(list.range(&2, &5, true, false).collect::<Vec<_>>(), vec![&3]);
//! ```

use crate::ordering::{Comparer, NaturalOrder};
use crate::traits::{check_destination, Collection, CollectionError};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use slotmap::{new_key_type, SlotMap};
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// Upper bound on node height.
pub const MAX_HEIGHT: usize = 32;

/// Number of levels the sentinels grow by when a taller node appears.
pub const HEIGHT_STEP: usize = 4;

new_key_type! {
    /// Arena key of a skip list node
    pub(crate) struct NodeKey;
}

type Links = SmallVec<[NodeKey; 4]>;

#[derive(Clone)]
struct Node<T> {
    item: Option<T>,
    next: Links,
    prev: Links,
}

impl<T> Node<T> {
    fn new(item: Option<T>, height: usize) -> Self {
        Self {
            item,
            next: smallvec![NodeKey::default(); height],
            prev: smallvec![NodeKey::default(); height],
        }
    }

    #[inline]
    fn height(&self) -> usize {
        self.next.len()
    }

    fn set_height(&mut self, height: usize) {
        self.next.resize(height, NodeKey::default());
        self.prev.resize(height, NodeKey::default());
    }
}

/// Construction parameters for [`SkipList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipListConfig {
    /// Tallest height a node may reach, `1..=MAX_HEIGHT`
    pub max_height: usize,
    /// Levels added to the sentinels each time the list outgrows them
    pub height_step: usize,
    /// Seed for the height generator; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self {
            max_height: MAX_HEIGHT,
            height_step: HEIGHT_STEP,
            seed: None,
        }
    }
}

impl SkipListConfig {
    /// Returns this configuration with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `max_height` is
    /// outside `1..=MAX_HEIGHT` or `height_step` is zero.
    pub fn validate(&self) -> Result<(), CollectionError> {
        if self.max_height == 0 || self.max_height > MAX_HEIGHT {
            return Err(CollectionError::InvalidConfiguration(
                "max_height must be between 1 and 32",
            ));
        }
        if self.height_step == 0 {
            return Err(CollectionError::InvalidConfiguration(
                "height_step must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// A sorted multi-level linked list
///
/// Elements are kept in non-decreasing order under the list's [`Comparer`];
/// equal elements are all kept, each new one after those already present.
#[derive(Clone)]
pub struct SkipList<T, C = NaturalOrder> {
    nodes: SlotMap<NodeKey, Node<T>>,
    head: NodeKey,
    tail: NodeKey,
    len: usize,
    /// Number of levels searches start from
    height: usize,
    /// Locality cache: `head` or a live node
    last_found: NodeKey,
    rng: SmallRng,
    config: SkipListConfig,
    comparer: C,
}

impl<T: Ord> SkipList<T> {
    /// Creates an empty list using the natural order of `T`.
    pub fn new() -> Self {
        Self::with_comparer(NaturalOrder)
    }
}

impl<T, C: Comparer<T>> SkipList<T, C> {
    /// Creates an empty list ordered by `comparer`.
    pub fn with_comparer(comparer: C) -> Self {
        Self::build(comparer, SkipListConfig::default())
    }

    /// Creates an empty list ordered by `comparer` with explicit parameters.
    ///
    /// # Errors
    /// Returns [`CollectionError::InvalidConfiguration`] if `config` fails
    /// [`SkipListConfig::validate`].
    pub fn with_config(comparer: C, config: SkipListConfig) -> Result<Self, CollectionError> {
        config.validate()?;
        Ok(Self::build(comparer, config))
    }

    fn build(comparer: C, config: SkipListConfig) -> Self {
        let sentinel_height = config.height_step.min(config.max_height);
        let mut nodes = SlotMap::with_key();
        let head = nodes.insert(Node::new(None, sentinel_height));
        let tail = nodes.insert(Node::new(None, sentinel_height));
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut list = Self {
            nodes,
            head,
            tail,
            len: 0,
            height: 1,
            last_found: head,
            rng,
            config,
            comparer,
        };
        list.reset();
        list
    }

    /// Returns the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels searches currently start from
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the list's ordering policy
    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Returns the parameters the list was built with
    pub fn config(&self) -> &SkipListConfig {
        &self.config
    }

    /// Inserts an element after any equal elements already present.
    pub fn add(&mut self, item: T) {
        let prev = self.insertion_point(&item);
        self.insert_after(prev, item);
    }

    /// Removes one element comparing equal to `item`.
    ///
    /// Returns false if there is no such element.
    pub fn remove(&mut self, item: &T) -> bool {
        let node = self.locate(item);
        if !self.is_match(node, item) {
            return false;
        }
        self.unlink(node);
        true
    }

    /// Returns true if some element compares equal to `item`.
    pub fn contains(&self, item: &T) -> bool {
        let node = self.locate(item);
        self.is_match(node, item)
    }

    /// Returns the smallest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn first(&self) -> Result<&T, CollectionError> {
        let first = self.nodes[self.head].next[0];
        self.nodes[first]
            .item
            .as_ref()
            .ok_or(CollectionError::EmptyCollection)
    }

    /// Returns the smallest element. Same as [`first`](Self::first).
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn peek(&self) -> Result<&T, CollectionError> {
        self.first()
    }

    /// Returns the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn last(&self) -> Result<&T, CollectionError> {
        let last = self.nodes[self.tail].prev[0];
        self.nodes[last]
            .item
            .as_ref()
            .ok_or(CollectionError::EmptyCollection)
    }

    /// Removes and returns the smallest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn take(&mut self) -> Result<T, CollectionError> {
        let first = self.nodes[self.head].next[0];
        self.unlink(first).ok_or(CollectionError::EmptyCollection)
    }

    /// Removes and returns the greatest element.
    ///
    /// # Errors
    /// Returns [`CollectionError::EmptyCollection`] if the list is empty.
    pub fn take_last(&mut self) -> Result<T, CollectionError> {
        let last = self.nodes[self.tail].prev[0];
        self.unlink(last).ok_or(CollectionError::EmptyCollection)
    }

    /// Returns the greatest element less than or equal to `key`, or `None`
    /// if every element is greater.
    pub fn floor(&self, key: &T) -> Option<&T> {
        let node = self.locate(key);
        self.nodes[node].item.as_ref()
    }

    /// Returns the smallest element greater than or equal to `key`, or
    /// `None` if every element is smaller.
    pub fn ceiling(&self, key: &T) -> Option<&T> {
        let mut node = self.locate(key);
        if self.compare_node(node, key).is_lt() {
            node = self.nodes[node].next[0];
        }
        self.nodes[node].item.as_ref()
    }

    /// Like [`floor`](Self::floor), but returns `T::default()` when there is
    /// no floor.
    ///
    /// The result cannot tell "no floor" apart from a stored default value;
    /// check [`contains`](Self::contains) or [`len`](Self::len) when that
    /// matters, or use [`floor`](Self::floor).
    pub fn floor_or_default(&self, key: &T) -> T
    where
        T: Default + Clone,
    {
        self.floor(key).cloned().unwrap_or_default()
    }

    /// Like [`ceiling`](Self::ceiling), but returns `T::default()` when
    /// there is no ceiling. Same caveat as
    /// [`floor_or_default`](Self::floor_or_default).
    pub fn ceiling_or_default(&self, key: &T) -> T
    where
        T: Default + Clone,
    {
        self.ceiling(key).cloned().unwrap_or_default()
    }

    /// Returns the elements between `from` and `to` in ascending order.
    ///
    /// `include_from` and `include_to` select whether elements equal to the
    /// bounds are part of the range. An inverted range is empty.
    pub fn range(&self, from: &T, to: &T, include_from: bool, include_to: bool) -> Iter<'_, T> {
        let empty = match self.comparer.compare(from, to) {
            Ordering::Greater => true,
            Ordering::Equal => !(include_from && include_to),
            Ordering::Less => false,
        };
        if empty {
            return Iter::new(&self.nodes, self.tail, self.tail);
        }

        let start = self.nodes[self.predecessor(from, !include_from)].next[0];
        let end = self.nodes[self.predecessor(to, include_to)].next[0];
        Iter::new(&self.nodes, start, end)
    }

    /// Returns an iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.nodes[self.head].next[0], self.tail)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        let (head, tail) = (self.head, self.tail);
        self.nodes.retain(|key, _| key == head || key == tail);
        let sentinel_height = self.config.height_step.min(self.config.max_height);
        self.nodes[head].set_height(sentinel_height);
        self.nodes[tail].set_height(sentinel_height);
        self.reset();
    }

    /// Copies every element into `dest[offset..]` in ascending order.
    ///
    /// # Errors
    /// Returns [`CollectionError::OffsetOutOfRange`] or
    /// [`CollectionError::InsufficientSpace`] if `dest` is too small.
    pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        check_destination(dest, offset, self.len)?;
        for (slot, item) in dest[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(item);
        }
        Ok(())
    }

    /// Returns the elements in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consumes the list, returning its elements in ascending order.
    pub fn into_vec(mut self) -> Vec<T> {
        let mut items = Vec::with_capacity(self.len);
        let mut node = self.nodes[self.head].next[0];
        while node != self.tail {
            let next = self.nodes[node].next[0];
            if let Some(item) = self.nodes.remove(node).and_then(|n| n.item) {
                items.push(item);
            }
            node = next;
        }
        items
    }

    /// Checks the structural invariants: every level is a consistent doubly
    /// linked chain from `head` to `tail` in non-decreasing order, every node
    /// appears on each level below its height, and the cache points at a
    /// live node.
    pub fn verify_links(&self) -> bool {
        let sentinel_height = self.nodes[self.head].height();
        if self.nodes[self.tail].height() != sentinel_height || self.height > sentinel_height {
            return false;
        }
        if self.last_found != self.head && !self.nodes.contains_key(self.last_found) {
            return false;
        }
        if self.nodes.len() != self.len + 2 {
            return false;
        }

        for level in 0..sentinel_height {
            let mut walked = 0;
            let mut node = self.head;
            while node != self.tail {
                let next = self.nodes[node].next[level];
                let Some(successor) = self.nodes.get(next) else {
                    return false;
                };
                if successor.height() <= level || successor.prev[level] != node {
                    return false;
                }
                if let (Some(a), Some(b)) = (&self.nodes[node].item, &successor.item) {
                    if self.comparer.compare(a, b).is_gt() {
                        return false;
                    }
                }
                if next != self.tail {
                    walked += 1;
                    if walked > self.len {
                        return false;
                    }
                }
                node = next;
            }

            let expected = self
                .nodes
                .iter()
                .filter(|(key, n)| *key != self.head && *key != self.tail && n.height() > level)
                .count();
            if walked != expected {
                return false;
            }
        }
        true
    }

    /// Finds the node equal to `key`, or else the last node before it
    /// (`head` if every element is greater).
    pub(crate) fn locate(&self, key: &T) -> NodeKey {
        let mut node = self.head;
        let mut level = self.height - 1;

        let cached = self.last_found;
        if cached != self.head && self.nodes.contains_key(cached) {
            match self.compare_node(cached, key) {
                Ordering::Equal => return cached,
                Ordering::Less => {
                    node = cached;
                    level = self.nodes[cached].height() - 1;
                }
                Ordering::Greater => {}
            }
        }

        loop {
            let mut next = self.nodes[node].next[level];
            let mut cmp = self.compare_node(next, key);
            while cmp == Ordering::Less {
                node = next;
                next = self.nodes[node].next[level];
                cmp = self.compare_node(next, key);
            }
            if cmp == Ordering::Equal {
                return next;
            }
            if level == 0 {
                return node;
            }
            level -= 1;
        }
    }

    /// Returns the last node strictly before `key`, or with `inclusive` the
    /// last node at or before it.
    fn predecessor(&self, key: &T, inclusive: bool) -> NodeKey {
        let advances = |cmp: Ordering| cmp.is_lt() || (inclusive && cmp.is_eq());

        let mut node = self.head;
        let mut level = self.height - 1;
        let cached = self.last_found;
        if cached != self.head
            && self.nodes.contains_key(cached)
            && advances(self.compare_node(cached, key))
        {
            node = cached;
            level = self.nodes[cached].height() - 1;
        }

        loop {
            loop {
                let next = self.nodes[node].next[level];
                if !advances(self.compare_node(next, key)) {
                    break;
                }
                node = next;
            }
            if level == 0 {
                return node;
            }
            level -= 1;
        }
    }

    /// Last node at or before `key`: new elements are linked after it so
    /// that equal elements keep their insertion order.
    pub(crate) fn insertion_point(&self, key: &T) -> NodeKey {
        self.predecessor(key, true)
    }

    /// True if `node` holds an element equal to `key`
    pub(crate) fn is_match(&self, node: NodeKey, key: &T) -> bool {
        self.compare_node(node, key).is_eq()
    }

    /// First data node, or `tail` when empty
    pub(crate) fn first_node(&self) -> NodeKey {
        self.nodes[self.head].next[0]
    }

    /// Points the locality cache at `node` if it is still linked.
    ///
    /// Returns false, leaving the cache untouched, if `node` has been removed
    /// since it was located.
    pub(crate) fn remember(&mut self, node: NodeKey) -> bool {
        if node == self.tail || !self.nodes.contains_key(node) {
            return false;
        }
        self.last_found = node;
        true
    }

    /// Links a new node holding `item` directly after `prev` and caches it.
    pub(crate) fn insert_after(&mut self, prev: NodeKey, item: T) -> NodeKey {
        let next = self.nodes[prev].next[0];
        let height = self.random_height();
        let node = self.nodes.insert(Node::new(Some(item), height));

        let (mut prev, mut next) = (prev, next);
        for level in 0..height {
            // Walk outward to the nearest neighbours tall enough for this level
            while self.nodes[prev].height() <= level {
                prev = self.nodes[prev].prev[level - 1];
            }
            while self.nodes[next].height() <= level {
                next = self.nodes[next].next[level - 1];
            }
            let new_node = &mut self.nodes[node];
            new_node.prev[level] = prev;
            new_node.next[level] = next;
            self.nodes[prev].next[level] = node;
            self.nodes[next].prev[level] = node;
        }

        self.len += 1;
        self.last_found = node;
        node
    }

    /// Unlinks `node` from every level and returns its element.
    ///
    /// Returns `None` for the sentinels, which is how `take` on an empty
    /// list reports emptiness.
    pub(crate) fn unlink(&mut self, node: NodeKey) -> Option<T> {
        if node == self.head || node == self.tail {
            return None;
        }

        for level in 0..self.nodes[node].height() {
            let prev = self.nodes[node].prev[level];
            let next = self.nodes[node].next[level];
            self.nodes[prev].next[level] = next;
            self.nodes[next].prev[level] = prev;
        }
        if self.last_found == node {
            self.last_found = self.head;
        }

        let removed = self.nodes.remove(node)?;
        self.len -= 1;
        if self.height > 1 && self.len.checked_shr(self.height as u32).unwrap_or(0) == 0 {
            self.height -= 1;
        }
        removed.item
    }

    fn compare_node(&self, node: NodeKey, key: &T) -> Ordering {
        match &self.nodes[node].item {
            Some(item) => self.comparer.compare(item, key),
            None if node == self.head => Ordering::Less,
            None => Ordering::Greater,
        }
    }

    /// Geometric height: start at 1 and keep adding a level with
    /// probability 1/2, up to one more than the current height.
    fn random_height(&mut self) -> usize {
        let cap = (self.height + 1).min(self.config.max_height);
        let mut height = 1;
        while height < cap && self.rng.gen_bool(0.5) {
            height += 1;
        }
        if height > self.height {
            self.raise_height(height);
        }
        height
    }

    fn raise_height(&mut self, height: usize) {
        self.height = height;
        let old = self.nodes[self.head].height();
        if old >= height {
            return;
        }

        let new = (old + self.config.height_step).min(self.config.max_height);
        let (head, tail) = (self.head, self.tail);
        self.nodes[head].set_height(new);
        self.nodes[tail].set_height(new);
        for level in old..new {
            self.nodes[head].next[level] = tail;
            self.nodes[tail].prev[level] = head;
        }
        tracing::debug!(height, old_levels = old, new_levels = new, "raised skip list height");
    }

    fn reset(&mut self) {
        let (head, tail) = (self.head, self.tail);
        for level in 0..self.nodes[head].height() {
            self.nodes[head].next[level] = tail;
            self.nodes[tail].prev[level] = head;
        }
        self.len = 0;
        self.height = 1;
        self.last_found = head;
    }
}

/// Borrowing iterator over a run of list elements in ascending order
///
/// Returned by [`SkipList::iter`] and [`SkipList::range`].
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeKey, Node<T>>,
    current: NodeKey,
    end: NodeKey,
}

impl<'a, T> Iter<'a, T> {
    fn new(nodes: &'a SlotMap<NodeKey, Node<T>>, start: NodeKey, end: NodeKey) -> Self {
        Self {
            nodes,
            current: start,
            end,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.end {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.current];
        let item = node.item.as_ref()?;
        self.current = node.next[0];
        Some(item)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, C: Comparer<T>> IntoIterator for &'a SkipList<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: Comparer<T>> IntoIterator for SkipList<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T, C: Comparer<T>> Collection<T> for SkipList<T, C> {
    fn len(&self) -> usize {
        SkipList::len(self)
    }

    fn add(&mut self, item: T) {
        SkipList::add(self, item)
    }

    fn take(&mut self) -> Result<T, CollectionError> {
        SkipList::take(self)
    }

    fn peek(&self) -> Result<&T, CollectionError> {
        SkipList::peek(self)
    }

    fn contains(&self, item: &T) -> bool {
        SkipList::contains(self, item)
    }

    fn remove(&mut self, item: &T) -> bool {
        SkipList::remove(self, item)
    }

    fn clear(&mut self) {
        SkipList::clear(self)
    }

    fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<(), CollectionError>
    where
        T: Clone,
    {
        SkipList::copy_to(self, dest, offset)
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        SkipList::to_vec(self)
    }
}

impl<T: Ord> Default for SkipList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, C: Comparer<T>> fmt::Debug for SkipList<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, C: Comparer<T>> Extend<T> for SkipList<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for SkipList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

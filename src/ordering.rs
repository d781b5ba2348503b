//! Ordering policies
//!
//! Every collection in this crate is parameterised by a [`Comparer`], a
//! three-way comparison over elements. The comparer is consulted on every
//! ordering decision and is never mutated by the collection.
//!
//! - [`NaturalOrder`] delegates to [`Ord`] and is the default everywhere.
//! - Any closure `Fn(&T, &T) -> Ordering` is a comparer.
//! - [`Reversed`] flips another comparer, which turns the max-priority queue
//!   into a min-priority queue.
//! - [`PairKeyOrder`] orders `(key, value)` tuples by key only, so a value can
//!   ride along with its priority.
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::ordering::{Comparer, NaturalOrder, PairKeyOrder, Reversed};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//! assert_eq!(Reversed(NaturalOrder).compare(&1, &2), Ordering::Greater);
//!
//! let by_key = PairKeyOrder::new();
//! assert_eq!(by_key.compare(&(3, "a"), &(3, "b")), Ordering::Equal);
//! ```

use std::cmp::Ordering;

/// A total order over `T`.
///
/// Implementations must be consistent: `compare(a, b)` must be the reverse of
/// `compare(b, a)` and transitive, otherwise the collections' ordering
/// invariants cannot hold.
pub trait Comparer<T: ?Sized> {
    /// Compares two elements.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns true if `a` sorts at or after `b`.
    #[inline]
    fn greater_or_equal(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) != Ordering::Less
    }
}

/// The natural ordering of an [`Ord`] type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparer<T> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Inverts the wrapped comparer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: Comparer<T>> Comparer<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Orders `(K, V)` pairs by their key, ignoring the value.
///
/// Two pairs with equal keys compare equal, so `contains` and `remove` on a
/// collection using this comparer match by key alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairKeyOrder<C = NaturalOrder> {
    key_comparer: C,
}

impl PairKeyOrder<NaturalOrder> {
    /// Orders pairs by the natural order of their keys.
    pub fn new() -> Self {
        Self {
            key_comparer: NaturalOrder,
        }
    }
}

impl<C> PairKeyOrder<C> {
    /// Orders pairs by their keys using a custom key comparer.
    pub fn with_key_comparer(key_comparer: C) -> Self {
        Self { key_comparer }
    }
}

impl<K, V, C: Comparer<K>> Comparer<(K, V)> for PairKeyOrder<C> {
    #[inline]
    fn compare(&self, a: &(K, V), b: &(K, V)) -> Ordering {
        self.key_comparer.compare(&a.0, &b.0)
    }
}

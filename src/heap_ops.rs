//! Binary heap helpers over plain slices
//!
//! These routines maintain the max-heap property on a slice: every element
//! compares greater than or equal to its children under the supplied
//! [`Comparer`].
//!
//! Positions are **1-based**: position `i` lives in `heap[i - 1]`, its parent
//! is at `i / 2` and its children at `2i` and `2i + 1`. Keeping the arithmetic
//! 1-based lets the same routines run over any sub-slice, which is how
//! [`heap_sort`] sorts the destination range of a copy in place.
//!
//! # Example
//!
//! ```rust
//! use rust_ordered_collections::heap_ops::{heap_sort, heapify, is_heap};
//! use rust_ordered_collections::NaturalOrder;
//!
//! let mut data = vec![3, 9, 1, 7, 5];
//! heapify(&mut data, &NaturalOrder);
//! assert!(is_heap(&data, &NaturalOrder));
//!
//! heap_sort(&mut data, &NaturalOrder);
//! assert_eq!(data, vec![9, 7, 5, 3, 1]);
//! ```

use crate::ordering::Comparer;

/// Moves the element at 1-based position `i` toward the root while it
/// compares greater than its parent.
pub fn sift_up<T, C: Comparer<T> + ?Sized>(heap: &mut [T], mut i: usize, comparer: &C) {
    while i > 1 {
        let parent = i / 2;
        if comparer.greater_or_equal(&heap[parent - 1], &heap[i - 1]) {
            return;
        }
        heap.swap(parent - 1, i - 1);
        i = parent;
    }
}

/// Moves the element at 1-based position `i` toward the leaves while a child
/// compares greater, considering only positions `1..=count`.
///
/// At each level the element is exchanged with the greater child; on a tie
/// the left child wins.
pub fn sink<T, C: Comparer<T> + ?Sized>(
    heap: &mut [T],
    mut i: usize,
    count: usize,
    comparer: &C,
) {
    loop {
        let left = 2 * i;
        if left > count {
            return;
        }
        let right = left + 1;
        let greater = if right <= count
            && !comparer.greater_or_equal(&heap[left - 1], &heap[right - 1])
        {
            right
        } else {
            left
        };

        if comparer.greater_or_equal(&heap[i - 1], &heap[greater - 1]) {
            return;
        }
        heap.swap(i - 1, greater - 1);
        i = greater;
    }
}

/// Rearranges an arbitrary slice into a max-heap in O(n).
pub fn heapify<T, C: Comparer<T> + ?Sized>(heap: &mut [T], comparer: &C) {
    let count = heap.len();
    for i in (1..=count / 2).rev() {
        sink(heap, i, count, comparer);
    }
}

/// Sorts a slice that already satisfies the heap property into
/// **descending** order.
///
/// Repeatedly swaps the root behind the shrinking heap and sinks the new
/// root, which leaves the slice ascending, then reverses it.
pub fn heap_sort<T, C: Comparer<T> + ?Sized>(heap: &mut [T], comparer: &C) {
    let mut remaining = heap.len();
    while remaining > 1 {
        heap.swap(0, remaining - 1);
        remaining -= 1;
        sink(heap, 1, remaining, comparer);
    }
    heap.reverse();
}

/// Returns true if every element compares greater than or equal to both of
/// its children.
pub fn is_heap<T, C: Comparer<T> + ?Sized>(heap: &[T], comparer: &C) -> bool {
    (2..=heap.len()).all(|i| comparer.greater_or_equal(&heap[i / 2 - 1], &heap[i - 1]))
}

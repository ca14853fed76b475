//! Array-backed binary min-heap ordered by the elements' own `Ord`.

use std::fmt;
use std::slice;

use crate::error::HeapError;
use crate::sift;
use crate::snapshot::Snapshot;

/// A binary min-heap.
///
/// The smallest element is always at the front. The backing array is
/// private; every mutation runs through the sift primitives so the heap
/// invariant (`heap[k] <= heap[2k+1]` and `heap[k] <= heap[2k+2]`) holds
/// after each public operation, which `check_invariant` can confirm.
#[derive(Debug, Clone)]
pub struct Heap<T> {
    items: Vec<T>,
}

impl<T> Heap<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Gives the backing array up, in heap order (not sorted).
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Ord> Heap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Builds a heap from arbitrary elements in O(n).
    pub fn from_vec(mut items: Vec<T>) -> Self {
        sift::heapify(&mut items, &mut ());
        Self { items }
    }

    /// Returns the minimum without removing it.
    pub fn peek(&self) -> Result<&T, HeapError> {
        self.items.first().ok_or(HeapError::Empty)
    }

    /// Inserts an element. O(log n).
    pub fn push(&mut self, item: T) {
        let pos = self.items.len();
        self.items.push(item);
        sift::sift_up(&mut self.items, 0, pos, &mut ());
    }

    /// Removes and returns the minimum. O(log n).
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop().unwrap();
        if !self.items.is_empty() {
            sift::sift_down(&mut self.items, 0, &mut ());
        }
        Ok(min)
    }

    /// Removes and returns the element at an arbitrary slot, or `None`
    /// when the slot is out of range. The vacated slot is filled with the
    /// last element and the invariant restored in either direction.
    pub fn pop_at(&mut self, slot: usize) -> Option<T> {
        if slot >= self.items.len() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(slot, last);
        let taken = self.items.pop().unwrap();
        if slot < self.items.len() {
            sift::restore_at(&mut self.items, slot, &mut ());
        }
        Some(taken)
    }

    /// Pops the current minimum and pushes `item` in a single restore
    /// pass (a.k.a. poppush). On an empty heap the item is pushed and
    /// `None` returned.
    pub fn replace(&mut self, item: T) -> Option<T> {
        if self.items.is_empty() {
            self.push(item);
            return None;
        }
        let min = std::mem::replace(&mut self.items[0], item);
        sift::sift_down(&mut self.items, 0, &mut ());
        Some(min)
    }

    /// Pushes `item`, then pops the minimum. When the heap is empty or
    /// `item` is not greater than the current minimum, `item` comes
    /// straight back without ever entering the heap.
    pub fn push_pop(&mut self, item: T) -> T {
        let goes_in = matches!(self.items.first(), Some(min) if *min < item);
        if !goes_in {
            return item;
        }
        let min = std::mem::replace(&mut self.items[0], item);
        sift::sift_down(&mut self.items, 0, &mut ());
        min
    }

    /// Rebuilds the invariant from the current array state. O(n).
    pub fn heapify(&mut self) {
        sift::heapify(&mut self.items, &mut ());
    }

    /// Removal by value needs a position index; use an indexed variant.
    pub fn remove(&mut self, _value: &T) -> Result<T, HeapError> {
        Err(HeapError::NotSupported("remove"))
    }

    /// O(n) membership scan.
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Drains the heap into a sorted vector.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Ok(item) = self.pop() {
            out.push(item);
        }
        out
    }
}

impl<T: Ord + fmt::Debug> Heap<T> {
    /// Scans every parent/child pair and reports the first violation.
    /// Diagnostic only; a failure means a bug in the heap, not bad input.
    pub fn check_invariant(&self) -> Result<(), HeapError> {
        sift::check_invariant(&self.items)
    }

    /// Full diagnostic pass. For the plain heap this is the invariant
    /// scan; indexed variants also verify their position index.
    pub fn check(&self) -> Result<(), HeapError> {
        self.check_invariant()
    }
}

impl<T: Ord + Clone> Heap<T> {
    /// Renders the heap to a [`Snapshot`] that round-trips through
    /// [`Heap::from_snapshot`].
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot::plain(self.items.clone())
    }

    /// Rebuilds a heap from a snapshot. Fails with `MissingKey` when the
    /// snapshot came from a keyed heap, whose ordering cannot be
    /// reproduced without its key function.
    pub fn from_snapshot(snapshot: Snapshot<T>) -> Result<Self, HeapError> {
        let (items, key_label) = snapshot.into_parts();
        if key_label.is_some() {
            return Err(HeapError::MissingKey);
        }
        Ok(Self::from_vec(items))
    }
}

impl<T: Ord> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for Heap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Ord> Extend<T> for Heap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Heap<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for Heap<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    /// Yields the elements in storage order, not sorted order; use
    /// [`Heap::into_sorted_vec`] for a sorted drain.
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: fmt::Debug> fmt::Display for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Heap({:?})", self.items)
    }
}

//! Min-heap with a position index: values can be removed in O(log n)
//! without knowing where they sit, at the price of uniqueness.
//!
//! Handy when callers cancel work out of a queue, or when two queues
//! hold the same items and popping one must evict from the other.

use std::fmt;
use std::hash::Hash;
use std::slice;

use crate::error::HeapError;
use crate::index::PositionIndex;
use crate::sift;
use crate::snapshot::Snapshot;

/// A binary min-heap that tracks each value's slot in a side index.
///
/// Values must be unique; pushing one that is already present fails with
/// [`HeapError::Duplicate`]. Every array write made by the sift
/// primitives is mirrored into the index, so `remove` is a hash lookup
/// followed by one O(log n) restore pass. `check_indexes` rebuilds the
/// index from scratch to prove the two structures agree.
#[derive(Debug, Clone)]
pub struct IndexedHeap<T> {
    items: Vec<T>,
    index: PositionIndex<T>,
}

impl<T> IndexedHeap<T>
where
    T: Ord + Eq + Hash + Clone + fmt::Debug,
{
    /// Creates an empty indexed heap.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: PositionIndex::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: PositionIndex::with_capacity(capacity),
        }
    }

    /// Builds an indexed heap from initial values in O(n). Fails with
    /// `Duplicate` on repeated input, constructing nothing.
    pub fn from_vec(items: Vec<T>) -> Result<Self, HeapError> {
        let mut index = PositionIndex::with_capacity(items.len());
        for (slot, value) in items.iter().enumerate() {
            if index.contains(value) {
                return Err(HeapError::Duplicate(format!("{:?}", value)));
            }
            index.record(value.clone(), slot);
        }
        let mut heap = Self { items, index };
        sift::heapify(&mut heap.items, &mut heap.index);
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the minimum without removing it.
    pub fn peek(&self) -> Result<&T, HeapError> {
        self.items.first().ok_or(HeapError::Empty)
    }

    /// O(1) membership test via the index.
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains(value)
    }

    /// Inserts a value not already present. O(log n).
    pub fn push(&mut self, value: T) -> Result<(), HeapError> {
        if self.index.contains(&value) {
            return Err(HeapError::Duplicate(format!("{:?}", value)));
        }
        let slot = self.items.len();
        self.index.record(value.clone(), slot);
        self.items.push(value);
        sift::sift_up(&mut self.items, 0, slot, &mut self.index);
        Ok(())
    }

    /// Removes and returns the minimum. O(log n).
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.items.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.take_slot(0))
    }

    /// Removes `value` wherever it currently sits, or returns `None` if
    /// it is not in the heap. O(log n).
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let slot = self.index.slot_of(value)?;
        Some(self.take_slot(slot))
    }

    /// Removes the occupant of `slot`: swap with the last element, shrink
    /// the array, then restore the invariant in whichever direction the
    /// moved element violates it. The index is patched for every element
    /// the restore pass touches.
    fn take_slot(&mut self, slot: usize) -> T {
        let last = self.items.len() - 1;
        self.items.swap(slot, last);
        let taken = self.items.pop().unwrap();
        self.index.forget(&taken);
        if slot < self.items.len() {
            self.index.record(self.items[slot].clone(), slot);
            sift::restore_at(&mut self.items, slot, &mut self.index);
        }
        taken
    }

    /// Poppush: pops the current minimum and installs `value` in one
    /// restore pass. On an empty heap the value is pushed and `Ok(None)`
    /// returned. Fails with `Duplicate` if `value` is already present.
    pub fn replace(&mut self, value: T) -> Result<Option<T>, HeapError> {
        if self.index.contains(&value) {
            return Err(HeapError::Duplicate(format!("{:?}", value)));
        }
        if self.items.is_empty() {
            self.index.record(value.clone(), 0);
            self.items.push(value);
            return Ok(None);
        }
        let min = std::mem::replace(&mut self.items[0], value);
        self.index.forget(&min);
        self.index.record(self.items[0].clone(), 0);
        sift::sift_down(&mut self.items, 0, &mut self.index);
        Ok(Some(min))
    }

    /// Pushes `value`, then pops the minimum. When the heap is empty or
    /// `value` is not greater than the current minimum, the value comes
    /// straight back without ever entering the heap or its index. The
    /// duplicate check applies either way.
    pub fn push_pop(&mut self, value: T) -> Result<T, HeapError> {
        if self.index.contains(&value) {
            return Err(HeapError::Duplicate(format!("{:?}", value)));
        }
        let goes_in = matches!(self.items.first(), Some(min) if *min < value);
        if !goes_in {
            return Ok(value);
        }
        let min = std::mem::replace(&mut self.items[0], value);
        self.index.forget(&min);
        self.index.record(self.items[0].clone(), 0);
        sift::sift_down(&mut self.items, 0, &mut self.index);
        Ok(min)
    }

    /// Rebuilds the invariant from the current array state, patching the
    /// index as elements move. O(n).
    pub fn heapify(&mut self) {
        sift::heapify(&mut self.items, &mut self.index);
    }

    /// Scans every parent/child pair and reports the first violation.
    pub fn check_invariant(&self) -> Result<(), HeapError> {
        sift::check_invariant(&self.items)
    }

    /// Recomputes the index from the array and reports the first
    /// disagreement with the live one. Diagnostic only, O(n).
    pub fn check_indexes(&self) -> Result<(), HeapError> {
        self.index.verify(self.items.iter())
    }

    /// Full diagnostic pass: invariant scan plus index verification.
    pub fn check(&self) -> Result<(), HeapError> {
        self.check_invariant()?;
        self.check_indexes()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Drains the heap into a sorted vector.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Ok(value) = self.pop() {
            out.push(value);
        }
        out
    }

    /// Renders the heap to a [`Snapshot`] that round-trips through
    /// [`IndexedHeap::from_snapshot`].
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot::plain(self.items.clone())
    }

    /// Rebuilds an indexed heap from a snapshot, rejecting keyed
    /// snapshots (`MissingKey`) and duplicated elements (`Duplicate`).
    pub fn from_snapshot(snapshot: Snapshot<T>) -> Result<Self, HeapError> {
        let (items, key_label) = snapshot.into_parts();
        if key_label.is_some() {
            return Err(HeapError::MissingKey);
        }
        Self::from_vec(items)
    }
}

impl<T> Default for IndexedHeap<T>
where
    T: Ord + Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a IndexedHeap<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Display for IndexedHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexedHeap({:?})", self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: i32) -> IndexedHeap<i32> {
        IndexedHeap::from_vec((1..=n).rev().collect()).unwrap()
    }

    #[test]
    fn empty_heap() {
        let mut heap: IndexedHeap<i32> = IndexedHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), Err(HeapError::Empty));
        assert_eq!(heap.pop(), Err(HeapError::Empty));
        heap.check().unwrap();
    }

    #[test]
    fn construction_indexes_every_value() {
        let heap = seeded(26);
        heap.check().unwrap();
        for v in 1..=26 {
            assert!(heap.contains(&v));
        }
    }

    #[test]
    fn duplicate_construction_fails() {
        let result = IndexedHeap::from_vec(vec![1, 2, 3, 2]);
        assert!(matches!(result, Err(HeapError::Duplicate(_))));
    }

    #[test]
    fn duplicate_push_fails() {
        let mut heap = seeded(5);
        assert!(matches!(heap.push(3), Err(HeapError::Duplicate(_))));
        assert_eq!(heap.len(), 5);
        heap.check().unwrap();
    }

    #[test]
    fn push_and_pop_keep_index_in_sync() {
        let mut heap = IndexedHeap::new();
        for v in (1..=26).rev() {
            heap.push(v).unwrap();
            heap.check().unwrap();
        }
        for expect in 1..=26 {
            assert_eq!(heap.pop(), Ok(expect));
            heap.check().unwrap();
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn remove_arbitrary_values() {
        let mut heap = seeded(26);
        assert_eq!(heap.remove(&13), Some(13));
        heap.check().unwrap();
        assert_eq!(heap.remove(&13), None);
        assert_eq!(heap.remove(&1), Some(1));
        heap.check().unwrap();
        assert_eq!(heap.len(), 24);
        assert_eq!(heap.peek(), Ok(&2));
    }

    #[test]
    fn remove_then_push_restores_the_heap() {
        let mut heap = seeded(26);
        heap.remove(&13).unwrap();
        heap.push(13).unwrap();
        heap.check().unwrap();
        assert_eq!(heap.len(), 26);
        assert_eq!(
            heap.into_sorted_vec(),
            (1..=26).collect::<Vec<i32>>()
        );
    }

    #[test]
    fn replace_swaps_the_minimum() {
        let mut heap = seeded(5);
        assert_eq!(heap.replace(9), Ok(Some(1)));
        heap.check().unwrap();
        assert!(!heap.contains(&1));
        assert!(heap.contains(&9));
    }

    #[test]
    fn replace_rejects_duplicates() {
        let mut heap = seeded(5);
        assert!(matches!(heap.replace(4), Err(HeapError::Duplicate(_))));
        heap.check().unwrap();
    }

    #[test]
    fn replace_on_empty_pushes() {
        let mut heap = IndexedHeap::new();
        assert_eq!(heap.replace(7), Ok(None));
        assert_eq!(heap.peek(), Ok(&7));
        heap.check().unwrap();
    }

    #[test]
    fn push_pop_on_empty_returns_value() {
        let mut heap: IndexedHeap<i32> = IndexedHeap::new();
        assert_eq!(heap.push_pop(42), Ok(42));
        assert!(heap.is_empty());
        heap.check().unwrap();
    }

    #[test]
    fn push_pop_below_minimum_bypasses_heap() {
        let mut heap = IndexedHeap::from_vec(vec![5, 6, 7]).unwrap();
        assert_eq!(heap.push_pop(3), Ok(3));
        assert!(!heap.contains(&3));
        assert_eq!(heap.len(), 3);
        heap.check().unwrap();
    }

    #[test]
    fn push_pop_checks_duplicates_even_when_bypassing() {
        let mut heap = IndexedHeap::from_vec(vec![5, 6, 7]).unwrap();
        assert!(matches!(heap.push_pop(5), Err(HeapError::Duplicate(_))));
        heap.check().unwrap();
    }

    #[test]
    fn push_pop_above_minimum_replaces() {
        let mut heap = IndexedHeap::from_vec(vec![5, 6, 7]).unwrap();
        assert_eq!(heap.push_pop(9), Ok(5));
        assert!(heap.contains(&9));
        assert!(!heap.contains(&5));
        heap.check().unwrap();
    }

    #[test]
    fn check_indexes_catches_corruption() {
        let mut heap = seeded(10);
        heap.index.record(3, 0);
        assert!(matches!(
            heap.check_indexes(),
            Err(HeapError::IndexCorrupt(_))
        ));
    }

    #[test]
    fn push_n_pop_n_is_a_permutation() {
        for n in [0usize, 1, 2, 25, 1000] {
            let mut heap = IndexedHeap::new();
            for v in (0..n).rev() {
                heap.push(v).unwrap();
            }
            let mut drained = Vec::new();
            while let Ok(v) = heap.pop() {
                drained.push(v);
            }
            assert_eq!(drained, (0..n).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let heap = seeded(8);
        let rebuilt = IndexedHeap::from_snapshot(heap.snapshot()).unwrap();
        rebuilt.check().unwrap();
        assert_eq!(rebuilt.into_sorted_vec(), (1..=8).collect::<Vec<i32>>());
    }
}

//! Hybrid of the keyed and indexed variants: ordering by a key function,
//! removal by original value in O(log n).
//!
//! Every mutation keeps three things synchronized: the (key, value) pair
//! array, the heap invariant over the pairs, and the value-to-slot
//! position index. Comparisons always see the pair; duplicate checks,
//! index writes and returned values always see the bare value.

use std::any::type_name;
use std::fmt;
use std::hash::Hash;

use crate::error::HeapError;
use crate::index::PositionIndex;
use crate::keyed::Entry;
use crate::sift::{self, MoveTracker};
use crate::snapshot::Snapshot;

/// Sift bookkeeping for heaps whose array stores (key, value) pairs: the
/// index tracks the pair's value component.
impl<K, T: Eq + Hash + Clone> MoveTracker<Entry<K, T>> for PositionIndex<T> {
    fn moved(&mut self, entry: &Entry<K, T>, slot: usize) {
        self.record(entry.value.clone(), slot);
    }
}

/// A min-heap ordered by `key(value)` with O(log n) removal by value.
///
/// Values must be unique and hashable; keys only need `Ord`. Equal keys
/// break ties by the value's own comparison.
pub struct KeyedIndexedHeap<T, K, F> {
    entries: Vec<Entry<K, T>>,
    index: PositionIndex<T>,
    key: F,
}

impl<T, K, F> KeyedIndexedHeap<T, K, F>
where
    T: Ord + Eq + Hash + Clone + fmt::Debug,
    K: Ord,
    F: Fn(&T) -> K,
{
    /// Creates an empty heap ordering by `key`. The key function is
    /// mandatory; without one [`IndexedHeap`](crate::IndexedHeap)
    /// already covers the natural ordering.
    pub fn new(key: F) -> Self {
        Self {
            entries: Vec::new(),
            index: PositionIndex::new(),
            key,
        }
    }

    /// Builds a heap from initial values in O(n). Fails with `Duplicate`
    /// on repeated input, constructing nothing.
    pub fn from_vec(values: Vec<T>, key: F) -> Result<Self, HeapError> {
        let mut index = PositionIndex::with_capacity(values.len());
        let mut entries = Vec::with_capacity(values.len());
        for (slot, value) in values.into_iter().enumerate() {
            if index.contains(&value) {
                return Err(HeapError::Duplicate(format!("{:?}", value)));
            }
            index.record(value.clone(), slot);
            entries.push(Entry {
                key: key(&value),
                value,
            });
        }
        let mut heap = Self {
            entries,
            index,
            key,
        };
        sift::heapify(&mut heap.entries, &mut heap.index);
        Ok(heap)
    }

    fn entry(&self, value: T) -> Entry<K, T> {
        Entry {
            key: (self.key)(&value),
            value,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value whose key is minimal.
    pub fn peek(&self) -> Result<&T, HeapError> {
        self.entries.first().map(|e| &e.value).ok_or(HeapError::Empty)
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
        let slot = self.entries.len();
        self.index.record(value.clone(), slot);
        let entry = self.entry(value);
        self.entries.push(entry);
        sift::sift_up(&mut self.entries, 0, slot, &mut self.index);
        Ok(())
    }

    /// Removes and returns the value with the minimal key. O(log n).
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.entries.is_empty() {
            return Err(HeapError::Empty);
        }
        Ok(self.take_slot(0))
    }

    /// Removes `value` wherever its pair currently sits, or returns
    /// `None` if it is not in the heap. O(log n).
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let slot = self.index.slot_of(value)?;
        Some(self.take_slot(slot))
    }

    fn take_slot(&mut self, slot: usize) -> T {
        let last = self.entries.len() - 1;
        self.entries.swap(slot, last);
        let taken = self.entries.pop().unwrap();
        self.index.forget(&taken.value);
        if slot < self.entries.len() {
            self.index.record(self.entries[slot].value.clone(), slot);
            sift::restore_at(&mut self.entries, slot, &mut self.index);
        }
        taken.value
    }

    /// Poppush: pops the value with the minimal key and installs `value`
    /// in one restore pass. On an empty heap the value is pushed and
    /// `Ok(None)` returned. Fails with `Duplicate` if already present.
    pub fn replace(&mut self, value: T) -> Result<Option<T>, HeapError> {
        if self.index.contains(&value) {
            return Err(HeapError::Duplicate(format!("{:?}", value)));
        }
        if self.entries.is_empty() {
            self.index.record(value.clone(), 0);
            let entry = self.entry(value);
            self.entries.push(entry);
            return Ok(None);
        }
        let entry = self.entry(value);
        let old = std::mem::replace(&mut self.entries[0], entry);
        self.index.forget(&old.value);
        self.index.record(self.entries[0].value.clone(), 0);
        sift::sift_down(&mut self.entries, 0, &mut self.index);
        Ok(Some(old.value))
    }

    /// Pushes `value`, then pops the minimum-keyed value. When the heap
    /// is empty or `value`'s key is not greater than the current
    /// minimum's, the value comes straight back without entering the
    /// heap or its index. The duplicate check applies either way.
    pub fn push_pop(&mut self, value: T) -> Result<T, HeapError> {
        if self.index.contains(&value) {
            return Err(HeapError::Duplicate(format!("{:?}", value)));
        }
        let entry = self.entry(value);
        let goes_in = matches!(self.entries.first(), Some(min) if *min < entry);
        if !goes_in {
            return Ok(entry.value);
        }
        let old = std::mem::replace(&mut self.entries[0], entry);
        self.index.forget(&old.value);
        self.index.record(self.entries[0].value.clone(), 0);
        sift::sift_down(&mut self.entries, 0, &mut self.index);
        Ok(old.value)
    }

    /// Rebuilds the invariant from the current array state, patching the
    /// index as pairs move. O(n).
    pub fn heapify(&mut self) {
        sift::heapify(&mut self.entries, &mut self.index);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterates over the original values in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Drains the heap into a vector sorted by key.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.entries.len());
        while let Ok(value) = self.pop() {
            out.push(value);
        }
        out
    }

    /// Renders the heap to a [`Snapshot`] carrying the element set and
    /// the key function's type name.
    pub fn snapshot(&self) -> Snapshot<T> {
        let items = self.iter().cloned().collect();
        Snapshot::keyed(items, type_name::<F>().to_string())
    }

    /// Rebuilds a heap from a snapshot using `key`, which the snapshot
    /// itself cannot carry. Fails with `Duplicate` on repeated elements.
    pub fn from_snapshot(snapshot: Snapshot<T>, key: F) -> Result<Self, HeapError> {
        let (items, _) = snapshot.into_parts();
        Self::from_vec(items, key)
    }
}

impl<T, K, F> KeyedIndexedHeap<T, K, F>
where
    T: Ord + Eq + Hash + Clone + fmt::Debug,
    K: Ord + fmt::Debug,
    F: Fn(&T) -> K,
{
    /// Scans every parent/child pair of (key, value) entries.
    pub fn check_invariant(&self) -> Result<(), HeapError> {
        sift::check_invariant(&self.entries)
    }

    /// Recomputes the value-to-slot index from the pair array and
    /// reports the first disagreement with the live one.
    pub fn check_indexes(&self) -> Result<(), HeapError> {
        self.index.verify(self.entries.iter().map(|e| &e.value))
    }

    /// Full diagnostic pass: invariant scan plus index verification.
    pub fn check(&self) -> Result<(), HeapError> {
        self.check_invariant()?;
        self.check_indexes()
    }
}

impl<T, K, F> fmt::Display for KeyedIndexedHeap<T, K, F>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&T> = self.entries.iter().map(|e| &e.value).collect();
        write!(f, "KeyedIndexedHeap({:?}, key={})", values, type_name::<F>())
    }
}

impl<T, K, F> fmt::Debug for KeyedIndexedHeap<T, K, F>
where
    T: fmt::Debug,
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedIndexedHeap")
            .field("entries", &self.entries)
            .field("key", &type_name::<F>())
            .finish()
    }
}

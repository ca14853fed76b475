//! Min-heap ordered by a caller-supplied key function instead of the
//! elements' own comparison.

use std::any::type_name;
use std::fmt;

use crate::error::HeapError;
use crate::heap::Heap;
use crate::snapshot::Snapshot;

/// What the keyed variants actually store: the computed key alongside the
/// original value. The derived `Ord` compares the key first and falls
/// back to the value's own `Ord` on ties, so equal keys break by the
/// value's comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Entry<K, T> {
    pub(crate) key: K,
    pub(crate) value: T,
}

/// A min-heap that orders elements by `key(value)`.
///
/// Useful when the same set of values needs to live in several heaps with
/// different orders, or to reverse a heap's order without wrapper types.
/// The key is computed once on the way in and stored next to the value;
/// reads hand back the original values only.
pub struct KeyedHeap<T, K, F> {
    heap: Heap<Entry<K, T>>,
    key: F,
}

impl<T, K, F> KeyedHeap<T, K, F>
where
    T: Ord,
    K: Ord,
    F: Fn(&T) -> K,
{
    /// Creates an empty heap ordering by `key`. The key function is
    /// mandatory; without one the plain [`Heap`] already covers the
    /// natural ordering.
    pub fn new(key: F) -> Self {
        Self {
            heap: Heap::new(),
            key,
        }
    }

    /// Builds a keyed heap from initial values in O(n).
    pub fn from_vec(values: Vec<T>, key: F) -> Self {
        let entries = values
            .into_iter()
            .map(|value| Entry {
                key: key(&value),
                value,
            })
            .collect();
        Self {
            heap: Heap::from_vec(entries),
            key,
        }
    }

    fn entry(&self, value: T) -> Entry<K, T> {
        Entry {
            key: (self.key)(&value),
            value,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the value whose key is minimal.
    pub fn peek(&self) -> Result<&T, HeapError> {
        self.heap.peek().map(|entry| &entry.value)
    }

    pub fn push(&mut self, value: T) {
        let entry = self.entry(value);
        self.heap.push(entry);
    }

    pub fn pop(&mut self) -> Result<T, HeapError> {
        self.heap.pop().map(|entry| entry.value)
    }

    /// Removes the value at an arbitrary slot of the backing array.
    pub fn pop_at(&mut self, slot: usize) -> Option<T> {
        self.heap.pop_at(slot).map(|entry| entry.value)
    }

    /// Poppush: pops the current minimum and installs `value` in one
    /// restore pass. Pushes and returns `None` on an empty heap.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let entry = self.entry(value);
        self.heap.replace(entry).map(|old| old.value)
    }

    /// Returns `value` untouched when the heap is empty or its key is not
    /// greater than the current minimum's; otherwise behaves like
    /// [`KeyedHeap::replace`].
    pub fn push_pop(&mut self, value: T) -> T {
        let entry = self.entry(value);
        self.heap.push_pop(entry).value
    }

    pub fn heapify(&mut self) {
        self.heap.heapify();
    }

    /// Removal by value needs a position index; use
    /// [`KeyedIndexedHeap`](crate::KeyedIndexedHeap).
    pub fn remove(&mut self, _value: &T) -> Result<T, HeapError> {
        Err(HeapError::NotSupported("remove"))
    }

    /// O(n) membership scan over the stored values.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Iterates over the original values in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.heap.as_slice().iter().map(|entry| &entry.value)
    }

    /// Gives the values up, in heap order (not sorted).
    pub fn into_vec(self) -> Vec<T> {
        self.heap.into_vec().into_iter().map(|e| e.value).collect()
    }

    /// Drains the heap into a vector sorted by key.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| e.value)
            .collect()
    }
}

impl<T, K, F> KeyedHeap<T, K, F>
where
    T: Ord + fmt::Debug,
    K: Ord + fmt::Debug,
    F: Fn(&T) -> K,
{
    /// Scans every parent/child pair of (key, value) entries.
    pub fn check_invariant(&self) -> Result<(), HeapError> {
        self.heap.check_invariant()
    }

    pub fn check(&self) -> Result<(), HeapError> {
        self.check_invariant()
    }
}

impl<T, K, F> KeyedHeap<T, K, F>
where
    T: Ord + Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    /// Renders the heap to a [`Snapshot`] carrying the element set and
    /// the key function's type name.
    pub fn snapshot(&self) -> Snapshot<T> {
        let items = self.iter().cloned().collect();
        Snapshot::keyed(items, type_name::<F>().to_string())
    }

    /// Rebuilds a keyed heap from a snapshot using `key`, which the
    /// snapshot itself cannot carry.
    pub fn from_snapshot(snapshot: Snapshot<T>, key: F) -> Self {
        let (items, _) = snapshot.into_parts();
        Self::from_vec(items, key)
    }
}

impl<T, K, F> fmt::Display for KeyedHeap<T, K, F>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<&T> = self.heap.as_slice().iter().map(|e| &e.value).collect();
        write!(f, "KeyedHeap({:?}, key={})", values, type_name::<F>())
    }
}

impl<T, K, F> fmt::Debug for KeyedHeap<T, K, F>
where
    T: fmt::Debug,
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedHeap")
            .field("entries", &self.heap.as_slice())
            .field("key", &type_name::<F>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Reverse;

    fn reversed(v: &i32) -> Reverse<i32> {
        Reverse(*v)
    }

    #[test]
    fn orders_by_key_not_value() {
        let mut heap = KeyedHeap::from_vec((1..=26).collect(), reversed);
        heap.check().unwrap();
        // Reverse key turns the min-heap into a max-drain.
        let mut popped = Vec::new();
        while let Ok(v) = heap.pop() {
            popped.push(v);
        }
        assert_eq!(popped, (1..=26).rev().collect::<Vec<i32>>());
    }

    #[test]
    fn peek_and_pop_strip_the_key() {
        let mut heap = KeyedHeap::new(reversed);
        heap.push(5);
        heap.push(9);
        heap.push(7);
        assert_eq!(heap.peek(), Ok(&9));
        assert_eq!(heap.pop(), Ok(9));
        heap.check().unwrap();
    }

    #[test]
    fn push_keeps_invariant_each_step() {
        let mut heap = KeyedHeap::new(reversed);
        for v in 1..=26 {
            heap.push(v);
            heap.check().unwrap();
        }
        assert_eq!(heap.len(), 26);
    }

    #[test]
    fn replace_and_push_pop_follow_key_order() {
        let mut heap = KeyedHeap::from_vec(vec![5, 6, 7], reversed);
        // Under Reverse ordering the "minimum" is the largest value.
        assert_eq!(heap.replace(9), Some(7));
        heap.check().unwrap();

        // 9 is the current minimum under Reverse; pushing 10 (smaller
        // key) bounces straight back.
        assert_eq!(heap.push_pop(10), 10);
        assert_eq!(heap.len(), 3);

        // 4 has a greater key than the minimum 9, so 9 comes out.
        assert_eq!(heap.push_pop(4), 9);
        heap.check().unwrap();
    }

    #[test]
    fn push_pop_on_empty_returns_value() {
        let mut heap = KeyedHeap::new(reversed);
        assert_eq!(heap.push_pop(3), 3);
        assert!(heap.is_empty());
    }

    #[test]
    fn iteration_yields_values() {
        let heap = KeyedHeap::from_vec(vec![2, 1, 3], reversed);
        let mut seen: Vec<i32> = heap.iter().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn remove_is_not_supported() {
        let mut heap = KeyedHeap::from_vec(vec![1, 2], reversed);
        assert_eq!(heap.remove(&1), Err(HeapError::NotSupported("remove")));
    }

    #[test]
    fn equal_keys_break_ties_by_value() {
        let mut heap = KeyedHeap::from_vec(vec![14, 3, 8, 21], |v: &i32| v % 2);
        // All even values share key 0 and drain in value order, then the
        // odd ones do the same.
        assert_eq!(heap.pop(), Ok(8));
        assert_eq!(heap.pop(), Ok(14));
        assert_eq!(heap.pop(), Ok(3));
        assert_eq!(heap.pop(), Ok(21));
    }

    #[test]
    fn snapshot_round_trip() {
        let heap = KeyedHeap::from_vec(vec![4, 1, 3], reversed);
        let snapshot = heap.snapshot();
        assert!(snapshot.key_label().is_some());
        let rebuilt = KeyedHeap::from_snapshot(snapshot, reversed);
        rebuilt.check().unwrap();
        assert_eq!(rebuilt.into_sorted_vec(), vec![4, 3, 1]);
    }

    #[test]
    fn plain_heap_refuses_keyed_snapshot() {
        let heap = KeyedHeap::from_vec(vec![4, 1, 3], reversed);
        assert_eq!(
            Heap::from_snapshot(heap.snapshot()).unwrap_err(),
            HeapError::MissingKey
        );
    }

    #[test]
    fn display_names_the_key_fn() {
        let heap = KeyedHeap::from_vec(vec![1], reversed);
        let rendered = heap.to_string();
        assert!(rendered.starts_with("KeyedHeap([1], key="));
    }
}

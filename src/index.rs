//! The position index: a derived map from value to its current slot in
//! the backing array. It is never a source of truth on its own; every
//! array write patches it, and `verify` can rebuild it from scratch to
//! prove the two agree.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::HeapError;
use crate::sift::MoveTracker;

#[derive(Debug, Clone, Default)]
pub(crate) struct PositionIndex<V> {
    slots: HashMap<V, usize>,
}

impl<V> PositionIndex<V>
where
    V: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn contains(&self, value: &V) -> bool {
        self.slots.contains_key(value)
    }

    pub(crate) fn slot_of(&self, value: &V) -> Option<usize> {
        self.slots.get(value).copied()
    }

    /// Records that `value` now lives at `slot`, overwriting any stale
    /// entry for it.
    pub(crate) fn record(&mut self, value: V, slot: usize) {
        self.slots.insert(value, slot);
    }

    pub(crate) fn forget(&mut self, value: &V) -> Option<usize> {
        self.slots.remove(value)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Recomputes the index from the live array and reports the first
    /// disagreement with the incrementally-maintained one.
    pub(crate) fn verify<'a>(
        &self,
        live: impl ExactSizeIterator<Item = &'a V>,
    ) -> Result<(), HeapError>
    where
        V: fmt::Debug + 'a,
    {
        if live.len() != self.slots.len() {
            return Err(HeapError::IndexCorrupt(format!(
                "index holds {} entries but the array holds {}",
                self.slots.len(),
                live.len()
            )));
        }
        for (slot, value) in live.enumerate() {
            match self.slots.get(value) {
                Some(&recorded) if recorded == slot => {}
                Some(&recorded) => {
                    return Err(HeapError::IndexCorrupt(format!(
                        "{:?} sits in slot {} but the index records slot {}",
                        value, slot, recorded
                    )));
                }
                None => {
                    return Err(HeapError::IndexCorrupt(format!(
                        "{:?} sits in slot {} but is missing from the index",
                        value, slot
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Sift bookkeeping for heaps whose array stores bare values.
impl<V: Eq + Hash + Clone> MoveTracker<V> for PositionIndex<V> {
    fn moved(&mut self, element: &V, slot: usize) {
        self.record(element.clone(), slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_state() {
        let values = vec!["a", "b", "c"];
        let mut index = PositionIndex::new();
        for (slot, v) in values.iter().enumerate() {
            index.record(*v, slot);
        }
        assert!(index.verify(values.iter()).is_ok());
    }

    #[test]
    fn verify_rejects_stale_slot() {
        let values = vec!["a", "b", "c"];
        let mut index = PositionIndex::new();
        index.record("a", 0);
        index.record("b", 2);
        index.record("c", 1);
        assert!(matches!(
            index.verify(values.iter()),
            Err(HeapError::IndexCorrupt(_))
        ));
    }

    #[test]
    fn verify_rejects_size_mismatch() {
        let values = vec!["a", "b"];
        let mut index = PositionIndex::new();
        index.record("a", 0);
        assert!(matches!(
            index.verify(values.iter()),
            Err(HeapError::IndexCorrupt(_))
        ));
    }
}

//! Diagnostic rendering of a heap: the logical element set plus, for the
//! keyed variants, a reference to the key function the heap was built
//! with. A snapshot carries enough to rebuild an equivalent heap through
//! the matching constructor, which is what the `Display` impls print.

use std::fmt;

/// Owned rendering of a heap's contents.
///
/// Produced by the `snapshot` method on every heap variant and accepted
/// by the matching `from_snapshot` constructor. `key_label` names the key
/// function's type for snapshots taken from keyed heaps; plain heaps
/// leave it `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    items: Vec<T>,
    key_label: Option<String>,
}

impl<T> Snapshot<T> {
    pub(crate) fn plain(items: Vec<T>) -> Self {
        Self {
            items,
            key_label: None,
        }
    }

    pub(crate) fn keyed(items: Vec<T>, key_label: String) -> Self {
        Self {
            items,
            key_label: Some(key_label),
        }
    }

    /// The logical elements, in storage order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Type name of the key function the source heap ordered by, if any.
    pub fn key_label(&self) -> Option<&str> {
        self.key_label.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.key_label)
    }
}

impl<T: fmt::Debug> fmt::Display for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key_label {
            Some(label) => write!(f, "Snapshot({:?}, key={})", self.items, label),
            None => write!(f, "Snapshot({:?})", self.items),
        }
    }
}

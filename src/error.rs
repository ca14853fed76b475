use thiserror::Error;

/// Errors reported by the heap variants.
///
/// `Invariant` and `IndexCorrupt` are only produced by the explicit
/// diagnostic checks (`check_invariant`, `check_indexes`); if one of them
/// shows up, it points at a bug in the heap itself, not at caller input.
/// Every other variant is a caller precondition failure and is safe to
/// recover from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    /// `peek` or `pop` on an empty heap.
    #[error("heap is empty")]
    Empty,

    /// An indexed heap was asked to hold the same value twice.
    #[error("duplicate value not allowed: {0}")]
    Duplicate(String),

    /// A snapshot taken from a keyed heap was fed to a constructor that
    /// has no key function to rebuild it with.
    #[error("snapshot came from a keyed heap; restore it with its key function")]
    MissingKey,

    /// The operation is not implemented by this heap variant.
    #[error("operation not supported by this heap variant: {0}")]
    NotSupported(&'static str),

    /// `check_invariant` found a parent slot greater than one of its
    /// children.
    #[error("heap invariant (heap[{parent}] <= heap[{child}]) violated: {message}")]
    Invariant {
        parent: usize,
        child: usize,
        message: String,
    },

    /// `check_indexes` found the position index disagreeing with the
    /// backing array.
    #[error("position index out of sync with heap storage: {0}")]
    IndexCorrupt(String),
}

//! Binary min-heaps with two extras the textbook algorithm lacks:
//! ordering by a derived key, and O(log n) removal of an arbitrary value
//! without knowing where it sits.
//!
//! Four variants share the same sift primitives and operation set:
//!
//! - [`Heap`] — plain min-heap over the elements' own `Ord`.
//! - [`KeyedHeap`] — orders by a caller-supplied key function; reads hand
//!   back the original values.
//! - [`IndexedHeap`] — keeps a value-to-slot index so `remove(&value)`
//!   runs in O(log n); values must be unique and hashable.
//! - [`KeyedIndexedHeap`] — both at once: keyed ordering, removal by
//!   original value.
//!
//! Push, pop, `replace` (poppush) and `push_pop` are O(log n);
//! construction from existing elements is O(n). The structures are
//! single-owner and not internally synchronized; wrap one in a lock to
//! share it across threads.
//!
//! Each variant carries two diagnostic checks: `check_invariant` scans
//! every parent/child pair, and on the indexed variants `check_indexes`
//! rebuilds the position index from scratch and compares. Both are meant
//! for tests and debugging, never for the hot path.
//!
//! ```
//! use heapkit::IndexedHeap;
//!
//! let mut queue = IndexedHeap::from_vec(vec![30, 10, 20])?;
//! assert_eq!(queue.pop()?, 10);
//! // Cancel an entry without knowing its position.
//! assert_eq!(queue.remove(&30), Some(30));
//! assert_eq!(queue.pop()?, 20);
//! # Ok::<(), heapkit::HeapError>(())
//! ```

mod error;
mod heap;
mod index;
mod indexed;
mod keyed;
mod keyed_indexed;
mod sift;
mod snapshot;

pub use error::HeapError;
pub use heap::Heap;
pub use indexed::IndexedHeap;
pub use keyed::KeyedHeap;
pub use keyed_indexed::KeyedIndexedHeap;
pub use snapshot::Snapshot;

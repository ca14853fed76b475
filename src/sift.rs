//! The two restore-invariant primitives shared by every heap variant,
//! plus the bottom-up heapify built from them.
//!
//! All slot movement inside a heap goes through these functions. Each
//! swap reports the new slot of both moved elements to a [`MoveTracker`],
//! which is how the indexed variants keep their position index in
//! lock-step with the array without ever re-scanning it.

use std::fmt;

use crate::error::HeapError;

/// Observer for element movement. `moved` is called with the element now
/// occupying `slot` every time a swap writes a slot.
pub(crate) trait MoveTracker<T> {
    fn moved(&mut self, element: &T, slot: usize);
}

/// Tracker for heaps that carry no derived state.
impl<T> MoveTracker<T> for () {
    fn moved(&mut self, _element: &T, _slot: usize) {}
}

/// Bubbles the element at `pos` toward `start` while it is strictly less
/// than its parent. Returns the slot the element came to rest in.
pub(crate) fn sift_up<T: Ord>(
    a: &mut [T],
    start: usize,
    mut pos: usize,
    tracker: &mut impl MoveTracker<T>,
) -> usize {
    while pos > start {
        let parent = (pos - 1) / 2;
        if a[pos] < a[parent] {
            a.swap(pos, parent);
            tracker.moved(&a[pos], pos);
            tracker.moved(&a[parent], parent);
            pos = parent;
        } else {
            break;
        }
    }
    pos
}

/// Bubbles the element at `pos` downward, swapping with the smaller child
/// until both children are no smaller or a leaf is reached. Returns the
/// final slot.
pub(crate) fn sift_down<T: Ord>(
    a: &mut [T],
    mut pos: usize,
    tracker: &mut impl MoveTracker<T>,
) -> usize {
    let len = a.len();
    loop {
        let left = 2 * pos + 1;
        let right = 2 * pos + 2;
        let mut smallest = pos;

        if left < len && a[left] < a[smallest] {
            smallest = left;
        }
        if right < len && a[right] < a[smallest] {
            smallest = right;
        }
        if smallest == pos {
            return pos;
        }
        a.swap(pos, smallest);
        tracker.moved(&a[pos], pos);
        tracker.moved(&a[smallest], smallest);
        pos = smallest;
    }
}

/// Restores the invariant after an arbitrary slot has been overwritten.
/// The new occupant may violate the invariant in either direction, so try
/// sifting up first; if the element did not move, sift it down instead.
pub(crate) fn restore_at<T: Ord>(
    a: &mut [T],
    pos: usize,
    tracker: &mut impl MoveTracker<T>,
) -> usize {
    let settled = sift_up(a, 0, pos, tracker);
    if settled == pos {
        sift_down(a, pos, tracker)
    } else {
        settled
    }
}

/// Rebuilds the invariant over the whole array, bottom-up. O(n).
pub(crate) fn heapify<T: Ord>(a: &mut [T], tracker: &mut impl MoveTracker<T>) {
    for pos in (0..a.len() / 2).rev() {
        sift_down(a, pos, tracker);
    }
}

/// Scans every parent/child pair from the end of the array toward the
/// front and reports the first violation found.
pub(crate) fn check_invariant<T: Ord + fmt::Debug>(a: &[T]) -> Result<(), HeapError> {
    for child in (1..a.len()).rev() {
        let parent = (child - 1) / 2;
        if a[child] < a[parent] {
            return Err(HeapError::Invariant {
                parent,
                child,
                message: format!("{:?} !<= {:?}", a[parent], a[child]),
            });
        }
    }
    Ok(())
}

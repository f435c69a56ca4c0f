//! Ascending-order helpers over a `Vec`.
//!
//! Both the virtual-node list and the object key list go through these
//! functions so they share one ordering discipline: ascending, duplicates
//! allowed, a new value lands before any existing equal value.
//!
//! Insertion and removal shift the tail of the vector, O(M) per call on top of
//! the O(log M) search. That is fine for the virtual-node counts a ring
//! typically carries.

/// The value asked for is not in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value not present in sorted sequence")]
pub struct NotFound;

/// Index of the first element `>= value`, or `seq.len()` if there is none.
#[inline]
pub fn lower_bound<T: Ord>(seq: &[T], value: &T) -> usize {
    seq.partition_point(|x| x < value)
}

/// Inserts `value` keeping `seq` ascending and returns the index it landed at.
pub fn sorted_insert<T: Ord>(seq: &mut Vec<T>, value: T) -> usize {
    let index = lower_bound(seq, &value);
    seq.insert(index, value);
    index
}

/// Removes one element equal to `value` and returns the index it occupied.
pub fn sorted_remove<T: Ord>(seq: &mut Vec<T>, value: &T) -> Result<usize, NotFound> {
    let index = find(seq, value).ok_or(NotFound)?;
    seq.remove(index);
    Ok(index)
}

/// Index of the first element equal to `value`.
pub fn find<T: Ord>(seq: &[T], value: &T) -> Option<usize> {
    let index = lower_bound(seq, value);
    match seq.get(index) {
        Some(found) if found == value => Some(index),
        _ => None,
    }
}

/// Index of the first element `>= value`, wrapping to `0` past the end.
///
/// `None` only for an empty sequence.
pub fn successor_index<T: Ord>(seq: &[T], value: &T) -> Option<usize> {
    if seq.is_empty() {
        return None;
    }
    let index = lower_bound(seq, value);
    Some(if index == seq.len() { 0 } else { index })
}

//! Parallel Arrays
//!
//! All per-component state lives in these parallel arrays.
//! Each array index corresponds to one component.
//!
//! All arrays use `TrackedSlotArray` for stable reactive cells with fine-grained
//! per-index tracking. Reads inside a derived or effect only re-run when the
//! specific indices they touched change.
//!
//! # Array Categories
//!
//! - **core**: Component type
//! - **text**: Text content
//!
//! Structure (parent links, ordered children) is not reactive and lives in
//! [`crate::engine::tree`]; changes to it are reported through the observer.

pub mod core;
pub mod text;

use spark_signals::TrackedSlotArray;

use self::core as core_arrays;
use self::text as text_arrays;

/// Reset every slot of a column to its default.
pub trait ClearAll {
    fn clear_all(&self);
}

impl<T: Clone + PartialEq + 'static> ClearAll for TrackedSlotArray<T> {
    fn clear_all(&self) {
        for index in 0..self.len() {
            self.clear(index);
        }
        self.dirty().borrow_mut().clear();
    }
}

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    text_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    text_arrays::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically when the last component is released.
pub fn reset_all_arrays() {
    core_arrays::reset();
    text_arrays::reset();
}

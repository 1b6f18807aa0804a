//! Core Arrays
//!
//! - componentType: What kind of node lives at an index

use spark_signals::{dirty_set, tracked_slot_array, TrackedSlotArray};

use super::ClearAll;
use crate::types::ComponentType;

thread_local! {
    /// Component type per index.
    static COMPONENT_TYPE: TrackedSlotArray<ComponentType> =
        tracked_slot_array(Some(ComponentType::None), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    COMPONENT_TYPE.with(|arr| arr.ensure_capacity(index + 1));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    COMPONENT_TYPE.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    COMPONENT_TYPE.with(|arr| arr.clear_all());
}

/// Get component type at index (reactive).
pub fn get_component_type(index: usize) -> ComponentType {
    COMPONENT_TYPE.with(|arr| arr.get(index).unwrap_or_default())
}

/// Set component type at index.
pub fn set_component_type(index: usize, component_type: ComponentType) {
    COMPONENT_TYPE.with(|arr| arr.set_value(index, component_type));
}

//! Text Arrays
//!
//! - textContent: The text string a Text node displays
//!
//! Uses `TrackedSlotArray` for stable reactive cells with fine-grained tracking.

use spark_signals::{dirty_set, tracked_slot_array, Signal, TrackedSlotArray};

use super::ClearAll;

thread_local! {
    /// Text content string.
    static TEXT_CONTENT: TrackedSlotArray<String> =
        tracked_slot_array(Some(String::new()), dirty_set());
}

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    TEXT_CONTENT.with(|arr| arr.ensure_capacity(index + 1));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    TEXT_CONTENT.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    TEXT_CONTENT.with(|arr| arr.clear_all());
}

/// Get text content at index (reactive).
pub fn get_text_content(index: usize) -> String {
    TEXT_CONTENT.with(|arr| arr.get(index).unwrap_or_default())
}

/// Set text content at index.
pub fn set_text_content(index: usize, content: String) {
    TEXT_CONTENT.with(|arr| arr.set_value(index, content));
}

/// Set text content from a getter function.
pub fn set_text_content_getter<F>(index: usize, getter: F)
where
    F: Fn() -> String + 'static,
{
    TEXT_CONTENT.with(|arr| arr.set_getter(index, getter));
}

/// Set text content from a signal.
pub fn set_text_content_signal(index: usize, sig: &Signal<String>) {
    TEXT_CONTENT.with(|arr| arr.set_signal(index, sig));
}

//! Text Primitive - Display text.
//!
//! A pure display component for text content. Cannot have children, and is
//! not an element: text never counts towards a node's child element count.

use crate::engine::{allocate_index, release_index, get_current_parent_index, tree};
use crate::engine::arrays::{core, text as text_arrays};
use crate::types::ComponentType;
use super::types::{TextProps, PropValue, Cleanup};

/// Create a text display component.
///
/// Returns a cleanup function that releases resources when called.
pub fn text(props: TextProps) -> Cleanup {
    // 1. ALLOCATE INDEX
    let index = allocate_index(props.id.as_deref());

    // 2. CORE SETUP - Type, parent
    core::set_component_type(index, ComponentType::Text);

    // 3. BIND TEXT CONTENT
    match props.content {
        PropValue::Static(v) => text_arrays::set_text_content(index, v),
        PropValue::Signal(s) => text_arrays::set_text_content_signal(index, &s),
        PropValue::Getter(g) => text_arrays::set_text_content_getter(index, move || g()),
    }

    // 4. ATTACH (last, so observers see a fully initialised node)
    if let Some(parent) = get_current_parent_index() {
        tree::append_child(parent, index);
    }

    // 5. RETURN CLEANUP
    Box::new(move || {
        release_index(index);
    })
}

//! Box Primitive - Container component.
//!
//! The fundamental container component. Groups children under one node.
//!
//! # Example
//!
//! ```ignore
//! use spark_relay::primitives::{box_primitive, text, BoxProps, TextProps};
//!
//! let cleanup = box_primitive(BoxProps {
//!     children: Some(Box::new(|| {
//!         text(TextProps {
//!             content: "Hello!".into(),
//!             ..Default::default()
//!         });
//!     })),
//!     ..Default::default()
//! });
//! ```

use crate::engine::{
    allocate_index, release_index, tree,
    get_current_parent_index, push_parent_context, pop_parent_context,
};
use crate::engine::arrays::core;
use crate::types::ComponentType;
use super::types::{BoxProps, Cleanup};

/// Create a box container component.
///
/// Children render with this box as their parent context, then the box is
/// attached to the current parent. Returns a cleanup function that releases
/// the box and everything under it.
pub fn box_primitive(props: BoxProps) -> Cleanup {
    // 1. ALLOCATE INDEX
    let index = allocate_index(props.id.as_deref());

    // 2. CORE SETUP - Type
    core::set_component_type(index, ComponentType::Box);

    // 3. ATTACH TO PARENT
    if let Some(parent) = get_current_parent_index() {
        tree::append_child(parent, index);
    }

    // 4. RENDER CHILDREN
    if let Some(children) = props.children {
        push_parent_context(index);
        children();
        pop_parent_context();
    }

    // 5. RETURN CLEANUP
    Box::new(move || {
        release_index(index);
    })
}

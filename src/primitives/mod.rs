//! Primitives - Component building blocks.
//!
//! - [`box_primitive`] - Plain container
//! - [`text`] - Text display
//! - [`show`] - Conditional rendering
//! - [`mount_across`] - Render content under a node elsewhere in the tree
//!
//! # Architecture
//!
//! Components are indices into parallel arrays (ECS pattern). Each component:
//! 1. Allocates an index from the registry
//! 2. Writes its state into the arrays (binding signals where given)
//! 3. Attaches to the current parent
//! 4. Returns a cleanup function

mod types;
mod box_primitive;
mod text;
mod control_flow;

pub use types::*;
pub use box_primitive::box_primitive;
pub use text::text;
pub use control_flow::{mount_across, show};

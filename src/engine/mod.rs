//! Engine - Component registry, node tree, observation, parallel arrays.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping, parent context, destroy callbacks
//! - Tree: Parent links and ordered child lists
//! - Observer: Child-list mutation records, batching, observation handles
//! - Arrays: Parallel SlotArrays for component state
//!
//! # Architecture
//!
//! Components are NOT objects. They are indices into parallel arrays:
//!
//! ```text
//! Index 0: Root  (children=[1, 2])
//! Index 1: Box   (parent=0, children=[3])
//! Index 2: Mount (parent=0, id="relay-target--1123581321")
//! Index 3: Text  (parent=1, content="fallback")
//! ```
//!
//! Portals are built purely from these pieces: a mount node is an index with
//! an ID, a relay container is an index attached under it, and presence is
//! derived from the mount node's child list.

mod registry;
pub mod tree;
pub mod observer;
pub mod arrays;

pub use registry::*;
pub use observer::{batch, observe, MutationRecord, ObservationHandle};

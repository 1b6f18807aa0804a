//! # spark-relay
//!
//! Reactive content relay for component trees.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## What it does
//!
//! A [`Relay`] renders content into a [`Target`] that lives somewhere else in
//! the tree. The pair is created together by [`create_relay_pair`] and
//! shares one [`MountId`]. The Target renders fallback content whenever no
//! relay content is attached, and hides it as soon as some is.
//!
//! ## Architecture
//!
//! Components are indices into parallel arrays rather than objects, and
//! component functions render synchronously and return a cleanup:
//!
//! ```text
//! create_relay_pair ─┬─ Target → fallback slot + mount node ← PresenceTracker (observes)
//!                    └─ Relay  → container ──(append_child)──┘
//! ```
//!
//! Presence is derived from child-list mutation records on the mount node,
//! never set by the Relay.
//!
//! ## Modules
//!
//! - [`types`] - Core types (ComponentType, MountId, MutationKind)
//! - [`engine`] - Registry, node tree, mutation observer, parallel arrays
//! - [`primitives`] - Box, Text, `show`, `mount_across`
//! - [`pipeline`] - Environment check and tree mounting
//! - [`portal`] - Relay, Target, presence tracking, the pair factory
//! - [`renderer`] - Static text output of a tree
//! - [`error`] - Portal errors

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod portal;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::PortalError;

pub use engine::{
    allocate_index, batch, find_node_by_id, get_allocated_count, get_current_parent_index, get_id,
    get_index, get_mount_id, is_allocated, observe, off_destroy, on_destroy, pop_parent_context,
    push_parent_context, register_mount_node, release_index, reset_registry, DestroyToken,
    MutationRecord, ObservationHandle,
};

pub use pipeline::{
    environment, is_interactive_document_available, mount, set_environment, unmount,
    with_environment, Environment, MountHandle,
};

pub use primitives::{
    box_primitive, mount_across, show, text, BoxProps, Children, Cleanup, PropValue, TextProps,
};

pub use portal::{
    create_relay_pair, create_relay_pair_with, ContainerLifecycle, Derivation, IdentityAllocator,
    PresenceTracker, Relay, RelayInstance, RelayPair, RelayProps, Target, TargetInstance,
    TargetProps,
};

pub use renderer::{collect_text, outline};

//! Portal - Relay content into a Target elsewhere in the tree.
//!
//! A [`RelayPair`] is a matched [`Relay`] and [`Target`] bound to one
//! [`MountId`]. The Target renders a mount node plus fallback content; the
//! Relay renders its children into a container it attaches under that mount
//! node. The Target shows its fallback exactly when nothing is attached.
//!
//! # Example
//!
//! ```ignore
//! use spark_relay::{create_relay_pair, mount, RelayProps, TargetProps};
//!
//! let toolbar = create_relay_pair(None);
//!
//! let handle = mount(|| {
//!     // Header renders the Target, with fallback for when nothing is relayed
//!     toolbar.target.render(TargetProps::text("no actions"));
//!
//!     // Some page deeper in the tree provides the actual content
//!     let _actions = toolbar.relay.render(RelayProps::text("Save"))?;
//!     Ok(())
//! })?;
//! ```
//!
//! # Ordering
//!
//! Targets must render before their relays. A relay that mounts while no
//! matching target exists fails with [`PortalError::TargetNotFound`].
//!
//! [`PortalError::TargetNotFound`]: crate::error::PortalError::TargetNotFound

mod container;
mod identity;
mod presence;
mod relay;
mod target;

pub use container::ContainerLifecycle;
pub use identity::{IdentityAllocator, DEFAULT_ALLOCATOR, DEFAULT_PREFIX, DEFAULT_SEED};
pub use presence::{Derivation, PresenceTracker};
pub use relay::{Relay, RelayInstance, RelayProps};
pub use target::{Target, TargetInstance, TargetProps};

use crate::types::MountId;

// =============================================================================
// Factory
// =============================================================================

/// A Relay and a Target bound to the same identifier.
#[derive(Debug, Clone)]
pub struct RelayPair {
    pub relay: Relay,
    pub target: Target,
}

impl RelayPair {
    /// The identifier both halves share.
    pub fn id(&self) -> &MountId {
        self.target.id()
    }
}

/// Create a matched pair using the process-wide allocator.
///
/// `id` is used as-is when it is a non-empty string. Reusing one explicit
/// id for two live pairs is unsupported: the Target mounted last wins.
pub fn create_relay_pair(id: Option<&str>) -> RelayPair {
    create_relay_pair_with(&DEFAULT_ALLOCATOR, id)
}

/// Create a matched pair drawing its identifier from `allocator`.
pub fn create_relay_pair_with(allocator: &IdentityAllocator, id: Option<&str>) -> RelayPair {
    let id = allocator.allocate(id);
    tracing::debug!(%id, "relay pair created");
    RelayPair {
        relay: Relay::new(id.clone()),
        target: Target::new(id),
    }
}

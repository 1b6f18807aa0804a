//! Core types for spark-relay.
//!
//! These types are shared by the engine, the primitives, and the portal
//! components built on top of them.

use std::fmt;
use std::rc::Rc;

// =============================================================================
// Component Types - For parallel arrays
// =============================================================================

/// Component types for the parallel arrays pattern.
///
/// Each component at index i has componentType[i] set to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ComponentType {
    #[default]
    None = 0,
    /// Root node created by `pipeline::mount`.
    Root = 1,
    Box = 2,
    Text = 3,
    /// Mount node of a portal Target, addressable by its [`MountId`].
    Mount = 4,
    /// Intermediate container owned by a Relay instance.
    ///
    /// Containers are never released by the node they are attached to,
    /// only detached from it.
    RelayContainer = 5,
}

impl ComponentType {
    /// Whether this node counts as an element child for presence detection.
    pub fn is_element(self) -> bool {
        !matches!(self, ComponentType::None | ComponentType::Text)
    }
}

// =============================================================================
// Mutation Kinds (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Kinds of structural change an observer can subscribe to.
    ///
    /// Combine with bitwise OR when more kinds exist; today only the
    /// child list is observable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MutationKind: u8 {
        const NONE = 0;
        /// Direct children inserted or removed.
        const CHILD_LIST = 1 << 0;
    }
}

// =============================================================================
// Mount Identifier
// =============================================================================

/// Opaque address of a Target's mount node.
///
/// Cheap to clone. Two pairs must not share an identifier; if they do,
/// lookups resolve to the most recently registered mount node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountId(Rc<str>);

impl MountId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<Rc<str>>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MountId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_types() {
        assert!(ComponentType::Box.is_element());
        assert!(ComponentType::RelayContainer.is_element());
        assert!(ComponentType::Mount.is_element());
        assert!(!ComponentType::Text.is_element());
        assert!(!ComponentType::None.is_element());
    }

    #[test]
    fn test_mount_id_display() {
        let id = MountId::from("sidebar");
        assert_eq!(id.to_string(), "sidebar");
        assert_eq!(id.as_str(), "sidebar");
        assert_eq!(id, MountId::new(String::from("sidebar")));
    }
}

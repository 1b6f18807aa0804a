//! Portal errors.

use std::fmt;

use crate::types::MountId;

/// Errors raised while mounting portal components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// A Relay mounted while no Target with its identifier was in the tree.
    ///
    /// This is a wiring mistake in the application (the Relay rendered
    /// before its Target, or the Target was never rendered). It is never
    /// retried.
    TargetNotFound { id: MountId },

    /// A Relay's Target was rendered inside the Relay's own content, so
    /// attaching would put the container under itself.
    CyclicMount { id: MountId },
}

impl fmt::Display for PortalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound { id } => write!(
                f,
                "relay unable to find target `{id}`; make sure the matching Target is mounted before the Relay"
            ),
            Self::CyclicMount { id } => write!(
                f,
                "relay cannot mount into target `{id}`: the target is rendered inside the relay's own content"
            ),
        }
    }
}

impl std::error::Error for PortalError {}

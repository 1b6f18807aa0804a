//! Relay - Renders its children into a Target elsewhere in the tree.
//!
//! # Render
//!
//! The relay asks its [`ContainerLifecycle`] for a container and renders
//! its children into it with [`mount_across`]. In a non-interactive
//! environment there is no container and the relay renders nothing at all.
//!
//! # Mount
//!
//! 1. Resolve the Target's mount node by [`MountId`]
//! 2. No node: fail with [`PortalError::TargetNotFound`]. Never retried
//! 3. Append the container as the last child of the mount node
//!
//! Unmounting detaches the container but keeps it (and the content in it),
//! so mounting the same instance again reattaches the identical container.
//! Disposing releases it.

use std::cell::Cell;
use std::rc::Rc;

use super::container::ContainerLifecycle;
use crate::engine::{
    find_node_by_id, get_current_parent_index, off_destroy, on_destroy, tree, DestroyToken,
};
use crate::error::PortalError;
use crate::primitives::{mount_across, text, Cleanup, TextProps};
use crate::types::MountId;

// =============================================================================
// Props
// =============================================================================

/// Properties for a Relay. The children are the relayed content.
#[derive(Default)]
pub struct RelayProps {
    /// Content to render inside the Target.
    pub children: Option<Box<dyn FnOnce()>>,
}

impl RelayProps {
    /// Relay whatever `children` renders.
    pub fn content(children: impl FnOnce() + 'static) -> Self {
        Self {
            children: Some(Box::new(children)),
        }
    }

    /// Relay a single line of text.
    pub fn text(content: impl Into<String>) -> Self {
        let content: String = content.into();
        Self::content(move || {
            text(TextProps {
                content: content.into(),
                ..Default::default()
            });
        })
    }
}

// =============================================================================
// Relay Component
// =============================================================================

/// Relay half of a relay pair, bound to one [`MountId`].
#[derive(Debug, Clone)]
pub struct Relay {
    id: MountId,
}

impl Relay {
    pub(crate) fn new(id: MountId) -> Self {
        Self { id }
    }

    /// The identifier of the Target this relay renders into.
    pub fn id(&self) -> &MountId {
        &self.id
    }

    /// Render and mount the relay. Returns its cleanup.
    ///
    /// Fails with [`PortalError::TargetNotFound`] if the Target is not
    /// mounted; nothing is left behind in that case.
    pub fn render(&self, props: RelayProps) -> Result<Cleanup, PortalError> {
        let instance = self.instance(props);
        if let Err(err) = instance.mount() {
            instance.dispose();
            return Err(err);
        }
        Ok(instance.into_cleanup())
    }

    /// Render the relay's content without mounting it.
    ///
    /// The instance is disposed when the node that was the current parent
    /// at this point is released, if there was one.
    pub fn instance(&self, props: RelayProps) -> RelayInstance {
        let state = Rc::new(RelayState {
            id: self.id.clone(),
            container: ContainerLifecycle::new(),
            host: Cell::new(None),
            disposed: Cell::new(false),
        });

        match state.container.get_or_create() {
            Some(container) => {
                if let Some(children) = props.children {
                    mount_across(children, container);
                }
                if let Some(host) = get_current_parent_index() {
                    let on_release = state.clone();
                    let token = on_destroy(host, move || on_release.dispose());
                    state.host.set(Some(token));
                }
            }
            None => {
                tracing::debug!(id = %self.id, "relay renders nothing: environment is not interactive");
            }
        }

        RelayInstance { state }
    }
}

// =============================================================================
// Relay Instance
// =============================================================================

struct RelayState {
    id: MountId,
    container: ContainerLifecycle,
    /// Registration that disposes this relay when its host is released.
    host: Cell<Option<DestroyToken>>,
    disposed: Cell<bool>,
}

impl RelayState {
    fn mount(&self) -> Result<(), PortalError> {
        if self.disposed.get() {
            return Ok(());
        }
        let Some(container) = self.container.get_or_create() else {
            return Ok(());
        };
        if tree::parent_of(container).is_some() {
            return Ok(());
        }

        let Some(target) = find_node_by_id(self.id.as_str()) else {
            tracing::warn!(id = %self.id, "relay mounted without a matching target");
            return Err(PortalError::TargetNotFound { id: self.id.clone() });
        };

        if !tree::append_child(target, container) {
            return Err(PortalError::CyclicMount { id: self.id.clone() });
        }
        tracing::debug!(id = %self.id, mount_node = target, container, "relay attached");
        Ok(())
    }

    fn unmount(&self) {
        let Some(container) = self.container.current() else {
            return;
        };
        if let Some(target) = tree::detach(container) {
            tracing::debug!(id = %self.id, mount_node = target, container, "relay detached");
        }
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.unmount();
        self.container.release();
        if let Some(token) = self.host.take() {
            off_destroy(token);
        }
    }
}

/// A rendered Relay.
///
/// Dropping the handle does not unmount; use [`unmount`](Self::unmount),
/// [`dispose`](Self::dispose), or the cleanup from
/// [`into_cleanup`](Self::into_cleanup).
pub struct RelayInstance {
    state: Rc<RelayState>,
}

impl RelayInstance {
    /// Attach the container under the Target's mount node.
    ///
    /// No-op if already attached, disposed, or the environment is not
    /// interactive.
    pub fn mount(&self) -> Result<(), PortalError> {
        self.state.mount()
    }

    /// Detach the container, keeping it for a later [`mount`](Self::mount).
    pub fn unmount(&self) {
        self.state.unmount();
    }

    /// Detach and release the container and its content.
    pub fn dispose(&self) {
        self.state.dispose();
    }

    /// The container index, if one was created.
    pub fn container(&self) -> Option<usize> {
        self.state.container.current()
    }

    /// Whether the container is currently attached somewhere.
    pub fn is_mounted(&self) -> bool {
        self.container().and_then(tree::parent_of).is_some()
    }

    /// Convert into a plain component cleanup that disposes the relay.
    pub fn into_cleanup(self) -> Cleanup {
        Box::new(move || self.dispose())
    }
}

impl std::fmt::Debug for RelayInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayInstance")
            .field("id", &self.state.id)
            .field("container", &self.state.container.current())
            .field("disposed", &self.state.disposed.get())
            .finish()
    }
}

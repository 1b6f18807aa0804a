//! Mount API - Application lifecycle.
//!
//! This module provides the entry point for mounting an application tree.
//! Everything rendered by the app closure lands under a fresh root node, and
//! the whole initial render is one commit: child-list records produced while
//! it runs are delivered to observers only once it has finished.
//!
//! # Example
//!
//! ```ignore
//! use spark_relay::pipeline::mount;
//!
//! let pair = create_relay_pair(None);
//! let handle = mount(|| {
//!     pair.target.render(TargetProps::text("nothing here"));
//!     let _relay = pair.relay.render(RelayProps::text("hello"))?;
//!     Ok(())
//! })?;
//!
//! // Clean up
//! handle.unmount();
//! ```

use crate::engine::arrays::core;
use crate::engine::{allocate_index, batch, pop_parent_context, push_parent_context, release_index};
use crate::error::PortalError;
use crate::types::ComponentType;

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`] that owns the root node.
///
/// Unmounting (or dropping) releases the root and, recursively, everything
/// rendered under it. Components tear down through their destroy callbacks.
#[derive(Debug)]
pub struct MountHandle {
    root: Option<usize>,
}

impl MountHandle {
    /// Index of the root node.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// Render more components under the root, as one commit.
    pub fn update<R>(&self, f: impl FnOnce() -> R) -> R {
        let Some(root) = self.root else {
            return f();
        };
        commit_under(root, f)
    }

    /// Release the root and everything under it.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(root) = self.root.take() {
            tracing::debug!(root, "unmounting tree");
            batch(|| release_index(root));
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount an application tree.
///
/// Creates a root node and runs `app` with the root as parent context.
/// Observers see the records of the whole initial render together, after
/// `app` returns.
///
/// If `app` fails, the partially built tree is released and the error is
/// returned.
pub fn mount(app: impl FnOnce() -> Result<(), PortalError>) -> Result<MountHandle, PortalError> {
    let root = allocate_index(None);
    core::set_component_type(root, ComponentType::Root);
    tracing::debug!(root, "mounting tree");

    let mut handle = MountHandle { root: Some(root) };
    match commit_under(root, app) {
        Ok(()) => Ok(handle),
        Err(err) => {
            handle.release();
            Err(err)
        }
    }
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

fn commit_under<R>(parent: usize, f: impl FnOnce() -> R) -> R {
    batch(|| {
        push_parent_context(parent);
        let result = f();
        pop_parent_context();
        result
    })
}

// =============================================================================
// Tests
// =============================================================================

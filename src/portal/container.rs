//! Relay container lifecycle.

use std::cell::Cell;

use crate::engine::arrays::core;
use crate::engine::{allocate_index, is_allocated, release_index};
use crate::pipeline::is_interactive_document_available;
use crate::types::ComponentType;

/// Lazily created, memoized container node owned by one Relay instance.
///
/// The container is created on the first [`get_or_create`](Self::get_or_create)
/// in an interactive environment and the same index is returned from then on.
/// It is released by [`release`](Self::release) or on drop, taking the
/// relayed content with it.
#[derive(Debug, Default)]
pub struct ContainerLifecycle {
    container: Cell<Option<usize>>,
}

impl ContainerLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The container index, creating it on first use.
    ///
    /// Always `None` in a non-interactive environment, and nothing is
    /// allocated in that case however often this is called.
    pub fn get_or_create(&self) -> Option<usize> {
        if !is_interactive_document_available() {
            return None;
        }
        if let Some(index) = self.container.get() {
            return Some(index);
        }

        let index = allocate_index(None);
        core::set_component_type(index, ComponentType::RelayContainer);
        self.container.set(Some(index));
        tracing::trace!(container = index, "relay container created");
        Some(index)
    }

    /// The container index if it has been created.
    pub fn current(&self) -> Option<usize> {
        self.container.get()
    }

    /// Release the container and everything rendered into it.
    ///
    /// Repeated calls are no-ops.
    pub fn release(&self) {
        if let Some(index) = self.container.take() {
            if is_allocated(index) {
                release_index(index);
            }
            tracing::trace!(container = index, "relay container released");
        }
    }
}

impl Drop for ContainerLifecycle {
    fn drop(&mut self) {
        self.release();
    }
}

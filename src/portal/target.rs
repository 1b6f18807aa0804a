//! Target - The named mount point relays render into.
//!
//! A Target renders two siblings under the current parent:
//!
//! ```text
//! Box   (fallback slot: holds the fallback children while nothing is relayed)
//! Mount (registered under the pair's MountId; relay containers attach here)
//! ```
//!
//! Fallback visibility is a two-state machine driven by the presence signal:
//! NoContent (fallback rendered) and HasContent (fallback torn down). The
//! initial state is NoContent. Only the [`PresenceTracker`] moves it.
//!
//! The Target tears down when its cleanup runs, when the instance is
//! unmounted, or when an ancestor releases the mount node, whichever comes
//! first. Relay containers still attached at that point are detached and
//! left to their relays.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::presence::{Derivation, PresenceTracker};
use crate::engine::arrays::core;
use crate::engine::{
    allocate_index, get_current_parent_index, on_destroy, register_mount_node, release_index, tree,
};
use crate::primitives::{mount_across, show, text, Children, Cleanup, TextProps};
use crate::types::{ComponentType, MountId};

// =============================================================================
// Props
// =============================================================================

/// Properties for a Target. The children are the fallback content.
#[derive(Default)]
pub struct TargetProps {
    /// Fallback content, rendered whenever nothing is relayed.
    ///
    /// Runs again on every return to the empty state.
    pub children: Option<Children>,
}

impl TargetProps {
    /// Fallback rendered by `children`.
    pub fn fallback(children: impl Fn() + 'static) -> Self {
        Self {
            children: Some(Rc::new(children)),
        }
    }

    /// A single line of fallback text.
    pub fn text(content: impl Into<String>) -> Self {
        let content: String = content.into();
        Self::fallback(move || {
            text(TextProps {
                content: content.clone().into(),
                ..Default::default()
            });
        })
    }
}

// =============================================================================
// Target Component
// =============================================================================

/// Target half of a relay pair, bound to one [`MountId`].
#[derive(Debug, Clone)]
pub struct Target {
    id: MountId,
    derivation: Derivation,
}

impl Target {
    pub(crate) fn new(id: MountId) -> Self {
        Self {
            id,
            derivation: Derivation::default(),
        }
    }

    /// The identifier this target registers its mount node under.
    pub fn id(&self) -> &MountId {
        &self.id
    }

    /// Choose how presence is derived from child-list notifications.
    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivation = derivation;
        self
    }

    /// Render the target under the current parent. Returns its cleanup.
    pub fn render(&self, props: TargetProps) -> Cleanup {
        self.mount(props).into_cleanup()
    }

    /// Render the target and keep a handle to inspect it.
    pub fn mount(&self, props: TargetProps) -> TargetInstance {
        let parent = get_current_parent_index();

        // Fallback slot first, so fallback content precedes the mount node
        let slot = allocate_index(None);
        core::set_component_type(slot, ComponentType::Box);
        if let Some(parent) = parent {
            tree::append_child(parent, slot);
        }

        let node = allocate_index(None);
        core::set_component_type(node, ComponentType::Mount);
        register_mount_node(self.id.as_str(), node);
        if let Some(parent) = parent {
            tree::append_child(parent, node);
        }

        // Seed before the fallback renders, so existing content never flashes it
        let has_content = signal(false);
        let tracker = PresenceTracker::attach(node, has_content.clone(), self.derivation);

        let fallback = props.children.map(|children| {
            let presence = has_content.clone();
            mount_across(
                move || {
                    show(
                        move || !presence.get(),
                        move || -> Cleanup {
                            children();
                            Box::new(move || release_children(slot))
                        },
                        None::<fn() -> Cleanup>,
                    )
                },
                slot,
            )
        });

        let state = Rc::new(TargetState {
            id: self.id.clone(),
            slot,
            node,
            has_content,
            tracker: RefCell::new(Some(tracker)),
            fallback: RefCell::new(fallback),
            torn_down: Cell::new(false),
        });

        let on_release = state.clone();
        on_destroy(node, move || on_release.teardown(true));

        tracing::debug!(id = %self.id, node, slot, "target mounted");
        TargetInstance { state }
    }
}

fn release_children(index: usize) {
    for child in tree::children(index) {
        release_index(child);
    }
}

// =============================================================================
// Target Instance
// =============================================================================

struct TargetState {
    id: MountId,
    slot: usize,
    node: usize,
    has_content: Signal<bool>,
    tracker: RefCell<Option<PresenceTracker>>,
    fallback: RefCell<Option<Cleanup>>,
    torn_down: Cell<bool>,
}

impl TargetState {
    /// Release everything the target owns. `node_released` is true when
    /// the registry is already releasing the mount node.
    fn teardown(&self, node_released: bool) {
        if self.torn_down.replace(true) {
            return;
        }

        // Stop observing first, so nothing re-renders the fallback below
        let tracker = self.tracker.borrow_mut().take();
        if let Some(tracker) = tracker {
            tracker.release();
        }

        let fallback = self.fallback.borrow_mut().take();
        if let Some(fallback) = fallback {
            fallback();
        }

        release_index(self.slot);
        if !node_released {
            release_index(self.node);
        }
        tracing::debug!(id = %self.id, "target unmounted");
    }
}

/// A mounted Target.
///
/// Dropping the handle does not unmount; the target lives until
/// [`unmount`](Self::unmount), its cleanup, or the release of an ancestor.
pub struct TargetInstance {
    state: Rc<TargetState>,
}

impl TargetInstance {
    /// Index of the mount node.
    pub fn node(&self) -> usize {
        self.state.node
    }

    /// Index of the fallback slot.
    pub fn fallback_slot(&self) -> usize {
        self.state.slot
    }

    /// Current presence value.
    pub fn has_content(&self) -> bool {
        self.state.has_content.get()
    }

    /// The presence signal, for binding into other components.
    pub fn presence(&self) -> Signal<bool> {
        self.state.has_content.clone()
    }

    /// Whether the fallback is currently rendered.
    pub fn is_showing_fallback(&self) -> bool {
        !tree::children(self.state.slot).is_empty()
    }

    /// Whether presence is still being observed.
    pub fn is_observing(&self) -> bool {
        self.state
            .tracker
            .borrow()
            .as_ref()
            .is_some_and(PresenceTracker::is_observing)
    }

    /// Tear the target down now.
    pub fn unmount(self) {
        self.state.teardown(false);
    }

    /// Convert into a plain component cleanup.
    pub fn into_cleanup(self) -> Cleanup {
        Box::new(move || self.unmount())
    }
}

impl std::fmt::Debug for TargetInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetInstance")
            .field("id", &self.state.id)
            .field("node", &self.state.node)
            .field("slot", &self.state.slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{find_node_by_id, get_allocated_count, is_allocated, observer, reset_registry};
    use crate::renderer::collect_text;

    #[test]
    fn test_target_registers_mount_node() {
        reset_registry();

        let target = Target::new(MountId::from("dock"));
        let instance = target.mount(TargetProps::default());

        assert_eq!(find_node_by_id("dock"), Some(instance.node()));
        assert_eq!(core::get_component_type(instance.node()), ComponentType::Mount);
        assert!(instance.is_observing());
        assert!(!instance.has_content());
    }

    #[test]
    fn test_fallback_renders_when_empty() {
        reset_registry();

        let root = allocate_index(None);
        crate::engine::push_parent_context(root);
        let instance = Target::new(MountId::from("dock")).mount(TargetProps::text("empty"));
        crate::engine::pop_parent_context();

        assert!(instance.is_showing_fallback());
        assert_eq!(collect_text(root), vec!["empty"]);
        assert_eq!(
            tree::children(root),
            vec![instance.fallback_slot(), instance.node()],
            "fallback slot precedes the mount node"
        );
    }

    #[test]
    fn test_fallback_follows_presence() {
        reset_registry();

        let instance = Target::new(MountId::from("dock")).mount(TargetProps::text("empty"));
        let container = allocate_index(None);
        core::set_component_type(container, ComponentType::RelayContainer);

        tree::append_child(instance.node(), container);
        assert!(instance.has_content());
        assert!(!instance.is_showing_fallback());

        tree::detach(container);
        assert!(!instance.has_content());
        assert!(instance.is_showing_fallback());
    }

    #[test]
    fn test_unmount_releases_everything() {
        reset_registry();

        let instance = Target::new(MountId::from("dock")).mount(TargetProps::text("empty"));
        let node = instance.node();
        assert_eq!(get_allocated_count(), 3, "slot, mount node, fallback text");

        instance.unmount();
        assert!(!is_allocated(node));
        assert_eq!(get_allocated_count(), 0);
        assert_eq!(observer::observation_count(), 0);
        assert_eq!(find_node_by_id("dock"), None);
    }

    #[test]
    fn test_ancestor_release_tears_down() {
        reset_registry();

        let root = allocate_index(None);
        crate::engine::push_parent_context(root);
        let instance = Target::new(MountId::from("dock")).mount(TargetProps::text("empty"));
        crate::engine::pop_parent_context();

        release_index(root);
        assert!(!instance.is_observing());
        assert_eq!(get_allocated_count(), 0);
        assert_eq!(observer::observation_count(), 0);
    }

    #[test]
    fn test_cleanup_twice_is_safe() {
        reset_registry();

        let target = Target::new(MountId::from("dock"));
        let instance = target.mount(TargetProps::default());
        let state = instance.state.clone();

        instance.unmount();
        state.teardown(false);
        assert_eq!(get_allocated_count(), 0);
    }
}

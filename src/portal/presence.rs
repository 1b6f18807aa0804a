//! Presence tracking - Does a mount node have content?
//!
//! A [`PresenceTracker`] keeps a `Signal<bool>` equal to "the node has at
//! least one child element". It seeds the signal synchronously when it
//! attaches, so content that is already there is seen without waiting for a
//! notification, then follows child-list mutation records.
//!
//! How the boolean is derived does not depend on the shape of the
//! notifications. Two policies are available and settle on the same value:
//!
//! - [`Derivation::ChildCount`] re-reads the element count on every delivery.
//! - [`Derivation::Counter`] starts from the seeded count and applies the
//!   inserted/removed counts each record carries.
//!
//! Mount nodes only ever receive relay containers, which are elements, so
//! the counter never has to tell elements and text apart.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::Signal;

use crate::engine::observer::{observe, MutationRecord, ObservationHandle};
use crate::engine::{is_allocated, tree};
use crate::pipeline::is_interactive_document_available;
use crate::types::MutationKind;

/// How presence is derived from child-list notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Derivation {
    /// Recompute `child_element_count(node) > 0` on every delivery.
    #[default]
    ChildCount,
    /// Maintain a running count from record deltas.
    Counter,
}

/// Keeps a presence signal in sync with a node's child list.
///
/// Inert when the environment is not interactive or the node does not
/// exist: the signal then keeps whatever value it had.
#[derive(Debug)]
pub struct PresenceTracker {
    node: Option<usize>,
    handle: Option<ObservationHandle>,
}

impl PresenceTracker {
    /// A tracker that observes nothing.
    pub fn inert() -> Self {
        Self { node: None, handle: None }
    }

    /// Seed `has_content` from `node` and start observing it.
    pub fn attach(node: usize, has_content: Signal<bool>, derivation: Derivation) -> Self {
        if !is_interactive_document_available() {
            tracing::debug!(node, "presence tracking skipped: environment is not interactive");
            return Self::inert();
        }
        if !is_allocated(node) {
            tracing::debug!(node, "presence tracking skipped: node is not mounted");
            return Self::inert();
        }

        // Synchronous seed, before any record can arrive
        let seeded = tree::child_element_count(node);
        let present = Rc::new(Cell::new(seeded > 0));
        has_content.set(seeded > 0);
        tracing::trace!(node, children = seeded, "presence seeded");

        let publish = move |now: bool| {
            // Never read the signal here: callbacks can run inside an
            // effect, and a read would subscribe that effect to presence.
            if present.replace(now) != now {
                tracing::debug!(node, has_content = now, "presence changed");
                has_content.set(now);
            }
        };

        let handle = match derivation {
            Derivation::ChildCount => observe(node, MutationKind::CHILD_LIST, move |_records| {
                publish(tree::child_element_count(node) > 0);
            }),
            Derivation::Counter => {
                let count = Cell::new(seeded);
                observe(node, MutationKind::CHILD_LIST, move |records: &[MutationRecord]| {
                    for record in records {
                        let next = (count.get() + record.added.len()).saturating_sub(record.removed.len());
                        count.set(next);
                    }
                    publish(count.get() > 0);
                })
            }
        };

        Self {
            node: Some(node),
            handle: Some(handle),
        }
    }

    /// The observed node, if tracking started.
    pub fn node(&self) -> Option<usize> {
        self.node
    }

    /// Whether notifications are still being received.
    pub fn is_observing(&self) -> bool {
        self.handle.as_ref().is_some_and(ObservationHandle::is_active)
    }

    /// Stop observing. Safe to call any number of times.
    pub fn release(&self) {
        if let Some(handle) = &self.handle {
            handle.release();
        }
    }
}

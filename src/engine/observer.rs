//! Mutation Observer - Structural change notifications.
//!
//! Observers subscribe to child-list changes of a single node and receive
//! [`MutationRecord`]s describing what was inserted or removed.
//!
//! # Delivery
//!
//! Outside a [`batch`], each mutation is delivered as soon as it happens,
//! as a slice of one record. Inside a batch, records are queued and
//! delivered when the outermost batch ends, grouped per observer in the
//! order they happened. A record is routed to the observers registered at
//! the moment of the mutation; observing a node never replays history.
//!
//! Callbacks run with no engine state borrowed, so they may freely render,
//! allocate, or mutate the tree. Mutations they cause are delivered too.
//!
//! # Lifetime
//!
//! [`observe`] returns an [`ObservationHandle`]. Releasing it (explicitly or
//! by dropping it) stops delivery, including for records still queued.
//! Releasing the observed node drops its observations as well.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::MutationKind;

// =============================================================================
// Records
// =============================================================================

/// One structural change on `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// What kind of change this is.
    pub kind: MutationKind,
    /// The node whose child list changed.
    pub target: usize,
    /// Children inserted into `target`.
    pub added: Vec<usize>,
    /// Children removed from `target`.
    pub removed: Vec<usize>,
}

impl MutationRecord {
    /// Record a single insertion.
    pub fn added(target: usize, child: usize) -> Self {
        Self {
            kind: MutationKind::CHILD_LIST,
            target,
            added: vec![child],
            removed: Vec::new(),
        }
    }

    /// Record a single removal.
    pub fn removed(target: usize, child: usize) -> Self {
        Self {
            kind: MutationKind::CHILD_LIST,
            target,
            added: Vec::new(),
            removed: vec![child],
        }
    }
}

/// Observer callback (Rc so it can be cloned out before being invoked).
pub type ObserverCallback = Rc<dyn Fn(&[MutationRecord])>;

struct Observation {
    target: usize,
    kinds: MutationKind,
    callback: ObserverCallback,
}

// =============================================================================
// State
// =============================================================================

thread_local! {
    /// Active observations by id.
    static OBSERVATIONS: RefCell<HashMap<u64, Observation>> = RefCell::new(HashMap::new());

    /// Next observation id.
    static NEXT_OBSERVATION_ID: Cell<u64> = const { Cell::new(0) };

    /// Nesting depth of `batch` calls.
    static BATCH_DEPTH: Cell<usize> = const { Cell::new(0) };

    /// Records waiting for the outermost batch to end, with their recipient.
    static PENDING: RefCell<Vec<(u64, MutationRecord)>> = RefCell::new(Vec::new());
}

// =============================================================================
// Observation Handle
// =============================================================================

/// Subscription returned by [`observe`].
///
/// Release is idempotent and also happens on drop.
#[derive(Debug)]
pub struct ObservationHandle {
    id: u64,
    released: Cell<bool>,
}

impl ObservationHandle {
    /// Stop delivering records to this observation.
    pub fn release(&self) {
        if self.released.replace(true) {
            return;
        }
        OBSERVATIONS.with(|map| {
            map.borrow_mut().remove(&self.id);
        });
    }

    /// Whether records are still being delivered.
    ///
    /// False after [`release`](Self::release) or once the observed node
    /// has been released.
    pub fn is_active(&self) -> bool {
        !self.released.get() && OBSERVATIONS.with(|map| map.borrow().contains_key(&self.id))
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Observe / Notify
// =============================================================================

/// Observe `kinds` of change on the node at `target`.
pub fn observe(
    target: usize,
    kinds: MutationKind,
    callback: impl Fn(&[MutationRecord]) + 'static,
) -> ObservationHandle {
    let id = NEXT_OBSERVATION_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    OBSERVATIONS.with(|map| {
        map.borrow_mut().insert(
            id,
            Observation {
                target,
                kinds,
                callback: Rc::new(callback),
            },
        );
    });
    tracing::trace!(node = target, observation = id, "observing child list");

    ObservationHandle {
        id,
        released: Cell::new(false),
    }
}

/// Report a mutation. Called by the tree on every structural change.
pub fn notify(record: MutationRecord) {
    let recipients: Vec<u64> = OBSERVATIONS.with(|map| {
        let mut ids: Vec<u64> = map
            .borrow()
            .iter()
            .filter(|(_, obs)| obs.target == record.target && obs.kinds.intersects(record.kind))
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    });
    if recipients.is_empty() {
        return;
    }

    if is_batching() {
        PENDING.with(|pending| {
            let mut pending = pending.borrow_mut();
            for id in recipients {
                pending.push((id, record.clone()));
            }
        });
        return;
    }

    for id in recipients {
        deliver(id, std::slice::from_ref(&record));
    }
}

fn deliver(id: u64, records: &[MutationRecord]) {
    let callback = OBSERVATIONS.with(|map| map.borrow().get(&id).map(|obs| obs.callback.clone()));
    match callback {
        Some(callback) => callback(records),
        None => tracing::trace!(observation = id, dropped = records.len(), "observation released before delivery"),
    }
}

// =============================================================================
// Batching
// =============================================================================

struct BatchGuard;

impl Drop for BatchGuard {
    fn drop(&mut self) {
        BATCH_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `f`, queueing mutation records until it returns.
///
/// Nested batches join the outermost one. Queued records are delivered when
/// the outermost batch ends.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    let result = {
        BATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        let _guard = BatchGuard;
        f()
    };
    if !is_batching() {
        flush();
    }
    result
}

/// Whether mutation records are currently being queued.
pub fn is_batching() -> bool {
    BATCH_DEPTH.with(|depth| depth.get() > 0)
}

/// Deliver every queued record, until no callback queues more.
fn flush() {
    loop {
        let pending = PENDING.with(|pending| std::mem::take(&mut *pending.borrow_mut()));
        if pending.is_empty() {
            break;
        }

        // Group per observer, keeping first-seen order
        let mut groups: Vec<(u64, Vec<MutationRecord>)> = Vec::new();
        for (id, record) in pending {
            match groups.iter_mut().find(|(group_id, _)| *group_id == id) {
                Some((_, records)) => records.push(record),
                None => groups.push((id, vec![record])),
            }
        }

        for (id, records) in groups {
            deliver(id, &records);
        }
    }
}

// =============================================================================
// Cleanup
// =============================================================================

/// Drop every observation of `target`. Called when the node is released.
pub fn forget_target(target: usize) {
    OBSERVATIONS.with(|map| {
        map.borrow_mut().retain(|_, obs| obs.target != target);
    });
}

/// Number of live observations (all targets).
pub fn observation_count() -> usize {
    OBSERVATIONS.with(|map| map.borrow().len())
}

/// Reset all observer state (for testing).
pub fn reset_observers() {
    OBSERVATIONS.with(|map| map.borrow_mut().clear());
    PENDING.with(|pending| pending.borrow_mut().clear());
    BATCH_DEPTH.with(|depth| depth.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, release_index, reset_registry, tree};

    fn recorder() -> (Rc<RefCell<Vec<Vec<MutationRecord>>>>, impl Fn(&[MutationRecord]) + 'static) {
        let log: Rc<RefCell<Vec<Vec<MutationRecord>>>> = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        (log, move |records: &[MutationRecord]| {
            log_clone.borrow_mut().push(records.to_vec());
        })
    }

    #[test]
    fn test_immediate_delivery() {
        reset_registry();

        let parent = allocate_index(None);
        let child = allocate_index(None);
        let (log, callback) = recorder();
        let _handle = observe(parent, MutationKind::CHILD_LIST, callback);

        tree::append_child(parent, child);
        tree::detach(child);

        let log = log.borrow();
        assert_eq!(log.len(), 2, "each mutation is delivered on its own");
        assert_eq!(log[0], vec![MutationRecord::added(parent, child)]);
        assert_eq!(log[1], vec![MutationRecord::removed(parent, child)]);
    }

    #[test]
    fn test_batch_groups_records() {
        reset_registry();

        let parent = allocate_index(None);
        let a = allocate_index(None);
        let b = allocate_index(None);
        let (log, callback) = recorder();
        let _handle = observe(parent, MutationKind::CHILD_LIST, callback);

        batch(|| {
            tree::append_child(parent, a);
            batch(|| tree::append_child(parent, b));
            assert!(log.borrow().is_empty(), "nothing delivered inside a batch");
        });

        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].len(), 2);
        assert!(!is_batching());
    }

    #[test]
    fn test_only_observed_target_is_notified() {
        reset_registry();

        let observed = allocate_index(None);
        let other = allocate_index(None);
        let child = allocate_index(None);
        let (log, callback) = recorder();
        let _handle = observe(observed, MutationKind::CHILD_LIST, callback);

        tree::append_child(other, child);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_release_is_idempotent_and_stops_delivery() {
        reset_registry();

        let parent = allocate_index(None);
        let child = allocate_index(None);
        let (log, callback) = recorder();
        let handle = observe(parent, MutationKind::CHILD_LIST, callback);

        handle.release();
        handle.release();
        assert!(!handle.is_active());

        tree::append_child(parent, child);
        assert!(log.borrow().is_empty());
        assert_eq!(observation_count(), 0);
    }

    #[test]
    fn test_release_drops_queued_records() {
        reset_registry();

        let parent = allocate_index(None);
        let child = allocate_index(None);
        let (log, callback) = recorder();
        let handle = observe(parent, MutationKind::CHILD_LIST, callback);

        batch(|| {
            tree::append_child(parent, child);
            handle.release();
        });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_releasing_node_forgets_observations() {
        reset_registry();

        let parent = allocate_index(None);
        let _other = allocate_index(None);
        let (_log, callback) = recorder();
        let handle = observe(parent, MutationKind::CHILD_LIST, callback);
        assert!(handle.is_active());

        release_index(parent);
        assert!(!handle.is_active());
    }

    #[test]
    fn test_drop_releases() {
        reset_registry();

        let parent = allocate_index(None);
        let (_log, callback) = recorder();
        {
            let _handle = observe(parent, MutationKind::CHILD_LIST, callback);
            assert_eq!(observation_count(), 1);
        }
        assert_eq!(observation_count(), 0);
    }
}

//! Component Registry - Index allocation for parallel arrays.
//!
//! Manages the lifecycle of component indices:
//! - ID ↔ Index bidirectional mapping
//! - Mount node address book, the one portals resolve against
//! - Free index pool for O(1) reuse
//! - ReactiveSet for allocatedIndices (deriveds react to add/remove)
//! - Parent context stack for nested component creation
//! - Destroy callbacks so components can tear down when an ancestor is released

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use spark_signals::ReactiveSet;

use super::arrays;
use super::arrays::core;
use super::observer;
use super::tree;
use crate::types::ComponentType;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map component ID to array index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map array index to component ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices (for iteration).
    static ALLOCATED_INDICES: RefCell<ReactiveSet<usize>> = RefCell::new(ReactiveSet::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Stack of parent indices for nested component creation.
    static PARENT_STACK: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Destroy callbacks registered per index, keyed by registration token.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<(u64, Box<dyn FnOnce()>)>>> = RefCell::new(HashMap::new());

    /// Next destroy callback token.
    static NEXT_DESTROY_TOKEN: Cell<u64> = const { Cell::new(0) };

    /// Map mount id to the mount node registered under it.
    static MOUNT_NODES: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map mount node index to its mount id.
    static MOUNT_IDS: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());
}

/// Mutate the allocated set. Effects that track it run after the borrow ends.
fn update_allocated(f: impl FnOnce(&mut ReactiveSet<usize>)) {
    spark_signals::batch(|| {
        ALLOCATED_INDICES.with(|set| f(&mut set.borrow_mut()));
    });
}

// =============================================================================
// Parent Context Stack
// =============================================================================

/// Get current parent index (None if at root).
pub fn get_current_parent_index() -> Option<usize> {
    PARENT_STACK.with(|stack| {
        let stack = stack.borrow();
        stack.last().copied()
    })
}

/// Push a parent index onto the stack.
pub fn push_parent_context(index: usize) {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().push(index);
    })
}

/// Pop a parent index from the stack.
pub fn pop_parent_context() {
    PARENT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    })
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new component.
///
/// # Arguments
/// * `id` - Optional component ID. If not provided, one is generated.
///
/// An ID that is already registered is re-pointed at the new index. The
/// earlier node keeps its own index and its reverse mapping.
///
/// # Returns
/// The allocated index.
pub fn allocate_index(id: Option<&str>) -> usize {
    // Generate ID if not provided
    let component_id = match id {
        Some(id) => id.to_string(),
        None => {
            ID_COUNTER.with(|counter| {
                let mut counter = counter.borrow_mut();
                let id = format!("c{}", *counter);
                *counter += 1;
                id
            })
        }
    };

    // Reuse free index or allocate new
    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    // Register mappings
    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(component_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, component_id);
    });
    update_allocated(|set| {
        set.insert(index);
    });

    // Ensure arrays have capacity for this index
    arrays::ensure_all_capacity(index);

    index
}

/// Release an index back to the pool.
///
/// Also recursively releases all children, except relay containers: those
/// belong to the Relay that created them and are only detached here.
pub fn release_index(index: usize) {
    let id = INDEX_TO_ID.with(|map| {
        map.borrow().get(&index).cloned()
    });
    let Some(id) = id else { return };

    // Nobody may observe a node that is going away.
    observer::forget_target(index);

    // Release children recursively (collected first, the list mutates)
    for child_index in tree::children(index) {
        if core::get_component_type(child_index) == ComponentType::RelayContainer {
            tree::detach(child_index);
        } else {
            release_index(child_index);
        }
    }

    // Run destroy callbacks before cleanup
    run_destroy_callbacks(index);

    // Unlink from the parent (reported to the parent's observers)
    tree::detach(index);
    tree::forget(index);

    // Clean up mappings. The ID may have been claimed by a newer node.
    ID_TO_INDEX.with(|map| {
        let mut map = map.borrow_mut();
        if map.get(&id) == Some(&index) {
            map.remove(&id);
        }
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().remove(&index);
    });
    unregister_mount_node(index);
    update_allocated(|set| {
        set.remove(&index);
    });

    // Clear all array values at this index
    arrays::clear_all_at_index(index);

    // Return to pool for reuse
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    // AUTO-CLEANUP: When all components destroyed, reset all arrays to free memory
    let is_empty = spark_signals::untrack(|| ALLOCATED_INDICES.with(|set| set.borrow().is_empty()));
    if is_empty {
        arrays::reset_all_arrays();
        FREE_INDICES.with(|free| {
            free.borrow_mut().clear();
        });
        NEXT_INDEX.with(|next| {
            *next.borrow_mut() = 0;
        });
    }
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Token identifying one destroy callback registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyToken {
    index: usize,
    token: u64,
}

/// Register a callback to run when the component at `index` is destroyed.
///
/// The returned token unregisters it with [`off_destroy`].
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) -> DestroyToken {
    let token = NEXT_DESTROY_TOKEN.with(|next| {
        let token = next.get();
        next.set(token + 1);
        token
    });
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push((token, Box::new(callback)));
    });
    DestroyToken { index, token }
}

/// Drop a destroy callback without running it. Unknown tokens are ignored.
pub fn off_destroy(token: DestroyToken) {
    // Dropped outside the borrow: the closure may own state with its own Drop
    let removed = DESTROY_CALLBACKS.with(|callbacks| {
        let mut callbacks = callbacks.borrow_mut();
        let list = callbacks.get_mut(&token.index)?;
        let position = list.iter().position(|(t, _)| *t == token.token)?;
        let removed = list.remove(position);
        if list.is_empty() {
            callbacks.remove(&token.index);
        }
        Some(removed)
    });
    drop(removed);
}

/// Number of destroy callbacks pending for `index`.
pub fn destroy_callback_count(index: usize) -> usize {
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow().get(&index).map_or(0, Vec::len))
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| {
        callbacks.borrow_mut().remove(&index)
    });
    if let Some(callbacks) = callbacks {
        for (_, callback) in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Mount Nodes
// =============================================================================

/// Register `index` as the mount node for `id`.
///
/// Mount ids live apart from component IDs, so no generated component ID
/// can shadow one. Registering an id that is already claimed re-points it:
/// the last registration wins.
pub fn register_mount_node(id: &str, index: usize) {
    let shadowed = MOUNT_NODES.with(|map| map.borrow_mut().insert(id.to_string(), index));
    if let Some(previous) = shadowed.filter(|&previous| previous != index) {
        tracing::warn!(
            id,
            previous,
            index,
            "mount id registered twice; lookups now resolve to the newest node"
        );
    }
    MOUNT_IDS.with(|map| {
        map.borrow_mut().insert(index, id.to_string());
    });
}

/// Forget the mount id of `index`, keeping any newer claim on the same id.
fn unregister_mount_node(index: usize) {
    let Some(id) = MOUNT_IDS.with(|map| map.borrow_mut().remove(&index)) else {
        return;
    };
    MOUNT_NODES.with(|map| {
        let mut map = map.borrow_mut();
        if map.get(&id) == Some(&index) {
            map.remove(&id);
        }
    });
}

/// Mount id registered for `index`, if it is a mount node.
pub fn get_mount_id(index: usize) -> Option<String> {
    MOUNT_IDS.with(|map| map.borrow().get(&index).cloned())
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a component ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Resolve a live mount node by its mount id.
///
/// This is the lookup Relays use to find their Target's mount node. Only
/// ids passed to [`register_mount_node`] resolve.
pub fn find_node_by_id(id: &str) -> Option<usize> {
    MOUNT_NODES
        .with(|map| map.borrow().get(id).copied())
        .filter(|&index| is_allocated(index))
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated indices.
///
/// Note: This creates a reactive dependency when called from a derived/effect.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated components.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    update_allocated(|set| set.clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENT_STACK.with(|stack| stack.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    NEXT_DESTROY_TOKEN.with(|next| next.set(0));
    MOUNT_NODES.with(|map| map.borrow_mut().clear());
    MOUNT_IDS.with(|map| map.borrow_mut().clear());
    tree::reset_tree();
    observer::reset_observers();
    arrays::reset_all_arrays();
}

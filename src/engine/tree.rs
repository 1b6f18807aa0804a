//! Node Tree - Parent links and ordered child lists.
//!
//! The registry hands out indices; this module records how they nest.
//! Every structural change is reported to [`super::observer`] as a
//! [`MutationRecord`](super::observer::MutationRecord) against the parent
//! whose child list changed.
//!
//! Structure is not reactive. Code that needs to know about
//! child-list changes observes them instead of tracking them.

use std::cell::RefCell;
use std::collections::HashMap;

use super::arrays::core;
use super::observer::{self, MutationRecord};

thread_local! {
    /// Parent of each attached index.
    static PARENT: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Ordered children of each index that has any.
    static CHILDREN: RefCell<HashMap<usize, Vec<usize>>> = RefCell::new(HashMap::new());
}

/// Append `child` as the last child of `parent`. Returns whether it was
/// attached.
///
/// A child that is already attached elsewhere is moved: it is removed from
/// its old parent first (and that removal is reported too). Attaching a
/// node under itself or one of its descendants is refused and changes
/// nothing.
pub fn append_child(parent: usize, child: usize) -> bool {
    if is_ancestor_or_self(child, parent) {
        tracing::warn!(parent, child, "refusing to attach a node under itself");
        return false;
    }

    if parent_of(child).is_some() {
        detach(child);
    }

    PARENT.with(|map| {
        map.borrow_mut().insert(child, parent);
    });
    CHILDREN.with(|map| {
        map.borrow_mut().entry(parent).or_default().push(child);
    });

    observer::notify(MutationRecord::added(parent, child));
    true
}

/// Whether `ancestor` is `index` or one of its ancestors.
pub fn is_ancestor_or_self(ancestor: usize, index: usize) -> bool {
    let mut current = Some(index);
    while let Some(node) = current {
        if node == ancestor {
            return true;
        }
        current = parent_of(node);
    }
    false
}

/// Remove `child` from its parent. Returns the former parent.
///
/// Detaching a node that has no parent is a no-op.
pub fn detach(child: usize) -> Option<usize> {
    let parent = PARENT.with(|map| map.borrow_mut().remove(&child))?;

    CHILDREN.with(|map| {
        let mut map = map.borrow_mut();
        if let Some(children) = map.get_mut(&parent) {
            children.retain(|&c| c != child);
            if children.is_empty() {
                map.remove(&parent);
            }
        }
    });

    observer::notify(MutationRecord::removed(parent, child));
    Some(parent)
}

/// Drop any bookkeeping left for a released index.
///
/// Callers detach children and the node itself first; this only clears
/// stale entries without reporting anything.
pub fn forget(index: usize) {
    PARENT.with(|map| {
        map.borrow_mut().remove(&index);
    });
    let orphans = CHILDREN.with(|map| map.borrow_mut().remove(&index));
    if let Some(orphans) = orphans {
        PARENT.with(|map| {
            let mut map = map.borrow_mut();
            for orphan in orphans {
                map.remove(&orphan);
            }
        });
    }
}

/// Parent of `index`, if attached.
pub fn parent_of(index: usize) -> Option<usize> {
    PARENT.with(|map| map.borrow().get(&index).copied())
}

/// Children of `index` in insertion order (a snapshot).
pub fn children(index: usize) -> Vec<usize> {
    CHILDREN.with(|map| map.borrow().get(&index).cloned().unwrap_or_default())
}

/// Number of element children of `index`.
///
/// Text nodes do not count.
pub fn child_element_count(index: usize) -> usize {
    CHILDREN.with(|map| {
        map.borrow()
            .get(&index)
            .map(|children| {
                children
                    .iter()
                    .filter(|&&child| core::get_component_type(child).is_element())
                    .count()
            })
            .unwrap_or(0)
    })
}

/// Reset all tree state (for testing).
pub fn reset_tree() {
    PARENT.with(|map| map.borrow_mut().clear());
    CHILDREN.with(|map| map.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry};
    use crate::types::ComponentType;

    fn node(component_type: ComponentType) -> usize {
        let index = allocate_index(None);
        core::set_component_type(index, component_type);
        index
    }

    #[test]
    fn test_append_keeps_order() {
        reset_registry();

        let parent = node(ComponentType::Box);
        let a = node(ComponentType::Box);
        let b = node(ComponentType::Text);
        let c = node(ComponentType::Box);

        append_child(parent, a);
        append_child(parent, b);
        append_child(parent, c);

        assert_eq!(children(parent), vec![a, b, c]);
        assert_eq!(parent_of(b), Some(parent));
        assert_eq!(child_element_count(parent), 2, "text nodes are not elements");
    }

    #[test]
    fn test_append_moves_between_parents() {
        reset_registry();

        let left = node(ComponentType::Box);
        let right = node(ComponentType::Box);
        let child = node(ComponentType::Box);

        append_child(left, child);
        append_child(right, child);

        assert!(children(left).is_empty());
        assert_eq!(children(right), vec![child]);
        assert_eq!(parent_of(child), Some(right));
    }

    #[test]
    fn test_reappend_moves_to_end() {
        reset_registry();

        let parent = node(ComponentType::Box);
        let a = node(ComponentType::Box);
        let b = node(ComponentType::Box);
        append_child(parent, a);
        append_child(parent, b);

        append_child(parent, a);
        assert_eq!(children(parent), vec![b, a]);
    }

    #[test]
    fn test_detach() {
        reset_registry();

        let parent = node(ComponentType::Box);
        let child = node(ComponentType::Box);
        append_child(parent, child);

        assert_eq!(detach(child), Some(parent));
        assert_eq!(detach(child), None, "second detach is a no-op");
        assert_eq!(child_element_count(parent), 0);
    }

    #[test]
    fn test_append_refuses_cycles() {
        reset_registry();

        let parent = node(ComponentType::Box);
        let child = node(ComponentType::Box);
        let grandchild = node(ComponentType::Box);
        assert!(append_child(parent, child));
        assert!(append_child(child, grandchild));

        assert!(!append_child(child, child), "self");
        assert!(!append_child(grandchild, parent), "descendant");
        assert_eq!(parent_of(child), Some(parent), "nothing moved");
        assert_eq!(parent_of(parent), None);
        assert!(children(child).contains(&grandchild));
    }
}

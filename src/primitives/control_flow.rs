//! Control Flow Primitives - Conditional rendering and context redirection.
//!
//! - [`show`] - Conditional rendering based on a reactive condition
//! - [`mount_across`] - Render content under a node other than the current parent
//!
//! # Pattern: EffectScope-based Cleanup
//!
//! `show` uses spark-signals' EffectScope for cleanup:
//! 1. Create an EffectScope to manage the lifetime of the branch effect
//! 2. Run rendering logic inside `scope.run()`
//! 3. Register branch cleanup with `on_scope_dispose()`
//! 4. Return `Box::new(move || scope.stop())` as the Cleanup
//!
//! # Pattern: Parent Context Restoration
//!
//! Components attach to whatever parent is on top of the context stack when
//! they are created. `show` captures the parent at creation time and restores
//! it before rendering a branch, because branches re-render later from inside
//! an effect, when the stack holds something else. `mount_across` does the
//! opposite: it deliberately swaps in a different parent so content lands
//! somewhere else in the tree than the component producing it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose};

use crate::engine::{get_current_parent_index, pop_parent_context, push_parent_context};
use crate::primitives::Cleanup;

/// Conditionally render components based on a reactive condition.
///
/// Creates and destroys components when the condition changes. The condition
/// getter establishes a reactive dependency, so the UI updates automatically.
/// Setting the condition to the value it already has renders nothing again.
///
/// A portal Target drives its fallback with `show(|| !has_content.get(), ..)`.
/// Presence flips from observer callbacks, often while a batch is being
/// flushed, long after the component that created the branch returned. The
/// branch still renders under the parent captured here, and the previous
/// branch is torn down before the next one renders.
///
/// # Arguments
///
/// * `condition` - Getter that returns boolean (creates reactive dependency)
/// * `then_fn` - Function to render when condition is true (returns cleanup)
/// * `else_fn` - Optional function to render when condition is false
///
/// # Returns
///
/// A cleanup function that destroys the current branch and stops tracking.
///
/// # Example
///
/// ```ignore
/// let has_content = signal(false);
///
/// let cleanup = show(
///     move || !has_content.get(),
///     || text(TextProps { content: "Nothing here yet".into(), ..Default::default() }),
///     None::<fn() -> Cleanup>,
/// );
/// ```
pub fn show<ThenF, ElseF, ThenR, ElseR>(
    condition: impl Fn() -> bool + 'static,
    then_fn: ThenF,
    else_fn: Option<ElseF>,
) -> Cleanup
where
    ThenF: Fn() -> ThenR + 'static,
    ElseF: Fn() -> ElseR + 'static,
    ThenR: Into<Cleanup>,
    ElseR: Into<Cleanup>,
{
    // Branches render under the parent that was current when show() ran
    let parent_index = get_current_parent_index();

    let branch_cleanup: Rc<RefCell<Option<Cleanup>>> = Rc::new(RefCell::new(None));
    let last_condition: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    let scope = effect_scope(false);

    let cleanup_for_update = branch_cleanup.clone();
    let cleanup_for_dispose = branch_cleanup;

    let update = move |new_condition: bool| {
        if last_condition.get() == Some(new_condition) {
            return;
        }
        last_condition.set(Some(new_condition));
        tracing::trace!(condition = new_condition, parent = ?parent_index, "show branch switch");

        // Tear down the previous branch before rendering the next one
        let previous = cleanup_for_update.borrow_mut().take();
        if let Some(previous) = previous {
            previous();
        }

        if let Some(parent) = parent_index {
            push_parent_context(parent);
        }

        let next = if new_condition {
            Some(then_fn().into())
        } else {
            else_fn.as_ref().map(|f| f().into())
        };

        if parent_index.is_some() {
            pop_parent_context();
        }

        *cleanup_for_update.borrow_mut() = next;
    };

    scope.run(move || {
        // First effect run performs the initial render
        let _effect_cleanup = effect(move || {
            let current = condition();
            update(current);
        });

        on_scope_dispose(move || {
            let current = cleanup_for_dispose.borrow_mut().take();
            if let Some(current) = current {
                current();
            }
        });
    });

    Box::new(move || {
        scope.stop();
    })
}

/// Render `content` with `container` as its parent, whatever the current
/// parent is.
///
/// This is the cross-tree mount primitive portals are built on: the content
/// is produced by one component but attached somewhere else.
pub fn mount_across<R>(content: impl FnOnce() -> R, container: usize) -> R {
    push_parent_context(container);
    let result = content();
    pop_parent_context();
    result
}

// =============================================================================
// Tests
// =============================================================================

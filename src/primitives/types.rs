//! Primitive types - Props and cleanup.
//!
//! These types define the interface for component props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;
use spark_signals::Signal;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Children
// =============================================================================

/// Child render function that may run more than once.
///
/// Used where content is torn down and rendered again, like fallback
/// content that comes back every time a portal target empties.
pub type Children = Rc<dyn Fn()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// This enables reactive props while maintaining type safety.
/// When binding to slot arrays, the reactive connection is preserved.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Box Props
// =============================================================================

/// Properties for the Box component.
///
/// Box is the plain container: it groups children and can be addressed
/// by ID.
///
/// # Example
///
/// ```ignore
/// use spark_relay::primitives::{box_primitive, text, BoxProps, TextProps};
///
/// let cleanup = box_primitive(BoxProps {
///     id: Some("sidebar".to_string()),
///     children: Some(Box::new(|| {
///         text(TextProps { content: "Hello!".into(), ..Default::default() });
///     })),
/// });
/// ```
#[derive(Default)]
pub struct BoxProps {
    /// Optional component ID for lookup.
    pub id: Option<String>,

    /// Child render function.
    pub children: Option<Box<dyn FnOnce()>>,
}

// =============================================================================
// Text Props
// =============================================================================

/// Properties for the Text component.
///
/// Text is a pure display component for text content. Cannot have children.
///
/// # Example
///
/// ```ignore
/// use spark_relay::primitives::{text, TextProps};
/// use spark_signals::signal;
///
/// let message = signal("Hello!".to_string());
///
/// let cleanup = text(TextProps {
///     content: message.clone().into(),
///     ..Default::default()
/// });
///
/// // Later: update text reactively
/// message.set("Updated!".to_string());
/// ```
#[derive(Default)]
pub struct TextProps {
    /// Optional component ID for lookup.
    pub id: Option<String>,

    /// The text content to display.
    pub content: PropValue<String>,
}

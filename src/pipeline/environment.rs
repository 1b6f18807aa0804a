//! Environment - Whether a live, interactive tree is available.
//!
//! Static rendering (pre-rendering to text, snapshotting a tree on a thread
//! that will never process updates) still builds the component tree, but
//! nothing may reach into it for portal work: relays render nothing and
//! presence is never observed.
//!
//! The environment is thread-local runtime configuration, read through
//! [`is_interactive_document_available`] before any mount-node access.

use std::cell::Cell;

/// Rendering environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Environment {
    /// Live tree: relays attach, targets observe (default).
    #[default]
    Interactive = 0,
    /// Non-interactive rendering: portal machinery degrades to nothing.
    Static = 1,
}

impl From<u8> for Environment {
    fn from(value: u8) -> Self {
        match value {
            1 => Environment::Static,
            _ => Environment::Interactive,
        }
    }
}

thread_local! {
    static ENVIRONMENT: Cell<Environment> = const { Cell::new(Environment::Interactive) };
}

/// Current environment.
pub fn environment() -> Environment {
    ENVIRONMENT.with(|env| env.get())
}

/// Set the environment for this thread.
pub fn set_environment(env: Environment) {
    tracing::debug!(?env, "environment changed");
    ENVIRONMENT.with(|cell| cell.set(env));
}

/// Capability check consulted before touching mount nodes.
pub fn is_interactive_document_available() -> bool {
    environment() == Environment::Interactive
}

struct RestoreEnvironment(Environment);

impl Drop for RestoreEnvironment {
    fn drop(&mut self) {
        ENVIRONMENT.with(|cell| cell.set(self.0));
    }
}

/// Run `f` with `env` active, restoring the previous environment afterwards,
/// even if `f` panics.
pub fn with_environment<R>(env: Environment, f: impl FnOnce() -> R) -> R {
    let _restore = RestoreEnvironment(environment());
    ENVIRONMENT.with(|cell| cell.set(env));
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_interactive() {
        assert_eq!(environment(), Environment::Interactive);
        assert!(is_interactive_document_available());
    }

    #[test]
    fn test_with_environment_restores() {
        let inside = with_environment(Environment::Static, is_interactive_document_available);
        assert!(!inside);
        assert!(is_interactive_document_available());
    }

    #[test]
    fn test_from_u8() {
        assert_eq!(Environment::from(0), Environment::Interactive);
        assert_eq!(Environment::from(1), Environment::Static);
        assert_eq!(Environment::from(9), Environment::Interactive);
    }

    #[test]
    fn test_with_environment_restores_after_panic() {
        let result = std::panic::catch_unwind(|| {
            with_environment::<()>(Environment::Static, || panic!("render failed"));
        });

        assert!(result.is_err());
        assert_eq!(environment(), Environment::Interactive);
    }
}

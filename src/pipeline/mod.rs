//! Pipeline - Environment configuration and tree mounting.
//!
//! - [`environment`] - Interactive vs static rendering, the capability check
//! - [`mount`] - Root node creation and commit batching

pub mod environment;
pub mod mount;

// Re-exports
pub use environment::{
    environment, is_interactive_document_available, set_environment, with_environment, Environment,
};
pub use mount::{mount, unmount, MountHandle};

//! Renderer - Static output of a component tree.
//!
//! - [`outline`] - Indented structural dump of a subtree
//! - [`collect_text`] - Visible text in tree order
//!
//! Both read the live tree; run them after a commit has settled to see what
//! the user would see.

mod outline;

pub use outline::{collect_text, outline};

//! Tree outline rendering.
//!
//! One line per node, children indented two spaces under their parent:
//!
//! ```text
//! Root #0
//!   Box #1
//!     Text #3 "nothing relayed yet"
//!   Mount #2 [relay-target--1123581321]
//! ```

use std::fmt::Write;

use crate::engine::arrays::{core, text as text_arrays};
use crate::engine::{get_mount_id, is_allocated, tree};
use crate::types::ComponentType;

/// Render the subtree rooted at `index` as an indented outline.
///
/// Unallocated indices render as an empty string.
pub fn outline(index: usize) -> String {
    let mut out = String::new();
    if is_allocated(index) {
        write_node(&mut out, index, 0);
    }
    out
}

fn write_node(out: &mut String, index: usize, depth: usize) {
    let component_type = core::get_component_type(index);
    let _ = write!(out, "{:indent$}{:?} #{}", "", component_type, index, indent = depth * 2);

    match component_type {
        ComponentType::Text => {
            let _ = write!(out, " {:?}", text_arrays::get_text_content(index));
        }
        ComponentType::Mount => {
            if let Some(id) = get_mount_id(index) {
                let _ = write!(out, " [{id}]");
            }
        }
        _ => {}
    }
    out.push('\n');

    for child in tree::children(index) {
        write_node(out, child, depth + 1);
    }
}

/// Collect the content of every Text node under `index`, depth first.
pub fn collect_text(index: usize) -> Vec<String> {
    let mut texts = Vec::new();
    if is_allocated(index) {
        gather(index, &mut texts);
    }
    texts
}

fn gather(index: usize, texts: &mut Vec<String>) {
    if core::get_component_type(index) == ComponentType::Text {
        texts.push(text_arrays::get_text_content(index));
    }
    for child in tree::children(index) {
        gather(child, texts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reset_registry;
    use crate::primitives::{box_primitive, text, BoxProps, TextProps};

    #[test]
    fn test_outline_nests_children() {
        reset_registry();

        let _cleanup = box_primitive(BoxProps {
            children: Some(Box::new(|| {
                text(TextProps { content: "hello".into(), ..Default::default() });
            })),
            ..Default::default()
        });

        assert_eq!(outline(0), "Box #0\n  Text #1 \"hello\"\n");
    }

    #[test]
    fn test_collect_text_in_order() {
        reset_registry();

        let _cleanup = box_primitive(BoxProps {
            children: Some(Box::new(|| {
                text(TextProps { content: "a".into(), ..Default::default() });
                box_primitive(BoxProps {
                    children: Some(Box::new(|| {
                        text(TextProps { content: "b".into(), ..Default::default() });
                    })),
                    ..Default::default()
                });
                text(TextProps { content: "c".into(), ..Default::default() });
            })),
            ..Default::default()
        });

        assert_eq!(collect_text(0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unallocated_renders_nothing() {
        reset_registry();
        assert_eq!(outline(42), "");
        assert!(collect_text(42).is_empty());
    }
}

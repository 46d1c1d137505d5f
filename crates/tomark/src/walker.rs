//! Recursive descent driven by a shared document-order cursor.
//!
//! [`walk`] pulls top-level nodes from a [`DomRunner`]; for each node, `track`
//! advances the same runner once per child before recursing, so every
//! recursive call consumes exactly the subtree it was entered on. Children are
//! rendered before their parent, which receives their concatenated Markdown.

use std::ptr;

use crate::node::{Node, NodeRef};
use crate::rules::Renderer;
use crate::runner::DomRunner;
use crate::{Result, ToMarkError};

/// Convert every remaining top-level node of `runner` and concatenate the results
pub fn walk(runner: &mut DomRunner<'_>, renderer: &dyn Renderer, max_depth: usize) -> Result<String> {
    let mut markdown = String::new();

    while runner.next() {
        markdown.push_str(&track(runner, renderer, None, 1, max_depth)?);
    }

    Ok(markdown)
}

fn track<'a>(
    runner: &mut DomRunner<'a>,
    renderer: &dyn Renderer,
    parent: Option<&'a Node>,
    depth: usize,
    max_depth: usize,
) -> Result<String> {
    if depth > max_depth {
        log::warn!("document nesting exceeds {} levels", max_depth);
        return Err(ToMarkError::DepthLimitExceeded { limit: max_depth });
    }

    let node = runner
        .current()
        .ok_or_else(|| ToMarkError::Traversal("cursor is not positioned on a node".to_string()))?;

    let mut content = String::new();
    for (index, child) in node.children().enumerate() {
        let landed = runner.next().then(|| runner.current()).flatten();

        let aligned = landed.map_or(false, |n| ptr::eq(n, child));
        debug_assert!(aligned, "cursor left the subtree of <{}>", node.tag_name());
        if !aligned {
            log::warn!("cursor misaligned at child {} of <{}>", index, node.tag_name());
            return Err(ToMarkError::Traversal(format!(
                "expected child {} of <{}>, cursor was elsewhere",
                index,
                node.tag_name()
            )));
        }

        content.push_str(&track(runner, renderer, Some(node), depth + 1, max_depth)?);
    }

    let markdown = renderer.convert(&NodeRef::with_parent(node, parent), &content);
    log::trace!("<{}> -> {} bytes", node.tag_name(), markdown.len());
    Ok(markdown)
}

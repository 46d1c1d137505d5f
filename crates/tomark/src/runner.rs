//! Document-order cursor over a node tree.

use crate::node::Node;

/// Steps through a tree in preorder, one node per [`DomRunner::next`].
///
/// The runner starts positioned before the first node. Once the tree is
/// exhausted `next` keeps returning `false` and [`DomRunner::current`] stays
/// on the last visited node.
#[derive(Debug, Clone)]
pub struct DomRunner<'a> {
    /// Nodes still to visit, next one on top
    pending: Vec<&'a Node>,
    current: Option<&'a Node>,
}

impl<'a> DomRunner<'a> {
    /// Create a runner over a single tree
    pub fn new(root: &'a Node) -> Self {
        Self {
            pending: vec![root],
            current: None,
        }
    }

    /// Create a runner over a sequence of sibling trees
    pub fn forest(roots: &'a [Node]) -> Self {
        Self {
            pending: roots.iter().rev().collect(),
            current: None,
        }
    }

    /// Advance to the next node in document order.
    ///
    /// Returns whether a node is now available.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let Some(node) = self.pending.pop() else {
            return false;
        };

        self.pending.extend(node.children.iter().rev());
        self.current = Some(node);
        true
    }

    /// The node under the cursor, `None` until the first successful `next`
    pub fn current(&self) -> Option<&'a Node> {
        self.current
    }
}

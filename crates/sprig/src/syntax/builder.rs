use crate::grammar::Symbol;
use crate::syntax::{Node, NodeId, Tree};
use compact_str::CompactString;
use smallvec::SmallVec;

/// Builder for arena trees.
///
/// Nodes are allocated detached and linked with [`attach`](Self::attach),
/// which appends the child and records the parent link. Both top-down
/// (parser) and bottom-up (reducer) construction orders work. Nodes that end
/// up unreachable from the root are dropped by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a detached node.
    pub fn node(&mut self, symbol: Symbol, value: impl Into<CompactString>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            symbol,
            value: value.into(),
            children: SmallVec::new(),
            parent: None,
        });
        id
    }

    /// Append `child` to `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Allocate a node and attach the given children in order.
    pub fn branch(
        &mut self,
        symbol: Symbol,
        value: impl Into<CompactString>,
        children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let id = self.node(symbol, value);
        for child in children {
            self.attach(id, child);
        }
        id
    }

    #[must_use]
    pub fn symbol(&self, id: NodeId) -> &Symbol {
        &self.nodes[id.0].symbol
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freeze the tree rooted at `root`.
    ///
    /// The result is renumbered in pre-order, so the root is always the first
    /// node and parent links reflect the final shape.
    #[must_use]
    pub fn finish(mut self, root: NodeId) -> Tree {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(root, None)];

        while let Some((old, parent)) = stack.pop() {
            let id = NodeId(nodes.len());
            let source = &mut self.nodes[old.0];
            let children = std::mem::take(&mut source.children);
            nodes.push(Node {
                symbol: source.symbol.clone(),
                value: std::mem::take(&mut source.value),
                children: SmallVec::with_capacity(children.len()),
                parent,
            });
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }
            stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
        }

        Tree {
            nodes,
            root: NodeId(0),
        }
    }
}

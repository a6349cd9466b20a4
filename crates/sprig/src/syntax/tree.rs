use crate::grammar::Symbol;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;
use std::ops::Index;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A node of a parse tree or CST.
///
/// Children are owned by the tree through the arena; `parent` is a plain
/// index back into the same arena and never keeps anything alive.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) symbol: Symbol,
    pub(crate) value: CompactString,
    pub(crate) children: SmallVec<[NodeId; 4]>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Literal lexeme of a terminal leaf; empty for interior nodes.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-owned rose tree.
///
/// Equality is structural: two trees are equal when their roots have the
/// same symbol, value and pairwise equal children, regardless of how the
/// nodes are laid out in the arena.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Tree {
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root_node(&self) -> &Node {
        &self[self.root]
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self[id].parent, move |&current| self[current].parent)
    }

    /// Node ids in pre-order (parent before children, children left to right).
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self[id].children.iter().rev().copied());
        }
        order
    }

    /// Values of the leaves from left to right, skipping empty ones.
    #[must_use]
    pub fn leaf_values(&self) -> Vec<&str> {
        self.preorder()
            .into_iter()
            .map(|id| &self[id])
            .filter(|node| node.is_leaf() && !node.value.is_empty())
            .map(Node::value)
            .collect()
    }

    /// Height of the tree; a lone root has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(self[id].children.iter().map(|&child| (child, depth + 1)));
        }
        deepest
    }

    /// Structural comparison of the subtree at `a` with the subtree of
    /// `other` at `b`.
    #[must_use]
    pub fn subtree_eq(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((left, right)) = pending.pop() {
            let (left, right) = (&self[left], &other[right]);
            if left.symbol != right.symbol
                || left.value != right.value
                || left.children.len() != right.children.len()
            {
                return false;
            }
            pending.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        true
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

impl Eq for Tree {}

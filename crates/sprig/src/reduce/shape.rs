use crate::reduce::ReduceConfig;
use crate::syntax::{Node, Tree};
use std::fmt;

/// Statement shapes the simplification pass recognizes.
///
/// A node's shape is decided by the terminal *leaves* among its direct
/// children. Nodes produced by a rewrite carry their keyword as the node
/// symbol rather than as a leaf child, so they classify as [`Shape::Generic`]
/// and are left alone by later runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `while B do body` becomes `while(B, body)`
    While,
    /// `if B then S else S fi` becomes `if(B, then, else)`
    If,
    /// `target := expr` becomes `:=(target, expr)`
    Assign,
    /// Separator leaves are dropped, the node keeps its symbol
    Sequence,
    /// Copied unchanged
    Generic,
}

impl Shape {
    #[must_use]
    pub fn classify(tree: &Tree, node: &Node, config: &ReduceConfig) -> Self {
        let mut shape = Self::Generic;
        for &child in node.children() {
            let child = &tree[child];
            if !child.is_leaf() || !child.symbol().is_terminal() {
                continue;
            }
            let name = child.symbol().name();
            let candidate = if config.while_keyword == name {
                Self::While
            } else if config.if_keyword == name {
                Self::If
            } else if config.assign_operator == name {
                Self::Assign
            } else if config.sequence_separator == name {
                Self::Sequence
            } else {
                continue;
            };
            if candidate.priority() < shape.priority() {
                shape = candidate;
            }
        }
        shape
    }

    const fn priority(self) -> u8 {
        match self {
            Self::While => 0,
            Self::If => 1,
            Self::Assign => 2,
            Self::Sequence => 3,
            Self::Generic => 4,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::While => "while",
            Self::If => "if",
            Self::Assign => "assign",
            Self::Sequence => "sequence",
            Self::Generic => "generic",
        })
    }
}

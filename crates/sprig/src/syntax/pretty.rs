//! # Tree Rendering
//!
//! Text renderings of parse trees and CSTs.
//!
//! - [`render`] draws one node per line, indented by depth
//! - [`sexpr`] prints a compact S-expression, handy in assertions

use crate::syntax::{Node, NodeId, Tree};
use std::fmt::Write;

/// Configuration for tree rendering
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Indentation string per level
    pub indent: String,
    /// Whether to print node ids
    pub show_ids: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent: "  ".into(),
            show_ids: false,
        }
    }
}

fn label(node: &Node) -> String {
    if node.value().is_empty() || node.value() == node.symbol().name() {
        node.symbol().to_string()
    } else {
        format!("{} \"{}\"", node.symbol(), node.value())
    }
}

/// Indented rendering with the default configuration.
#[must_use]
pub fn render(tree: &Tree) -> String {
    render_with(tree, &PrettyConfig::default())
}

#[must_use]
pub fn render_with(tree: &Tree, config: &PrettyConfig) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(tree.root(), 0)];
    while let Some((id, depth)) = stack.pop() {
        let node = &tree[id];
        for _ in 0..depth {
            out.push_str(&config.indent);
        }
        if config.show_ids {
            write!(out, "{id} ").unwrap();
        }
        writeln!(out, "{}", label(node)).unwrap();
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

/// S-expression rendering: leaves print their value (or symbol when the value
/// is empty), interior nodes print `(symbol child…)`.
#[must_use]
pub fn sexpr(tree: &Tree) -> String {
    enum Step {
        /// Print a node, preceded by a space unless it is the root
        Enter(NodeId, bool),
        Close,
    }

    let mut out = String::new();
    let mut stack = vec![Step::Enter(tree.root(), false)];
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Close => {
                out.push(')');
                continue;
            }
            Step::Enter(id, spaced) => {
                if spaced {
                    out.push(' ');
                }
                id
            }
        };

        let node = &tree[id];
        if node.is_leaf() {
            if node.value().is_empty() {
                out.push_str(node.symbol().name());
            } else {
                out.push_str(node.value());
            }
            continue;
        }
        out.push('(');
        out.push_str(node.symbol().name());
        stack.push(Step::Close);
        stack.extend(node.children().iter().rev().map(|&child| Step::Enter(child, true)));
    }
    out
}

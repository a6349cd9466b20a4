//! The four rewrite passes. Each reads one tree and builds a fresh one.

use crate::error::ReduceError;
use crate::grammar::Symbol;
use crate::reduce::{ReduceConfig, Shape};
use crate::syntax::{NodeId, Tree, TreeBuilder};
use std::convert::Infallible;

/// Rebuild `tree` bottom-up without recursion.
///
/// `rebuild` sees every input node after all of its children, together with
/// their replacements in `out` (`None` for dropped children), and returns the
/// node's own replacement.
fn fold<E, F>(tree: &Tree, out: &mut TreeBuilder, mut rebuild: F) -> Result<Option<NodeId>, E>
where
    F: FnMut(&mut TreeBuilder, NodeId, Vec<Option<NodeId>>) -> Result<Option<NodeId>, E>,
{
    let mut results: Vec<Option<NodeId>> = vec![None; tree.len()];
    let mut stack = vec![(tree.root(), false)];

    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            let children = tree[id]
                .children()
                .iter()
                .map(|child| results[child.index()])
                .collect();
            results[id.index()] = rebuild(out, id, children)?;
        } else {
            stack.push((id, true));
            stack.extend(tree[id].children().iter().rev().map(|&child| (child, false)));
        }
    }

    Ok(results[tree.root().index()])
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Drop childless nodes with an empty value, bottom-up.
///
/// Interior nodes whose children were all dropped are dropped as well. If
/// nothing survives, the result is a lone node carrying the root's symbol.
#[must_use]
pub fn filter_epsilon(tree: &Tree) -> Tree {
    let mut out = TreeBuilder::with_capacity(tree.len());
    let root = infallible(fold(tree, &mut out, |out, id, children| {
        let node = &tree[id];
        let kept: Vec<NodeId> = children.into_iter().flatten().collect();
        if kept.is_empty() && node.value().is_empty() {
            return Ok(None);
        }
        Ok(Some(out.branch(node.symbol().clone(), node.value(), kept)))
    }));

    let root = root.unwrap_or_else(|| out.node(tree.root_node().symbol().clone(), ""));
    out.finish(root)
}

/// Rewrite recognized statement shapes into canonical nodes.
///
/// # Errors
///
/// Returns [`ReduceError::MalformedDerivation`] when a recognized shape lacks
/// a child it needs.
pub fn simplify(tree: &Tree, config: &ReduceConfig) -> Result<Tree, ReduceError> {
    let mut out = TreeBuilder::with_capacity(tree.len());
    let root = fold::<ReduceError, _>(tree, &mut out, |out, id, children| {
        let node = &tree[id];
        let shape = Shape::classify(tree, node, config);
        let inputs = node.children();
        let rebuilt: Vec<NodeId> = children.into_iter().flatten().collect();

        let malformed = |missing: String| ReduceError::MalformedDerivation {
            shape,
            node: node.symbol().clone(),
            missing,
        };
        let find = |symbols: &[Symbol], nth: usize, what: &str| {
            find_child(tree, inputs, symbols, nth)
                .map(|index| rebuilt[index])
                .ok_or_else(|| malformed(format!("{what} ({})", names(symbols))))
        };

        let replacement = match shape {
            Shape::While => {
                let condition = find(&config.boolean_symbols, 1, "condition")?;
                let body = find(&config.statement_symbols, 1, "body")?;
                out.branch(
                    Symbol::terminal(config.while_keyword.clone()),
                    config.while_keyword.clone(),
                    [condition, body],
                )
            }
            Shape::If => {
                let condition = find(&config.boolean_symbols, 1, "condition")?;
                let then_branch = find(&config.statement_symbols, 1, "then branch")?;
                let else_branch = find(&config.statement_symbols, 2, "else branch")?;
                out.branch(
                    Symbol::terminal(config.if_keyword.clone()),
                    config.if_keyword.clone(),
                    [condition, then_branch, else_branch],
                )
            }
            Shape::Assign => {
                let operator = inputs
                    .iter()
                    .position(|&child| is_leaf_named(tree, child, &config.assign_operator))
                    .ok_or_else(|| malformed(format!("`{}`", config.assign_operator)))?;
                let target = operator
                    .checked_sub(1)
                    .map(|index| rebuilt[index])
                    .ok_or_else(|| malformed("assignment target".to_string()))?;
                let value = rebuilt
                    .get(operator + 1)
                    .copied()
                    .ok_or_else(|| malformed("assigned expression".to_string()))?;
                out.branch(
                    Symbol::terminal(config.assign_operator.clone()),
                    config.assign_operator.clone(),
                    [target, value],
                )
            }
            Shape::Sequence => {
                let kept = inputs
                    .iter()
                    .zip(&rebuilt)
                    .filter(|&(&input, _)| !is_leaf_named(tree, input, &config.sequence_separator))
                    .map(|(_, &output)| output);
                out.branch(node.symbol().clone(), node.value(), kept)
            }
            Shape::Generic => out.branch(node.symbol().clone(), node.value(), rebuilt),
        };

        if shape != Shape::Generic {
            tracing::trace!(%shape, node = %node.symbol(), "simplified");
        }
        Ok(Some(replacement))
    })?;

    let root = root.unwrap_or_else(|| out.node(tree.root_node().symbol().clone(), ""));
    Ok(out.finish(root))
}

/// Position of the `nth` (1-based) child whose symbol is one of `symbols`.
fn find_child(tree: &Tree, children: &[NodeId], symbols: &[Symbol], nth: usize) -> Option<usize> {
    children
        .iter()
        .enumerate()
        .filter(|&(_, &child)| symbols.contains(tree[child].symbol()))
        .nth(nth.checked_sub(1)?)
        .map(|(index, _)| index)
}

fn is_leaf_named(tree: &Tree, id: NodeId, name: &str) -> bool {
    let node = &tree[id];
    node.is_leaf() && node.symbol().is_terminal() && node.symbol().name() == name
}

fn names(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Replace every node that has exactly one child by that child.
#[must_use]
pub fn collapse_singletons(tree: &Tree) -> Tree {
    let mut out = TreeBuilder::with_capacity(tree.len());
    let root = infallible(fold(tree, &mut out, |out, id, children| {
        let node = &tree[id];
        let children: Vec<NodeId> = children.into_iter().flatten().collect();
        Ok(Some(match children.as_slice() {
            [only] => *only,
            _ => out.branch(node.symbol().clone(), node.value(), children),
        }))
    }));

    let root = root.unwrap_or_else(|| out.node(tree.root_node().symbol().clone(), ""));
    out.finish(root)
}

/// Splice helper children `X'` into their owner `X`.
///
/// The helper is removed and its children are appended after `X`'s remaining
/// children; this repeats until `X` has no helper child left. Each splice
/// removes one helper node, so the loop terminates.
#[must_use]
pub fn unwind_helpers(tree: &Tree) -> Tree {
    let mut out = TreeBuilder::with_capacity(tree.len());
    let root = infallible(fold(tree, &mut out, |out, id, children| {
        let node = &tree[id];
        let mut children: Vec<NodeId> = children.into_iter().flatten().collect();

        while let Some(index) = children
            .iter()
            .position(|&child| out.symbol(child).is_helper_of(node.symbol()))
        {
            let helper = children.remove(index);
            children.extend_from_slice(out.children(helper));
        }

        Ok(Some(out.branch(node.symbol().clone(), node.value(), children)))
    }));

    let root = root.unwrap_or_else(|| out.node(tree.root_node().symbol().clone(), ""));
    out.finish(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::pretty::sexpr;

    fn nt(name: &str) -> Symbol {
        Symbol::non_terminal(name)
    }

    fn leaf(builder: &mut TreeBuilder, kind: &str, value: &str) -> NodeId {
        builder.node(Symbol::terminal(kind), value)
    }

    #[test]
    fn test_filter_epsilon_cascades() {
        let mut b = TreeBuilder::new();
        let x = leaf(&mut b, "var", "x");
        let empty = b.node(nt("M'"), "");
        let tail = b.branch(nt("E'"), "", [empty]);
        let root = b.branch(nt("E"), "", [x, tail]);
        let tree = b.finish(root);

        assert_eq!(sexpr(&filter_epsilon(&tree)), "(E x)");
    }

    #[test]
    fn test_filter_epsilon_keeps_root() {
        let mut b = TreeBuilder::new();
        let empty = b.node(nt("S"), "");
        let tree = b.finish(empty);

        let filtered = filter_epsilon(&tree);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.root_node().symbol(), &nt("S"));
    }

    #[test]
    fn test_simplify_while() {
        let mut b = TreeBuilder::new();
        let kw = leaf(&mut b, "while", "while");
        let t = leaf(&mut b, "true", "true");
        let cond = b.branch(nt("B"), "", [t]);
        let d = leaf(&mut b, "do", "do");
        let s = leaf(&mut b, "skip", "skip");
        let body = b.branch(nt("T"), "", [s]);
        let root = b.branch(nt("T"), "", [kw, cond, d, body]);
        let tree = b.finish(root);

        let simplified = simplify(&tree, &ReduceConfig::default()).unwrap();
        assert_eq!(sexpr(&simplified), "(while (B true) (T skip))");
    }

    #[test]
    fn test_simplify_missing_condition() {
        let mut b = TreeBuilder::new();
        let kw = leaf(&mut b, "while", "while");
        let s = leaf(&mut b, "skip", "skip");
        let body = b.branch(nt("T"), "", [s]);
        let root = b.branch(nt("T"), "", [kw, body]);
        let tree = b.finish(root);

        match simplify(&tree, &ReduceConfig::default()) {
            Err(ReduceError::MalformedDerivation { shape, node, missing }) => {
                assert_eq!(shape, Shape::While);
                assert_eq!(node, nt("T"));
                assert_eq!(missing, "condition (B)");
            }
            other => panic!("expected MalformedDerivation, got {other:?}"),
        }
    }

    #[test]
    fn test_simplify_if_needs_two_branches() {
        let mut b = TreeBuilder::new();
        let kw = leaf(&mut b, "if", "if");
        let t = leaf(&mut b, "true", "true");
        let cond = b.branch(nt("B"), "", [t]);
        let s = leaf(&mut b, "skip", "skip");
        let then_branch = b.branch(nt("S"), "", [s]);
        let root = b.branch(nt("T"), "", [kw, cond, then_branch]);
        let tree = b.finish(root);

        assert!(matches!(
            simplify(&tree, &ReduceConfig::default()),
            Err(ReduceError::MalformedDerivation { shape: Shape::If, .. })
        ));
    }

    #[test]
    fn test_simplify_assign_and_sequence() {
        let mut b = TreeBuilder::new();
        let x = leaf(&mut b, "var", "x");
        let op = leaf(&mut b, ":=", ":=");
        let one = leaf(&mut b, "num", "1");
        let assign = b.branch(nt("T"), "", [x, op, one]);
        let semi = leaf(&mut b, ";", ";");
        let s = leaf(&mut b, "skip", "skip");
        let tail = b.branch(nt("S'"), "", [semi, s]);
        let root = b.branch(nt("S"), "", [assign, tail]);
        let tree = b.finish(root);

        let simplified = simplify(&tree, &ReduceConfig::default()).unwrap();
        assert_eq!(sexpr(&simplified), "(S (:= x 1) (S' skip))");
    }

    #[test]
    fn test_collapse_singletons() {
        let mut b = TreeBuilder::new();
        let x = leaf(&mut b, "var", "x");
        let f = b.branch(nt("F"), "", [x]);
        let m = b.branch(nt("M"), "", [f]);
        let plus = leaf(&mut b, "aop", "+");
        let y = leaf(&mut b, "var", "y");
        let root = b.branch(nt("E"), "", [m, plus, y]);
        let tree = b.finish(root);

        assert_eq!(sexpr(&collapse_singletons(&tree)), "(E x + y)");
    }

    #[test]
    fn test_unwind_nested_helpers() {
        let mut b = TreeBuilder::new();
        let one = leaf(&mut b, "num", "1");
        let plus = leaf(&mut b, "aop", "+");
        let two = leaf(&mut b, "num", "2");
        let minus = leaf(&mut b, "aop", "-");
        let three = leaf(&mut b, "num", "3");
        let inner = b.branch(nt("E'"), "", [minus, three]);
        let outer = b.branch(nt("E'"), "", [plus, two, inner]);
        let root = b.branch(nt("E"), "", [one, outer]);
        let tree = b.finish(root);

        assert_eq!(sexpr(&unwind_helpers(&tree)), "(E 1 + 2 - 3)");
    }

    #[test]
    fn test_unwind_appends_after_remaining_children() {
        let mut b = TreeBuilder::new();
        let a = leaf(&mut b, "a", "a");
        let c = leaf(&mut b, "c", "c");
        let helper = b.branch(nt("X'"), "", [a, c]);
        let z = leaf(&mut b, "z", "z");
        let root = b.branch(nt("X"), "", [helper, z]);
        let tree = b.finish(root);

        assert_eq!(sexpr(&unwind_helpers(&tree)), "(X z a c)");
    }
}

//! Graphviz rendering of grammars, parse tables and trees
//!
//! Every function returns a complete `digraph` in DOT format.

use sprig::grammar::{ClosureTables, Grammar, Symbol, left_recursive};
use sprig::ParseTable;
use sprig::syntax::Tree;
use std::collections::BTreeSet;
use std::fmt::Write;

static EOF: Symbol = Symbol::Eof;

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Nonterminal dependency graph of a grammar.
///
/// Nonterminals are ellipses with solid edges to the nonterminals their
/// alternatives mention; terminals are boxes reached by dashed edges.
/// Left-recursive nonterminals are filled red and nonterminals with LL(1)
/// conflicts orange.
///
/// # Example
///
/// ```rust
/// use sprig::grammar::parse_grammar;
/// use sprig_tools::visualize::grammar_dot;
///
/// let grammar = parse_grammar("E -> E + n | n").unwrap();
/// let dot = grammar_dot(&grammar);
/// assert!(dot.contains("\"E\" -> \"E\" [color=red, penwidth=2];"));
/// ```
#[must_use]
pub fn grammar_dot(grammar: &Grammar) -> String {
    let closure = ClosureTables::compute(grammar);
    let table = ParseTable::build(grammar, &closure);
    let recursive: BTreeSet<Symbol> = left_recursive(grammar, &closure).into_iter().collect();
    let conflicted: BTreeSet<&Symbol> = table.conflicts().iter().map(|c| &c.nonterminal).collect();

    let mut output = String::new();
    writeln!(output, "digraph Grammar {{").unwrap();
    writeln!(output, "  rankdir=LR;").unwrap();
    writeln!(output, "  node [shape=box];").unwrap();
    writeln!(output).unwrap();

    for nt in grammar.non_terminals() {
        let style = if recursive.contains(nt) {
            "shape=ellipse, style=filled, fillcolor=red, fontcolor=white"
        } else if conflicted.contains(nt) {
            "shape=ellipse, style=filled, fillcolor=orange"
        } else {
            "shape=ellipse"
        };
        writeln!(output, "  {} [{style}];", quote(nt.name())).unwrap();
    }

    writeln!(output).unwrap();
    let mut edges = BTreeSet::new();
    let mut terminals = BTreeSet::new();
    for production in grammar.productions() {
        for symbol in production.rhs() {
            if symbol.is_terminal() {
                terminals.insert(symbol);
            }
            edges.insert((production.lhs(), symbol));
        }
    }

    for (from, to) in &edges {
        let attributes = if to.is_terminal() {
            " [style=dashed]"
        } else if recursive.contains(*from) && recursive.contains(*to) {
            " [color=red, penwidth=2]"
        } else {
            ""
        };
        writeln!(
            output,
            "  {} -> {}{attributes};",
            quote(from.name()),
            quote(to.name())
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "  // Terminals").unwrap();
    for terminal in terminals {
        writeln!(
            output,
            "  {} [shape=box, style=filled, fillcolor=lightblue];",
            quote(terminal.name())
        )
        .unwrap();
    }

    writeln!(output, "}}").unwrap();
    output
}

/// The parse table as a single HTML-label node; conflicting cells are
/// highlighted.
#[must_use]
pub fn table_dot(grammar: &Grammar, table: &ParseTable) -> String {
    let mut columns: Vec<&Symbol> = grammar.sorted_terminals();
    columns.push(&EOF);

    let mut output = String::new();
    writeln!(output, "digraph Table {{").unwrap();
    writeln!(output, "  node [shape=plaintext];").unwrap();
    writeln!(
        output,
        "  table [label=<<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">"
    )
    .unwrap();

    write!(output, "    <TR><TD></TD>").unwrap();
    for column in &columns {
        write!(output, "<TD><B>{}</B></TD>", html_escape(&column.to_string())).unwrap();
    }
    writeln!(output, "</TR>").unwrap();

    for nt in grammar.non_terminals() {
        write!(output, "    <TR><TD><B>{}</B></TD>", html_escape(nt.name())).unwrap();
        for &column in &columns {
            let cell = table.get(nt, column);
            let text = cell
                .iter()
                .map(|&id| html_escape(&grammar.production(id).to_string()))
                .collect::<Vec<_>>()
                .join("<BR/>");
            if cell.len() > 1 {
                write!(output, "<TD BGCOLOR=\"orange\">{text}</TD>").unwrap();
            } else {
                write!(output, "<TD>{text}</TD>").unwrap();
            }
        }
        writeln!(output, "</TR>").unwrap();
    }

    writeln!(output, "  </TABLE>>];").unwrap();
    writeln!(output, "}}").unwrap();
    output
}

/// A parse tree or CST, one node per tree node, edges from parent to child.
///
/// Leaves are boxes labelled with their value; interior nodes are ellipses
/// labelled with their symbol.
#[must_use]
pub fn tree_dot(tree: &Tree) -> String {
    let mut output = String::new();
    writeln!(output, "digraph Tree {{").unwrap();
    writeln!(output, "  node [shape=ellipse];").unwrap();

    for id in tree.preorder() {
        let node = &tree[id];
        if node.is_leaf() {
            let label = if node.value().is_empty() {
                node.symbol().to_string()
            } else {
                node.value().to_string()
            };
            writeln!(output, "  {id} [label={}, shape=box];", quote(&label)).unwrap();
        } else {
            writeln!(output, "  {id} [label={}];", quote(&node.symbol().to_string())).unwrap();
        }
        for child in node.children() {
            writeln!(output, "  {id} -> {child};").unwrap();
        }
    }

    writeln!(output, "}}").unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig::grammar::parse_grammar;
    use sprig::lang::Pipeline;

    #[test]
    fn test_grammar_dot_marks_terminals() {
        let grammar = parse_grammar("S -> ( S ) S | ε").unwrap();
        let dot = grammar_dot(&grammar);

        assert!(dot.starts_with("digraph Grammar {"));
        assert!(dot.contains("\"S\" [shape=ellipse];"));
        assert!(dot.contains("\"S\" -> \"(\" [style=dashed];"));
        assert!(dot.contains("\"S\" -> \"S\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_grammar_dot_highlights_conflicts() {
        let grammar = parse_grammar("S -> a b | a c").unwrap();
        let dot = grammar_dot(&grammar);
        assert!(dot.contains("\"S\" [shape=ellipse, style=filled, fillcolor=orange];"));
    }

    #[test]
    fn test_table_dot_escapes_and_highlights() {
        let grammar = parse_grammar("S -> < S | < x").unwrap();
        let table = ParseTable::build(&grammar, &ClosureTables::compute(&grammar));
        let dot = table_dot(&grammar, &table);

        assert!(dot.contains("<B>&lt;</B>"));
        assert!(dot.contains("BGCOLOR=\"orange\""));
        assert!(!dot.contains("<B><</B>"));
    }

    #[test]
    fn test_tree_dot() {
        let tree = Pipeline::new().unwrap().reduce("x := 1").unwrap();
        let dot = tree_dot(&tree);

        assert!(dot.contains("n0 [label=\":=\"];"));
        assert!(dot.contains("n1 [label=\"x\", shape=box];"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("n0 -> n2;"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\"), "\"a\\\"b\\\\\"");
    }
}

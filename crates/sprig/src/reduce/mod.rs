//! # Tree Reducer
//!
//! Rewrites a raw parse tree into a compact concrete syntax tree.
//!
//! Four passes run in order, each producing a fresh tree:
//!
//! 1. [`filter_epsilon`](passes::filter_epsilon) removes the empty nodes
//!    left behind by epsilon productions.
//! 2. [`simplify`](passes::simplify) rewrites `while`, `if`, assignment and
//!    sequence shapes into canonical nodes (see [`Shape`]).
//! 3. [`collapse_singletons`](passes::collapse_singletons) replaces every
//!    node that has exactly one child by that child.
//! 4. [`unwind_helpers`](passes::unwind_helpers) splices helper
//!    nonterminals `X'` into their owners `X`, flattening operator and
//!    statement chains.
//!
//! The input tree is never modified, and reducing an already reduced tree
//! returns an equal tree.
//!
//! ```rust
//! use sprig::{TreeReducer, lang};
//! use sprig::syntax::pretty::sexpr;
//!
//! let tokens = lang::lexer()?.tokenize("while x < 3 do x := x + 1")?;
//! let parser = lang::parser()?;
//! let raw = parser.parse(&tokens)?.tree;
//!
//! let cst = TreeReducer::default().reduce(&raw)?;
//! assert_eq!(sexpr(&cst), "(while (C x < 3) (:= x (E x + 1)))");
//! # Ok::<(), sprig::Error>(())
//! ```

pub mod passes;
mod shape;

pub use shape::Shape;

use crate::error::ReduceError;
use crate::grammar::Symbol;
use crate::syntax::Tree;
use compact_str::CompactString;

/// Names the reducer matches against.
///
/// The defaults describe the built-in toy language.
#[derive(Debug, Clone)]
pub struct ReduceConfig {
    /// Leaf marking a loop; also the symbol of rewritten loop nodes
    pub while_keyword: CompactString,
    /// Leaf marking a conditional; also the symbol of rewritten conditionals
    pub if_keyword: CompactString,
    /// Leaf marking an assignment; also the symbol of rewritten assignments
    pub assign_operator: CompactString,
    /// Leaf separating statements in a sequence
    pub sequence_separator: CompactString,
    /// Nonterminals producing a boolean condition
    pub boolean_symbols: Vec<Symbol>,
    /// Nonterminals producing a statement
    pub statement_symbols: Vec<Symbol>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            while_keyword: "while".into(),
            if_keyword: "if".into(),
            assign_operator: ":=".into(),
            sequence_separator: ";".into(),
            boolean_symbols: vec![Symbol::non_terminal("B")],
            statement_symbols: vec![Symbol::non_terminal("S"), Symbol::non_terminal("T")],
        }
    }
}

/// Runs the four reduction passes.
#[derive(Debug, Clone, Default)]
pub struct TreeReducer {
    config: ReduceConfig,
}

impl TreeReducer {
    #[must_use]
    pub const fn new(config: ReduceConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ReduceConfig {
        &self.config
    }

    /// Reduce a parse tree to its CST.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::MalformedDerivation`] if a recognized shape is
    /// missing a child.
    pub fn reduce(&self, tree: &Tree) -> Result<Tree, ReduceError> {
        let filtered = passes::filter_epsilon(tree);
        let simplified = passes::simplify(&filtered, &self.config)?;
        let collapsed = passes::collapse_singletons(&simplified);
        let unwound = passes::unwind_helpers(&collapsed);

        tracing::debug!(
            input = tree.len(),
            filtered = filtered.len(),
            collapsed = collapsed.len(),
            output = unwound.len(),
            "reduced tree"
        );
        Ok(unwound)
    }
}

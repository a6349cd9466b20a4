//! Textual grammar format.
//!
//! One production per line in the form `LHS -> S1 S2 … Sn`. Alternatives may
//! share a line separated by `|`. An empty right-hand side, or the lone symbol
//! `ε`, is an epsilon production. Blank lines and lines starting with `#` are
//! skipped. The first left-hand side is the start symbol.
//!
//! ```text
//! # balanced parentheses
//! S -> ( S ) S | ε
//! ```

use crate::error::GrammarError;
use crate::grammar::{Grammar, Production, Symbol};

const ARROW: &str = "->";

/// Read a grammar from text and build it.
///
/// # Errors
///
/// Returns [`GrammarError::Syntax`] for malformed lines and any error
/// [`Grammar::from_productions`] reports.
pub fn parse_grammar(source: &str) -> Result<Grammar, GrammarError> {
    Grammar::from_productions(parse_productions(source)?)
}

/// Read the raw production list, without classification or hygiene.
///
/// Left-hand sides are nonterminals and every right-hand-side name is a
/// terminal until [`Grammar::from_productions`] reclassifies them.
///
/// # Errors
///
/// Returns [`GrammarError::Syntax`] with a 1-based line number.
pub fn parse_productions(source: &str) -> Result<Vec<Production>, GrammarError> {
    let mut productions = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let syntax = |message: &str| GrammarError::Syntax {
            line: index + 1,
            message: message.to_string(),
        };

        let (lhs, rhs) = line
            .split_once(ARROW)
            .ok_or_else(|| syntax("expected `->` between left- and right-hand side"))?;

        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(syntax("missing left-hand side"));
        }
        if lhs.split_whitespace().count() > 1 {
            return Err(syntax("left-hand side must be a single symbol"));
        }
        if lhs == Symbol::EPSILON_NAME || lhs == Symbol::EOF_NAME {
            return Err(syntax("reserved symbol on left-hand side"));
        }

        for alternative in rhs.split('|') {
            let symbols = alternative
                .split_whitespace()
                .map(|name| match name {
                    Symbol::EPSILON_NAME => Ok(Symbol::Epsilon),
                    Symbol::EOF_NAME => Err(syntax("`$` is reserved for end of input")),
                    ARROW => Err(syntax("unexpected second `->`")),
                    name => Ok(Symbol::terminal(name)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            productions.push(Production::new(Symbol::non_terminal(lhs), symbols));
        }
    }

    Ok(productions)
}

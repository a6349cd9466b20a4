//! # Grammar Hygiene
//!
//! Removal of useless productions. A grammar is reduced in two passes, in
//! this order:
//!
//! 1. [`reduce_generating`] drops every production that mentions a
//!    nonterminal which cannot derive a terminal string.
//! 2. [`reduce_reachable`] drops every production whose left-hand side
//!    cannot be reached from the start symbol.
//!
//! Both passes are monotone fixed points over the finite nonterminal set, so
//! they terminate, and both preserve the relative order of the productions
//! they keep. Applying them to an already reduced list is the identity.

use crate::grammar::{Production, Symbol, SymbolSet};

/// Nonterminals that derive at least one terminal string.
///
/// A nonterminal is generating if it has an alternative whose every
/// right-hand-side symbol is a terminal or an already generating
/// nonterminal. Epsilon alternatives qualify trivially.
#[must_use]
pub fn generating_symbols(productions: &[Production]) -> SymbolSet {
    let mut generating = SymbolSet::default();
    let mut iterations = 0usize;

    loop {
        iterations += 1;
        let before = generating.len();

        for production in productions {
            if !generating.contains(production.lhs())
                && is_generating_rhs(production, &generating)
            {
                generating.insert(production.lhs().clone());
            }
        }

        if generating.len() == before {
            break;
        }
    }

    tracing::trace!(iterations, count = generating.len(), "generating fixed point");
    generating
}

fn is_generating_rhs(production: &Production, generating: &SymbolSet) -> bool {
    production
        .rhs()
        .iter()
        .all(|symbol| !symbol.is_non_terminal() || generating.contains(symbol))
}

/// Keep only productions built entirely from generating symbols.
#[must_use]
pub fn reduce_generating(productions: &[Production]) -> Vec<Production> {
    let generating = generating_symbols(productions);

    let kept: Vec<Production> = productions
        .iter()
        .filter(|p| generating.contains(p.lhs()) && is_generating_rhs(p, &generating))
        .cloned()
        .collect();

    if kept.len() != productions.len() {
        tracing::debug!(
            removed = productions.len() - kept.len(),
            "dropped productions over non-generating symbols"
        );
    }
    kept
}

/// Nonterminals reachable from `start` through right-hand sides.
#[must_use]
pub fn reachable_symbols(productions: &[Production], start: &Symbol) -> SymbolSet {
    let mut reachable = SymbolSet::default();
    let mut worklist = vec![start.clone()];

    while let Some(nt) = worklist.pop() {
        if !reachable.insert(nt.clone()) {
            continue;
        }

        for production in productions.iter().filter(|p| p.lhs() == &nt) {
            for referenced in production.non_terminals() {
                if !reachable.contains(referenced) {
                    worklist.push(referenced.clone());
                }
            }
        }
    }

    reachable
}

/// Keep only productions whose left-hand side is reachable from `start`.
#[must_use]
pub fn reduce_reachable(productions: &[Production], start: &Symbol) -> Vec<Production> {
    let reachable = reachable_symbols(productions, start);

    let kept: Vec<Production> = productions
        .iter()
        .filter(|p| reachable.contains(p.lhs()))
        .cloned()
        .collect();

    if kept.len() != productions.len() {
        tracing::debug!(
            removed = productions.len() - kept.len(),
            start = %start,
            "dropped unreachable productions"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(name: &str) -> Symbol {
        Symbol::non_terminal(name)
    }

    fn t(name: &str) -> Symbol {
        Symbol::terminal(name)
    }

    #[test]
    fn test_non_generating_cycle_is_removed() {
        // A -> B, B -> A never bottom out
        let productions = vec![
            Production::new(nt("S"), [t("a")]),
            Production::new(nt("S"), [nt("A")]),
            Production::new(nt("A"), [nt("B")]),
            Production::new(nt("B"), [nt("A")]),
        ];

        let generating = generating_symbols(&productions);
        assert!(generating.contains(&nt("S")));
        assert!(!generating.contains(&nt("A")));

        let reduced = reduce_generating(&productions);
        assert_eq!(reduced, vec![Production::new(nt("S"), [t("a")])]);
    }

    #[test]
    fn test_epsilon_alternative_is_generating() {
        let productions = vec![
            Production::new(nt("S"), [nt("A"), t("b")]),
            Production::epsilon(nt("A")),
        ];
        assert_eq!(reduce_generating(&productions), productions);
    }

    #[test]
    fn test_unreachable_is_removed() {
        let productions = vec![
            Production::new(nt("S"), [t("a")]),
            Production::new(nt("U"), [t("u")]),
        ];
        let reduced = reduce_reachable(&productions, &nt("S"));
        assert_eq!(reduced, vec![Production::new(nt("S"), [t("a")])]);
    }

    #[test]
    fn test_order_of_passes_matters() {
        // S -> a | A B, A -> a, B never generates. After the generating
        // pass A is unreachable, which only the second pass can see.
        let productions = vec![
            Production::new(nt("S"), [t("a")]),
            Production::new(nt("S"), [nt("A"), nt("B")]),
            Production::new(nt("A"), [t("a")]),
            Production::new(nt("B"), [nt("B"), t("b")]),
        ];

        let generating = reduce_generating(&productions);
        assert_eq!(generating.len(), 2);
        let reachable = reduce_reachable(&generating, &nt("S"));
        assert_eq!(reachable, vec![Production::new(nt("S"), [t("a")])]);
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let productions = vec![
            Production::new(nt("S"), [t("a"), nt("S"), t("b")]),
            Production::epsilon(nt("S")),
            Production::new(nt("X"), [nt("Y")]),
        ];
        let once = reduce_reachable(&reduce_generating(&productions), &nt("S"));
        let twice = reduce_reachable(&reduce_generating(&once), &nt("S"));
        assert_eq!(once, twice);
    }
}

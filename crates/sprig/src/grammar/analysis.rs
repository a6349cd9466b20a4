//! # Grammar Analysis
//!
//! Metrics and diagnostics for context-free grammars.
//!
//! This module explains *why* a grammar is not LL(1) in terms a grammar
//! author can act on:
//! - Computing grammar complexity metrics
//! - Detecting direct and indirect left recursion
//! - Detecting alternatives that share a leading symbol

use crate::grammar::{ClosureTables, Grammar, Symbol, SymbolSet};
use hashbrown::HashMap;

/// Metrics about a grammar's complexity
#[derive(Debug, Clone)]
pub struct GrammarMetrics {
    /// Total number of productions
    pub production_count: usize,
    /// Number of non-terminals
    pub non_terminal_count: usize,
    /// Number of terminals
    pub terminal_count: usize,
    /// Average number of alternatives per non-terminal
    pub avg_alternatives: f64,
    /// Number of nullable non-terminals
    pub nullable_count: usize,
    /// Left-recursive non-terminals, in grammar order
    pub left_recursive: Vec<Symbol>,
}

impl GrammarMetrics {
    /// Compute metrics for a grammar
    #[must_use]
    pub fn compute(grammar: &Grammar, closure: &ClosureTables) -> Self {
        let non_terminal_count = grammar.non_terminals().len();
        let avg_alternatives = if non_terminal_count > 0 {
            f64::from(u32::try_from(grammar.production_count()).unwrap_or(u32::MAX))
                / f64::from(u32::try_from(non_terminal_count).unwrap_or(u32::MAX))
        } else {
            0.0
        };

        Self {
            production_count: grammar.production_count(),
            non_terminal_count,
            terminal_count: grammar.terminals().len(),
            avg_alternatives,
            nullable_count: closure.nullable().len(),
            left_recursive: left_recursive(grammar, closure),
        }
    }
}

/// Non-terminals that can derive a sentential form starting with themselves.
///
/// A non-terminal `A` has `B` as a left corner if some alternative of `A` is
/// `α B β` with `α` nullable. `A` is left-recursive if it is its own
/// transitive left corner.
#[must_use]
pub fn left_recursive(grammar: &Grammar, closure: &ClosureTables) -> Vec<Symbol> {
    let mut corners: HashMap<&Symbol, SymbolSet, ahash::RandomState> = HashMap::default();
    for production in grammar.productions() {
        let entry = corners.entry(production.lhs()).or_default();
        for symbol in production.rhs() {
            if symbol.is_non_terminal() {
                entry.insert(symbol.clone());
            }
            if !closure.is_nullable(symbol) {
                break;
            }
        }
    }

    grammar
        .non_terminals()
        .iter()
        .filter(|nt| {
            let mut seen = SymbolSet::default();
            let mut worklist: Vec<&Symbol> = corners
                .get(nt)
                .map(|set| set.iter().collect())
                .unwrap_or_default();
            while let Some(next) = worklist.pop() {
                if next == *nt {
                    return true;
                }
                if seen.insert(next.clone())
                    && let Some(set) = corners.get(next)
                {
                    worklist.extend(set.iter());
                }
            }
            false
        })
        .cloned()
        .collect()
}

/// Suggestions for making a grammar LL(1)
#[derive(Debug, Clone)]
pub struct OptimizationSuggestion {
    /// Type of suggestion
    pub kind: SuggestionKind,
    /// Non-terminal this applies to
    pub target: Symbol,
    /// Description of the suggestion
    pub message: String,
}

/// Types of optimization suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// Consider factoring common prefixes
    FactorCommonPrefix,
    /// Consider removing left recursion with a helper non-terminal
    RemoveLeftRecursion,
}

/// Analyze a grammar and provide suggestions
#[must_use]
pub fn analyze_grammar(grammar: &Grammar, closure: &ClosureTables) -> Vec<OptimizationSuggestion> {
    let mut suggestions = Vec::new();

    for nt in left_recursive(grammar, closure) {
        suggestions.push(OptimizationSuggestion {
            kind: SuggestionKind::RemoveLeftRecursion,
            message: format!(
                "Rule '{nt}' is left-recursive. Rewrite it as '{nt} -> β {helper}' with '{helper} -> α {helper} | ε'.",
                helper = nt.helper()
            ),
            target: nt,
        });
    }

    for nt in grammar.non_terminals() {
        let mut leading: HashMap<&Symbol, usize, ahash::RandomState> = HashMap::default();
        for &id in grammar.alternatives(nt) {
            if let Some(first) = grammar.production(id).rhs().first() {
                *leading.entry(first).or_default() += 1;
            }
        }
        let mut shared: Vec<_> = leading
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .collect();
        shared.sort();
        for (symbol, count) in shared {
            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::FactorCommonPrefix,
                target: nt.clone(),
                message: format!(
                    "Rule '{nt}' has {count} alternatives starting with '{symbol}'. Consider factoring the common prefix."
                ),
            });
        }
    }

    suggestions
}

/// Get a summary of grammar characteristics
#[must_use]
pub fn grammar_summary(grammar: &Grammar, closure: &ClosureTables) -> String {
    let metrics = GrammarMetrics::compute(grammar, closure);
    format!(
        "Grammar summary: {} productions, {} non-terminals, {} terminals, {:.1} avg alternatives, {} nullable, {} left-recursive",
        metrics.production_count,
        metrics.non_terminal_count,
        metrics.terminal_count,
        metrics.avg_alternatives,
        metrics.nullable_count,
        metrics.left_recursive.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    fn expression_grammar() -> Grammar {
        GrammarBuilder::new()
            .rule("E", ["E", "+", "T"])
            .rule("E", ["T"])
            .rule("T", ["num"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_grammar_metrics() {
        let grammar = expression_grammar();
        let closure = ClosureTables::compute(&grammar);
        let metrics = GrammarMetrics::compute(&grammar, &closure);

        assert_eq!(metrics.production_count, 3);
        assert_eq!(metrics.non_terminal_count, 2);
        assert_eq!(metrics.terminal_count, 2);
        assert_eq!(metrics.nullable_count, 0);
        assert_eq!(metrics.left_recursive, vec![Symbol::non_terminal("E")]);
    }

    #[test]
    fn test_indirect_left_recursion_through_nullable_prefix() {
        let grammar = GrammarBuilder::new()
            .rule("A", ["N", "B", "x"])
            .rule("A", ["a"])
            .rule("B", ["A", "y"])
            .epsilon("N")
            .build()
            .unwrap();
        let closure = ClosureTables::compute(&grammar);
        let recursive = left_recursive(&grammar, &closure);

        assert_eq!(
            recursive,
            vec![Symbol::non_terminal("A"), Symbol::non_terminal("B")]
        );
    }

    #[test]
    fn test_suggestions() {
        let grammar = GrammarBuilder::new()
            .rule("S", ["a", "b"])
            .rule("S", ["a", "c"])
            .build()
            .unwrap();
        let closure = ClosureTables::compute(&grammar);
        let suggestions = analyze_grammar(&grammar, &closure);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::FactorCommonPrefix);
        assert_eq!(suggestions[0].target, Symbol::non_terminal("S"));
    }

    #[test]
    fn test_grammar_summary() {
        let grammar = expression_grammar();
        let closure = ClosureTables::compute(&grammar);
        let summary = grammar_summary(&grammar, &closure);
        assert!(summary.contains("3 productions"));
        assert!(summary.contains("1 left-recursive"));
    }
}

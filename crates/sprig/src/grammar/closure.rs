//! # Closure Solver
//!
//! Nullable, FIRST and FOLLOW sets as monotone fixed points.
//!
//! The three computations depend on each other in one direction only: FIRST
//! needs the finished nullable set and FOLLOW needs the finished FIRST table.
//! [`ClosureSolver`] exposes every fixed point one iteration at a time so the
//! growth of each set can be observed; [`ClosureTables::compute`] runs them to
//! completion.
//!
//! FOLLOW is computed over the augmented grammar `S' -> S $`: the end-of-input
//! marker is seeded into the follow set of the start symbol before the first
//! iteration, which is the only effect the synthetic production has.

use crate::grammar::{Grammar, Symbol, SymbolSet, SymbolTable};
use std::fmt::Write;

/// Steppable fixed-point iteration over a grammar.
///
/// Call the steps in dependency order: `step_nullable` until it returns
/// `false`, then `step_first`, then `step_follow`. Every step only ever adds
/// symbols to the tables.
#[derive(Debug, Clone)]
pub struct ClosureSolver<'g> {
    grammar: &'g Grammar,
    nullable: SymbolSet,
    first: SymbolTable,
    follow: SymbolTable,
}

impl<'g> ClosureSolver<'g> {
    #[must_use]
    pub fn new(grammar: &'g Grammar) -> Self {
        let mut first = SymbolTable::default();
        let mut follow = SymbolTable::default();
        for nt in grammar.non_terminals() {
            first.insert(nt.clone(), SymbolSet::default());
            follow.insert(nt.clone(), SymbolSet::default());
        }
        if let Some(start) = follow.get_mut(grammar.start()) {
            start.insert(Symbol::Eof);
        }

        Self {
            grammar,
            nullable: SymbolSet::default(),
            first,
            follow,
        }
    }

    /// One pass of the nullable fixed point.
    pub fn step_nullable(&mut self) -> bool {
        let mut changed = false;
        let grammar = self.grammar;
        for production in grammar.productions() {
            if self.nullable.contains(production.lhs()) {
                continue;
            }
            let all_nullable = production
                .rhs()
                .iter()
                .all(|s| s.is_epsilon() || self.nullable.contains(s));
            if all_nullable {
                self.nullable.insert(production.lhs().clone());
                changed = true;
            }
        }
        changed
    }

    /// One pass of the FIRST fixed point.
    pub fn step_first(&mut self) -> bool {
        let mut changed = false;
        let grammar = self.grammar;
        for production in grammar.productions() {
            let found = first_of(production.rhs(), &self.nullable, &self.first);
            let entry = self.first.entry(production.lhs().clone()).or_default();
            for symbol in found {
                changed |= entry.insert(symbol);
            }
        }
        changed
    }

    /// One pass of the FOLLOW fixed point.
    pub fn step_follow(&mut self) -> bool {
        let mut changed = false;
        let grammar = self.grammar;
        for production in grammar.productions() {
            let rhs = production.rhs();
            for (index, symbol) in rhs.iter().enumerate() {
                if !symbol.is_non_terminal() {
                    continue;
                }

                let trailer = first_of(&rhs[index + 1..], &self.nullable, &self.first);
                let mut additions: Vec<Symbol> =
                    trailer.iter().filter(|s| !s.is_epsilon()).cloned().collect();
                if trailer.contains(&Symbol::Epsilon)
                    && let Some(parent) = self.follow.get(production.lhs())
                {
                    additions.extend(parent.iter().cloned());
                }

                let entry = self.follow.entry(symbol.clone()).or_default();
                for addition in additions {
                    changed |= entry.insert(addition);
                }
            }
        }
        changed
    }

    #[must_use]
    pub const fn nullable(&self) -> &SymbolSet {
        &self.nullable
    }

    #[must_use]
    pub const fn first_table(&self) -> &SymbolTable {
        &self.first
    }

    #[must_use]
    pub const fn follow_table(&self) -> &SymbolTable {
        &self.follow
    }

    /// Run every fixed point to completion.
    #[must_use]
    pub fn solve(mut self) -> ClosureTables {
        let nullable_iterations = iterate(|| self.step_nullable());
        let first_iterations = iterate(|| self.step_first());
        let follow_iterations = iterate(|| self.step_follow());

        tracing::debug!(
            nullable_iterations,
            first_iterations,
            follow_iterations,
            nullable = self.nullable.len(),
            "closure fixed points reached"
        );

        let mut first = self.first;
        for terminal in self.grammar.terminals() {
            first.insert(terminal.clone(), std::iter::once(terminal.clone()).collect());
        }
        first.insert(Symbol::Eof, std::iter::once(Symbol::Eof).collect());

        ClosureTables {
            nullable: self.nullable,
            first,
            follow: self.follow,
        }
    }
}

fn iterate(mut step: impl FnMut() -> bool) -> usize {
    let mut iterations = 1;
    while step() {
        iterations += 1;
    }
    iterations
}

/// FIRST of a symbol sequence under the given nullable set and FIRST table.
///
/// Contains [`Symbol::Epsilon`] exactly when every symbol of the sequence is
/// nullable, which includes the empty sequence.
fn first_of(symbols: &[Symbol], nullable: &SymbolSet, first: &SymbolTable) -> SymbolSet {
    let mut result = SymbolSet::default();
    for symbol in symbols {
        match symbol {
            Symbol::Epsilon => continue,
            Symbol::Terminal(_) | Symbol::Eof => {
                result.insert(symbol.clone());
                return result;
            }
            Symbol::NonTerminal(_) => {
                if let Some(set) = first.get(symbol) {
                    result.extend(set.iter().filter(|s| !s.is_epsilon()).cloned());
                }
                if !nullable.contains(symbol) {
                    return result;
                }
            }
        }
    }
    result.insert(Symbol::Epsilon);
    result
}

/// Finished nullable set, FIRST table and FOLLOW table of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureTables {
    nullable: SymbolSet,
    first: SymbolTable,
    follow: SymbolTable,
}

impl ClosureTables {
    #[must_use]
    pub fn compute(grammar: &Grammar) -> Self {
        ClosureSolver::new(grammar).solve()
    }

    #[must_use]
    pub fn is_nullable(&self, symbol: &Symbol) -> bool {
        symbol.is_epsilon() || self.nullable.contains(symbol)
    }

    #[must_use]
    pub const fn nullable(&self) -> &SymbolSet {
        &self.nullable
    }

    /// FIRST set of a nonterminal, or the singleton of a terminal or `$`.
    #[must_use]
    pub fn first(&self, symbol: &Symbol) -> Option<&SymbolSet> {
        self.first.get(symbol)
    }

    /// FOLLOW set of a nonterminal.
    #[must_use]
    pub fn follow(&self, symbol: &Symbol) -> Option<&SymbolSet> {
        self.follow.get(symbol)
    }

    /// FIRST of an arbitrary symbol sequence.
    #[must_use]
    pub fn first_of_sequence(&self, symbols: &[Symbol]) -> SymbolSet {
        first_of(symbols, &self.nullable, &self.first)
    }

    /// Render the tables one nonterminal per line, in grammar order.
    #[must_use]
    pub fn render(&self, grammar: &Grammar) -> String {
        let mut out = String::new();
        let sorted = |set: Option<&SymbolSet>| {
            let mut symbols: Vec<&Symbol> = set.into_iter().flatten().collect();
            symbols.sort();
            symbols
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        for nt in grammar.non_terminals() {
            writeln!(
                out,
                "{nt}: nullable={} first={{{}}} follow={{{}}}",
                self.is_nullable(nt),
                sorted(self.first(nt)),
                sorted(self.follow(nt)),
            )
            .unwrap();
        }
        out
    }
}

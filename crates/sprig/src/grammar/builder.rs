use crate::error::GrammarError;
use crate::grammar::{Production, ProductionId, Symbol, SymbolSet, hygiene};
use compact_str::CompactString;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;
use std::fmt;

/// Context-free grammar.
///
/// A `Grammar` owns an insertion-ordered list of productions, the ordered
/// alternatives of every nonterminal, the terminal set and the start symbol.
/// It is immutable once built: construction classifies symbols (every name
/// that appears on some left-hand side is a nonterminal, every other
/// right-hand-side name is a terminal) and then removes non-generating and
/// unreachable productions, in that order.
///
/// # Example
///
/// ```rust
/// use sprig::grammar::{GrammarBuilder, Symbol};
///
/// let grammar = GrammarBuilder::new()
///     .rule("S", ["a", "S", "b"])
///     .epsilon("S")
///     .build()
///     .expect("Failed to build grammar");
///
/// assert_eq!(grammar.start(), &Symbol::non_terminal("S"));
/// assert!(grammar.is_terminal(&Symbol::terminal("a")));
/// assert_eq!(grammar.alternatives(grammar.start()).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    alternatives: HashMap<Symbol, SmallVec<[ProductionId; 4]>, ahash::RandomState>,
    non_terminals: Vec<Symbol>,
    terminals: SymbolSet,
    start: Symbol,
}

impl Grammar {
    /// Build a grammar whose start symbol is the left-hand side of the first
    /// production.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Empty`] for an empty production list,
    /// [`GrammarError::NotNonTerminal`] if a left-hand side is a reserved
    /// symbol, and [`GrammarError::UngeneratingStart`] if the start symbol
    /// derives no terminal string.
    pub fn from_productions(productions: Vec<Production>) -> Result<Self, GrammarError> {
        let start = productions
            .first()
            .ok_or(GrammarError::Empty)?
            .lhs()
            .clone();
        Self::with_start(productions, start)
    }

    /// Build a grammar with an explicit start symbol.
    ///
    /// # Errors
    ///
    /// See [`Grammar::from_productions`].
    pub fn with_start(productions: Vec<Production>, start: Symbol) -> Result<Self, GrammarError> {
        if productions.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut defined: HashSet<CompactString, ahash::RandomState> = HashSet::default();
        for production in &productions {
            match production.lhs() {
                Symbol::Terminal(name) | Symbol::NonTerminal(name) => {
                    defined.insert(name.clone());
                }
                reserved => {
                    return Err(GrammarError::NotNonTerminal {
                        symbol: reserved.clone(),
                    });
                }
            }
        }

        let classify = |symbol: Symbol| match symbol {
            Symbol::Terminal(name) if defined.contains(&name) => Symbol::NonTerminal(name),
            other => other,
        };

        let start = classify(start);
        if !start.is_non_terminal() {
            return Err(GrammarError::NotNonTerminal { symbol: start });
        }

        let mut seen: HashSet<Production, ahash::RandomState> = HashSet::default();
        let productions: Vec<Production> = productions
            .into_iter()
            .map(|p| p.map_symbols(&classify))
            .filter(|p| seen.insert(p.clone()))
            .collect();

        let generating = hygiene::reduce_generating(&productions);
        if !generating.iter().any(|p| p.lhs() == &start) {
            return Err(GrammarError::UngeneratingStart { start });
        }
        let reduced = hygiene::reduce_reachable(&generating, &start);

        tracing::debug!(
            start = %start,
            productions = reduced.len(),
            removed = productions.len() - reduced.len(),
            "built grammar"
        );

        Ok(Self::assemble(reduced, start))
    }

    fn assemble(productions: Vec<Production>, start: Symbol) -> Self {
        let mut alternatives: HashMap<Symbol, SmallVec<[ProductionId; 4]>, ahash::RandomState> =
            HashMap::default();
        let mut non_terminals = Vec::new();
        let mut terminals = SymbolSet::default();

        for (index, production) in productions.iter().enumerate() {
            alternatives
                .entry(production.lhs().clone())
                .or_insert_with(|| {
                    non_terminals.push(production.lhs().clone());
                    SmallVec::new()
                })
                .push(ProductionId(index));

            for symbol in production.rhs() {
                if symbol.is_terminal() {
                    terminals.insert(symbol.clone());
                }
            }
        }

        Self {
            productions,
            alternatives,
            non_terminals,
            terminals,
            start,
        }
    }

    #[must_use]
    pub const fn start(&self) -> &Symbol {
        &self.start
    }

    /// All productions, in insertion order.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Productions paired with their ids.
    pub fn enumerate(&self) -> impl Iterator<Item = (ProductionId, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(index, p)| (ProductionId(index), p))
    }

    /// Look up a production by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this grammar.
    #[must_use]
    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.0]
    }

    /// Alternatives of `nt` in insertion order; empty for unknown symbols.
    #[must_use]
    pub fn alternatives(&self, nt: &Symbol) -> &[ProductionId] {
        self.alternatives.get(nt).map_or(&[], |alts| alts.as_slice())
    }

    /// Nonterminals in order of first definition.
    #[must_use]
    pub fn non_terminals(&self) -> &[Symbol] {
        &self.non_terminals
    }

    #[must_use]
    pub const fn terminals(&self) -> &SymbolSet {
        &self.terminals
    }

    /// Terminals sorted by name, for stable reports.
    #[must_use]
    pub fn sorted_terminals(&self) -> Vec<&Symbol> {
        let mut terminals: Vec<_> = self.terminals.iter().collect();
        terminals.sort();
        terminals
    }

    #[must_use]
    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        self.terminals.contains(symbol)
    }

    #[must_use]
    pub fn is_non_terminal(&self, symbol: &Symbol) -> bool {
        self.alternatives.contains_key(symbol)
    }

    #[must_use]
    pub fn production_count(&self) -> usize {
        self.productions.len()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for production in &self.productions {
            writeln!(f, "{production}")?;
        }
        Ok(())
    }
}

/// Builder for constructing grammars from symbol names.
///
/// Names are classified when [`build`](GrammarBuilder::build) runs, so rules
/// may mention nonterminals before they are defined.
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    productions: Vec<Production>,
    entry_point: Option<CompactString>,
}

impl GrammarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the start symbol (defaults to the first rule's left-hand side).
    #[must_use]
    pub fn entry_point(mut self, name: impl Into<CompactString>) -> Self {
        self.entry_point = Some(name.into());
        self
    }

    /// Add `lhs -> rhs`. The name `ε` stands for the empty string.
    #[must_use]
    pub fn rule<I, S>(mut self, lhs: &str, rhs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rhs = rhs.into_iter().map(|name| match name.as_ref() {
            Symbol::EPSILON_NAME => Symbol::Epsilon,
            name => Symbol::terminal(name),
        });
        self.productions
            .push(Production::new(Symbol::non_terminal(lhs), rhs));
        self
    }

    /// Add `lhs -> ε`.
    #[must_use]
    pub fn epsilon(mut self, lhs: &str) -> Self {
        self.productions
            .push(Production::epsilon(Symbol::non_terminal(lhs)));
        self
    }

    /// Add an already constructed production.
    #[must_use]
    pub fn production(mut self, production: Production) -> Self {
        self.productions.push(production);
        self
    }

    /// Classify symbols and run hygiene reduction.
    ///
    /// # Errors
    ///
    /// See [`Grammar::from_productions`].
    pub fn build(self) -> Result<Grammar, GrammarError> {
        match self.entry_point {
            Some(start) => Grammar::with_start(self.productions, Symbol::non_terminal(start)),
            None => Grammar::from_productions(self.productions),
        }
    }
}

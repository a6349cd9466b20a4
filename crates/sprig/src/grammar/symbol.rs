use compact_str::{CompactString, format_compact};
use std::fmt;

/// Set of symbols, as produced by the closure solver
pub type SymbolSet = hashbrown::HashSet<Symbol, ahash::RandomState>;

/// Map from a symbol to a set of symbols (FIRST and FOLLOW tables)
pub type SymbolTable = hashbrown::HashMap<Symbol, SymbolSet, ahash::RandomState>;

/// An element of the grammar alphabet.
///
/// Terminals and nonterminals are named. Two reserved symbols exist:
/// [`Symbol::Epsilon`], the empty-string marker that only ever appears inside
/// FIRST sets, and [`Symbol::Eof`], the synthetic end-of-input marker that
/// terminates every derivation of the start symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A symbol matched directly against input tokens
    Terminal(CompactString),
    /// A symbol defined by one or more productions
    NonTerminal(CompactString),
    /// The empty string
    Epsilon,
    /// End of input
    Eof,
}

impl Symbol {
    /// Display name used for [`Symbol::Epsilon`]
    pub const EPSILON_NAME: &'static str = "ε";
    /// Display name used for [`Symbol::Eof`]
    pub const EOF_NAME: &'static str = "$";

    #[must_use]
    pub fn terminal(name: impl Into<CompactString>) -> Self {
        Self::Terminal(name.into())
    }

    #[must_use]
    pub fn non_terminal(name: impl Into<CompactString>) -> Self {
        Self::NonTerminal(name.into())
    }

    /// The symbol's name; reserved symbols answer with their display names.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Terminal(name) | Self::NonTerminal(name) => name,
            Self::Epsilon => Self::EPSILON_NAME,
            Self::Eof => Self::EOF_NAME,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    #[must_use]
    pub const fn is_non_terminal(&self) -> bool {
        matches!(self, Self::NonTerminal(_))
    }

    #[must_use]
    pub const fn is_epsilon(&self) -> bool {
        matches!(self, Self::Epsilon)
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Whether this symbol can label a parse-table column (a terminal or EOF).
    #[must_use]
    pub const fn is_lookahead(&self) -> bool {
        matches!(self, Self::Terminal(_) | Self::Eof)
    }

    /// The apostrophe-suffixed helper nonterminal `X'` of this nonterminal.
    ///
    /// Helpers are what left-recursion removal introduces: `E -> E + T | T`
    /// becomes `E -> T E'`, `E' -> + T E' | ε`.
    #[must_use]
    pub fn helper(&self) -> Self {
        Self::NonTerminal(format_compact!("{}'", self.name()))
    }

    /// Whether `self` is the helper nonterminal of `owner` (`self == owner'`).
    #[must_use]
    pub fn is_helper_of(&self, owner: &Self) -> bool {
        match (self, owner) {
            (Self::NonTerminal(name), Self::NonTerminal(owner)) => name
                .strip_suffix('\'')
                .is_some_and(|stem| stem == owner.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render a list of symbols separated by spaces, `ε` for the empty list.
#[must_use]
pub fn display_symbols(symbols: &[Symbol]) -> String {
    if symbols.is_empty() {
        return Symbol::EPSILON_NAME.to_string();
    }
    symbols
        .iter()
        .map(Symbol::name)
        .collect::<Vec<_>>()
        .join(" ")
}

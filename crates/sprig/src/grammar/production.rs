use crate::grammar::Symbol;
use smallvec::SmallVec;
use std::fmt;

/// Right-hand side storage; most productions are short.
pub type Rhs = SmallVec<[Symbol; 4]>;

/// A production `lhs -> rhs`.
///
/// Equality and hashing are structural. An epsilon production has an empty
/// right-hand side: [`Symbol::Epsilon`] placeholders are stripped on
/// construction so that there is exactly one spelling of the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Production {
    lhs: Symbol,
    rhs: Rhs,
}

impl Production {
    #[must_use]
    pub fn new(lhs: Symbol, rhs: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            lhs,
            rhs: rhs.into_iter().filter(|s| !s.is_epsilon()).collect(),
        }
    }

    /// `lhs -> ε`
    #[must_use]
    pub fn epsilon(lhs: Symbol) -> Self {
        Self {
            lhs,
            rhs: SmallVec::new(),
        }
    }

    #[must_use]
    pub const fn lhs(&self) -> &Symbol {
        &self.lhs
    }

    #[must_use]
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Nonterminals referenced by the right-hand side, in order.
    pub fn non_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.rhs.iter().filter(|s| s.is_non_terminal())
    }

    pub(crate) fn map_symbols(self, mut f: impl FnMut(Symbol) -> Symbol) -> Self {
        Self {
            lhs: f(self.lhs),
            rhs: self.rhs.into_iter().map(f).collect(),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.lhs,
            crate::grammar::display_symbols(&self.rhs)
        )
    }
}

/// Index of a production in its grammar's production list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionId(pub(crate) usize);

impl ProductionId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProductionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

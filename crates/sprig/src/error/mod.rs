//! # Error Types
//!
//! Errors for every stage of the pipeline.
//!
//! ## Overview
//!
//! - [`GrammarError`]: grammar construction and the textual grammar format
//! - [`LlError`]: parse table validation (the grammar is not LL(1))
//! - [`ParseError`]: table-driven parsing of a token stream
//! - [`ReduceError`]: a parse tree that does not match the reducer's shapes
//! - [`LexerError`]: tokenization
//! - [`CstError`]: conversion of a reduced tree into the typed CST
//! - [`Error`]: umbrella error used by the one-call pipeline helpers
//!
//! Every failure aborts the current operation; there is no recovery.
//!
//! ## Diagnostics Support
//!
//! When the `diagnostics` feature is enabled, errors integrate with [`miette`]
//! and carry stable error codes.

use crate::backend::ll::TableConflict;
use crate::grammar::Symbol;
use crate::lexer::Token;
use crate::reduce::Shape;
use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors raised while building a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("Grammar has no productions")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::empty)))]
    Empty,

    #[error("Start symbol `{start}` does not derive any terminal string")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(grammar::ungenerating_start),
            help("every derivation from the start symbol loops forever")
        )
    )]
    UngeneratingStart { start: Symbol },

    #[error("`{symbol}` cannot be used as a non-terminal")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::not_non_terminal)))]
    NotNonTerminal { symbol: Symbol },

    #[error("Syntax error on line {line}: {message}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::syntax)))]
    Syntax { line: usize, message: String },
}

/// LL(1) table validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LlError {
    #[error("Grammar is not LL(1): {} conflicting cell(s)", .conflicts.len())]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(grammar::ambiguous),
            help("remove left recursion and factor common prefixes")
        )
    )]
    AmbiguousGrammar { conflicts: Vec<TableConflict> },
}

/// Errors raised by the table-driven parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ParseError {
    #[error("Unexpected end of input, expected {}", format_expected_list(.expected))]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_eof)))]
    UnexpectedEof {
        /// Remaining parse stack, top first
        expected: Vec<Symbol>,
    },

    #[error(
        "Unexpected terminal `{}` at token {position}, expected {}",
        .found.kind,
        format_expected_list(.expected)
    )]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::unexpected_terminal)))]
    UnexpectedTerminal {
        found: Token,
        position: usize,
        /// Lookaheads that would have been accepted
        expected: Vec<Symbol>,
        /// Parse stack at the point of failure, top first
        stack: Vec<Symbol>,
    },

    #[error("Ambiguous parse of `{nonterminal}` on `{lookahead}`: {} alternatives", .alternatives.len())]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::ambiguous)))]
    AmbiguousParse {
        nonterminal: Symbol,
        lookahead: Symbol,
        alternatives: Vec<String>,
    },

    #[error("Refusing to parse with a non-LL(1) table ({conflicts} conflicting cell(s))")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::ambiguous_grammar)))]
    AmbiguousGrammar { conflicts: usize },

    #[error("Trailing input starting with `{}` at token {position} ({remaining} token(s) left)", .found.kind)]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::trailing_input)))]
    TrailingInput {
        found: Token,
        position: usize,
        remaining: usize,
    },

    #[error("Parse stack or tree depth exceeded {limit}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(parser::stack_overflow)))]
    StackOverflow { limit: usize },
}

impl ParseError {
    /// Token position the error refers to, if any
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedTerminal { position, .. } | Self::TrailingInput { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Source byte offset of the offending token, if any
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedTerminal { found, .. } | Self::TrailingInput { found, .. } => {
                Some(found.offset)
            }
            _ => None,
        }
    }
}

/// Errors raised when a parse tree does not have the shape a rewrite expects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum ReduceError {
    #[error("Malformed `{shape}` derivation at `{node}`: missing {missing}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(reduce::malformed_derivation)))]
    MalformedDerivation {
        shape: Shape,
        node: Symbol,
        missing: String,
    },
}

/// Lexer errors
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerError {
    #[error("Unexpected character '{ch}' at offset {offset}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::unexpected_char)))]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Invalid pattern for token `{kind}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_pattern)))]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors converting a reduced tree into the typed CST
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum CstError {
    #[error("Expected {expected}, found `{found}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(cst::unexpected_node)))]
    UnexpectedNode { expected: &'static str, found: Symbol },

    #[error("`{node}` is missing its {expected}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(cst::missing_child)))]
    MissingChild { node: Symbol, expected: &'static str },

    #[error("Invalid number literal `{lexeme}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(cst::invalid_number)))]
    InvalidNumber { lexeme: String },

    #[error("Unknown operator `{operator}`")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(cst::unknown_operator)))]
    UnknownOperator { operator: String },

    #[error("Program nests deeper than {limit} levels")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(cst::too_deep)))]
    TooDeep { limit: usize },
}

/// Any error the pipeline can produce
#[derive(Debug, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum Error {
    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Ll(#[from] LlError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Reduce(#[from] ReduceError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Lexer(#[from] LexerError),

    #[error(transparent)]
    #[cfg_attr(feature = "diagnostics", diagnostic(transparent))]
    Cst(#[from] CstError),
}

/// Format a list of expected symbols for error messages
///
/// Returns a string like "a, b, or c" for multiple items, or "a" for a single item.
#[must_use]
pub fn format_expected_list(expected: &[Symbol]) -> String {
    let names: Vec<String> = expected.iter().map(|s| format!("`{s}`")).collect();
    match names.len() {
        0 => "nothing".to_string(),
        1 => names[0].clone(),
        2 => format!("{} or {}", names[0], names[1]),
        n => format!("{}, or {}", names[..n - 1].join(", "), names[n - 1]),
    }
}

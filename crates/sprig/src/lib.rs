//! # Sprig
//!
//! LL(1) grammar analysis and table-driven parsing for context-free grammars.
//!
//! ## Overview
//!
//! Sprig takes a context-free grammar, analyzes it, and uses the analysis to
//! deterministically parse a token stream:
//!
//! - **Grammar model**: productions, terminals, nonterminals and a start symbol,
//!   cleaned of non-generating and unreachable productions
//! - **Closure solver**: nullable, FIRST and FOLLOW sets by fixed-point iteration
//! - **Parse table**: the LL(1) decision table, with every conflicting cell reported
//! - **Parser**: a stack-based predictive parser with one token of lookahead
//! - **Tree reducer**: rewrites the raw derivation tree into a compact CST
//!
//! ## Quick Start
//!
//! ```rust
//! use sprig::backend::ll::{LlConfig, LlParser};
//! use sprig::grammar::text::parse_grammar;
//! use sprig::lexer::Token;
//!
//! let grammar = parse_grammar(
//!     "S -> a S b
//!      S ->",
//! )?;
//! let parser = LlParser::new(grammar, LlConfig::default())?;
//!
//! let tokens = vec![
//!     Token::new("a", "a"),
//!     Token::new("b", "b"),
//!     Token::eof(),
//! ];
//! let output = parser.parse(&tokens)?;
//! assert!(output.leftover.is_empty());
//! assert_eq!(output.tree.root_node().symbol().name(), "S");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The [`lang`] module wires everything together for the bundled toy language:
//!
//! ```rust
//! use sprig::lang::Pipeline;
//!
//! let pipeline = Pipeline::new()?;
//! let program = pipeline.compile("x := 1; while x < 10 do x := x + 1")?;
//! assert_eq!(program.to_string(), "x := 1; while x < 10 do x := x + 1");
//! # Ok::<(), sprig::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Grammar model, hygiene, closure sets and the grammar text format
//! - [`backend`] - The LL(1) parse table and table-driven parser
//! - [`syntax`] - Arena-allocated rose trees with parent back-references
//! - [`reduce`] - Derivation tree to CST reduction
//! - [`lexer`] - Tokenization
//! - [`lang`] - The toy imperative language and its typed CST
//! - [`error`] - Error types

pub mod backend;
pub mod error;
pub mod grammar;
pub mod lang;
pub mod lexer;
pub mod reduce;
pub mod syntax;

// Re-export commonly used types
pub use backend::ll::{LlConfig, LlParser, ParseOutput, ParseTable};
pub use error::{CstError, Error, GrammarError, LexerError, LlError, ParseError, ReduceError};
pub use grammar::{ClosureTables, Grammar, GrammarBuilder, Production, ProductionId, Symbol};
pub use lexer::{Lexer, LexerBuilder, Token};
pub use reduce::{ReduceConfig, TreeReducer};
pub use syntax::{Node, NodeId, Tree, TreeBuilder};

//! # Grammar Module
//!
//! Context-free grammars and the fixed points computed over them.
//!
//! ## Overview
//!
//! - **Symbols and productions**: [`Symbol`], [`Production`], [`ProductionId`]
//! - **Construction**: [`GrammarBuilder`], [`Grammar::from_productions`] and the
//!   textual format in [`text`]
//! - **Hygiene**: removal of non-generating and unreachable productions, run on
//!   every build
//! - **Closure**: nullable, FIRST and FOLLOW via [`ClosureTables`]
//! - **Analysis**: metrics and left-recursion reports for diagnostics
//!
//! ## Usage
//!
//! ```rust
//! use sprig::grammar::{ClosureTables, GrammarBuilder, Symbol};
//!
//! let grammar = GrammarBuilder::new()
//!     .rule("S", ["a", "S", "b"])
//!     .epsilon("S")
//!     .build()
//!     .expect("Failed to build grammar");
//!
//! let closure = ClosureTables::compute(&grammar);
//! let s = Symbol::non_terminal("S");
//! assert!(closure.is_nullable(&s));
//! assert!(closure.follow(&s).unwrap().contains(&Symbol::Eof));
//! ```

pub mod analysis;
pub mod builder;
pub mod closure;
pub mod hygiene;
pub mod production;
pub mod symbol;
pub mod text;

pub use analysis::*;
pub use builder::*;
pub use closure::*;
pub use production::*;
pub use symbol::*;
pub use text::{parse_grammar, parse_productions};

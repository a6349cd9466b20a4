//! # Parser Backends
//!
//! Table-driven parsing.
//!
//! The only backend is [`ll`]: LL(1) predictive parsing over a
//! [`ParseTable`](ll::ParseTable) built from the grammar's closure tables.
//! Grammars that are not LL(1) are reported with every conflicting cell and
//! are never parsed.

pub mod ll;

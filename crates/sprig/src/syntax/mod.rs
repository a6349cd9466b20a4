//! # Syntax Trees
//!
//! Arena-allocated rose trees shared by the parser and the tree reducer.
//!
//! Every node lives in the [`Tree`]'s arena and is addressed by a [`NodeId`].
//! Parent links are indices, so the ownership graph is the plain top-down
//! tree. Trees are never edited after [`TreeBuilder::finish`]; each reducer
//! pass builds a fresh one.

pub mod builder;
pub mod pretty;
pub mod tree;

pub use builder::*;
pub use tree::*;

//! Sprig Tools - Developer utilities for working with sprig grammars
//!
//! This crate provides tools for inspecting closure sets and parse tables and
//! for rendering grammars and trees as Graphviz graphs.

pub mod cli;
pub mod visualize;

pub use visualize::*;

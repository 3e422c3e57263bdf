//! Storage module for reading model inputs and persisting trees.
//!
//! Input tables are CSV files (motif mutability, motif substitution and
//! per-site amino acid effects) plus plain sequence lists. Trees are written
//! and read as JSON arrays of nested records.

mod tables;
mod trees;

pub use tables::{
    parse_effects, parse_mutability, parse_sequences, parse_substitution, read_effects,
    read_mutability, read_sequences, read_substitution,
};
pub use trees::{read_trees, read_trees_from, write_trees, write_trees_to};

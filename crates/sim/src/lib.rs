//! # Simulation Crate
//!
//! The `sim` crate grows lineage trees under a continuous-time multitype
//! branching process. It includes modules for sequences and their
//! translation, mutation and rate models, the arena-backed lineage tree with
//! sampling and pruning, the growth engine, and loaders and writers for
//! input tables and generated trees.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;
pub mod storage;
pub mod tree;

pub use base::{Nucleotide, Sequence};
pub use tree::{Tree, TreeRecord};

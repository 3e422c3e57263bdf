//! Evolution module providing event rates and mutation.
//!
//! This module implements the models a lineage evolves under:
//! - **Response**: event rates as functions of phenotype, sequence and time
//! - **Mutation**: discrete Markov jumps, or context-dependent substitution
//!   mapped to a phenotype
//! - **Context**: 5-mer mutability and substitution tables
//! - **GP map**: additive genotype-to-phenotype map

pub mod context;
pub mod gpmap;
pub mod mutation;
pub mod response;

pub use context::MotifModel;
pub use gpmap::AdditiveGpMap;
pub use mutation::{DiscreteMutator, Mutator, SequencePhenotypeMutator};
pub use response::Response;

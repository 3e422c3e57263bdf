//! Base types for sequence representation.
//!
//! Nucleotides, mutable nucleotide sequences and their translation into
//! amino acids.

mod codon;
mod nucleotide;
mod sequence;

pub use codon::{translate, translate_chains, translate_codon, AminoAcid};
pub use nucleotide::Nucleotide;
pub use sequence::Sequence;

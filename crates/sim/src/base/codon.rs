//! Amino acids and translation of coding sequences.

use super::{Nucleotide, Sequence};
use std::fmt;

/// Standard genetic code with codons enumerated in `ACGT` index order
/// (`16 * first + 4 * second + third`). `*` marks a stop codon.
const GENETIC_CODE: &[u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

/// The twenty proteinogenic amino acids in one-letter alphabetical order.
const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// An amino acid or a stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AminoAcid {
    /// One of the twenty standard residues, stored as its index into the
    /// alphabetical one-letter alphabet.
    Residue(u8),
    Stop,
}

impl AminoAcid {
    /// Number of distinct residues (excluding stop).
    pub const COUNT: usize = 20;

    /// Parse a one-letter code (case-insensitive); `*` is stop.
    pub fn from_char(c: char) -> Option<Self> {
        if c == '*' {
            return Some(Self::Stop);
        }
        if !c.is_ascii() {
            return None;
        }
        let upper = c.to_ascii_uppercase() as u8;
        AMINO_ACIDS
            .iter()
            .position(|&aa| aa == upper)
            .map(|idx| Self::Residue(idx as u8))
    }

    /// Index into the 20-letter residue alphabet, `None` for stop.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Residue(idx) => Some(idx as usize),
            Self::Stop => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Residue(idx) => AMINO_ACIDS[idx as usize] as char,
            Self::Stop => '*',
        }
    }

    #[inline]
    pub fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Translate a single codon.
pub fn translate_codon(codon: [Nucleotide; 3]) -> AminoAcid {
    let idx = 16 * codon[0].to_index() as usize
        + 4 * codon[1].to_index() as usize
        + codon[2].to_index() as usize;
    // GENETIC_CODE only holds valid one-letter codes or '*'
    AminoAcid::from_char(GENETIC_CODE[idx] as char).unwrap_or(AminoAcid::Stop)
}

/// Translate a stretch of coding sequence in frame 0, ignoring a trailing
/// partial codon.
pub fn translate(bases: &[Nucleotide]) -> Vec<AminoAcid> {
    bases
        .chunks_exact(3)
        .map(|c| translate_codon([c[0], c[1], c[2]]))
        .collect()
}

/// Translate a paired heavy/light chain sequence.
///
/// When `chain_boundary` is set, the two chains are translated separately
/// (each in its own frame) and concatenated, so no codon spans the boundary.
pub fn translate_chains(sequence: &Sequence, chain_boundary: Option<usize>) -> Vec<AminoAcid> {
    let bases = sequence.as_slice();
    match chain_boundary {
        Some(boundary) if boundary < bases.len() => {
            let mut protein = translate(&bases[..boundary]);
            protein.extend(translate(&bases[boundary..]));
            protein
        }
        _ => translate(bases),
    }
}

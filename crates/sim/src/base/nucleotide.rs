use std::fmt::{self, Write};

use crate::errors::InvalidNucleotide;
use serde::{Deserialize, Serialize};

/// A DNA nucleotide base.
///
/// Backed by a single byte with the stable mapping A=0, C=1, G=2, T=3. The
/// index is used to address substitution profiles and codon tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nucleotide {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
}

impl Nucleotide {
    /// All four bases in index order.
    pub const ALL: [Nucleotide; 4] = [Self::A, Self::C, Self::G, Self::T];

    const ASCII: &'static [u8; 4] = b"ACGT";

    /// Base with the given index, `None` past 3.
    #[inline]
    pub const fn from_index(idx: u8) -> Option<Self> {
        if (idx as usize) < Self::ALL.len() {
            Some(Self::ALL[idx as usize])
        } else {
            None
        }
    }

    /// Index used to address substitution profiles and motif codes.
    #[inline(always)]
    pub const fn to_index(self) -> u8 {
        self as u8
    }

    /// Parse an ASCII byte, case-insensitive. Returns `None` for anything
    /// outside `ACGT` (ambiguity codes such as `N` included).
    #[inline]
    pub const fn from_ascii(byte: u8) -> Option<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' => Some(Self::T),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn to_ascii(self) -> u8 {
        Self::ASCII[self as usize]
    }

    #[inline(always)]
    pub const fn to_char(self) -> char {
        self.to_ascii() as char
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_ascii(byte).ok_or(InvalidNucleotide(byte))
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii() {
            Self::try_from(c as u8)
        } else {
            Err(InvalidNucleotide(b'?'))
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

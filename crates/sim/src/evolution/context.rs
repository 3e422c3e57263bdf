//! Context-dependent somatic hypermutation model.
//!
//! Mutation in B cells is strongly biased by the local sequence context: the
//! probability that a base mutates depends on the 5-mer motif centred on it,
//! and so does the base it mutates into. This module holds the per-motif
//! mutability and substitution tables and computes site contexts for paired
//! heavy/light chain sequences.
//!
//! Motifs are strings over `ACGTN`. A site near the end of a chain (or next to
//! the chain boundary) sees `N` in place of the bases it cannot reach, so
//! contexts never straddle the two chains. Tables usually list only concrete
//! motifs; entries for motifs with `N` that are not given explicitly are the
//! mean over every concrete motif they could stand for.

use crate::base::{Nucleotide, Sequence};
use crate::errors::ConfigurationError;
use std::collections::HashMap;

/// Width of a motif; the mutating base sits in the middle.
pub const MOTIF_LEN: usize = 5;

/// Offset of the mutating base inside a motif.
const CENTER: usize = MOTIF_LEN / 2;

/// Alphabet size including the `N` placeholder.
const SYMBOLS: usize = 5;

/// Index of `N` in the motif alphabet.
const N_SYMBOL: usize = 4;

/// Number of distinct motifs over `ACGTN`.
pub const MOTIF_COUNT: usize = SYMBOLS.pow(MOTIF_LEN as u32);

/// Encode a motif string as a base-5 integer, or `None` if it is not five
/// characters over `ACGTN` (case-insensitive).
pub fn encode_motif(motif: &str) -> Option<usize> {
    if motif.len() != MOTIF_LEN {
        return None;
    }
    motif.bytes().try_fold(0usize, |code, b| {
        let digit = match b.to_ascii_uppercase() {
            b'N' => N_SYMBOL,
            other => Nucleotide::from_ascii(other)?.to_index() as usize,
        };
        Some(code * SYMBOLS + digit)
    })
}

/// Decode a motif code back into its string form.
pub fn decode_motif(code: usize) -> String {
    digits(code)
        .iter()
        .map(|&d| match Nucleotide::from_index(d as u8) {
            Some(nuc) => nuc.to_char(),
            None => 'N',
        })
        .collect()
}

fn digits(mut code: usize) -> [usize; MOTIF_LEN] {
    let mut out = [0; MOTIF_LEN];
    for slot in out.iter_mut().rev() {
        *slot = code % SYMBOLS;
        code /= SYMBOLS;
    }
    out
}

/// Codes of every concrete motif an `N`-containing motif can stand for. A
/// concrete motif expands to itself.
fn expansions(code: usize) -> Vec<usize> {
    let mut codes = vec![0usize];
    for digit in digits(code) {
        let choices = if digit == N_SYMBOL { 0..4 } else { digit..digit + 1 };
        codes = codes
            .iter()
            .flat_map(|&prefix| choices.clone().map(move |d| prefix * SYMBOLS + d))
            .collect();
    }
    codes
}

fn is_concrete(code: usize) -> bool {
    !digits(code).contains(&N_SYMBOL)
}

/// Mutability and substitution profile per 5-mer motif.
///
/// Shared read-only between the sequence-context rate response and the
/// sequence mutator, so that the rate at which a lineage mutates and the site
/// it mutates at come from the same table.
#[derive(Debug, Clone, PartialEq)]
pub struct MotifModel {
    /// Relative mutability, indexed by motif code.
    mutability: Vec<f64>,
    /// Target-base weights in `ACGT` order, indexed by motif code. The weight
    /// of the centre base itself is always zero.
    substitution: Vec<[f64; 4]>,
    /// Index at which the light chain starts, if the sequence is paired.
    chain_boundary: Option<usize>,
}

impl MotifModel {
    /// Build a model from motif-keyed tables.
    ///
    /// Keys are 5-mers over `ACGTN`. Concrete motifs missing from a table get
    /// zero mutability and an empty substitution profile.
    ///
    /// # Errors
    /// - a key that is not a valid motif
    /// - a negative or non-finite value
    /// - a mutable motif whose substitution profile has no mass away from the
    ///   centre base
    pub fn new(
        mutability: &HashMap<String, f64>,
        substitution: &HashMap<String, [f64; 4]>,
        chain_boundary: Option<usize>,
    ) -> Result<Self, ConfigurationError> {
        let mut mut_table: Vec<Option<f64>> = vec![None; MOTIF_COUNT];
        for (motif, &value) in mutability {
            let code = encode_motif(motif).ok_or_else(|| {
                ConfigurationError::InvalidMotifModel(format!("invalid motif '{motif}'"))
            })?;
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidMotifModel(format!(
                    "mutability of '{motif}' is {value}"
                )));
            }
            mut_table[code] = Some(value);
        }

        let mut sub_table: Vec<Option<[f64; 4]>> = vec![None; MOTIF_COUNT];
        for (motif, &weights) in substitution {
            let code = encode_motif(motif).ok_or_else(|| {
                ConfigurationError::InvalidMotifModel(format!("invalid motif '{motif}'"))
            })?;
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(ConfigurationError::InvalidMotifModel(format!(
                    "substitution weights of '{motif}' are {weights:?}"
                )));
            }
            sub_table[code] = Some(without_center(code, weights));
        }

        let mut model = Self {
            mutability: vec![0.0; MOTIF_COUNT],
            substitution: vec![[0.0; 4]; MOTIF_COUNT],
            chain_boundary,
        };

        for code in (0..MOTIF_COUNT).filter(|&c| is_concrete(c)) {
            model.mutability[code] = mut_table[code].unwrap_or(0.0);
            model.substitution[code] = sub_table[code].unwrap_or([0.0; 4]);
        }

        for code in (0..MOTIF_COUNT).filter(|&c| !is_concrete(c)) {
            let concrete = expansions(code);
            let n = concrete.len() as f64;
            let mutability = mut_table[code]
                .unwrap_or_else(|| concrete.iter().map(|&c| model.mutability[c]).sum::<f64>() / n);
            let substitution = sub_table[code].unwrap_or_else(|| {
                let mut mean = [0.0; 4];
                for &c in &concrete {
                    for (acc, w) in mean.iter_mut().zip(model.substitution[c]) {
                        *acc += w / n;
                    }
                }
                without_center(code, mean)
            });
            model.mutability[code] = mutability;
            model.substitution[code] = substitution;
        }

        for code in 0..MOTIF_COUNT {
            if model.mutability[code] > 0.0 && model.substitution[code].iter().sum::<f64>() <= 0.0 {
                return Err(ConfigurationError::InvalidMotifModel(format!(
                    "motif '{}' is mutable but has no substitution target",
                    decode_motif(code)
                )));
            }
        }

        Ok(model)
    }

    /// A model in which every motif has the same mutability and every
    /// substitution is equally likely.
    pub fn uniform(mutability: f64, chain_boundary: Option<usize>) -> Result<Self, ConfigurationError> {
        if !mutability.is_finite() || mutability < 0.0 {
            return Err(ConfigurationError::InvalidMotifModel(format!(
                "mutability is {mutability}"
            )));
        }
        let substitution = (0..MOTIF_COUNT)
            .map(|code| without_center(code, [1.0; 4]))
            .map(|w| {
                let total: f64 = w.iter().sum();
                w.map(|x| x / total)
            })
            .collect();
        Ok(Self {
            mutability: vec![mutability; MOTIF_COUNT],
            substitution,
            chain_boundary,
        })
    }

    #[inline]
    pub fn chain_boundary(&self) -> Option<usize> {
        self.chain_boundary
    }

    /// Mutability of a motif given as text.
    pub fn mutability_of(&self, motif: &str) -> Option<f64> {
        encode_motif(motif).map(|code| self.mutability[code])
    }

    /// Substitution weights of a motif given as text, in `ACGT` order.
    pub fn substitution_of(&self, motif: &str) -> Option<[f64; 4]> {
        encode_motif(motif).map(|code| self.substitution[code])
    }

    /// Check that the chain boundary lies inside `sequence`.
    pub fn check_sequence(&self, sequence: &Sequence) -> Result<(), ConfigurationError> {
        match self.chain_boundary {
            Some(boundary) if boundary > sequence.len() => Err(ConfigurationError::InvalidMotifModel(
                format!(
                    "chain boundary {boundary} lies beyond the sequence length {}",
                    sequence.len()
                ),
            )),
            _ => Ok(()),
        }
    }

    /// The span `[start, end)` of the chain that contains `site`.
    #[inline]
    fn chain_of(&self, site: usize, len: usize) -> (usize, usize) {
        match self.chain_boundary {
            Some(b) if b <= len && site < b => (0, b),
            Some(b) if b <= len => (b, len),
            _ => (0, len),
        }
    }

    /// Motif code of the context around every site.
    pub fn contexts(&self, sequence: &Sequence) -> Vec<usize> {
        let bases = sequence.as_slice();
        let len = bases.len();
        (0..len)
            .map(|site| {
                let (start, end) = self.chain_of(site, len);
                (0..MOTIF_LEN).fold(0usize, |code, k| {
                    let digit = (site + k)
                        .checked_sub(CENTER)
                        .filter(|&j| j >= start && j < end)
                        .map_or(N_SYMBOL, |j| bases[j].to_index() as usize);
                    code * SYMBOLS + digit
                })
            })
            .collect()
    }

    /// Mutability of every site in its context.
    pub fn site_mutabilities(&self, sequence: &Sequence) -> Vec<f64> {
        self.contexts(sequence)
            .into_iter()
            .map(|code| self.mutability[code])
            .collect()
    }

    /// Sum of the site mutabilities of `sequence`.
    pub fn total_mutability(&self, sequence: &Sequence) -> f64 {
        self.contexts(sequence)
            .into_iter()
            .map(|code| self.mutability[code])
            .sum()
    }

    /// Target-base weights for a context code, `ACGT` order.
    #[inline]
    pub fn substitution_weights(&self, code: usize) -> [f64; 4] {
        self.substitution[code]
    }
}

/// Zero the weight of the centre base (for `N` centres nothing is zeroed).
fn without_center(code: usize, mut weights: [f64; 4]) -> [f64; 4] {
    let center = digits(code)[CENTER];
    if center < 4 {
        weights[center] = 0.0;
    }
    weights
}

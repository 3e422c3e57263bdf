//! Additive genotype-to-phenotype map.

use crate::base::{translate_chains, AminoAcid, Sequence};
use crate::errors::ConfigurationError;

/// Phenotype as a sum of independent per-site amino acid effects.
///
/// A sequence is translated (each chain in its own frame) and compared with
/// the translated reference. Every site where the residue differs adds the
/// measured effect of that residue at that site; the reference itself maps to
/// zero. Any stop codon makes the protein nonfunctional and yields
/// `nonsense_phenotype` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveGpMap {
    reference: Vec<AminoAcid>,
    /// Length of the reference in nucleotides.
    sequence_len: usize,
    /// `deltas[site][residue]`, residues in alphabetical one-letter order.
    deltas: Vec<[f64; AminoAcid::COUNT]>,
    chain_boundary: Option<usize>,
    nonsense_phenotype: f64,
}

impl AdditiveGpMap {
    /// Create a map from a dense delta table, one row per reference residue.
    pub fn new(
        reference: &Sequence,
        chain_boundary: Option<usize>,
        deltas: Vec<[f64; AminoAcid::COUNT]>,
        nonsense_phenotype: f64,
    ) -> Result<Self, ConfigurationError> {
        let protein = translate_chains(reference, chain_boundary);
        if protein.iter().any(|aa| aa.is_stop()) {
            return Err(ConfigurationError::InvalidGpMap(
                "reference sequence contains a stop codon".into(),
            ));
        }
        if deltas.len() != protein.len() {
            return Err(ConfigurationError::InvalidGpMap(format!(
                "delta table has {} sites but the reference protein has {}",
                deltas.len(),
                protein.len()
            )));
        }
        if let Some(site) = deltas.iter().position(|row| row.iter().any(|d| !d.is_finite())) {
            return Err(ConfigurationError::InvalidGpMap(format!(
                "non-finite effect at site {}",
                site + 1
            )));
        }
        Ok(Self {
            reference: protein,
            sequence_len: reference.len(),
            deltas,
            chain_boundary,
            nonsense_phenotype,
        })
    }

    /// Create a map from sparse `(site, residue, effect)` entries with 0-based
    /// sites. Unlisted residues are neutral. Sites beyond the reference
    /// protein are an error.
    pub fn from_effects(
        reference: &Sequence,
        chain_boundary: Option<usize>,
        effects: &[(usize, AminoAcid, f64)],
        nonsense_phenotype: Option<f64>,
    ) -> Result<Self, ConfigurationError> {
        let sites = translate_chains(reference, chain_boundary).len();
        let mut deltas = vec![[0.0; AminoAcid::COUNT]; sites];
        for &(site, residue, effect) in effects {
            let row = deltas.get_mut(site).ok_or_else(|| {
                ConfigurationError::InvalidGpMap(format!(
                    "site {} is outside the reference protein of length {sites}",
                    site + 1
                ))
            })?;
            // effects on stop are covered by the nonsense phenotype
            if let Some(idx) = residue.index() {
                row[idx] = effect;
            }
        }

        // the most damaging measured effect stands in for nonsense by default
        let nonsense = nonsense_phenotype.unwrap_or_else(|| {
            effects
                .iter()
                .map(|&(_, _, effect)| effect)
                .fold(0.0, f64::min)
        });
        Self::new(reference, chain_boundary, deltas, nonsense)
    }

    /// A map under which every sequence without a stop codon has phenotype 0.
    pub fn neutral(reference: &Sequence, chain_boundary: Option<usize>) -> Result<Self, ConfigurationError> {
        Self::from_effects(reference, chain_boundary, &[], Some(0.0))
    }

    #[inline]
    pub fn nonsense_phenotype(&self) -> f64 {
        self.nonsense_phenotype
    }

    #[inline]
    pub fn chain_boundary(&self) -> Option<usize> {
        self.chain_boundary
    }

    /// Length of the reference protein.
    #[inline]
    pub fn sites(&self) -> usize {
        self.reference.len()
    }

    #[inline]
    pub fn sequence_len(&self) -> usize {
        self.sequence_len
    }

    /// Check that `sequence` can be compared with the reference.
    pub fn check_sequence(&self, sequence: &Sequence) -> Result<(), ConfigurationError> {
        if sequence.len() != self.sequence_len {
            return Err(ConfigurationError::SequenceLength {
                expected: self.sequence_len,
                found: sequence.len(),
            });
        }
        Ok(())
    }

    /// Phenotype of `sequence`.
    ///
    /// # Errors
    /// [`ConfigurationError::SequenceLength`] if `sequence` is not as long as
    /// the reference.
    pub fn phenotype(&self, sequence: &Sequence) -> Result<f64, ConfigurationError> {
        self.check_sequence(sequence)?;
        Ok(self.phenotype_unchecked(sequence))
    }

    /// Phenotype of a sequence already known to have the reference length.
    pub(crate) fn phenotype_unchecked(&self, sequence: &Sequence) -> f64 {
        let protein = translate_chains(sequence, self.chain_boundary);
        let mut total = 0.0;
        for (site, (&aa, &reference)) in protein.iter().zip(&self.reference).enumerate() {
            match aa.index() {
                None => return self.nonsense_phenotype,
                Some(idx) if aa != reference => total += self.deltas[site][idx],
                Some(_) => {}
            }
        }
        total
    }
}

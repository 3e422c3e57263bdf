use super::Nucleotide;
use crate::errors::InvalidSequence;
use std::fmt;
use std::str::FromStr;

/// Nucleotide sequence carried by a lineage in sequence-level mutation mode.
///
/// Sequences are small (a few hundred bases for a paired heavy/light chain)
/// and are copied on every birth, so the representation is a plain vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence(Vec<Nucleotide>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_nucleotides(nucleotides: Vec<Nucleotide>) -> Self {
        Self(nucleotides)
    }

    /// Parse a sequence, rejecting the empty string.
    pub fn parse_non_empty(s: &str) -> Result<Self, InvalidSequence> {
        let seq = Self::from_str(s.trim())?;
        if seq.is_empty() {
            return Err(InvalidSequence::EmptySequence);
        }
        Ok(seq)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Nucleotide> {
        self.0.get(index).copied()
    }

    /// Replace the base at `index`, returning the previous base, or `None`
    /// if `index` is out of range.
    #[inline]
    pub fn substitute(&mut self, index: usize, base: Nucleotide) -> Option<Nucleotide> {
        self.0
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, base))
    }

    #[inline]
    pub fn as_slice(&self) -> &[Nucleotide] {
        &self.0
    }

    /// Positions at which two sequences differ. Extra trailing bases of the
    /// longer sequence count as differences.
    pub fn hamming_sites(&self, other: &Sequence) -> Vec<usize> {
        let shared = self.len().min(other.len());
        let mut sites: Vec<usize> = (0..shared)
            .filter(|&i| self.0[i] != other.0[i])
            .collect();
        sites.extend(shared..self.len().max(other.len()));
        sites
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &nuc in &self.0 {
            write!(f, "{}", nuc.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Sequence {
    type Err = InvalidSequence;

    /// Case-insensitive parse of an `ACGT` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data: Result<Vec<Nucleotide>, _> = s
            .chars()
            .map(|c| Nucleotide::try_from(c).map_err(|_| InvalidSequence::InvalidChar(c)))
            .collect();

        Ok(Self(data?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_mixed_case() {
        let seq = Sequence::from_str("AcGt").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.to_string(), "ACGT");
    }

    #[test]
    fn test_from_str_invalid() {
        match Sequence::from_str("ACGN").unwrap_err() {
            InvalidSequence::InvalidChar(c) => assert_eq!(c, 'N'),
            other => panic!("Expected InvalidChar error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_non_empty() {
        assert_eq!(
            Sequence::parse_non_empty("  \n"),
            Err(InvalidSequence::EmptySequence)
        );
        assert_eq!(Sequence::parse_non_empty(" ACG\n").unwrap().to_string(), "ACG");
    }

    #[test]
    fn test_substitute() {
        let mut seq = Sequence::from_str("ACGT").unwrap();
        assert_eq!(seq.substitute(1, Nucleotide::T), Some(Nucleotide::C));
        assert_eq!(seq.to_string(), "ATGT");
        assert_eq!(seq.substitute(10, Nucleotide::A), None);
    }

    #[test]
    fn test_hamming_sites() {
        let a = Sequence::from_str("ACGTAC").unwrap();
        let b = Sequence::from_str("ACCTA").unwrap();
        assert_eq!(a.hamming_sites(&b), vec![2, 5]);
        assert!(a.hamming_sites(&a).is_empty());
    }
}

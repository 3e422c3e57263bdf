//! Mutation of lineage state.
//!
//! A mutation event replaces a lineage's state with a new one. Two models are
//! provided:
//!
//! ## Discrete Markov mutation
//! The phenotype lives on a small ordered set of values (a "type space"), and a
//! mutation jumps from the current value to another one according to a
//! transition matrix. The diagonal of the matrix is ignored (a mutation always
//! changes the type) and each row is renormalized to a probability
//! distribution.
//!
//! ## Sequence-level mutation
//! The lineage carries a nucleotide sequence. A mutation picks one site with
//! probability proportional to the mutability of its 5-mer context, picks a
//! new base from that context's substitution profile, and then recomputes the
//! phenotype through a genotype-phenotype map. This is how somatic
//! hypermutation in germinal-center B cells is usually modeled: hot-spot
//! motifs mutate far more often than cold spots, and the base a site mutates
//! to is itself context-dependent.

use super::context::MotifModel;
use super::gpmap::AdditiveGpMap;
use crate::base::Nucleotide;
use crate::errors::ConfigurationError;
pub use crate::errors::MutationError;
use crate::tree::LineageState;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use std::sync::Arc;

/// Markov mutation over a discrete state space.
///
/// States are matched by exact equality of the phenotype, so the root and
/// every mutated lineage must carry a value taken verbatim from the state
/// space.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMutator {
    state_space: Vec<f64>,
    /// Row-stochastic transition matrix with zero diagonal.
    transition_matrix: Vec<Vec<f64>>,
    /// One sampler per row, built once.
    rows: Vec<WeightedIndex<f64>>,
}

impl DiscreteMutator {
    /// Create a mutator from a state space and a matrix of relative transition
    /// weights (`matrix[i][j]` is the weight of moving from state `i` to
    /// state `j`).
    ///
    /// # Errors
    /// - the state space is empty, holds a non-finite value or a duplicate
    /// - the matrix is not square with one row per state
    /// - an entry is negative or not finite
    /// - a row has no weight off the diagonal, so a lineage in that state
    ///   could never mutate away
    pub fn new(state_space: Vec<f64>, matrix: Vec<Vec<f64>>) -> Result<Self, ConfigurationError> {
        let n = state_space.len();
        if n == 0 {
            return Err(ConfigurationError::InvalidStateSpace("state space is empty".into()));
        }
        if let Some(x) = state_space.iter().find(|x| !x.is_finite()) {
            return Err(ConfigurationError::InvalidStateSpace(format!(
                "state {x} is not finite"
            )));
        }
        for (i, x) in state_space.iter().enumerate() {
            if state_space[..i].contains(x) {
                return Err(ConfigurationError::InvalidStateSpace(format!(
                    "state {x} is listed twice"
                )));
            }
        }

        if matrix.len() != n {
            return Err(ConfigurationError::MatrixShape {
                expected: n,
                found: matrix.len(),
            });
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != n) {
            return Err(ConfigurationError::MatrixShape {
                expected: n,
                found: row.len(),
            });
        }

        let mut transition_matrix = matrix;
        let mut rows = Vec::with_capacity(n);
        for (i, row) in transition_matrix.iter_mut().enumerate() {
            if let Some((j, &value)) = row
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(ConfigurationError::InvalidTransition { row: i, col: j, value });
            }

            // a mutation always changes the state
            row[i] = 0.0;
            let total: f64 = row.iter().sum();
            if total <= 0.0 {
                return Err(ConfigurationError::EmptyTransitionRow(i));
            }
            row.iter_mut().for_each(|v| *v /= total);

            rows.push(
                WeightedIndex::<f64>::new(row.iter().copied())
                    .map_err(|_| ConfigurationError::EmptyTransitionRow(i))?,
            );
        }

        Ok(Self {
            state_space,
            transition_matrix,
            rows,
        })
    }

    pub fn state_space(&self) -> &[f64] {
        &self.state_space
    }

    /// The normalized transition matrix.
    pub fn transition_matrix(&self) -> &[Vec<f64>] {
        &self.transition_matrix
    }

    /// Position of `phenotype` in the state space.
    pub fn state_index(&self, phenotype: f64) -> Option<usize> {
        self.state_space.iter().position(|&x| x == phenotype)
    }

    /// Draw the state a lineage moves to.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        state: &LineageState,
        rng: &mut R,
    ) -> Result<LineageState, MutationError> {
        let from = self
            .state_index(state.phenotype)
            .ok_or(MutationError::UnknownState(state.phenotype))?;
        let to = self.rows[from].sample(rng);
        Ok(LineageState {
            phenotype: self.state_space[to],
            sequence: state.sequence.clone(),
        })
    }
}

/// Context-dependent single-base substitution followed by a GP map.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencePhenotypeMutator {
    model: Arc<MotifModel>,
    gp_map: Arc<AdditiveGpMap>,
}

impl SequencePhenotypeMutator {
    pub fn new(model: Arc<MotifModel>, gp_map: Arc<AdditiveGpMap>) -> Self {
        Self { model, gp_map }
    }

    pub fn model(&self) -> &Arc<MotifModel> {
        &self.model
    }

    pub fn gp_map(&self) -> &Arc<AdditiveGpMap> {
        &self.gp_map
    }

    /// Substitute one base and recompute the phenotype.
    ///
    /// The site is drawn with probability proportional to its context
    /// mutability; the new base is drawn from the context's substitution
    /// profile, which never proposes the current base.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        state: &LineageState,
        rng: &mut R,
    ) -> Result<LineageState, MutationError> {
        let sequence = state.sequence.as_ref().ok_or(MutationError::MissingSequence)?;
        if sequence.len() != self.gp_map.sequence_len() {
            return Err(MutationError::SequenceLength {
                expected: self.gp_map.sequence_len(),
                found: sequence.len(),
            });
        }
        let contexts = self.model.contexts(sequence);

        let sites = WeightedIndex::<f64>::new(self.model.site_mutabilities(sequence))
            .map_err(|_| MutationError::NoMutableSite)?;
        let site = sites.sample(rng);

        let targets = WeightedIndex::<f64>::new(self.model.substitution_weights(contexts[site]))
            .map_err(|_| MutationError::NoSubstitution(site))?;
        let base = Nucleotide::ALL[targets.sample(rng)];

        let mut mutated = sequence.clone();
        mutated.substitute(site, base);
        let phenotype = self.gp_map.phenotype_unchecked(&mutated);
        Ok(LineageState::with_sequence(phenotype, mutated))
    }

    /// Check that a root carries a sequence of the reference length whose
    /// mapped phenotype is the root phenotype.
    pub fn check_root(&self, root: &LineageState) -> Result<(), ConfigurationError> {
        let sequence = root
            .sequence
            .as_ref()
            .ok_or(ConfigurationError::MissingSequence("sequence mutator"))?;
        self.model.check_sequence(sequence)?;
        let expected = self.gp_map.phenotype(sequence)?;
        if root.phenotype != expected {
            return Err(ConfigurationError::PhenotypeMismatch {
                phenotype: root.phenotype,
                expected,
            });
        }
        Ok(())
    }
}

/// The mutation model driving a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutator {
    Discrete(DiscreteMutator),
    Sequence(SequencePhenotypeMutator),
}

impl Mutator {
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        state: &LineageState,
        rng: &mut R,
    ) -> Result<LineageState, MutationError> {
        match self {
            Self::Discrete(m) => m.mutate(state, rng),
            Self::Sequence(m) => m.mutate(state, rng),
        }
    }

    #[inline]
    pub fn requires_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Check that a root state fits this mutator before anything is grown.
    pub fn check_root(&self, root: &LineageState) -> Result<(), ConfigurationError> {
        match self {
            Self::Discrete(m) => match m.state_index(root.phenotype) {
                Some(_) => Ok(()),
                None => Err(ConfigurationError::UnknownRootState(root.phenotype)),
            },
            Self::Sequence(m) => m.check_root(root),
        }
    }
}

impl From<DiscreteMutator> for Mutator {
    fn from(m: DiscreteMutator) -> Self {
        Self::Discrete(m)
    }
}

impl From<SequencePhenotypeMutator> for Mutator {
    fn from(m: SequencePhenotypeMutator) -> Self {
        Self::Sequence(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Sequence;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn three_states() -> DiscreteMutator {
        DiscreteMutator::new(
            vec![-1.0, 0.0, 1.0],
            vec![
                vec![5.0, 1.0, 3.0],
                vec![1.0, 0.0, 1.0],
                vec![2.0, 2.0, 9.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_discrete_rows_normalized_with_zero_diagonal() {
        let m = three_states();
        for (i, row) in m.transition_matrix().iter().enumerate() {
            assert_eq!(row[i], 0.0);
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert_eq!(m.transition_matrix()[0], vec![0.0, 0.25, 0.75]);
    }

    #[test]
    fn test_discrete_invalid_inputs() {
        assert!(matches!(
            DiscreteMutator::new(vec![], vec![]),
            Err(ConfigurationError::InvalidStateSpace(_))
        ));
        assert!(matches!(
            DiscreteMutator::new(vec![0.0, 0.0], vec![vec![0.0, 1.0], vec![1.0, 0.0]]),
            Err(ConfigurationError::InvalidStateSpace(_))
        ));
        assert_eq!(
            DiscreteMutator::new(vec![0.0, 1.0], vec![vec![0.0, 1.0]]),
            Err(ConfigurationError::MatrixShape { expected: 2, found: 1 })
        );
        assert_eq!(
            DiscreteMutator::new(vec![0.0, 1.0], vec![vec![0.0, 1.0], vec![1.0]]),
            Err(ConfigurationError::MatrixShape { expected: 2, found: 1 })
        );
        assert_eq!(
            DiscreteMutator::new(vec![0.0, 1.0], vec![vec![0.0, -1.0], vec![1.0, 0.0]]),
            Err(ConfigurationError::InvalidTransition { row: 0, col: 1, value: -1.0 })
        );
        // only self-transition weight
        assert_eq!(
            DiscreteMutator::new(vec![0.0, 1.0], vec![vec![0.0, 1.0], vec![0.0, 3.0]]),
            Err(ConfigurationError::EmptyTransitionRow(1))
        );
    }

    #[test]
    fn test_discrete_mutate_always_changes_state() {
        let m = three_states();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut state = LineageState::discrete(0.0);
        for _ in 0..200 {
            let next = m.mutate(&state, &mut rng).unwrap();
            assert_ne!(next.phenotype, state.phenotype);
            assert!(m.state_index(next.phenotype).is_some());
            state = next;
        }
    }

    #[test]
    fn test_discrete_mutate_distribution() {
        let m = three_states();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let start = LineageState::discrete(-1.0);
        let n = 10_000;
        let to_one = (0..n)
            .filter(|_| m.mutate(&start, &mut rng).unwrap().phenotype == 1.0)
            .count();
        // expect 75%
        let frac = to_one as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.02, "fraction {frac}");
    }

    #[test]
    fn test_discrete_unknown_state() {
        let m = three_states();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(
            m.mutate(&LineageState::discrete(0.5), &mut rng),
            Err(MutationError::UnknownState(0.5))
        );
    }

    fn sequence_mutator(mutability: f64) -> SequencePhenotypeMutator {
        let reference = Sequence::from_str("ATGGCAGGT").unwrap();
        let model = Arc::new(MotifModel::uniform(mutability, None).unwrap());
        let gp_map = Arc::new(AdditiveGpMap::neutral(&reference, None).unwrap());
        SequencePhenotypeMutator::new(model, gp_map)
    }

    #[test]
    fn test_sequence_mutation_changes_one_base() {
        let m = sequence_mutator(1.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let seq = Sequence::from_str("ATGGCAGGT").unwrap();
        let state = LineageState::with_sequence(0.0, seq.clone());
        for _ in 0..50 {
            let next = m.mutate(&state, &mut rng).unwrap();
            let mutated = next.sequence.as_ref().unwrap();
            assert_eq!(mutated.hamming_sites(&seq).len(), 1);
            assert_eq!(Ok(next.phenotype), m.gp_map().phenotype(mutated));
        }
    }

    #[test]
    fn test_sequence_mutation_follows_mutability() {
        // only the motif centred on the first base (NNATG) is mutable
        let mut mutability = HashMap::new();
        mutability.insert("NNATG".to_string(), 1.0);
        let mut substitution = HashMap::new();
        substitution.insert("NNATG".to_string(), [0.0, 0.0, 1.0, 0.0]);
        let model = Arc::new(MotifModel::new(&mutability, &substitution, None).unwrap());
        let reference = Sequence::from_str("ATGGCAGGT").unwrap();
        let gp_map = Arc::new(AdditiveGpMap::neutral(&reference, None).unwrap());
        let m = SequencePhenotypeMutator::new(model, gp_map);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let next = m
            .mutate(&LineageState::with_sequence(0.0, reference), &mut rng)
            .unwrap();
        assert_eq!(next.sequence.unwrap().to_string(), "GTGGCAGGT");
    }

    #[test]
    fn test_sequence_mutation_errors() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(
            sequence_mutator(1.0).mutate(&LineageState::discrete(0.0), &mut rng),
            Err(MutationError::MissingSequence)
        );
        let frozen = sequence_mutator(0.0);
        let state = LineageState::with_sequence(0.0, Sequence::from_str("ATGGCAGGT").unwrap());
        assert_eq!(frozen.mutate(&state, &mut rng), Err(MutationError::NoMutableSite));
    }

    #[test]
    fn test_mutator_root_check() {
        let m = Mutator::from(sequence_mutator(1.0));
        assert!(m.requires_sequence());
        assert_eq!(
            m.check_root(&LineageState::discrete(0.0)),
            Err(ConfigurationError::MissingSequence("sequence mutator"))
        );
        assert!(Mutator::from(three_states())
            .check_root(&LineageState::discrete(0.0))
            .is_ok());
    }

    #[test]
    fn test_discrete_root_outside_state_space() {
        let m = Mutator::from(three_states());
        assert_eq!(
            m.check_root(&LineageState::discrete(0.5)),
            Err(ConfigurationError::UnknownRootState(0.5))
        );
    }

    #[test]
    fn test_sequence_root_must_match_gp_map() {
        let m = Mutator::from(sequence_mutator(1.0));
        let reference = Sequence::from_str("ATGGCAGGT").unwrap();
        assert!(m
            .check_root(&LineageState::with_sequence(0.0, reference.clone()))
            .is_ok());

        let short = Sequence::from_str("ATGGCA").unwrap();
        assert_eq!(
            m.check_root(&LineageState::with_sequence(0.0, short.clone())),
            Err(ConfigurationError::SequenceLength { expected: 9, found: 6 })
        );
        assert_eq!(
            m.check_root(&LineageState::with_sequence(42.0, reference)),
            Err(ConfigurationError::PhenotypeMismatch {
                phenotype: 42.0,
                expected: 0.0
            })
        );

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        assert_eq!(
            m.mutate(&LineageState::with_sequence(0.0, short), &mut rng),
            Err(MutationError::SequenceLength { expected: 9, found: 6 })
        );
    }
}

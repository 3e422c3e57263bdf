//! Builder pattern for creating branching processes.
//!
//! Provides a fluent API for configuring a [`BranchingProcess`] with sensible
//! defaults and validation.

pub use crate::errors::BuilderError;
use crate::errors::ConfigurationError;
use crate::evolution::{DiscreteMutator, Mutator, Response};
use crate::simulation::{BranchingProcess, CapacityMethod, EvolveConfig};

/// Builder for constructing [`BranchingProcess`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use germinal_sim::simulation::{BranchingProcessBuilder, CapacityMethod};
/// use germinal_sim::evolution::Response;
///
/// let process = BranchingProcessBuilder::new()
///     .birth(Response::sigmoid(1.5, -0.1, 2.5, 0.6))
///     .death(Response::constant(1.0))
///     .mutation(Response::constant(1.0))
///     .discrete_mutator(vec![0.0, 1.0], vec![vec![0.0, 1.0], vec![1.0, 0.0]])
///     .horizon(15.0)
///     .capacity(1000, CapacityMethod::Birth)
///     .build()
///     .unwrap();
/// assert_eq!(process.config().capacity, Some(1000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchingProcessBuilder {
    // Required parameters
    birth: Option<Response>,
    mutator: Option<Result<Mutator, ConfigurationError>>,
    horizon: Option<f64>,

    // Optional parameters
    death: Option<Response>,    // Default: no deaths
    mutation: Option<Response>, // Default: no mutation
    capacity: Option<(usize, CapacityMethod)>,
    min_survivors: Option<usize>,
}

impl BranchingProcessBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the birth rate response (required).
    pub fn birth(mut self, response: Response) -> Self {
        self.birth = Some(response);
        self
    }

    pub fn death(mut self, response: Response) -> Self {
        self.death = Some(response);
        self
    }

    pub fn mutation(mut self, response: Response) -> Self {
        self.mutation = Some(response);
        self
    }

    /// Set all three rates to constants.
    pub fn constant_rates(self, birth: f64, death: f64, mutation: f64) -> Self {
        self.birth(Response::constant(birth))
            .death(Response::constant(death))
            .mutation(Response::constant(mutation))
    }

    /// Set the mutation model (required).
    pub fn mutator(mut self, mutator: impl Into<Mutator>) -> Self {
        self.mutator = Some(Ok(mutator.into()));
        self
    }

    /// Use a discrete Markov mutator. Invalid inputs are reported by
    /// [`build`](Self::build).
    pub fn discrete_mutator(mut self, state_space: Vec<f64>, transition_matrix: Vec<Vec<f64>>) -> Self {
        self.mutator = Some(DiscreteMutator::new(state_space, transition_matrix).map(Mutator::from));
        self
    }

    /// Set the time horizon (required).
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    pub fn capacity(mut self, capacity: usize, method: CapacityMethod) -> Self {
        self.capacity = Some((capacity, method));
        self
    }

    pub fn min_survivors(mut self, min_survivors: usize) -> Self {
        self.min_survivors = Some(min_survivors);
        self
    }

    /// Build the process.
    ///
    /// # Errors
    /// Returns an error if a required parameter is missing or any parameter
    /// is invalid.
    pub fn build(self) -> Result<BranchingProcess, BuilderError> {
        // Validate required parameters
        let birth = self.birth.ok_or(BuilderError::MissingRequired("birth"))?;
        let mutator = self.mutator.ok_or(BuilderError::MissingRequired("mutator"))??;
        let horizon = self.horizon.ok_or(BuilderError::MissingRequired("horizon"))?;

        let mut config = EvolveConfig::new(horizon);
        if let Some((capacity, method)) = self.capacity {
            config = config.with_capacity(capacity, method);
        }
        if let Some(min_survivors) = self.min_survivors {
            config = config.with_min_survivors(min_survivors);
        }

        let process = BranchingProcess::new(
            birth,
            self.death.unwrap_or(Response::constant(0.0)),
            self.mutation.unwrap_or(Response::constant(0.0)),
            mutator,
            config,
        )?;
        Ok(process)
    }
}

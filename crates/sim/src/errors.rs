use std::fmt;
use thiserror::Error;

/// Error returned when attempting to convert an invalid byte/character into
/// a `Nucleotide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNucleotide(pub u8);

impl fmt::Display for InvalidNucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid nucleotide byte: {} ('{}')", self.0, self.0 as char)
    }
}

impl std::error::Error for InvalidNucleotide {}

/// Error type for failures when constructing a `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSequence {
    /// A character was not recognized as a valid nucleotide.
    #[error("Invalid character in sequence: '{0}'")]
    InvalidChar(char),

    /// The sequence was empty when a non-empty sequence was required.
    #[error("Empty sequence not allowed")]
    EmptySequence,
}

/// Invalid inputs to the engine and its models.
///
/// These are always raised before any tree is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A rate response can evaluate below zero.
    #[error("Invalid rate for {0}: {1} (rates must be finite and non-negative)")]
    NegativeRate(&'static str, f64),

    /// A probability lies outside [0, 1].
    #[error("Invalid probability for {0}: {1} (must be between 0.0 and 1.0)")]
    InvalidProbability(&'static str, f64),

    /// The time horizon is not a positive finite number.
    #[error("Invalid horizon: {0} (must be positive and finite)")]
    InvalidHorizon(f64),

    /// Capacity of zero would make every tree immediately empty.
    #[error("Invalid capacity: 0 (capacity must be at least 1 or unbounded)")]
    ZeroCapacity,

    /// Unknown capacity method name.
    #[error("Unknown capacity method '{0}' (expected 'birth' or 'hard')")]
    UnknownCapacityMethod(String),

    /// Discrete state space is empty or contains duplicates/non-finite values.
    #[error("Invalid state space: {0}")]
    InvalidStateSpace(String),

    /// Transition matrix shape does not match the state space.
    #[error("Transition matrix must be {expected}x{expected}, found a row of length {found}")]
    MatrixShape { expected: usize, found: usize },

    /// A transition matrix entry is negative or not finite.
    #[error("Invalid transition rate {value} at ({row}, {col})")]
    InvalidTransition { row: usize, col: usize, value: f64 },

    /// A row has no off-diagonal mass, so it cannot be renormalized.
    #[error("Transition matrix row {0} has no off-diagonal mass")]
    EmptyTransitionRow(usize),

    /// Breakpoints/multipliers of a scheduled response are inconsistent.
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// A model needs a sequence but the root lineage has none.
    #[error("The {0} requires a sequence but the root lineage has none")]
    MissingSequence(&'static str),

    /// A discrete root phenotype is not a member of the state space.
    #[error("Root phenotype {0} is not in the discrete state space")]
    UnknownRootState(f64),

    /// A sequence does not have the length of the reference sequence.
    #[error("Sequence has length {found} but the reference has length {expected}")]
    SequenceLength { expected: usize, found: usize },

    /// The root phenotype is not the one its sequence maps to.
    #[error("Root phenotype {phenotype} differs from {expected}, the value its sequence maps to")]
    PhenotypeMismatch { phenotype: f64, expected: f64 },

    /// The genotype-phenotype map does not fit its reference sequence.
    #[error("Invalid genotype-phenotype map: {0}")]
    InvalidGpMap(String),

    /// The motif model is malformed.
    #[error("Invalid motif model: {0}")]
    InvalidMotifModel(String),

    /// Generic invalid parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors that can occur while applying a mutation to a lineage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// The phenotype is not a member of the discrete state space.
    #[error("Phenotype {0} is not in the discrete state space")]
    UnknownState(f64),

    /// A sequence-level mutator was applied to a lineage without a sequence.
    #[error("Sequence-level mutation requires a sequence")]
    MissingSequence,

    /// Every site has zero mutability in its context.
    #[error("No site is mutable in the current sequence")]
    NoMutableSite,

    /// The lineage sequence does not have the length of the GP map reference.
    #[error("Sequence has length {found} but the reference has length {expected}")]
    SequenceLength { expected: usize, found: usize },

    /// The chosen site has no substitution target with positive weight.
    #[error("No substitution target available at site {0}")]
    NoSubstitution(usize),
}

/// Failures of tree growth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    /// The population died out, or too few lineages reached the horizon.
    /// The caller is expected to retry with a fresh root.
    #[error("Tree went extinct: {survivors} survivors at the horizon (minimum {min_survivors})")]
    Extinction { survivors: usize, min_survivors: usize },

    /// `evolve` was called on a tree that already has descendants.
    #[error("Tree has already been evolved; start from a fresh root")]
    NotFresh,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Failures of the caller-level retry loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    /// Every attempt was rejected or went extinct.
    #[error("No acceptable tree after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors raised while reading or writing input tables and tree files.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column required by the loader is absent.
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// Row content could not be interpreted.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },
}

/// Errors that can occur while assembling a process from configuration.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required parameter is missing.
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to load table: {0}")]
    Table(#[from] TableError),

    #[error("Invalid sequence: {0}")]
    Sequence(#[from] InvalidSequence),
}

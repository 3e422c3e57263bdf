//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use germinal_sim::prelude::*;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let process = BranchingProcessBuilder::new()
//!     .constant_rates(1.0, 0.0, 0.0)
//!     .discrete_mutator(vec![0.0, 1.0], vec![vec![0.0, 1.0], vec![1.0, 0.0]])
//!     .horizon(2.0)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
//! let mut tree = process
//!     .evolve(Tree::new(LineageState::discrete(0.0)), &mut rng)
//!     .unwrap();
//! tree.sample_survivors(1.0, &mut rng).unwrap();
//! tree.prune();
//! assert!(tree.sampled_leaves().len() >= 1);
//! ```

pub use crate::base::{AminoAcid, Nucleotide, Sequence};
pub use crate::errors::{self, BatchError, ConfigurationError, MutationError, TreeError};
pub use crate::evolution::{
    AdditiveGpMap, DiscreteMutator, MotifModel, Mutator, Response, SequencePhenotypeMutator,
};
pub use crate::simulation::{
    generate_batch, generate_tree, BranchingProcess, BranchingProcessBuilder, CapacityMethod,
    Configuration, EvolveConfig, RetryPolicy,
};
pub use crate::tree::{Event, LineageState, NodeId, Tree, TreeRecord};

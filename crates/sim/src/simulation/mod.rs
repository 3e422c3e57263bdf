//! Tree growth and batch generation.
//!
//! Re-exports
//!
//! The most commonly used simulation types are re-exported here so consumers
//! can import them from `germinal_sim::simulation`.
//!
//! - `BranchingProcess`: grows one lineage tree to the horizon.
//! - `BranchingProcessBuilder`: fluent construction with validation.
//! - `generate_tree` / `generate_batch`: the retry loop and parallel batches.
//! - `Configuration`: serializable description of a whole run.

pub mod batch;
pub mod builder;
pub mod configs;
pub mod engine;
pub mod parameters;

pub use batch::{generate_batch, generate_tree, GeneratedTree};
pub use builder::BranchingProcessBuilder;
pub use configs::{
    Configuration, ExecutionConfig, ModelConfig, ProcessConfig, ResponseConfig, SimulationSetup,
};
pub use engine::BranchingProcess;
pub use parameters::{CapacityMethod, EvolveConfig, RetryPolicy};

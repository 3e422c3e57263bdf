//! Simulation configuration.
//!
//! A [`Configuration`] is the serializable description of a whole batch run:
//! how many trees to grow and how to accept them, the branching process, and
//! the model that maps lineages to phenotypes. It can be written to and read
//! from JSON to reproduce a run exactly, and assembled into the runtime
//! objects with [`Configuration::build`].
//!
//! ```json
//! {
//!   "execution": { "num_trees": 260, "seed": 1, "sampling_probability": 0.1 },
//!   "process": {
//!     "horizon": 15.0, "capacity": 1000, "capacity_method": "birth",
//!     "birth": { "type": "sigmoid", "xscale": 1.5, "xshift": -0.1, "yscale": 2.5, "yshift": 0.6 },
//!     "death": { "type": "constant", "value": 1.0 },
//!     "mutation": { "type": "constant", "value": 1.0 }
//!   },
//!   "model": { "kind": "discrete", "state_space": [0.0, 1.0],
//!              "transition_matrix": [[0.0, 1.0], [1.0, 0.0]], "initial_state": 0 }
//! }
//! ```

use super::engine::BranchingProcess;
use super::parameters::{EvolveConfig, RetryPolicy};
use crate::base::Sequence;
use crate::errors::{BuilderError, ConfigurationError, TableError};
use crate::evolution::{
    AdditiveGpMap, DiscreteMutator, MotifModel, Mutator, Response, SequencePhenotypeMutator,
};
use crate::storage::{read_effects, read_mutability, read_substitution};
use crate::tree::LineageState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The master configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub process: ProcessConfig,
    pub model: ModelConfig,
}

/// Batch size, seed and acceptance rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of accepted trees to generate
    pub num_trees: usize,
    /// Master seed; each tree gets its own stream derived from it
    pub seed: u64,
    #[serde(flatten)]
    pub retry: RetryPolicy,
}

impl ExecutionConfig {
    pub fn new(num_trees: usize, seed: u64, retry: RetryPolicy) -> Self {
        Self {
            num_trees,
            seed,
            retry,
        }
    }
}

/// The branching process: growth limits and the three rate responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    #[serde(flatten)]
    pub evolve: EvolveConfig,
    pub birth: ResponseConfig,
    #[serde(default = "ResponseConfig::zero")]
    pub death: ResponseConfig,
    #[serde(default = "ResponseConfig::zero")]
    pub mutation: ResponseConfig,
}

/// Serializable form of a [`Response`].
///
/// `SequenceContext` carries only its intensity; the motif model comes from
/// the sequence model section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseConfig {
    Constant {
        value: f64,
    },
    Sigmoid {
        xscale: f64,
        xshift: f64,
        yscale: f64,
        yshift: f64,
    },
    SequenceContext {
        intensity: f64,
    },
    Scheduled {
        base: Box<ResponseConfig>,
        breakpoints: Vec<f64>,
        multipliers: Vec<f64>,
    },
}

impl ResponseConfig {
    pub fn zero() -> Self {
        Self::Constant { value: 0.0 }
    }

    /// Resolve into a [`Response`], attaching `model` to sequence-context
    /// responses.
    pub fn to_response(&self, model: Option<&Arc<MotifModel>>) -> Result<Response, ConfigurationError> {
        Ok(match self {
            Self::Constant { value } => Response::constant(*value),
            Self::Sigmoid {
                xscale,
                xshift,
                yscale,
                yshift,
            } => Response::sigmoid(*xscale, *xshift, *yscale, *yshift),
            Self::SequenceContext { intensity } => {
                let model = model.ok_or(ConfigurationError::MissingSequence(
                    "sequence-context response",
                ))?;
                Response::sequence_context(Arc::clone(model), *intensity)
            }
            Self::Scheduled {
                base,
                breakpoints,
                multipliers,
            } => Response::scheduled(
                base.to_response(model)?,
                breakpoints.clone(),
                multipliers.clone(),
            ),
        })
    }
}

/// How lineage phenotypes are represented and mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Phenotypes jump between a finite set of values.
    Discrete {
        state_space: Vec<f64>,
        transition_matrix: Vec<Vec<f64>>,
        /// Index into `state_space` of the root phenotype
        initial_state: usize,
    },
    /// Lineages carry a nucleotide sequence mapped to a phenotype.
    Sequence {
        naive_sequence: String,
        #[serde(default)]
        chain_boundary: Option<usize>,
        /// Motif mutability table; uniform mutability when absent
        #[serde(default)]
        mutability_path: Option<PathBuf>,
        /// Motif substitution table; required with `mutability_path`
        #[serde(default)]
        substitution_path: Option<PathBuf>,
        /// Per-site amino acid effects; every sequence is neutral when absent
        #[serde(default)]
        dms_path: Option<PathBuf>,
        #[serde(default = "default_phenotype_column")]
        phenotype_column: String,
        /// Phenotype of sequences with a stop codon; defaults to the most
        /// damaging effect in the table
        #[serde(default)]
        nonsense_phenotype: Option<f64>,
    },
}

fn default_phenotype_column() -> String {
    "affinity".to_string()
}

impl ModelConfig {
    /// Make relative table paths relative to `dir`.
    fn resolve_paths(&mut self, dir: &Path) {
        if let Self::Sequence {
            mutability_path,
            substitution_path,
            dms_path,
            ..
        } = self
        {
            for path in [mutability_path, substitution_path, dms_path]
                .into_iter()
                .flatten()
            {
                if path.is_relative() {
                    *path = dir.join(&*path);
                }
            }
        }
    }
}

/// Everything needed to run a batch, built from a [`Configuration`].
#[derive(Debug, Clone)]
pub struct SimulationSetup {
    pub process: BranchingProcess,
    pub root: LineageState,
    pub policy: RetryPolicy,
    pub num_trees: usize,
    pub seed: u64,
}

impl Configuration {
    pub fn new(execution: ExecutionConfig, process: ProcessConfig, model: ModelConfig) -> Self {
        Self {
            execution,
            process,
            model,
        }
    }

    /// Read a configuration from a JSON file. Relative table paths are taken
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&text)?;
        if let Some(dir) = path.parent() {
            config.model.resolve_paths(dir);
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration, load any tables it names and assemble the
    /// process and root state.
    pub fn build(&self) -> Result<SimulationSetup, BuilderError> {
        self.execution.retry.validate()?;

        let (mutator, motif_model, root) = match &self.model {
            ModelConfig::Discrete {
                state_space,
                transition_matrix,
                initial_state,
            } => {
                let phenotype = *state_space.get(*initial_state).ok_or_else(|| {
                    ConfigurationError::InvalidParameter(format!(
                        "initial_state {initial_state} is outside a state space of {} states",
                        state_space.len()
                    ))
                })?;
                let mutator = DiscreteMutator::new(state_space.clone(), transition_matrix.clone())?;
                (Mutator::from(mutator), None, LineageState::discrete(phenotype))
            }
            ModelConfig::Sequence {
                naive_sequence,
                chain_boundary,
                mutability_path,
                substitution_path,
                dms_path,
                phenotype_column,
                nonsense_phenotype,
            } => {
                let naive = Sequence::parse_non_empty(naive_sequence)?;

                let model = match (mutability_path, substitution_path) {
                    (Some(mutability), Some(substitution)) => MotifModel::new(
                        &read_mutability(mutability)?,
                        &read_substitution(substitution)?,
                        *chain_boundary,
                    )?,
                    // unit total mutability for the naive sequence
                    (None, None) => MotifModel::uniform(1.0 / naive.len() as f64, *chain_boundary)?,
                    (Some(_), None) => return Err(BuilderError::MissingRequired("substitution_path")),
                    (None, Some(_)) => return Err(BuilderError::MissingRequired("mutability_path")),
                };
                model.check_sequence(&naive)?;

                let gp_map = match dms_path {
                    Some(path) => AdditiveGpMap::from_effects(
                        &naive,
                        *chain_boundary,
                        &read_effects(path, phenotype_column)?,
                        *nonsense_phenotype,
                    )?,
                    None => AdditiveGpMap::from_effects(
                        &naive,
                        *chain_boundary,
                        &[],
                        *nonsense_phenotype,
                    )?,
                };

                let root = LineageState::with_sequence(gp_map.phenotype(&naive)?, naive);
                let model = Arc::new(model);
                let mutator = SequencePhenotypeMutator::new(Arc::clone(&model), Arc::new(gp_map));
                (Mutator::from(mutator), Some(model), root)
            }
        };

        let process = BranchingProcess::new(
            self.process.birth.to_response(motif_model.as_ref())?,
            self.process.death.to_response(motif_model.as_ref())?,
            self.process.mutation.to_response(motif_model.as_ref())?,
            mutator,
            self.process.evolve,
        )?;
        process.check_root(&root)?;

        Ok(SimulationSetup {
            process,
            root,
            policy: self.execution.retry,
            num_trees: self.execution.num_trees,
            seed: self.execution.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::CapacityMethod;
    use tempfile::tempdir;

    const NAIVE: &str = "ATGGCAGGT";

    fn discrete_config() -> Configuration {
        Configuration::new(
            ExecutionConfig::new(3, 1, RetryPolicy::new(0.5)),
            ProcessConfig {
                evolve: EvolveConfig::new(5.0).with_capacity(100, CapacityMethod::Hard),
                birth: ResponseConfig::Sigmoid {
                    xscale: 1.5,
                    xshift: -0.1,
                    yscale: 2.5,
                    yshift: 0.6,
                },
                death: ResponseConfig::Constant { value: 1.0 },
                mutation: ResponseConfig::Constant { value: 1.0 },
            },
            ModelConfig::Discrete {
                state_space: vec![-1.0, 0.0, 1.0],
                transition_matrix: vec![
                    vec![0.0, 1.0, 0.0],
                    vec![0.5, 0.0, 0.5],
                    vec![0.0, 1.0, 0.0],
                ],
                initial_state: 1,
            },
        )
    }

    fn sequence_model(dms_path: Option<PathBuf>) -> ModelConfig {
        ModelConfig::Sequence {
            naive_sequence: NAIVE.to_string(),
            chain_boundary: Some(6),
            mutability_path: None,
            substitution_path: None,
            dms_path,
            phenotype_column: default_phenotype_column(),
            nonsense_phenotype: None,
        }
    }

    #[test]
    fn test_build_discrete() {
        let setup = discrete_config().build().unwrap();
        assert_eq!(setup.root, LineageState::discrete(0.0));
        assert_eq!(setup.num_trees, 3);
        assert_eq!(setup.process.config().capacity, Some(100));
        assert_eq!(setup.process.death(), &Response::constant(1.0));
    }

    #[test]
    fn test_json_round_trip() {
        let config = discrete_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"type\": \"sigmoid\""));
        assert!(json.contains("\"kind\": \"discrete\""));
        assert!(json.contains("\"capacity_method\": \"hard\""));
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let json = r#"{
            "execution": { "num_trees": 2, "seed": 9, "sampling_probability": 1.0 },
            "process": { "horizon": 3.0, "birth": { "type": "constant", "value": 1.0 } },
            "model": { "kind": "discrete", "state_space": [0.0, 1.0],
                       "transition_matrix": [[0.0, 1.0], [1.0, 0.0]], "initial_state": 0 }
        }"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.execution.retry.min_sampled, 1);
        assert_eq!(config.execution.retry.max_attempts, 10_000);
        assert_eq!(config.process.evolve.capacity, None);
        assert_eq!(config.process.evolve.capacity_method, CapacityMethod::Birth);
        assert_eq!(config.process.evolve.min_survivors, 1);
        assert_eq!(config.process.death, ResponseConfig::zero());
        assert!(config.build().is_ok());
    }

    #[test]
    fn test_initial_state_out_of_range() {
        let mut config = discrete_config();
        if let ModelConfig::Discrete { initial_state, .. } = &mut config.model {
            *initial_state = 3;
        }
        assert!(matches!(
            config.build(),
            Err(BuilderError::Configuration(ConfigurationError::InvalidParameter(_)))
        ));
    }

    #[test]
    fn test_invalid_sampling_probability() {
        let mut config = discrete_config();
        config.execution.retry.sampling_probability = -0.1;
        assert!(matches!(
            config.build(),
            Err(BuilderError::Configuration(ConfigurationError::InvalidProbability(..)))
        ));
    }

    #[test]
    fn test_sequence_context_needs_sequence_model() {
        let mut config = discrete_config();
        config.process.mutation = ResponseConfig::SequenceContext { intensity: 1.0 };
        assert!(matches!(
            config.build(),
            Err(BuilderError::Configuration(ConfigurationError::MissingSequence(_)))
        ));
    }

    #[test]
    fn test_build_sequence_neutral() {
        let mut config = discrete_config();
        config.model = sequence_model(None);
        config.process.mutation = ResponseConfig::SequenceContext { intensity: 2.0 };

        let setup = config.build().unwrap();
        assert_eq!(setup.root.phenotype, 0.0);
        assert_eq!(setup.root.sequence.as_ref().unwrap().to_string(), NAIVE);
        // uniform model scaled to unit total mutability
        let rate = setup.process.mutation().rate(&setup.root, 0.0);
        assert!((rate - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_build_sequence_with_tables() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("dms.csv"),
            "site,mutant,affinity\n1,A,-0.5\n2,V,0.75\n",
        )
        .unwrap();

        let mut config = discrete_config();
        config.model = sequence_model(Some(PathBuf::from("dms.csv")));
        let path = dir.path().join("config.json");
        config.save(&path).unwrap();

        let loaded = Configuration::load(&path).unwrap();
        match &loaded.model {
            ModelConfig::Sequence { dms_path, .. } => {
                assert_eq!(dms_path.as_deref(), Some(dir.path().join("dms.csv").as_path()));
            }
            other => panic!("unexpected model {other:?}"),
        }

        let setup = loaded.build().unwrap();
        let gp_map = match setup.process.mutator() {
            Mutator::Sequence(m) => Arc::clone(m.gp_map()),
            other => panic!("unexpected mutator {other:?}"),
        };
        assert_eq!(gp_map.nonsense_phenotype(), -0.5);
    }

    #[test]
    fn test_partial_motif_tables() {
        let mut config = discrete_config();
        config.model = sequence_model(None);
        if let ModelConfig::Sequence {
            mutability_path, ..
        } = &mut config.model
        {
            *mutability_path = Some(PathBuf::from("mut.csv"));
        }
        assert!(matches!(
            config.build(),
            Err(BuilderError::MissingRequired("substitution_path"))
        ));
    }

    #[test]
    fn test_invalid_naive_sequence() {
        let mut config = discrete_config();
        config.model = ModelConfig::Sequence {
            naive_sequence: "ACGX".into(),
            chain_boundary: None,
            mutability_path: None,
            substitution_path: None,
            dms_path: None,
            phenotype_column: default_phenotype_column(),
            nonsense_phenotype: None,
        };
        assert!(matches!(config.build(), Err(BuilderError::Sequence(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Configuration::load(&dir.path().join("absent.json")),
            Err(TableError::Io(_))
        ));
    }
}

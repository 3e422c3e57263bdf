use clap::{Args, ValueEnum};
use germinal_sim::simulation::CapacityMethod;
use std::path::PathBuf;

use crate::defaults;

/// How lineages carry their phenotype.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Jumps between the states of a fixed affinity type space
    Discrete,
    /// Context-dependent nucleotide substitutions mapped through a GP map
    Sequence,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub output: PathBuf,

    /// Phenotype model
    #[arg(short, long, value_enum, default_value_t = Mode::Discrete)]
    pub mode: Mode,

    /// Number of trees to generate
    #[arg(short = 'n', long, default_value_t = defaults::NUM_TREES)]
    pub trees: usize,

    /// Random seed
    #[arg(short, long, default_value_t = defaults::SEED)]
    pub seed: u64,

    /// Time at which growth stops
    #[arg(long, default_value_t = defaults::HORIZON)]
    pub horizon: f64,

    /// Maximum number of simultaneously alive lineages
    #[arg(long, default_value_t = defaults::CAPACITY, conflicts_with = "no_capacity")]
    pub capacity: usize,

    /// Grow without a population cap
    #[arg(long)]
    pub no_capacity: bool,

    /// How the cap is enforced (birth, hard)
    #[arg(long, default_value = defaults::CAPACITY_METHOD)]
    pub capacity_method: CapacityMethod,

    /// Fewer lineages than this at the horizon counts as extinction
    #[arg(long, default_value_t = defaults::MIN_SURVIVORS)]
    pub min_survivors: usize,

    /// Probability with which each surviving lineage is sampled
    #[arg(short = 'p', long, default_value_t = defaults::SAMPLING_PROBABILITY)]
    pub sampling_probability: f64,

    /// Trees with fewer sampled leaves are regrown
    #[arg(long, default_value_t = defaults::MIN_SAMPLED)]
    pub min_sampled: usize,

    /// Naive sequence (sequence mode)
    #[arg(long)]
    pub naive_sequence: Option<String>,

    /// Index where the second chain starts (sequence mode)
    #[arg(long)]
    pub chain_boundary: Option<usize>,

    /// Motif mutability CSV (sequence mode)
    #[arg(long, requires = "substitution")]
    pub mutability: Option<PathBuf>,

    /// Motif substitution CSV (sequence mode)
    #[arg(long, requires = "mutability")]
    pub substitution: Option<PathBuf>,

    /// Per-site amino acid effects CSV (sequence mode)
    #[arg(long)]
    pub dms: Option<PathBuf>,

    /// Scale of the sequence-context mutation rate (sequence mode)
    #[arg(long, default_value_t = defaults::MUTATION_INTENSITY)]
    pub intensity: f64,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Configuration file written by `init`
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory receiving the tree files
    #[arg(short, long, default_value = defaults::OUT_DIR)]
    pub out_dir: PathBuf,

    /// Override the configured seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the configured number of trees
    #[arg(short = 'n', long)]
    pub trees: Option<usize>,

    /// Show progress bar
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// File with one sequence per line; reads stdin when absent
    pub input: Option<PathBuf>,

    /// Reference sequence of the GP map (defaults to the built-in naive
    /// sequence)
    #[arg(long)]
    pub reference: Option<String>,

    /// Index where the second chain starts
    #[arg(long)]
    pub chain_boundary: Option<usize>,

    /// Motif mutability CSV
    #[arg(long, requires = "substitution")]
    pub mutability: Option<PathBuf>,

    /// Motif substitution CSV
    #[arg(long, requires = "mutability")]
    pub substitution: Option<PathBuf>,

    /// Per-site amino acid effects CSV
    #[arg(long)]
    pub dms: Option<PathBuf>,

    /// Length of each traced lineage
    #[arg(long, default_value_t = defaults::TRACE_HORIZON)]
    pub horizon: f64,

    /// Random seed
    #[arg(short, long, default_value_t = defaults::SEED)]
    pub seed: u64,
}

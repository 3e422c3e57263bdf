mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::{GenerateArgs, InitArgs, TraceArgs};
use commands::{generate, init, inspect, trace};

/// Germinal: a lineage tree simulator
///
/// Grows trees of lineages under a continuous-time birth, death and mutation
/// process in which rates depend on each lineage's phenotype, then samples
/// and prunes them for downstream inference.
#[derive(Parser, Debug)]
#[command(name = "germinal")]
#[command(author, version, about = "Simulates lineage trees under phenotype-dependent branching", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a new simulation configuration.
    ///
    /// Sets up the parameters of a batch (process, phenotype model, sampling)
    /// but does not run it yet.
    Init(Box<InitArgs>),

    /// Generate a batch of trees from a configuration.
    ///
    /// Writes every tree twice: as grown, and pruned to its sampled leaves.
    Generate(GenerateArgs),

    /// Trace single mutating lineages from input sequences.
    ///
    /// Prints one line per sequence with its phenotype transitions.
    Trace(TraceArgs),

    /// Summarize a file of generated trees.
    Inspect {
        /// Trees JSON file
        #[arg(default_value = "trees.json")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => {
            init::init_config(&args)?;
        }
        Commands::Generate(args) => {
            generate::generate_trees(&args)?;
        }
        Commands::Trace(args) => {
            trace::trace_sequences(&args)?;
        }
        Commands::Inspect { input } => {
            inspect::inspect_trees(&input)?;
        }
    }

    Ok(())
}

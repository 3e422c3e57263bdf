use anyhow::{Context, Result};
use germinal_sim::simulation::{
    Configuration, EvolveConfig, ExecutionConfig, ModelConfig, ProcessConfig, ResponseConfig,
    RetryPolicy,
};

use crate::args::{InitArgs, Mode};
use crate::defaults;
use crate::printing::print_parameters;
use crate::utils::absolute;

pub fn init_config(args: &InitArgs) -> Result<()> {
    println!("🌱 Germinal - Lineage Tree Simulator");
    println!("============================================\n");

    let config = build_config(args)?;
    config
        .build()
        .context("Configuration does not describe a valid simulation")?;

    println!("Configuration:");
    print_parameters(&config);

    config
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("\n✓ Configuration written to {}", args.output.display());
    println!(
        "\n💡 Use 'germinal generate --config {}' to generate trees",
        args.output.display()
    );

    Ok(())
}

pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    let retry = RetryPolicy::new(args.sampling_probability).with_min_sampled(args.min_sampled);
    let execution = ExecutionConfig::new(args.trees, args.seed, retry);

    let mut evolve = EvolveConfig::new(args.horizon).with_min_survivors(args.min_survivors);
    if !args.no_capacity {
        evolve = evolve.with_capacity(args.capacity, args.capacity_method);
    }

    let (xscale, xshift, yscale, yshift) = defaults::BIRTH_SIGMOID;
    let birth = ResponseConfig::Sigmoid {
        xscale,
        xshift,
        yscale,
        yshift,
    };
    let death = ResponseConfig::Constant {
        value: defaults::DEATH_RATE,
    };

    let (mutation, model) = match args.mode {
        Mode::Discrete => (
            ResponseConfig::Constant {
                value: defaults::MUTATION_RATE,
            },
            ModelConfig::Discrete {
                state_space: defaults::TYPE_SPACE.to_vec(),
                transition_matrix: defaults::TRANSITION_MATRIX
                    .iter()
                    .map(|row| row.to_vec())
                    .collect(),
                initial_state: defaults::INITIAL_STATE,
            },
        ),
        Mode::Sequence => {
            // the built-in naive sequence comes with its chain boundary
            let (naive_sequence, chain_boundary) = match &args.naive_sequence {
                Some(sequence) => (sequence.clone(), args.chain_boundary),
                None => (
                    defaults::NAIVE_SEQUENCE.to_string(),
                    args.chain_boundary.or(Some(defaults::CHAIN_BOUNDARY)),
                ),
            };
            let model = ModelConfig::Sequence {
                naive_sequence,
                chain_boundary,
                mutability_path: args.mutability.as_deref().map(absolute).transpose()?,
                substitution_path: args.substitution.as_deref().map(absolute).transpose()?,
                dms_path: args.dms.as_deref().map(absolute).transpose()?,
                phenotype_column: defaults::PHENOTYPE_COLUMN.to_string(),
                nonsense_phenotype: None,
            };
            (
                ResponseConfig::SequenceContext {
                    intensity: args.intensity,
                },
                model,
            )
        }
    };

    Ok(Configuration::new(
        execution,
        ProcessConfig {
            evolve,
            birth,
            death,
            mutation,
        },
        model,
    ))
}

use anyhow::{bail, Context, Result};
use germinal_sim::evolution::{AdditiveGpMap, MotifModel, SequencePhenotypeMutator};
use germinal_sim::simulation::BranchingProcessBuilder;
use germinal_sim::storage::{read_effects, read_mutability, read_substitution};
use germinal_sim::tree::{LineageState, Tree};
use germinal_sim::Sequence;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::sync::Arc;

use crate::args::TraceArgs;
use crate::defaults;
use crate::utils::input_sequences;

/// Follow a single mutating lineage from each input sequence and print its
/// phenotype transitions as `from:duration:to`, joined by `;`.
pub fn trace_sequences(args: &TraceArgs) -> Result<()> {
    let (reference, chain_boundary) = match &args.reference {
        Some(text) => (
            Sequence::parse_non_empty(text).context("Invalid reference sequence")?,
            args.chain_boundary,
        ),
        None => (
            Sequence::parse_non_empty(defaults::NAIVE_SEQUENCE)?,
            args.chain_boundary.or(Some(defaults::CHAIN_BOUNDARY)),
        ),
    };

    let model = match (&args.mutability, &args.substitution) {
        (Some(mutability), Some(substitution)) => MotifModel::new(
            &read_mutability(mutability).context("Failed to read mutability table")?,
            &read_substitution(substitution).context("Failed to read substitution table")?,
            chain_boundary,
        )?,
        _ => MotifModel::uniform(1.0, chain_boundary)?,
    };
    let gp_map = match &args.dms {
        Some(path) => AdditiveGpMap::from_effects(
            &reference,
            chain_boundary,
            &read_effects(path, defaults::PHENOTYPE_COLUMN).context("Failed to read DMS table")?,
            None,
        )?,
        None => AdditiveGpMap::neutral(&reference, chain_boundary)?,
    };
    let gp_map = Arc::new(gp_map);

    // a lone lineage that only mutates
    let process = BranchingProcessBuilder::new()
        .constant_rates(0.0, 0.0, defaults::MUTATION_RATE)
        .mutator(SequencePhenotypeMutator::new(
            Arc::new(model),
            Arc::clone(&gp_map),
        ))
        .horizon(args.horizon)
        .build()
        .context("Invalid trace parameters")?;

    let sequences = input_sequences(args.input.as_deref())?;
    let mut master = Xoshiro256PlusPlus::seed_from_u64(args.seed);

    for (line, sequence) in sequences.into_iter().enumerate() {
        if sequence.len() != reference.len() {
            bail!(
                "Sequence {} has length {} but the reference has length {}",
                line + 1,
                sequence.len(),
                reference.len()
            );
        }
        let root = LineageState::with_sequence(gp_map.phenotype(&sequence)?, sequence);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(master.random());
        let tree = process
            .evolve(Tree::new(root), &mut rng)
            .with_context(|| format!("Failed to trace sequence {}", line + 1))?;

        let path = tree.first_lineage();
        let transitions: Vec<String> = path
            .windows(2)
            .map(|pair| {
                let (parent, child) = (tree.node(pair[0]), tree.node(pair[1]));
                format!(
                    "{}:{}:{}",
                    parent.phenotype(),
                    child.time() - parent.time(),
                    child.phenotype()
                )
            })
            .collect();
        println!("{}", transitions.join(";"));
    }

    Ok(())
}

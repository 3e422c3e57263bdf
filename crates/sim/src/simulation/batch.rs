//! Generation of accepted trees: the retry loop and parallel batches.

use super::engine::BranchingProcess;
use super::parameters::RetryPolicy;
use crate::errors::{BatchError, TreeError};
use crate::tree::{LineageState, Tree};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// A tree accepted by the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTree {
    /// The grown tree with sampled leaves tagged, not yet pruned.
    pub tree: Tree,
    /// Number of attempts it took, counting the accepted one.
    pub attempts: usize,
    /// Number of sampled leaves.
    pub sampled: usize,
}

/// Grow trees from `root` until one is accepted.
///
/// Each attempt grows a fresh tree on its own stream seeded from `rng`,
/// samples survivors with the policy's probability, and accepts the tree if
/// enough leaves were sampled. Extinct and rejected attempts are retried up
/// to `policy.max_attempts` times in total; mutation and configuration errors
/// are returned immediately.
pub fn generate_tree<R: Rng + ?Sized>(
    process: &BranchingProcess,
    root: &LineageState,
    policy: &RetryPolicy,
    rng: &mut R,
) -> Result<GeneratedTree, BatchError> {
    policy.validate()?;
    process.check_root(root)?;

    for attempt in 1..=policy.max_attempts {
        let mut attempt_rng = Xoshiro256PlusPlus::seed_from_u64(rng.random());

        let mut tree = match process.evolve(Tree::new(root.clone()), &mut attempt_rng) {
            Ok(tree) => tree,
            Err(TreeError::Extinction {
                survivors,
                min_survivors,
            }) => {
                debug!(
                    "Attempt {attempt}: extinct ({survivors} survivors, need {min_survivors})"
                );
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let sampled = tree.sample_survivors(policy.sampling_probability, &mut attempt_rng)?;
        if sampled < policy.min_sampled {
            debug!(
                "Attempt {attempt}: rejected with {sampled} sampled leaves (need {})",
                policy.min_sampled
            );
            continue;
        }

        info!("Generated tree after {attempt} tries");
        return Ok(GeneratedTree {
            tree,
            attempts: attempt,
            sampled,
        });
    }

    Err(BatchError::RetriesExhausted {
        attempts: policy.max_attempts,
    })
}

/// Generate `num_trees` accepted trees in parallel.
///
/// One seed per tree is drawn up front from a master generator seeded with
/// `seed`, so the batch is reproducible for a fixed seed whatever the number
/// of threads. Results are in tree order. `on_tree` is called once per
/// finished tree, from whichever worker finished it.
pub fn generate_batch<F>(
    process: &BranchingProcess,
    root: &LineageState,
    policy: &RetryPolicy,
    num_trees: usize,
    seed: u64,
    on_tree: F,
) -> Result<Vec<GeneratedTree>, BatchError>
where
    F: Fn(usize) + Sync,
{
    policy.validate()?;
    process.check_root(root)?;

    let mut master = Xoshiro256PlusPlus::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..num_trees).map(|_| master.random()).collect();

    seeds
        .par_iter()
        .enumerate()
        .map(|(index, &tree_seed)| {
            let mut local_rng = Xoshiro256PlusPlus::seed_from_u64(tree_seed);
            let generated = generate_tree(process, root, policy, &mut local_rng);
            on_tree(index);
            generated
        })
        .collect()
}

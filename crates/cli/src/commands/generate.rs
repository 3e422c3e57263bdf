use anyhow::{Context, Result};
use germinal_sim::simulation::{generate_batch, Configuration};
use germinal_sim::storage::write_trees;
use germinal_sim::tree::TreeRecord;
use log::info;
use std::fs;

use crate::args::GenerateArgs;
use crate::defaults;
use crate::printing::print_parameters;
use crate::utils::progress_bar;

pub fn generate_trees(args: &GenerateArgs) -> Result<()> {
    println!("🌱 Germinal - Generating Trees");
    println!("============================================\n");

    let mut config = Configuration::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config.execution.seed = seed;
    }
    if let Some(trees) = args.trees {
        config.execution.num_trees = trees;
    }
    print_parameters(&config);

    let setup = config.build().context("Failed to set up simulation")?;

    println!("\nGenerating {} trees...", setup.num_trees);
    let pb = if args.progress {
        Some(progress_bar(setup.num_trees)?)
    } else {
        None
    };

    let generated = generate_batch(
        &setup.process,
        &setup.root,
        &setup.policy,
        setup.num_trees,
        setup.seed,
        |_| {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        },
    )
    .context("Tree generation failed")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let unpruned: Vec<TreeRecord> = generated.iter().map(|g| g.tree.to_record()).collect();
    let pruned: Vec<TreeRecord> = generated
        .iter()
        .map(|g| {
            let mut tree = g.tree.clone();
            tree.prune();
            tree.to_record()
        })
        .collect();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;
    let unpruned_path = args.out_dir.join(defaults::UNPRUNED_FILE);
    let pruned_path = args.out_dir.join(defaults::PRUNED_FILE);
    write_trees(&unpruned_path, &unpruned)
        .with_context(|| format!("Failed to write {}", unpruned_path.display()))?;
    write_trees(&pruned_path, &pruned)
        .with_context(|| format!("Failed to write {}", pruned_path.display()))?;
    info!("Wrote {} trees to {}", generated.len(), args.out_dir.display());

    let attempts: usize = generated.iter().map(|g| g.attempts).sum();
    let sampled: usize = generated.iter().map(|g| g.sampled).sum();
    let count = generated.len().max(1) as f64;

    println!("\n✓ Generation complete!");
    println!("  Trees: {}", generated.len());
    println!("  Mean attempts per tree: {:.2}", attempts as f64 / count);
    println!("  Mean sampled leaves per tree: {:.2}", sampled as f64 / count);
    println!("  Unpruned: {}", unpruned_path.display());
    println!("  Pruned: {}", pruned_path.display());

    Ok(())
}

use anyhow::{Context, Result};
use germinal_sim::storage::read_trees;
use germinal_sim::tree::{Event, Tree};
use std::path::Path;

const EVENTS: [Event; 5] = [
    Event::Root,
    Event::Birth,
    Event::Death,
    Event::Mutation,
    Event::Sampling,
];

pub fn inspect_trees(path: &Path) -> Result<()> {
    let records =
        read_trees(path).with_context(|| format!("Failed to read trees from {}", path.display()))?;
    let trees = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            Tree::from_record(record).with_context(|| format!("Tree {} is invalid", i + 1))
        })
        .collect::<Result<Vec<Tree>>>()?;

    println!("\n📊 Tree Summary: {}", path.display());
    println!("{}", "=".repeat(50));
    println!("Trees: {}", trees.len());
    if trees.is_empty() {
        return Ok(());
    }

    let sizes: Vec<usize> = trees.iter().map(Tree::len).collect();
    let leaves: usize = trees.iter().map(|t| t.leaves().count()).sum();
    let sampled: Vec<usize> = trees.iter().map(|t| t.sampled_leaves().len()).collect();
    let affinities: Vec<f64> = trees
        .iter()
        .flat_map(|t| {
            t.sampled_leaves()
                .into_iter()
                .map(|id| t.node(id).phenotype())
                .collect::<Vec<_>>()
        })
        .filter(|x| x.is_finite())
        .collect();

    let count = trees.len() as f64;
    let total_nodes: usize = sizes.iter().sum();
    let total_sampled: usize = sampled.iter().sum();
    println!(
        "Nodes: {total_nodes} (mean {:.1}, min {}, max {})",
        total_nodes as f64 / count,
        sizes.iter().min().unwrap_or(&0),
        sizes.iter().max().unwrap_or(&0)
    );
    println!("Leaves: {leaves} (mean {:.1})", leaves as f64 / count);
    println!(
        "Sampled leaves: {total_sampled} (mean {:.1}, min {}, max {})",
        total_sampled as f64 / count,
        sampled.iter().min().unwrap_or(&0),
        sampled.iter().max().unwrap_or(&0)
    );
    if affinities.is_empty() {
        println!("Mean sampled affinity: n/a");
    } else {
        let mean = affinities.iter().sum::<f64>() / affinities.len() as f64;
        println!("Mean sampled affinity: {mean:.4}");
    }

    println!("\nEvents:");
    for event in EVENTS {
        let n: usize = trees.iter().map(|t| t.count_events(event)).sum();
        println!("  {event}: {n}");
    }

    Ok(())
}

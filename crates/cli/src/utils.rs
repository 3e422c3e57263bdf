use anyhow::{Context, Result};
use germinal_sim::storage::{parse_sequences, read_sequences};
use germinal_sim::Sequence;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};

pub fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Sequences from `path`, or from stdin when no path is given.
pub fn input_sequences(path: Option<&Path>) -> Result<Vec<Sequence>> {
    match path {
        Some(path) => read_sequences(path)
            .with_context(|| format!("Failed to read sequences from {}", path.display())),
        None => parse_sequences(io::stdin().lock()).context("Failed to read sequences from stdin"),
    }
}

/// Make `path` absolute against the working directory.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get working directory")?;
    Ok(cwd.join(path))
}

//! Loaders for the input tables of the sequence-level model.
//!
//! All tables are CSV with a header row. Empty cells and `NA`/`NaN` mark
//! missing values, which are skipped rather than treated as errors.
//!
//! Example mutability table:
//! ```text
//! motif,mutability
//! AAAAA,0.21
//! AAAAC,0.17
//! ```

use crate::base::{AminoAcid, Sequence};
use crate::errors::TableError;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const MOTIF_COLUMNS: &[&str] = &["motif", "Fivemer"];
const MUTABILITY_COLUMNS: &[&str] = &["mutability", "Mutability"];
const BASE_COLUMNS: [&str; 4] = ["A", "C", "G", "T"];

fn open(path: &Path) -> Result<BufReader<File>, TableError> {
    Ok(BufReader::new(File::open(path)?))
}

fn column(headers: &StringRecord, names: &[&str]) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| names.contains(&h.trim()))
        .ok_or_else(|| TableError::MissingColumn(names[0].to_string()))
}

/// Parse an optional number; `None` for a missing value.
fn cell(record: &StringRecord, col: usize, row: usize) -> Result<Option<f64>, TableError> {
    let raw = record.get(col).unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("na") || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|e| TableError::Parse {
        row,
        message: format!("bad number '{raw}': {e}"),
    })
}

fn text(record: &StringRecord, col: usize) -> &str {
    record.get(col).unwrap_or("").trim()
}

/// Parse a motif mutability table.
pub fn parse_mutability<R: Read>(reader: R) -> Result<HashMap<String, f64>, TableError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let motif_col = column(&headers, MOTIF_COLUMNS)?;
    let value_col = column(&headers, MUTABILITY_COLUMNS)?;

    let mut table = HashMap::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        if let Some(value) = cell(&record, value_col, idx + 1)? {
            table.insert(text(&record, motif_col).to_ascii_uppercase(), value);
        }
    }
    Ok(table)
}

pub fn read_mutability(path: &Path) -> Result<HashMap<String, f64>, TableError> {
    parse_mutability(open(path)?)
}

/// Parse a motif substitution table with one column per target base.
/// Missing entries are zero.
pub fn parse_substitution<R: Read>(reader: R) -> Result<HashMap<String, [f64; 4]>, TableError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let motif_col = column(&headers, MOTIF_COLUMNS)?;
    let mut base_cols = [0usize; 4];
    for (slot, name) in base_cols.iter_mut().zip(BASE_COLUMNS) {
        *slot = column(&headers, &[name])?;
    }

    let mut table = HashMap::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let mut weights = [0.0; 4];
        for (w, &col) in weights.iter_mut().zip(&base_cols) {
            *w = cell(&record, col, idx + 1)?.unwrap_or(0.0);
        }
        table.insert(text(&record, motif_col).to_ascii_uppercase(), weights);
    }
    Ok(table)
}

pub fn read_substitution(path: &Path) -> Result<HashMap<String, [f64; 4]>, TableError> {
    parse_substitution(open(path)?)
}

/// Parse per-site amino acid effects.
///
/// Columns are `site` (1-based position in the concatenated protein),
/// `mutant` (one-letter code, `*` for stop) and `phenotype_column`. Rows with
/// a missing effect are skipped. Sites are returned 0-based.
pub fn parse_effects<R: Read>(
    reader: R,
    phenotype_column: &str,
) -> Result<Vec<(usize, AminoAcid, f64)>, TableError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let site_col = column(&headers, &["site"])?;
    let mutant_col = column(&headers, &["mutant"])?;
    let value_col = column(&headers, &[phenotype_column])?;

    let mut effects = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;
        let Some(effect) = cell(&record, value_col, row)? else {
            continue;
        };

        let site_text = text(&record, site_col);
        let site: usize = site_text.parse().map_err(|_| TableError::Parse {
            row,
            message: format!("bad site '{site_text}'"),
        })?;
        if site == 0 {
            return Err(TableError::Parse {
                row,
                message: "sites are numbered from 1".into(),
            });
        }

        let mutant_text = text(&record, mutant_col);
        let mut chars = mutant_text.chars();
        let mutant = match (chars.next(), chars.next()) {
            (Some(c), None) => AminoAcid::from_char(c),
            _ => None,
        }
        .ok_or_else(|| TableError::Parse {
            row,
            message: format!("bad amino acid '{mutant_text}'"),
        })?;

        effects.push((site - 1, mutant, effect));
    }
    Ok(effects)
}

pub fn read_effects(path: &Path, phenotype_column: &str) -> Result<Vec<(usize, AminoAcid, f64)>, TableError> {
    parse_effects(open(path)?, phenotype_column)
}

/// Parse one sequence per line, skipping blank lines.
pub fn parse_sequences<R: BufRead>(reader: R) -> Result<Vec<Sequence>, TableError> {
    let mut sequences = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let seq = Sequence::parse_non_empty(&line).map_err(|e| TableError::Parse {
            row: idx + 1,
            message: e.to_string(),
        })?;
        sequences.push(seq);
    }
    Ok(sequences)
}

pub fn read_sequences(path: &Path) -> Result<Vec<Sequence>, TableError> {
    parse_sequences(open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mutability_aliases() {
        let csv = "Fivemer,Mutability,Source\nAAAAA,0.5,x\nAAAAC,NA,x\naaaag,1.25,x\n";
        let table = parse_mutability(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["AAAAA"], 0.5);
        assert_eq!(table["AAAAG"], 1.25);
    }

    #[test]
    fn test_parse_mutability_missing_column() {
        let csv = "motif,value\nAAAAA,0.5\n";
        assert!(matches!(
            parse_mutability(csv.as_bytes()),
            Err(TableError::MissingColumn(c)) if c == "mutability"
        ));
    }

    #[test]
    fn test_parse_substitution() {
        let csv = "motif,A,C,G,T\nAAAAA,NA,0.2,0.5,0.3\n";
        let table = parse_substitution(csv.as_bytes()).unwrap();
        assert_eq!(table["AAAAA"], [0.0, 0.2, 0.5, 0.3]);
    }

    #[test]
    fn test_parse_effects() {
        let csv = "site,wildtype,mutant,affinity,expression\n\
                   1,M,A,-0.5,0.1\n\
                   1,M,*,,0.0\n\
                   3,G,V,0.25,NA\n";
        let effects = parse_effects(csv.as_bytes(), "affinity").unwrap();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0], (0, AminoAcid::from_char('A').unwrap(), -0.5));
        assert_eq!(effects[1].0, 2);

        let by_expression = parse_effects(csv.as_bytes(), "expression").unwrap();
        assert_eq!(by_expression.len(), 2);
    }

    #[test]
    fn test_parse_effects_bad_rows() {
        let zero_site = "site,mutant,affinity\n0,A,1.0\n";
        assert!(matches!(
            parse_effects(zero_site.as_bytes(), "affinity"),
            Err(TableError::Parse { row: 1, .. })
        ));
        let bad_mutant = "site,mutant,affinity\n1,A,1.0\n2,Xx,1.0\n";
        assert!(matches!(
            parse_effects(bad_mutant.as_bytes(), "affinity"),
            Err(TableError::Parse { row: 2, .. })
        ));
    }

    #[test]
    fn test_parse_sequences() {
        let input = "ACGT\n\n  ttga \n";
        let seqs = parse_sequences(input.as_bytes()).unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[1].to_string(), "TTGA");

        assert!(matches!(
            parse_sequences("ACGT\nACXT\n".as_bytes()),
            Err(TableError::Parse { row: 2, .. })
        ));
    }
}

//! JSON files holding arrays of trees in record form.

use crate::errors::TableError;
use crate::tree::TreeRecord;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Serialize `records` as a JSON array.
pub fn write_trees_to<W: Write>(writer: W, records: &[TreeRecord]) -> Result<(), TableError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

pub fn write_trees(path: &Path, records: &[TreeRecord]) -> Result<(), TableError> {
    write_trees_to(File::create(path)?, records)
}

/// Read a JSON array of trees. Nesting depth is unbounded, since an unpruned
/// tree is as deep as its longest chain of events.
pub fn read_trees_from<R: Read>(reader: R) -> Result<Vec<TreeRecord>, TableError> {
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(reader));
    de.disable_recursion_limit();
    let records = Vec::<TreeRecord>::deserialize(&mut de)?;
    de.end()?;
    Ok(records)
}

pub fn read_trees(path: &Path) -> Result<Vec<TreeRecord>, TableError> {
    read_trees_from(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Event, LineageState, Tree};
    use tempfile::tempdir;

    fn chain(depth: usize) -> TreeRecord {
        let mut record = TreeRecord {
            affinity: Some(0.0),
            time: depth as f64,
            event: Event::Sampling,
            sequence: None,
            children: Vec::new(),
        };
        for t in (0..depth).rev() {
            record = TreeRecord {
                affinity: Some(0.0),
                time: t as f64,
                event: if t == 0 { Event::Root } else { Event::Mutation },
                sequence: None,
                children: vec![record],
            };
        }
        record
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trees.json");
        let tree = Tree::new(LineageState::discrete(1.0));
        let records = vec![tree.to_record(), chain(3)];

        write_trees(&path, &records).unwrap();
        let back = read_trees(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_read_deep_tree() {
        // deeper than serde_json's default limit of 128
        let deep = vec![chain(400)];
        let mut buf = Vec::new();
        write_trees_to(&mut buf, &deep).unwrap();
        let back = read_trees_from(buf.as_slice()).unwrap();
        assert_eq!(back[0].size(), 401);
    }

    #[test]
    fn test_null_affinity() {
        let json = r#"[{"affinity": null, "time": 0.0, "event": "root", "children": []}]"#;
        let records = read_trees_from(json.as_bytes()).unwrap();
        let tree = Tree::from_record(&records[0]).unwrap();
        assert!(tree.root().phenotype().is_nan());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let json = r#"[] []"#;
        assert!(matches!(read_trees_from(json.as_bytes()), Err(TableError::Json(_))));
    }
}

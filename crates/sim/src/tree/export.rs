//! Recursive record form of a tree, as written to and read from JSON.

use super::{Event, LineageState, NodeId, Tree};
use crate::base::Sequence;
use crate::errors::InvalidSequence;
use serde::{Deserialize, Serialize};

/// A node and, nested, its whole subtree.
///
/// `affinity` is `null` when the phenotype is not a finite number; `event`
/// defaults to `"root"` and `children` to empty when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub affinity: Option<f64>,
    pub time: f64,
    #[serde(default)]
    pub event: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeRecord>,
}

impl TreeRecord {
    fn leaf(tree: &Tree, id: NodeId) -> Self {
        let node = tree.node(id);
        let phenotype = node.phenotype();
        Self {
            affinity: phenotype.is_finite().then_some(phenotype),
            time: node.time(),
            event: node.event(),
            sequence: node.sequence().map(Sequence::to_string),
            children: Vec::new(),
        }
    }

    fn state(&self) -> Result<LineageState, InvalidSequence> {
        let phenotype = self.affinity.unwrap_or(f64::NAN);
        match &self.sequence {
            Some(seq) => Ok(LineageState::with_sequence(phenotype, seq.parse()?)),
            None => Ok(LineageState::discrete(phenotype)),
        }
    }

    /// Number of records in this subtree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(record) = stack.pop() {
            count += 1;
            stack.extend(record.children.iter());
        }
        count
    }
}

impl Tree {
    /// Convert to the nested record form.
    pub fn to_record(&self) -> TreeRecord {
        // children have larger ids than parents, so a reverse sweep finishes
        // every subtree before its parent needs it
        let mut built: Vec<Option<TreeRecord>> = vec![None; self.len()];
        for id in (0..self.len()).rev() {
            let mut record = TreeRecord::leaf(self, id);
            record.children = self
                .node(id)
                .children()
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[id] = Some(record);
        }
        built[Tree::ROOT]
            .take()
            .unwrap_or_else(|| TreeRecord::leaf(self, Tree::ROOT))
    }

    /// Rebuild a tree from its record form. A missing or `null` affinity
    /// becomes NaN.
    pub fn from_record(record: &TreeRecord) -> Result<Tree, InvalidSequence> {
        let mut tree = Tree::new(record.state()?);
        {
            let root = tree.node_mut(Tree::ROOT);
            root.time = record.time;
            root.event = record.event;
        }

        let mut stack: Vec<(&TreeRecord, NodeId)> = vec![(record, Tree::ROOT)];
        while let Some((parent_record, parent)) = stack.pop() {
            for child in &parent_record.children {
                let id = tree.add_child(parent, child.state()?, child.time, child.event);
                stack.push((child, id));
            }
        }
        Ok(tree)
    }
}

//! Reduction of a grown tree to the ancestry of its sampled leaves.

use super::{Event, NodeId, Tree};

impl Tree {
    /// Drop every subtree without a sampled leaf, then fold away unary
    /// `Birth` nodes.
    ///
    /// A retained node whose only retained child is a non-leaf `Birth` node
    /// takes over that child's retained children directly; this repeats
    /// until the node has several children or its single child is something
    /// else. Node times are absolute, so no edge lengths need adjusting. The
    /// root is always retained, and a tree without sampled leaves prunes to
    /// the bare root. Pruning an already pruned tree changes nothing.
    pub fn prune(&mut self) {
        let keep = self.retention_mask();
        let before = self.len();

        let kept_children = |tree: &Tree, id: NodeId| -> Vec<NodeId> {
            tree.node(id)
                .children()
                .iter()
                .copied()
                .filter(|&c| keep[c])
                .collect()
        };

        let pruned = self.compact(|tree, id| {
            let mut kids = kept_children(tree, id);
            while let [only] = kids[..] {
                if tree.node(only).event() != Event::Birth {
                    break;
                }
                let grandkids = kept_children(tree, only);
                if grandkids.is_empty() {
                    break;
                }
                kids = grandkids;
            }
            kids
        });

        log::trace!("pruned tree from {before} to {} nodes", pruned.len());
        *self = pruned;
    }

    /// `mask[id]` is true when `id` is the root or has a sampled leaf at or
    /// below it.
    fn retention_mask(&self) -> Vec<bool> {
        let mut keep = vec![false; self.len()];
        // children always carry larger ids than their parents
        for id in (0..self.len()).rev() {
            let node = self.node(id);
            keep[id] = node.event() == Event::Sampling
                || node.children().iter().any(|&c| keep[c]);
        }
        keep[Tree::ROOT] = true;
        keep
    }
}

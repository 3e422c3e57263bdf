use super::node::{Event, LineageState, Node, NodeId};

/// A lineage tree stored as an arena of nodes.
///
/// Nodes refer to each other by index: every node keeps the id of its parent
/// and the ordered ids of its children, and the root is always id 0. Nodes
/// are only ever appended during growth, so a child's id is always larger than
/// its parent's. Removal happens by compaction into a new arena (see
/// [`Tree::prune`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Create a tree holding only a root lineage at time 0.
    pub fn new(state: LineageState) -> Self {
        Self {
            nodes: vec![Node::new(state, 0.0, Event::Root, None)],
        }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    /// Access a node.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Total number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True while the tree is a bare root that has never been grown.
    pub fn is_fresh(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Iterate over `(id, node)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Append a node under `parent`.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        state: LineageState,
        time: f64,
        event: Event,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(state, time, event, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Ids of all leaves, in creation order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
    }

    /// Ids of leaves tagged [`Event::Sampling`].
    pub fn sampled_leaves(&self) -> Vec<NodeId> {
        self.leaves()
            .filter(|&id| self.nodes[id].event == Event::Sampling)
            .collect()
    }

    /// Number of nodes carrying `event`.
    pub fn count_events(&self, event: Event) -> usize {
        self.nodes.iter().filter(|n| n.event == event).count()
    }

    /// Node ids in depth-first pre-order, children visited in creation order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// The path from the root that always follows the first child.
    pub fn first_lineage(&self) -> Vec<NodeId> {
        let mut path = vec![Self::ROOT];
        let mut current = Self::ROOT;
        while let Some(&next) = self.nodes[current].children.first() {
            path.push(next);
            current = next;
        }
        path
    }

    /// Number of lineages alive at time `t`.
    ///
    /// A node is alive from its own time until its first child's time; leaves
    /// other than deaths are alive until the end of the simulation, so `t`
    /// should not exceed the horizon the tree was grown to.
    pub fn population_at(&self, t: f64) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.event != Event::Death && node.time <= t)
            .filter(|node| match node.children.first() {
                Some(&child) => self.nodes[child].time > t,
                None => true,
            })
            .count()
    }

    /// Build a new arena containing the nodes reachable through `children_of`,
    /// starting at the root. `children_of(id)` returns the ids (in the old
    /// arena) that become the children of `id` in the new one. Node data is
    /// copied unchanged apart from the links.
    pub(crate) fn compact<F>(&self, mut children_of: F) -> Tree
    where
        F: FnMut(&Tree, NodeId) -> Vec<NodeId>,
    {
        let root = &self.nodes[Self::ROOT];
        let mut compacted = Tree {
            nodes: vec![Node::new(root.state.clone(), root.time, root.event, None)],
        };

        // (old id, new id) pairs whose children still need copying
        let mut stack = vec![(Self::ROOT, Self::ROOT)];
        while let Some((old_id, new_id)) = stack.pop() {
            let kids = children_of(self, old_id);
            let mut pending = Vec::with_capacity(kids.len());
            for old_child in kids {
                let child = &self.nodes[old_child];
                let new_child =
                    compacted.add_child(new_id, child.state.clone(), child.time, child.event);
                pending.push((old_child, new_child));
            }
            stack.extend(pending.into_iter().rev());
        }
        compacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(x: f64) -> LineageState {
        LineageState::discrete(x)
    }

    /// root(0) ─┬─ birth(1) ── mutation(2)
    ///          └─ birth(1) ── death(3)
    fn small_tree() -> Tree {
        let mut tree = Tree::new(state(0.0));
        let a = tree.add_child(Tree::ROOT, state(0.0), 1.0, Event::Birth);
        let b = tree.add_child(Tree::ROOT, state(0.0), 1.0, Event::Birth);
        tree.add_child(a, state(0.5), 2.0, Event::Mutation);
        tree.add_child(b, state(0.0), 3.0, Event::Death);
        tree
    }

    #[test]
    fn test_new_tree_is_fresh_root() {
        let tree = Tree::new(state(1.5));
        assert!(tree.is_fresh());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().event(), Event::Root);
        assert_eq!(tree.root().time(), 0.0);
        assert_eq!(tree.root().parent(), None);
        assert_eq!(tree.root().phenotype(), 1.5);
    }

    #[test]
    fn test_links() {
        let tree = small_tree();
        assert!(!tree.is_fresh());
        assert_eq!(tree.root().children(), &[1, 2]);
        assert_eq!(tree.node(3).parent(), Some(1));
        assert_eq!(tree.node(4).parent(), Some(2));
        assert!(tree.get(5).is_none());
    }

    #[test]
    fn test_leaves_and_counts() {
        let tree = small_tree();
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(tree.count_events(Event::Birth), 2);
        assert_eq!(tree.count_events(Event::Death), 1);
        assert!(tree.sampled_leaves().is_empty());
    }

    #[test]
    fn test_preorder_and_first_lineage() {
        let tree = small_tree();
        assert_eq!(tree.preorder(), vec![0, 1, 3, 2, 4]);
        assert_eq!(tree.first_lineage(), vec![0, 1, 3]);
    }

    #[test]
    fn test_population_at() {
        let tree = small_tree();
        assert_eq!(tree.population_at(0.5), 1);
        assert_eq!(tree.population_at(1.5), 2);
        assert_eq!(tree.population_at(2.5), 2);
        assert_eq!(tree.population_at(3.5), 1);
    }

    #[test]
    fn test_compact_keeps_selected_children() {
        let tree = small_tree();
        let compacted = tree.compact(|t, id| {
            t.node(id)
                .children()
                .iter()
                .copied()
                .filter(|&c| t.node(c).event() != Event::Death)
                .collect()
        });
        // the second birth survives but loses its death child
        assert_eq!(compacted.len(), 4);
        assert_eq!(compacted.preorder().len(), 4);
        assert_eq!(compacted.node(1).children().len(), 1);
        assert!(compacted.node(compacted.root().children()[1]).is_leaf());
    }
}

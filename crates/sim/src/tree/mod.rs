//! Lineage trees: the arena, survivor sampling, pruning and the record form.

mod arena;
mod export;
mod node;
mod pruning;
mod sampling;

pub use arena::Tree;
pub use export::TreeRecord;
pub use node::{Event, LineageState, Node, NodeId};

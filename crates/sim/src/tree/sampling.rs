//! Survivor sampling.

use super::{Event, NodeId, Tree};
use crate::errors::ConfigurationError;
use rand::Rng;

impl Tree {
    /// Leaves that reached the end of growth alive: neither deaths nor the
    /// bare root, and not already sampled.
    pub fn survivors(&self) -> Vec<NodeId> {
        self.leaves()
            .filter(|&id| id != Tree::ROOT)
            .filter(|&id| !matches!(self.node(id).event(), Event::Death | Event::Sampling))
            .collect()
    }

    /// Independently mark each survivor as sampled with probability `p`.
    ///
    /// Sampled leaves are retagged [`Event::Sampling`]; the others keep the
    /// tag of their last event. Topology is left untouched. Returns the number
    /// of leaves sampled by this call.
    ///
    /// The root is never sampled, even when it is the only leaf: a tree in
    /// which nothing happened before the horizon yields zero samples, and a
    /// retry loop with `min_sampled >= 1` regrows it.
    pub fn sample_survivors<R: Rng + ?Sized>(
        &mut self,
        p: f64,
        rng: &mut R,
    ) -> Result<usize, ConfigurationError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigurationError::InvalidProbability("sampling", p));
        }

        let mut sampled = 0;
        for id in self.survivors() {
            if rng.random_bool(p) {
                self.node_mut(id).event = Event::Sampling;
                sampled += 1;
            }
        }
        log::trace!("sampled {sampled} survivors with p = {p}");
        Ok(sampled)
    }
}

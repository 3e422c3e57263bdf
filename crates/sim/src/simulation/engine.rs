//! Branching-process engine.
//!
//! This module grows a lineage tree forward in continuous time. Every active
//! lineage has exactly one pending event (birth, death or mutation) drawn from
//! its current rates; events from all lineages are processed in global time
//! order until none is left before the horizon.

use super::parameters::{CapacityMethod, EvolveConfig};
use crate::errors::{ConfigurationError, TreeError};
use crate::evolution::{Mutator, Response};
use crate::tree::{Event, LineageState, NodeId, Tree};
use log::{debug, trace};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

/// A continuous-time multitype birth-death-mutation process.
///
/// Holds the three rate responses, the mutation model and the growth
/// parameters. All of them are validated on construction, so
/// [`BranchingProcess::evolve`] only fails for the root it is given or for
/// the way the tree happens to grow.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchingProcess {
    birth: Response,
    death: Response,
    mutation: Response,
    mutator: Mutator,
    config: EvolveConfig,
}

impl BranchingProcess {
    pub fn new(
        birth: Response,
        death: Response,
        mutation: Response,
        mutator: Mutator,
        config: EvolveConfig,
    ) -> Result<Self, ConfigurationError> {
        birth.validate("birth")?;
        death.validate("death")?;
        mutation.validate("mutation")?;
        config.validate()?;
        Ok(Self {
            birth,
            death,
            mutation,
            mutator,
            config,
        })
    }

    pub fn birth(&self) -> &Response {
        &self.birth
    }

    pub fn death(&self) -> &Response {
        &self.death
    }

    pub fn mutation(&self) -> &Response {
        &self.mutation
    }

    pub fn mutator(&self) -> &Mutator {
        &self.mutator
    }

    pub fn config(&self) -> &EvolveConfig {
        &self.config
    }

    /// Same process with different growth parameters.
    pub fn with_config(&self, config: EvolveConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            ..self.clone()
        })
    }

    /// Check that a root state can be grown by this process.
    pub fn check_root(&self, root: &LineageState) -> Result<(), ConfigurationError> {
        self.mutator.check_root(root)?;
        let needs_sequence = [&self.birth, &self.death, &self.mutation]
            .iter()
            .any(|r| r.requires_sequence());
        if needs_sequence && root.sequence.is_none() {
            return Err(ConfigurationError::MissingSequence("sequence-context response"));
        }
        Ok(())
    }

    /// Grow `tree` from its root up to the horizon.
    ///
    /// The tree must be fresh (a bare root). On success the grown tree is
    /// returned; every lineage alive at the horizon ends in a leaf tagged with
    /// its last event.
    ///
    /// # Errors
    /// - [`TreeError::NotFresh`] if the tree already has descendants
    /// - [`TreeError::Configuration`] if the root does not fit the models
    /// - [`TreeError::Extinction`] if every lineage dies, or fewer than
    ///   `min_survivors` lineages reach the horizon
    /// - [`TreeError::Mutation`] if the mutator rejects a lineage state
    pub fn evolve<R: Rng + ?Sized>(&self, tree: Tree, rng: &mut R) -> Result<Tree, TreeError> {
        if !tree.is_fresh() {
            return Err(TreeError::NotFresh);
        }
        self.check_root(tree.root().state())?;

        let mut growth = Growth {
            process: self,
            tree,
            active: ActiveSet::default(),
            queue: BinaryHeap::new(),
            suppressed: 0,
            killed: 0,
        };
        growth.admit(Tree::ROOT, 0.0, rng)?;
        growth.run(rng)?;

        let survivors = growth.active.len();
        debug!(
            "Grew tree to t = {}: {} nodes, {} survivors, {} suppressed births, {} capacity deaths",
            self.config.horizon,
            growth.tree.len(),
            survivors,
            growth.suppressed,
            growth.killed
        );
        if survivors < self.config.min_survivors {
            return Err(TreeError::Extinction {
                survivors,
                min_survivors: self.config.min_survivors,
            });
        }
        Ok(growth.tree)
    }

    /// Draw the next event of a lineage in `state` whose clock starts at
    /// `t0`. `None` means nothing happens before the horizon.
    fn next_event<R: Rng + ?Sized>(
        &self,
        state: &LineageState,
        t0: f64,
        rng: &mut R,
    ) -> Result<Option<(f64, Event)>, ConfigurationError> {
        let horizon = self.config.horizon;
        let homogeneous = self.birth.is_time_homogeneous()
            && self.death.is_time_homogeneous()
            && self.mutation.is_time_homogeneous();

        if homogeneous {
            let rates = self.rates(state, t0);
            let total = checked_total(rates)?;
            if total <= 0.0 {
                return Ok(None);
            }
            let t = t0 + waiting_time(total, rng)?;
            if t > horizon {
                return Ok(None);
            }
            return Ok(Some((t, choose_event(rates, total, rng))));
        }

        // thinning: propose at a rate bounding the true one over the rest of
        // the window, accept with probability rate/bound
        let mut t = t0;
        loop {
            let bound = checked_total([
                self.birth.rate_bound(state, t, horizon),
                self.death.rate_bound(state, t, horizon),
                self.mutation.rate_bound(state, t, horizon),
            ])?;
            if bound <= 0.0 {
                return Ok(None);
            }
            t += waiting_time(bound, rng)?;
            if t > horizon {
                return Ok(None);
            }
            let rates = self.rates(state, t);
            let total = checked_total(rates)?;
            if rng.random::<f64>() * bound < total {
                return Ok(Some((t, choose_event(rates, total, rng))));
            }
        }
    }

    #[inline]
    fn rates(&self, state: &LineageState, t: f64) -> [f64; 3] {
        [
            self.birth.rate(state, t),
            self.death.rate(state, t),
            self.mutation.rate(state, t),
        ]
    }
}

fn checked_total(rates: [f64; 3]) -> Result<f64, ConfigurationError> {
    let total: f64 = rates.iter().sum();
    if !total.is_finite() || rates.iter().any(|&r| r < 0.0) {
        return Err(ConfigurationError::NegativeRate("total event", total));
    }
    Ok(total)
}

/// Exponential waiting time with the given positive rate, never zero.
fn waiting_time<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> Result<f64, ConfigurationError> {
    let exp = Exp::new(rate).map_err(|_| ConfigurationError::NegativeRate("total event", rate))?;
    loop {
        let dt: f64 = exp.sample(rng);
        if dt > 0.0 {
            return Ok(dt);
        }
    }
}

/// Categorical draw of the event type proportional to `[birth, death,
/// mutation]` rates.
fn choose_event<R: Rng + ?Sized>(rates: [f64; 3], total: f64, rng: &mut R) -> Event {
    let u = rng.random::<f64>() * total;
    if u < rates[0] {
        Event::Birth
    } else if u < rates[0] + rates[1] {
        Event::Death
    } else {
        Event::Mutation
    }
}

/// A lineage's next event, ordered by time and then by node id.
#[derive(Debug, Clone, Copy)]
struct Pending {
    time: f64,
    node: NodeId,
    event: Event,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.node.cmp(&other.node))
    }
}

/// Active lineages with O(1) insertion, removal and uniform choice.
#[derive(Debug, Default)]
struct ActiveSet {
    nodes: Vec<NodeId>,
    position: HashMap<NodeId, usize>,
}

impl ActiveSet {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.position.contains_key(&node)
    }

    fn insert(&mut self, node: NodeId) {
        self.position.insert(node, self.nodes.len());
        self.nodes.push(node);
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(idx) = self.position.remove(&node) {
            self.nodes.swap_remove(idx);
            if let Some(&moved) = self.nodes.get(idx) {
                self.position.insert(moved, idx);
            }
        }
    }

    fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(self.nodes[rng.random_range(0..self.nodes.len())])
    }
}

/// Mutable state of one `evolve` call.
struct Growth<'a> {
    process: &'a BranchingProcess,
    tree: Tree,
    active: ActiveSet,
    /// Min-heap of pending events. Entries of lineages that are no longer
    /// active are stale and skipped.
    queue: BinaryHeap<Reverse<Pending>>,
    suppressed: usize,
    killed: usize,
}

impl Growth<'_> {
    /// Make `node` an active lineage and draw its first event from `t`.
    fn admit<R: Rng + ?Sized>(
        &mut self,
        node: NodeId,
        t: f64,
        rng: &mut R,
    ) -> Result<(), ConfigurationError> {
        self.active.insert(node);
        self.schedule(node, t, rng)
    }

    fn schedule<R: Rng + ?Sized>(
        &mut self,
        node: NodeId,
        t: f64,
        rng: &mut R,
    ) -> Result<(), ConfigurationError> {
        let next = self
            .process
            .next_event(self.tree.node(node).state(), t, rng)?;
        if let Some((time, event)) = next {
            self.queue.push(Reverse(Pending { time, node, event }));
        }
        Ok(())
    }

    fn retire(&mut self, node: NodeId, t: f64) {
        let state = self.tree.node(node).state().clone();
        self.tree.add_child(node, state, t, Event::Death);
        self.active.remove(node);
    }

    fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), TreeError> {
        let config = *self.process.config();
        while let Some(Reverse(Pending { time, node, event })) = self.queue.pop() {
            if !self.active.contains(node) {
                continue;
            }
            trace!("t = {time:.4}: {event} at node {node}");

            match event {
                Event::Birth => {
                    let full = config.capacity.is_some_and(|cap| self.active.len() >= cap);
                    if full && config.capacity_method == CapacityMethod::Birth {
                        self.suppressed += 1;
                        self.schedule(node, time, rng)?;
                        continue;
                    }

                    let state = self.tree.node(node).state().clone();
                    self.active.remove(node);
                    for _ in 0..2 {
                        let child = self.tree.add_child(node, state.clone(), time, Event::Birth);
                        self.admit(child, time, rng)?;
                    }

                    if let Some(cap) = config.capacity {
                        while self.active.len() > cap {
                            let Some(victim) = self.active.choose(rng) else {
                                break;
                            };
                            self.retire(victim, time);
                            self.killed += 1;
                        }
                    }
                }
                Event::Death => {
                    self.retire(node, time);
                    if self.active.is_empty() {
                        debug!("Population went extinct at t = {time:.4}");
                        return Err(TreeError::Extinction {
                            survivors: 0,
                            min_survivors: config.min_survivors,
                        });
                    }
                }
                Event::Mutation => {
                    let state = self
                        .process
                        .mutator()
                        .mutate(self.tree.node(node).state(), rng)?;
                    self.active.remove(node);
                    let child = self.tree.add_child(node, state, time, Event::Mutation);
                    self.admit(child, time, rng)?;
                }
                Event::Root | Event::Sampling => {}
            }
        }
        Ok(())
    }
}

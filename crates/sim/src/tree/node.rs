use crate::base::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a node inside its [`Tree`](super::Tree) arena.
pub type NodeId = usize;

/// The event that produced a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// The initial lineage; the only node without a producing event.
    #[default]
    Root,
    Birth,
    Death,
    Mutation,
    /// A survivor selected by the sampling pass.
    Sampling,
}

impl Event {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Birth => "birth",
            Self::Death => "death",
            Self::Mutation => "mutation",
            Self::Sampling => "sampling",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Event {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Self::Root),
            "birth" => Ok(Self::Birth),
            "death" => Ok(Self::Death),
            "mutation" => Ok(Self::Mutation),
            "sampling" => Ok(Self::Sampling),
            other => Err(format!("unknown event '{other}'")),
        }
    }
}

/// The heritable state of a lineage.
///
/// In sequence mode the phenotype is always the GP-map image of `sequence`;
/// only the mutator writes either field.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageState {
    pub phenotype: f64,
    pub sequence: Option<Sequence>,
}

impl LineageState {
    /// State of a discrete-mode lineage.
    pub fn discrete(phenotype: f64) -> Self {
        Self {
            phenotype,
            sequence: None,
        }
    }

    /// State of a sequence-mode lineage with its derived phenotype.
    pub fn with_sequence(phenotype: f64, sequence: Sequence) -> Self {
        Self {
            phenotype,
            sequence: Some(sequence),
        }
    }
}

/// One lineage over the interval between two consecutive events.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) state: LineageState,
    pub(crate) time: f64,
    pub(crate) event: Event,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(state: LineageState, time: f64, event: Event, parent: Option<NodeId>) -> Self {
        Self {
            state,
            time,
            event,
            parent,
            children: Vec::new(),
        }
    }

    pub fn state(&self) -> &LineageState {
        &self.state
    }

    #[inline]
    pub fn phenotype(&self) -> f64 {
        self.state.phenotype
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.state.sequence.as_ref()
    }

    /// Absolute time at which this node's interval begins.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn event(&self) -> Event {
        self.event
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_text_roundtrip() {
        for event in [
            Event::Root,
            Event::Birth,
            Event::Death,
            Event::Mutation,
            Event::Sampling,
        ] {
            assert_eq!(event.as_str().parse::<Event>(), Ok(event));
        }
        assert!("survival".parse::<Event>().is_err());
    }

    #[test]
    fn test_event_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Event::Mutation).unwrap(), "\"mutation\"");
        let event: Event = serde_json::from_str("\"sampling\"").unwrap();
        assert_eq!(event, Event::Sampling);
    }

    #[test]
    fn test_default_event_is_root() {
        assert_eq!(Event::default(), Event::Root);
    }
}

//! Computation report: the final state of every visited node, in visit order.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::state::ComputeState;
use crate::graph::NodeRef;

/// Per-node outcome of one computation, keyed by node identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    states: IndexMap<NodeRef, ComputeState>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, node: &NodeRef, state: ComputeState) {
        self.states.insert(node.clone(), state);
    }

    pub fn get(&self, node: &NodeRef) -> Option<&ComputeState> {
        self.states.get(node)
    }

    pub fn contains(&self, node: &NodeRef) -> bool {
        self.states.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Visited nodes and their states, in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeRef, &ComputeState)> {
        self.states.iter()
    }
}

/// Serializes as an object keyed by `name#id`.
impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.states.len()))?;
        for (node, state) in &self.states {
            map.serialize_entry(&node.to_string(), state)?;
        }
        map.end()
    }
}

//! Graph Nodes
//!
//! This module defines the node capability and the handle the graph stores.
//!
//! A node is anything implementing [`Node`]. The graph never looks inside a
//! node: it only asks it to compute against a [`Context`] and whether it is a
//! decision node. Nodes are wrapped once into a [`NodeRef`], which gives them
//! a stable identity. Two nodes that behave identically are still distinct;
//! clones of the same `NodeRef` are the same node.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::compute::{ComputeState, Context};

/// Unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work in a workflow graph.
///
/// `decide_capability` must be a stable property of the node: it is queried
/// when links are added and again at every propagation step.
pub trait Node: Send + Sync {
    /// Run the node against the shared context.
    fn compute(&self, context: &mut Context) -> ComputeState;

    /// Whether this node chooses between a true and a false branch.
    fn decide_capability(&self) -> bool {
        false
    }

    /// Name used in diagnostics and error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared, identity-bearing handle to a node.
#[derive(Clone)]
pub struct NodeRef {
    id: NodeId,
    node: Arc<dyn Node>,
}

impl NodeRef {
    /// Wrap a node, giving it a fresh identity.
    pub fn new<N>(node: N) -> Self
    where
        N: Node + 'static,
    {
        Self {
            id: NodeId::new(),
            node: Arc::new(node),
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn decide_capability(&self) -> bool {
        self.node.decide_capability()
    }

    pub fn compute(&self, context: &mut Context) -> ComputeState {
        self.node.compute(context)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name(), self.id)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("decide", &self.decide_capability())
            .finish()
    }
}

//! Node System
//!
//! The node system owns a workflow graph: its nodes, its links and the join
//! mode of each node. It has two phases.
//!
//! While *building*, nodes, join modes and links can be added freely and
//! [`NodeSystem::is_valid`] can be called at any time to check the graph.
//!
//! [`NodeSystem::activate`] compiles the link list into the forward and
//! backward adjacency indexes, computes the initial nodes and freezes the
//! system. An activated system is read-only and can be shared by any number
//! of computations.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::link::{Adjacency, Link};
use super::node::{NodeId, NodeRef};
use super::validation;
use crate::branch::Branch;
use crate::error::{GraphError, GraphResult, ValidationErrors};

/// How a node's incoming links combine to authorize it to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JoinMode {
    /// Every ancestor must continue on its feeding link.
    And,
    /// At least one ancestor must continue on its feeding link.
    Or,
    /// Exactly one ancestor must continue on its feeding link.
    #[default]
    None,
}

/// Adjacency compiled at activation.
#[derive(Debug, Clone, Default)]
struct Compiled {
    initial: Vec<NodeRef>,
    followers: Adjacency,
    ancestors: Adjacency,
}

/// A workflow graph under construction or ready to compute.
#[derive(Debug, Clone, Default)]
pub struct NodeSystem {
    nodes: Vec<NodeRef>,
    links: Vec<Link>,
    join_modes: IndexMap<NodeId, JoinMode>,
    compiled: Option<Compiled>,
}

impl NodeSystem {
    /// Create a new empty system.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_activated(&self) -> bool {
        self.compiled.is_some()
    }

    fn ensure_building(&self) -> GraphResult<()> {
        if self.is_activated() {
            Err(GraphError::Frozen)
        } else {
            Ok(())
        }
    }

    /// Append a node. Duplicates are caught by validation, not here.
    pub fn add_node(&mut self, node: NodeRef) -> GraphResult<()> {
        self.ensure_building()?;
        self.nodes.push(node);
        Ok(())
    }

    /// Set or overwrite the join mode of `node`.
    pub fn configure_join_mode_on_node(
        &mut self,
        node: &NodeRef,
        mode: JoinMode,
    ) -> GraphResult<()> {
        self.ensure_building()?;
        self.join_modes.insert(node.id(), mode);
        Ok(())
    }

    /// Add an unconditional link. `from` must not be a decision node.
    pub fn add_link(&mut self, from: &NodeRef, to: &NodeRef) -> GraphResult<()> {
        self.add_tagged_link(from, to, None)
    }

    /// Add a link leaving a decision node on the given branch.
    pub fn add_link_on_branch(
        &mut self,
        from: &NodeRef,
        to: &NodeRef,
        branch: bool,
    ) -> GraphResult<()> {
        self.add_tagged_link(from, to, Some(branch))
    }

    fn add_tagged_link(
        &mut self,
        from: &NodeRef,
        to: &NodeRef,
        branch: Branch,
    ) -> GraphResult<()> {
        self.ensure_building()?;
        let link = Link::new(Some(from), Some(to), branch)?;
        self.links.push(link);
        Ok(())
    }

    /// Check the current graph without changing it.
    ///
    /// Returns every error found by every check.
    pub fn is_valid(&self) -> Result<(), ValidationErrors> {
        let errors = validation::validate(&self.nodes, &self.links);
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(errors = errors.len(), "node system failed validation");
            Err(errors)
        }
    }

    /// Compile and freeze the system. Activating twice is a no-op.
    pub fn activate(&mut self) -> GraphResult<()> {
        if self.is_activated() {
            trace!("node system already activated");
            return Ok(());
        }
        self.is_valid().map_err(GraphError::NotValidated)?;

        let mut followers = Adjacency::new();
        let mut ancestors = Adjacency::new();
        for link in &self.links {
            followers.push(link.from(), link.branch(), link.to().clone());
            ancestors.push(link.to(), link.branch(), link.from().clone());
        }

        let initial: Vec<NodeRef> = self
            .nodes
            .iter()
            .filter(|node| !self.links.iter().any(|link| link.to() == *node))
            .cloned()
            .collect();

        debug!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            initial = initial.len(),
            keys = followers.len(),
            "node system activated"
        );

        self.compiled = Some(Compiled {
            initial,
            followers,
            ancestors,
        });
        Ok(())
    }

    /// The configured join mode of `node`, or [`JoinMode::None`].
    pub fn join_mode_of_node(&self, node: &NodeRef) -> JoinMode {
        self.join_modes.get(&node.id()).copied().unwrap_or_default()
    }

    /// Nodes without incoming links, in declaration order.
    ///
    /// Empty until the system is activated.
    pub fn initial_nodes(&self) -> &[NodeRef] {
        self.compiled
            .as_ref()
            .map(|compiled| compiled.initial.as_slice())
            .unwrap_or(&[])
    }

    /// Targets of links leaving `node` on exactly `branch`, in link order.
    pub fn follow(&self, node: &NodeRef, branch: Branch) -> GraphResult<&[NodeRef]> {
        let compiled = self.compiled.as_ref().ok_or(GraphError::NotActivated)?;
        Ok(compiled.followers.get(node, branch))
    }

    /// Sources of links entering `node` on exactly `branch`, in link order.
    pub fn ancestors(&self, node: &NodeRef, branch: Branch) -> GraphResult<&[NodeRef]> {
        let compiled = self.compiled.as_ref().ok_or(GraphError::NotActivated)?;
        Ok(compiled.ancestors.get(node, branch))
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

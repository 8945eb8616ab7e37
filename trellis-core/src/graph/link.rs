//! Links and Adjacency
//!
//! A [`Link`] is a directed edge between two nodes, optionally tagged with a
//! branch. Links leaving a decision node must carry a tag; links leaving any
//! other node must not.
//!
//! At activation the link list is compiled into two [`Adjacency`] indexes:
//! forward ("followers") and backward ("ancestors"). Both are keyed by the
//! exact `(node, branch)` pair and keep link-declaration order.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::node::{NodeId, NodeRef};
use crate::branch::{self, Branch};
use crate::error::LinkError;

/// A directed, optionally branch-tagged edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    from: NodeRef,
    to: NodeRef,
    branch: Branch,
}

impl Link {
    /// Build a link, checking endpoints and branch in this order:
    /// source present, branch matches the source's decide capability,
    /// target present, source and target distinct.
    pub fn new(
        from: Option<&NodeRef>,
        to: Option<&NodeRef>,
        branch: Branch,
    ) -> Result<Self, LinkError> {
        let from = from.ok_or(LinkError::MissingFrom)?;
        if from.decide_capability() != branch.is_some() {
            return Err(LinkError::BranchMismatch {
                from: from.clone(),
                branch,
            });
        }
        let to = to.ok_or(LinkError::MissingTo)?;
        if from == to {
            return Err(LinkError::SelfLoop { node: from.clone() });
        }

        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            branch,
        })
    }

    pub fn from(&self) -> &NodeRef {
        &self.from
    }

    pub fn to(&self) -> &NodeRef {
        &self.to
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.branch {
            None => write!(f, "{} -> {}", self.from, self.to),
            Some(_) => write!(
                f,
                "{} -[{}]-> {}",
                self.from,
                branch::label(self.branch),
                self.to
            ),
        }
    }
}

/// Ordered node lists keyed by `(node, branch)`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Adjacency {
    entries: IndexMap<(NodeId, Branch), SmallVec<[NodeRef; 4]>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` to the list recorded for `(key, branch)`.
    pub fn push(&mut self, key: &NodeRef, branch: Branch, node: NodeRef) {
        self.entries
            .entry((key.id(), branch))
            .or_default()
            .push(node);
    }

    /// The nodes recorded for the exact `(key, branch)` pair.
    pub fn get(&self, key: &NodeRef, branch: Branch) -> &[NodeRef] {
        self.entries
            .get(&(key.id(), branch))
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct `(node, branch)` keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

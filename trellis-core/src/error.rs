//! Error types for building, validating, activating and computing graphs.

use std::fmt;

use thiserror::Error;

use crate::branch::{self, Branch};
use crate::compute::NodeError;
use crate::graph::{Link, NodeId, NodeRef};

/// A link could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("link has no source node")]
    MissingFrom,

    #[error("branch `{}` does not match decide capability of `{from}`", branch_label(.branch))]
    BranchMismatch { from: NodeRef, branch: Branch },

    #[error("link has no target node")]
    MissingTo,

    #[error("node `{node}` cannot link to itself")]
    SelfLoop { node: NodeRef },
}

/// A structural defect found by [`NodeSystem::is_valid`](crate::graph::NodeSystem::is_valid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("decision node `{node}` has no outgoing link")]
    OrphanDecision { node: NodeRef },

    #[error("cycle detected: {}", display_links(.links))]
    Cycle { links: Vec<Link> },

    #[error("link {link} references undeclared node `{node}`")]
    UndeclaredNode { node: NodeRef, link: Link },

    #[error("node `{node}` is declared more than once")]
    DuplicateNode { node: NodeRef },
}

fn branch_label(branch: &Branch) -> &'static str {
    branch::label(*branch)
}

fn display_links(links: &[Link]) -> String {
    links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every error accumulated by one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors raised by [`NodeSystem`](crate::graph::NodeSystem) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node system is activated and can no longer be modified")]
    Frozen,

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("node system is not valid:\n{0}")]
    NotValidated(ValidationErrors),

    #[error("node system is not activated")]
    NotActivated,
}

/// Errors raised while creating or running a
/// [`Computation`](crate::compute::Computation).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("computation requires an activated node system")]
    NotActivated,

    #[error("computation has already been run")]
    AlreadyComputed,

    /// A node aborted. Displays as the node's own error.
    #[error("{error}")]
    Aborted {
        node: NodeId,
        name: String,
        #[source]
        error: NodeError,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ComputeError {
    /// The error of the aborting node, if this is an abort.
    pub fn node_error(&self) -> Option<&NodeError> {
        match self {
            Self::Aborted { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

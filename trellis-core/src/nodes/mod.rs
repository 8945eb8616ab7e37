//! Reference Nodes
//!
//! Two ready-made [`Node`](crate::graph::Node) implementations, each wrapping
//! a single closure:
//!
//! - [`ActionNode`] performs a side effect on the context and continues, or
//!   aborts with the closure's error.
//! - [`DecisionNode`] inspects the context and continues on the true or false
//!   branch, or aborts with the closure's error.
//!
//! Anything else can implement [`Node`](crate::graph::Node) directly.

mod action;
mod decision;

pub use action::ActionNode;
pub use decision::DecisionNode;

use crate::compute::{BoxError, Context};
use crate::graph::NodeRef;

/// Wrap an action closure into a node handle.
pub fn action<F>(name: impl Into<String>, f: F) -> NodeRef
where
    F: Fn(&mut Context) -> Result<(), BoxError> + Send + Sync + 'static,
{
    NodeRef::new(ActionNode::new(name, f))
}

/// Wrap a decision closure into a node handle.
pub fn decision<F>(name: impl Into<String>, f: F) -> NodeRef
where
    F: Fn(&Context) -> Result<bool, BoxError> + Send + Sync + 'static,
{
    NodeRef::new(DecisionNode::new(name, f))
}

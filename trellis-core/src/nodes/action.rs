//! Action nodes.

use crate::compute::{BoxError, ComputeState, Context};
use crate::graph::Node;

type ActionFn = dyn Fn(&mut Context) -> Result<(), BoxError> + Send + Sync;

/// A node that runs a side effect against the context.
pub struct ActionNode {
    name: String,
    f: Box<ActionFn>,
}

impl ActionNode {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Context) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl Node for ActionNode {
    fn compute(&self, context: &mut Context) -> ComputeState {
        match (self.f)(context) {
            Ok(()) => ComputeState::proceed(),
            Err(error) => ComputeState::abort(error),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

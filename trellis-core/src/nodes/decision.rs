//! Decision nodes.

use crate::compute::{BoxError, ComputeState, Context};
use crate::graph::Node;

type DecisionFn = dyn Fn(&Context) -> Result<bool, BoxError> + Send + Sync;

/// A node that picks the true or false branch based on the context.
pub struct DecisionNode {
    name: String,
    f: Box<DecisionFn>,
}

impl DecisionNode {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Context) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }
}

impl Node for DecisionNode {
    fn compute(&self, context: &mut Context) -> ComputeState {
        match (self.f)(context) {
            Ok(branch) => ComputeState::continue_on_branch(branch),
            Err(error) => ComputeState::abort(error),
        }
    }

    fn decide_capability(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }
}

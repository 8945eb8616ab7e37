//! Computation
//!
//! A computation runs one traversal of an activated [`NodeSystem`] against
//! one [`Context`].
//!
//! # Algorithm
//!
//! Traversal starts from the system's initial nodes in declaration order and
//! proceeds depth-first. Each node reached gets a disposition:
//!
//! 1. Count its ancestors over all three branch tags (C), how many of them
//!    already have a recorded state (K), and how many of those continued on
//!    exactly the tag of the link feeding this node (W).
//! 2. If `K != C` the node is not ready. Nothing happens; the node is reached
//!    again when its next ancestor finishes.
//! 3. If `C == 0` it is an initial node and runs.
//! 4. Otherwise its join mode decides: `And` runs iff `W == C`, `Or` runs iff
//!    `W > 0`, `None` runs iff `W == 1`. Anything else is skipped.
//!
//! Nodes that run or are skipped then propagate to their followers. Which
//! links are followed depends only on the node's decide capability: a decision
//! node follows its true and then its false branch, any other node its
//! unconditional links. Followers on a branch the node did not take are
//! reached too; their join sees no winning ancestor and they are recorded as
//! skipped, so joins below an if/else still resolve. The first node to abort
//! stops the whole traversal.

use tracing::{debug, debug_span, trace};

use super::context::Context;
use super::report::Report;
use super::state::ComputeState;
use crate::branch;
use crate::error::ComputeError;
use crate::graph::{JoinMode, NodeRef, NodeSystem};

/// What to do with a node when it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    NotReady,
    Run,
    Skip,
}

/// Ancestor tallies for one node.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: usize,
    known: usize,
    winning: usize,
}

/// One traversal of an activated node system.
pub struct Computation<'a> {
    system: &'a NodeSystem,
    context: &'a mut Context,
    report: Report,
    status: bool,
    computed: bool,
}

impl<'a> Computation<'a> {
    /// Prepare a computation. Fails if `system` has not been activated.
    pub fn new(system: &'a NodeSystem, context: &'a mut Context) -> Result<Self, ComputeError> {
        if !system.is_activated() {
            return Err(ComputeError::NotActivated);
        }

        Ok(Self {
            system,
            context,
            report: Report::new(),
            status: false,
            computed: false,
        })
    }

    /// Run the traversal.
    ///
    /// Returns the error of the first node that aborts. Whatever happened
    /// before the abort stays in the context and the report. A computation
    /// runs once; calling this again fails with
    /// [`ComputeError::AlreadyComputed`] and changes nothing.
    pub fn compute(&mut self) -> Result<(), ComputeError> {
        if self.computed {
            return Err(ComputeError::AlreadyComputed);
        }
        self.computed = true;

        let span = debug_span!("computation", initial = self.system.initial_nodes().len());
        let _enter = span.enter();

        let system = self.system;
        for node in system.initial_nodes() {
            if let Err(error) = self.visit(node) {
                if let ComputeError::Aborted { name, .. } = &error {
                    debug!(
                        node = %name,
                        %error,
                        visited = self.report.len(),
                        "computation aborted"
                    );
                }
                return Err(error);
            }
        }

        self.status = true;
        debug!(visited = self.report.len(), "computation completed");
        Ok(())
    }

    fn visit(&mut self, node: &NodeRef) -> Result<(), ComputeError> {
        if self.report.contains(node) {
            return Ok(());
        }

        match self.disposition(node)? {
            Disposition::NotReady => return Ok(()),
            Disposition::Skip => self.report.record(node, ComputeState::skip()),
            Disposition::Run => {
                let state = node.compute(&mut *self.context);
                if let Some(error) = state.error().cloned() {
                    self.report.record(node, state);
                    return Err(ComputeError::Aborted {
                        node: node.id(),
                        name: node.to_string(),
                        error,
                    });
                }
                self.report.record(node, state);
            }
        }

        let system = self.system;
        for tag in branch::outgoing(node.decide_capability()) {
            for follower in system.follow(node, tag)? {
                self.visit(follower)?;
            }
        }

        Ok(())
    }

    fn disposition(&self, node: &NodeRef) -> Result<Disposition, ComputeError> {
        let mut tally = Tally::default();
        for tag in branch::ALL {
            for ancestor in self.system.ancestors(node, tag)? {
                tally.total += 1;
                if let Some(state) = self.report.get(ancestor) {
                    tally.known += 1;
                    if state.continues_through(tag) {
                        tally.winning += 1;
                    }
                }
            }
        }

        let mode = self.system.join_mode_of_node(node);
        let disposition = if tally.known != tally.total {
            Disposition::NotReady
        } else if tally.total == 0 {
            Disposition::Run
        } else {
            let authorized = match mode {
                JoinMode::And => tally.winning == tally.total,
                JoinMode::Or => tally.winning > 0,
                JoinMode::None => tally.winning == 1,
            };
            if authorized {
                Disposition::Run
            } else {
                Disposition::Skip
            }
        };

        trace!(
            node = %node,
            ?mode,
            ?disposition,
            ancestors = tally.total,
            known = tally.known,
            winning = tally.winning,
            "node disposition"
        );
        Ok(disposition)
    }

    /// `true` iff the traversal completed without an abort.
    pub fn status(&self) -> bool {
        self.status
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The recorded state of `node`, if it was visited.
    pub fn state_of(&self, node: &NodeRef) -> Option<&ComputeState> {
        self.report.get(node)
    }

    pub fn context(&self) -> &Context {
        &*self.context
    }

    /// Consume the computation, keeping its report.
    pub fn into_report(self) -> Report {
        self.report
    }
}

//! Computations
//!
//! This module runs activated graphs.
//!
//! # Overview
//!
//! A [`Computation`] borrows an activated
//! [`NodeSystem`](crate::graph::NodeSystem) and a [`Context`], walks the graph
//! once depth-first and records a [`ComputeState`] for every node it reaches
//! in a [`Report`].
//!
//! The system is only read, so one activated system can serve any number of
//! computations, each with its own context and report. Within a computation
//! everything is synchronous: nodes run one at a time in a fixed order, and
//! each sees every write made by the nodes before it.

mod computation;
mod context;
mod report;
mod state;

pub use computation::Computation;
pub use context::Context;
pub use report::Report;
pub use state::{BoxError, ComputeState, ComputeValue, NodeError};

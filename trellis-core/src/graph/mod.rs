//! Workflow Graph
//!
//! This module defines workflow graphs and compiles them for execution.
//!
//! # Overview
//!
//! A workflow graph is a directed acyclic graph where:
//!
//! - Nodes are units of work ([`Node`]), referenced by identity ([`NodeRef`])
//! - Links are directed edges; links leaving a decision node carry the branch
//!   (true or false) they belong to
//! - Each node has a [`JoinMode`] saying how its incoming links combine
//!
//! # Design Decisions
//!
//! 1. Nodes are compared by identity, never by value. Two nodes that do the
//!    same thing are still two nodes.
//!
//! 2. Structural problems are collected, not raised one at a time:
//!    [`NodeSystem::is_valid`] reports every defect it finds.
//!
//! 3. Adjacency is compiled once, at activation, into forward and backward
//!    indexes keyed by `(node, branch)`. After that the system is frozen.

mod link;
mod node;
mod system;
mod validation;

pub use link::Link;
pub use node::{Node, NodeId, NodeRef};
pub use system::{JoinMode, NodeSystem};

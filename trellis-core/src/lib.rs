//! Trellis Core
//!
//! This crate provides the core engine for Trellis, an in-process workflow
//! graph engine. Callers assemble nodes into a directed graph, validate and
//! activate it once, then run it repeatedly against different input data.
//!
//! It implements:
//!
//! - Graph construction with per-node join modes and branch-tagged links
//! - Structural validation (orphan decisions, cycles, undeclared and
//!   duplicate nodes)
//! - Deterministic depth-first computation with AND/OR/NONE fan-in
//! - Ready-made action and decision nodes
//!
//! # Architecture
//!
//! - `graph`: nodes, links, validation and the [`NodeSystem`]
//! - `compute`: the [`Context`] data bag, [`ComputeState`] and [`Computation`]
//! - `nodes`: reference [`Node`] implementations wrapping closures
//! - `branch`: branch tag helpers
//!
//! # Example
//!
//! ```rust
//! use trellis_core::nodes::{action, decision};
//! use trellis_core::{Computation, Context, NodeSystem};
//!
//! let is_vip = decision("is-vip", |ctx| Ok(ctx.have_key("vip")));
//! let discount = action("discount", |ctx| {
//!     ctx.store("discount", 10);
//!     Ok(())
//! });
//! let standard = action("standard", |ctx| {
//!     ctx.store("discount", 0);
//!     Ok(())
//! });
//!
//! let mut system = NodeSystem::new();
//! system.add_node(is_vip.clone())?;
//! system.add_node(discount.clone())?;
//! system.add_node(standard.clone())?;
//! system.add_link_on_branch(&is_vip, &discount, true)?;
//! system.add_link_on_branch(&is_vip, &standard, false)?;
//! system.activate()?;
//!
//! let mut context = Context::new();
//! context.store("vip", true);
//!
//! let mut computation = Computation::new(&system, &mut context)?;
//! computation.compute()?;
//! assert!(computation.status());
//! assert_eq!(computation.context().read("discount"), Some(&10.into()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod branch;
pub mod compute;
pub mod error;
pub mod graph;
pub mod nodes;

pub use branch::Branch;
pub use compute::{BoxError, Computation, ComputeState, ComputeValue, Context, NodeError, Report};
pub use error::{ComputeError, GraphError, LinkError, ValidationError, ValidationErrors};
pub use graph::{JoinMode, Link, Node, NodeId, NodeRef, NodeSystem};

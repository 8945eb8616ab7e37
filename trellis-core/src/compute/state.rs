//! Compute State
//!
//! The outcome of visiting a single node. This is the only piece of control
//! information that flows from a node back into the traversal engine.
//!
//! - `Continue` is produced by a node that ran successfully. Decision nodes
//!   attach the branch they took; every other node leaves it unset.
//! - `Skip` is never produced by a node. The computation records it for nodes
//!   whose join condition was not met.
//! - `Abort` is produced by a node that failed. It carries the node's error
//!   and halts the computation.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::branch::Branch;

/// Error type node bodies may return.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error raised by a node body.
///
/// Cheap to clone so it can live both in the report and in the error
/// returned by [`Computation::compute`](super::Computation::compute).
#[derive(Clone)]
pub struct NodeError(Arc<dyn Error + Send + Sync + 'static>);

impl NodeError {
    /// Wrap an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self(Arc::from(error.into()))
    }

    /// Access the wrapped error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeError").field(&self.0.to_string()).finish()
    }
}

impl Error for NodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// Errors compare by message; two aborts with the same text are equal.
impl PartialEq for NodeError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.to_string() == other.0.to_string()
    }
}

/// The three kinds of outcome, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeValue {
    Continue,
    Skip,
    Abort,
}

impl fmt::Display for ComputeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Continue => "continue",
            Self::Skip => "skip",
            Self::Abort => "abort",
        })
    }
}

/// Result of visiting one node.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputeState {
    /// The node ran. The branch is set only by decision nodes.
    Continue(Branch),
    /// The node's join condition was not met; its body never ran.
    Skip,
    /// The node failed with the given error.
    Abort(NodeError),
}

impl ComputeState {
    /// A successful, unconditional result.
    pub fn proceed() -> Self {
        Self::Continue(None)
    }

    /// A successful decision that took `branch`.
    pub fn continue_on_branch(branch: bool) -> Self {
        Self::Continue(Some(branch))
    }

    /// A skipped node.
    pub fn skip() -> Self {
        Self::Skip
    }

    /// A failed node.
    pub fn abort<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Abort(NodeError::new(error))
    }

    pub fn value(&self) -> ComputeValue {
        match self {
            Self::Continue(_) => ComputeValue::Continue,
            Self::Skip => ComputeValue::Skip,
            Self::Abort(_) => ComputeValue::Abort,
        }
    }

    pub fn branch(&self) -> Branch {
        match self {
            Self::Continue(branch) => *branch,
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&NodeError> {
        match self {
            Self::Abort(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort(_))
    }

    /// Whether this state authorizes a follower fed through a link tagged `tag`.
    pub fn continues_through(&self, tag: Branch) -> bool {
        matches!(self, Self::Continue(branch) if *branch == tag)
    }
}

impl fmt::Display for ComputeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue(None) => write!(f, "continue"),
            Self::Continue(Some(branch)) => write!(f, "continue({branch})"),
            Self::Skip => write!(f, "skip"),
            Self::Abort(error) => write!(f, "abort({error})"),
        }
    }
}

impl Serialize for ComputeState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ComputeState", 3)?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("branch", &self.branch())?;
        state.serialize_field("error", &self.error().map(|e| e.to_string()))?;
        state.end()
    }
}

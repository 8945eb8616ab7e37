//! Branch Tags
//!
//! A branch tag is an optional boolean. Links leaving a decision node carry
//! `Some(true)` or `Some(false)`; every other link is unconditional (`None`).
//! The same tag is reported by a decision node in its
//! [`ComputeState`](crate::compute::ComputeState) to say which way it went.
//!
//! Tags are always compared by value.

use smallvec::{smallvec, SmallVec};

/// Optional branch discriminator on a link or a compute result.
pub type Branch = Option<bool>;

/// The tag of a link that is followed regardless of any decision.
pub const UNCONDITIONAL: Branch = None;

/// Every possible tag, in the order ancestors are inspected.
pub const ALL: [Branch; 3] = [UNCONDITIONAL, Some(true), Some(false)];

/// The branches a node propagates along once it has been run or skipped.
///
/// Decision nodes fan out along the true branch first, then the false one.
pub fn outgoing(decide_capability: bool) -> SmallVec<[Branch; 2]> {
    if decide_capability {
        smallvec![Some(true), Some(false)]
    } else {
        smallvec![UNCONDITIONAL]
    }
}

/// Short human-readable label, used in diagnostics.
pub fn label(branch: Branch) -> &'static str {
    match branch {
        None => "*",
        Some(true) => "true",
        Some(false) => "false",
    }
}

//! Lightweight unique identifier for nodes within a [`Pipeline`](crate::pipeline::Pipeline).
//!
//! Every source and stage attached to a pipeline gets a sequential `NodeId`.
//! Handles are opaque; only the pipeline, planner and runner look inside.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new `NodeId` (used internally by the pipeline).
    pub(crate) const fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

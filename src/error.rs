//! Error taxonomy for stream pipelines.
//!
//! Public fallible APIs return [`anyhow::Result`]; the typed causes below stay
//! reachable through [`anyhow::Error::downcast_ref`].
//!
//! Empty inputs are never errors: terminals such as `average` or `find_first`
//! report them as `None`.

use crate::node_id::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Faults raised while building or running a pipeline.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A stage was attached to (or a terminal invoked on) a stream that already
    /// has a downstream stage or has already been consumed.
    #[error("stream has already been operated upon or consumed")]
    AlreadyConsumed,

    /// The backing resource of a source could not be acquired.
    #[error("failed to open resource {path}")]
    Resource {
        /// Path of the resource.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Two elements mapped to the same key while collecting into a map.
    #[error("duplicate key {0}")]
    DuplicateKey(String),

    /// A partition did not carry the element type the stage expected.
    #[error("partition type mismatch: expected {expected}")]
    TypeMismatch {
        /// Name of the expected element type.
        expected: &'static str,
    },

    /// The node chain referenced a node that is not in the graph.
    #[error("missing node {0:?}")]
    MissingNode(NodeId),
}

impl StreamError {
    /// Returns `true` if `err` (or any error in its chain) is [`StreamError::AlreadyConsumed`].
    #[must_use]
    pub fn is_already_consumed(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<StreamError>(),
                Some(StreamError::AlreadyConsumed)
            )
        })
    }
}

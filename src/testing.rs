//! Testing utilities for ironstream pipelines.
//!
//! - **Assertions**: compare pipeline outputs with expected results, and check
//!   the single-use contract
//! - **Fixtures**: the [`Contact`] sample dataset
//! - **Mock I/O**: temporary text and JSONL files for source tests
//!
//! # Quick Start
//!
//! ```no_run
//! use ironstream::*;
//! use ironstream::testing::*;
//!
//! #[test]
//! fn doubles() -> anyhow::Result<()> {
//!     let p = TestPipeline::new();
//!
//!     let result = from_vec(&p, vec![1, 2, 3]).map(|x: &i32| x * 2).to_vec()?;
//!
//!     assert_collections_equal(&result, &[2, 4, 6]);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock_io;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use mock_io::*;

use crate::Pipeline;

/// A test-focused wrapper around [`Pipeline`] that can report on its graph.
///
/// ```
/// use ironstream::testing::TestPipeline;
/// use ironstream::from_vec;
///
/// let p = TestPipeline::new();
/// let evens = from_vec(&p, vec![1, 2, 3, 4]).filter(|n| n % 2 == 0);
/// assert_eq!(p.node_count(), 2);
/// assert_eq!(p.linked_count(), 1);
/// assert_eq!(evens.count().unwrap(), 2);
/// assert_eq!(p.linked_count(), 2);
/// ```
#[derive(Clone)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    /// Create a new test pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::default(),
        }
    }

    /// Number of nodes (sources and stages) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let (nodes, _) = self.pipeline.snapshot();
        nodes.len()
    }

    /// Number of stage-to-stage edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let (_, edges) = self.pipeline.snapshot();
        edges.len()
    }

    /// Number of nodes that already have a downstream stage or ran a terminal.
    #[must_use]
    pub fn linked_count(&self) -> usize {
        let (nodes, _) = self.pipeline.snapshot();
        nodes.keys().filter(|id| self.pipeline.is_linked(**id)).count()
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// Allow TestPipeline to be used wherever Pipeline is expected
impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}

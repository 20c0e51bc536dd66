//! # Ironstream
//!
//! Lazy, single-use **element pipelines** for Rust. A pipeline is a source
//! followed by a chain of intermediate stages and ended by one terminal stage.
//! Nothing runs until the terminal is invoked, and the same chain runs either
//! on the caller's thread or fork-join across a rayon pool.
//!
//! ## Key Features
//!
//! - **Fluent, lazy API** - `filter`, `map`, `flat_map`, `peek`, `distinct`,
//!   `sorted`, `limit`, `skip`
//! - **Pull-based evaluation** - `limit` over an infinite generator terminates,
//!   `find_first` and `any_match` stop early
//! - **Terminals** - `reduce`, `fold`, `collect`, `count`, `sum`, `average`,
//!   `min`/`max`, `find_first`, `to_vec`, `to_map`, `joining`, ...
//! - **Built-in combiners** - [`Sum`], [`Min`], [`Max`], [`AverageF64`],
//!   [`ToMap`], [`Joining`], [`Summarizing`] and more, or your own
//!   [`CombineFn`]
//! - **Sequential and parallel execution** - sources split into ordered leaves
//!   through the [`Spliterator`] trait; partial results merge in source order
//! - **Single-use streams** - reusing a consumed stream is reported as
//!   [`StreamError::AlreadyConsumed`]
//!
//! ## Quick Start
//!
//! ```
//! use ironstream::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = Pipeline::default();
//!
//! let total = from_vec(&p, vec!["3", "x", "4", "5"])
//!     .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
//!     .map(|s| s.parse::<u32>().unwrap_or_default())
//!     .sum()?;
//! assert_eq!(total, 12);
//!
//! // The same shape in parallel.
//! let evens = range(&p, 0u64, 10_000).parallel().filter(|n| n % 2 == 0).count()?;
//! assert_eq!(evens, 5_000);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! A [`Pipeline`] is the container for the stage graph. Create one with
//! `Pipeline::default()`, then attach sources to it.
//!
//! ### PCollection
//!
//! A [`PCollection<T>`] is a handle to one stage. Calling a stage on it
//! returns a handle to the next stage; calling a terminal runs the chain.
//! Each handle accepts exactly one downstream stage or terminal:
//!
//! ```
//! use ironstream::*;
//!
//! let p = Pipeline::default();
//! let nums = from_vec(&p, vec![1, 2, 3]);
//! let again = nums.clone();
//! assert_eq!(nums.count().unwrap(), 3);
//!
//! let err = again.count().unwrap_err();
//! assert!(StreamError::is_already_consumed(&err));
//! ```
//!
//! ### Sources
//!
//! - [`from_vec`], [`from_iter`], [`of`] - in-memory
//! - [`range`], [`range_closed`] - integer ranges
//! - [`iterate`], [`generate`] - unbounded; bound them with
//!   [`limit`](PCollection::limit) before forcing
//! - [`lines`](fn@lines) - a text file, line by line
//! - [`from_record_source`] - any [`RecordSource`]
//! - [`from_spliterator`] - a custom [`Spliterator`]
//!
//! ### Execution Modes
//!
//! - **Sequential** (default) - single traversal, fully deterministic
//! - **Parallel** - [`parallel()`](PCollection::parallel) or
//!   [`parallel_with()`](PCollection::parallel_with)
//!
//! Parallel runs give the same results as sequential ones as long as stages
//! have no ordering-dependent side effects and terminal combiners are
//! associative.
//!
//! ## Architecture
//!
//! 1. Building a pipeline records a chain of nodes in the [`Pipeline`]
//! 2. The [`planner`] linearizes the chain, fuses stateless stages and marks
//!    stateful barriers
//! 3. The [`runner`] opens the source (whole or split), wires the stages onto
//!    lazy element streams and folds them with the terminal's combiner
//!
//! ## Module Overview
//!
//! - [`collection`] - `PCollection` handle and the `CombineFn` trait
//! - [`combiners`] - built-in combiners
//! - [`pipeline`] - graph container and consumption tracking
//! - [`spliterator`] - splittable sources
//! - [`io`] - text lines and record sources
//! - [`runner`] - sequential and parallel executors
//! - [`planner`] - plan construction and explanation
//! - [`testing`] - assertions and fixtures for pipeline tests

pub mod collection;
pub mod combiners;
pub mod error;
pub mod helpers;
pub mod io;
pub mod node;
pub mod node_id;
pub mod pipeline;
pub mod planner;
pub mod runner;
pub mod spliterator;
pub mod stats;
pub mod testing;
pub mod type_token;

// General re-exports
pub use collection::{CombineFn, Count, PCollection, RFBound};
pub use combiners::{
    AverageF64, Joining, Max, MaxBy, Min, MinBy, Sum, Summarizing, ToBTreeSet, ToMap, ToSet, ToVec,
};
pub use error::StreamError;
pub use helpers::*;
pub use io::{RecordSource, VecRecordSource, lines};
pub use node_id::NodeId;
pub use pipeline::Pipeline;
pub use planner::{ExplainStep, PlanExplanation};
pub use runner::{ExecMode, Runner};
pub use spliterator::{
    IterSpliterator, RangeElem, RangeSpliterator, SliceSpliterator, SplitPolicy, Spliterator, split_leaves,
};
pub use stats::SummaryStatistics;
pub use type_token::{ElemIter, Partition};

// Gated re-exports
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{JsonlRecordSource, read_jsonl, read_jsonl_vec, write_jsonl_vec};

//! Ready-made [`CombineFn`](crate::CombineFn) implementations.
//!
//! Every combiner follows the same four steps: `create` an empty accumulator,
//! `add_input` elements of one leaf, `merge` partial accumulators in source
//! order, and `finish` into the output. Terminals such as
//! [`PCollection::sum`](crate::PCollection::sum) or
//! [`PCollection::to_map`](crate::PCollection::to_map) are thin wrappers over
//! [`PCollection::combine_globally`](crate::PCollection::combine_globally) with
//! one of these.
//!
//! ```
//! use ironstream::*;
//!
//! let p = Pipeline::default();
//! let total = from_vec(&p, vec![1u64, 2, 3, 4]).combine_globally(Sum::<u64>::new())?;
//! assert_eq!(total, 10);
//! # anyhow::Result::<()>::Ok(())
//! ```

pub mod basic;
pub mod collect;
pub mod statistical;

pub use basic::{Max, MaxBy, Min, MinBy, Sum};
pub use collect::{Joining, MapAcc, ToBTreeSet, ToMap, ToSet, ToVec};
pub use statistical::{AverageF64, Summarizing};

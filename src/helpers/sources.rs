//! Source constructors for `PCollection`s.
//!
//! Every constructor inserts a [`Node::Source`] wrapping a [`Spliterator`]. The
//! spliterator decides how the source behaves under parallel execution:
//!
//! - [`from_vec`] / [`from_iter`] / [`of`] -- in-memory, split at midpoints.
//! - [`range`] / [`range_closed`] -- integer ranges, split without
//!   materializing.
//! - [`iterate`] / [`generate`] -- **unbounded**, never split. Bound them with
//!   [`limit`](PCollection::limit) before any forcing terminal (`count`, `sum`,
//!   `to_vec`, `sorted`, ...); forcing an unbounded stream never returns.
//! - [`from_spliterator`] -- bring your own splitting strategy.
//! - [`from_record_source`] -- load records through a [`RecordSource`].
//!
//! ```
//! use ironstream::*;
//!
//! let p = Pipeline::default();
//! let firsts = iterate(&p, 0u64, |n| n + 1).limit(5).to_vec()?;
//! assert_eq!(firsts, vec![0, 1, 2, 3, 4]);
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::io::RecordSource;
use crate::node::Node;
use crate::spliterator::{IterSpliterator, RangeElem, RangeSpliterator, SliceSpliterator, Spliterator};
use crate::type_token::{FaultSlot, TypeTag, source_ops_for};
use crate::{PCollection, Pipeline, RFBound};
use anyhow::Result;
use std::iter::{repeat_with, successors};

/// Create a [`PCollection<T>`] from a pre-existing [`Vec<T>`].
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// let pc = from_vec(&p, vec![10, 20, 30]);
/// assert_eq!(pc.to_vec().unwrap(), vec![10, 20, 30]);
/// ```
pub fn from_vec<T>(p: &Pipeline, data: Vec<T>) -> PCollection<T>
where
    T: RFBound,
{
    let label = format!("vec[{}]", data.len());
    from_spliterator_labeled(p, Box::new(SliceSpliterator::new(data)), None, label)
}

/// Create a [`PCollection<T>`] from any finite [`IntoIterator`].
///
/// The iterator is collected eagerly; use [`iterate`] or [`generate`] for
/// unbounded inputs.
pub fn from_iter<T, I>(p: &Pipeline, iter: I) -> PCollection<T>
where
    T: RFBound,
    I: IntoIterator<Item = T>,
{
    from_vec(p, iter.into_iter().collect::<Vec<T>>())
}

/// Create a [`PCollection<T>`] directly from a list of values.
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// let words = of(&p, ["Using", "Stream", "API"]);
/// assert_eq!(words.count().unwrap(), 3);
/// ```
pub fn of<T, const N: usize>(p: &Pipeline, values: [T; N]) -> PCollection<T>
where
    T: RFBound,
{
    from_vec(p, Vec::from(values))
}

/// Integers in `[start, end)`.
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// assert_eq!(range(&p, 1, 10).count().unwrap(), 9);
/// ```
pub fn range<T: RangeElem>(p: &Pipeline, start: T, end: T) -> PCollection<T> {
    let spl = RangeSpliterator::new(start, end);
    let label = format!("range[{}]", spl.estimate_size().unwrap_or(0));
    from_spliterator_labeled(p, Box::new(spl), None, label)
}

/// Integers in `[start, end]`.
pub fn range_closed<T: RangeElem>(p: &Pipeline, start: T, end: T) -> PCollection<T> {
    let spl = RangeSpliterator::closed(start, end);
    let label = format!("range_closed[{}]", spl.estimate_size().unwrap_or(0));
    from_spliterator_labeled(p, Box::new(spl), None, label)
}

/// Unbounded stream `seed, f(seed), f(f(seed)), ...`.
pub fn iterate<T, F>(p: &Pipeline, seed: T, f: F) -> PCollection<T>
where
    T: RFBound,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    let iter = successors(Some(seed), move |prev| Some(f(prev)));
    from_spliterator_labeled(
        p,
        Box::new(IterSpliterator::unsized_iter(Box::new(iter))),
        None,
        "iterate".to_string(),
    )
}

/// Unbounded stream of values produced by `supplier`.
pub fn generate<T, F>(p: &Pipeline, supplier: F) -> PCollection<T>
where
    T: RFBound,
    F: FnMut() -> T + Send + 'static,
{
    from_spliterator_labeled(
        p,
        Box::new(IterSpliterator::unsized_iter(Box::new(repeat_with(supplier)))),
        None,
        "generate".to_string(),
    )
}

/// Create a [`PCollection<T>`] from a custom [`Spliterator`].
///
/// This is the extension point for sources that know how to split themselves
/// (sharded files, paged result sets, ...).
pub fn from_spliterator<T, S>(p: &Pipeline, spl: S) -> PCollection<T>
where
    T: RFBound,
    S: Spliterator<T> + 'static,
{
    from_spliterator_labeled(p, Box::new(spl), None, "spliterator".to_string())
}

/// Load every record of `source` and stream them in the order returned.
///
/// # Errors
/// Whatever `source.find_all()` reports; nothing is inserted in that case.
pub fn from_record_source<T, S>(p: &Pipeline, source: &S) -> Result<PCollection<T>>
where
    T: RFBound,
    S: RecordSource<T> + ?Sized,
{
    let records = source.find_all()?;
    let label = format!("{}[{}]", source.describe(), records.len());
    Ok(from_spliterator_labeled(
        p,
        Box::new(SliceSpliterator::new(records)),
        None,
        label,
    ))
}

pub(crate) fn from_spliterator_labeled<T: RFBound>(
    p: &Pipeline,
    spl: Box<dyn Spliterator<T>>,
    fault: Option<FaultSlot>,
    label: String,
) -> PCollection<T> {
    let id = p.insert_node(Node::Source {
        ops: source_ops_for(spl, fault),
        elem_tag: TypeTag::of::<T>(),
        label,
    });
    PCollection::root(p, id)
}

//! Splittable sources for fork-join execution.
//!
//! A [`Spliterator`] is a cursor over a contiguous run of source elements that
//! can hand off its **prefix half** to a new spliterator via
//! [`try_split`](Spliterator::try_split), keeping the suffix for itself. The
//! parallel runner calls [`split_leaves`] to carve a source into ordered leaves
//! and then drives each leaf on a rayon worker.
//!
//! ```
//! use ironstream::spliterator::{SliceSpliterator, Spliterator};
//!
//! let mut first = SliceSpliterator::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
//! let second = first.try_split().unwrap();
//!
//! assert_eq!(second.into_elem_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
//! assert_eq!(Box::new(first).into_elem_iter().collect::<Vec<_>>(), vec![5, 6, 7, 8]);
//! ```
//!
//! Implementations provided here:
//! - [`SliceSpliterator`] -- shared `Vec<T>` window, splits at the midpoint.
//! - [`RangeSpliterator`] -- half-open integer range, splits at the midpoint.
//! - [`IterSpliterator`] -- any boxed iterator; never splits.

use crate::type_token::ElemIter;
use std::sync::Arc;

/// A splittable, consumable cursor over source elements.
pub trait Spliterator<T: Send + 'static>: Send {
    /// Split off the first half of the remaining elements.
    ///
    /// Returns `None` when the spliterator cannot or should not split further.
    /// On success `self` keeps the suffix, so the returned prefix precedes it in
    /// source order.
    fn try_split(&mut self) -> Option<Box<dyn Spliterator<T>>>;

    /// Exact or estimated number of remaining elements; `None` when unknown or
    /// unbounded.
    fn estimate_size(&self) -> Option<usize>;

    /// Turn the remaining elements into an iterator.
    fn into_elem_iter(self: Box<Self>) -> ElemIter<T>;

    /// Feed every remaining element to `action`, in order.
    fn for_each_remaining(self: Box<Self>, action: &mut dyn FnMut(T)) {
        for item in self.into_elem_iter() {
            action(item);
        }
    }
}

/// Split granularity used by the parallel runner.
///
/// When `min_split_len` is unset the threshold follows the source size: a
/// spliterator keeps splitting while it holds more than
/// `estimate / (4 * parallelism)` elements, which yields roughly four leaves per
/// worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitPolicy {
    /// Number of workers the leaves will be spread across.
    pub parallelism: usize,
    /// Fixed leaf size; overrides the size-derived threshold.
    pub min_split_len: Option<usize>,
}

impl SplitPolicy {
    /// Policy for `parallelism` workers with an optional fixed threshold.
    #[must_use]
    pub fn new(parallelism: usize, min_split_len: Option<usize>) -> Self {
        Self {
            parallelism: parallelism.max(1),
            min_split_len,
        }
    }

    /// Leaf size threshold for a source of `estimate` elements.
    #[must_use]
    pub fn threshold(&self, estimate: usize) -> usize {
        self.min_split_len
            .unwrap_or_else(|| estimate / (self.parallelism * 4))
            .max(1)
    }
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::new(num_cpus::get(), None)
    }
}

/// Recursively split `root` into ordered leaves.
///
/// A spliterator is split while its size estimate exceeds the policy threshold
/// and it agrees to split. Unknown-size spliterators are never split. The result
/// is never empty.
pub fn split_leaves<T: Send + 'static>(
    root: Box<dyn Spliterator<T>>,
    policy: &SplitPolicy,
) -> Vec<Box<dyn Spliterator<T>>> {
    let threshold = root.estimate_size().map(|n| policy.threshold(n));
    let mut leaves = Vec::new();
    if let Some(threshold) = threshold {
        split_into(root, threshold, &mut leaves);
    } else {
        leaves.push(root);
    }
    leaves
}

fn split_into<T: Send + 'static>(
    mut spl: Box<dyn Spliterator<T>>,
    threshold: usize,
    out: &mut Vec<Box<dyn Spliterator<T>>>,
) {
    let splittable = spl.estimate_size().is_some_and(|n| n > threshold);
    if splittable && let Some(prefix) = spl.try_split() {
        split_into(prefix, threshold, out);
        split_into(spl, threshold, out);
        return;
    }
    out.push(spl);
}

/* ===================== SliceSpliterator ===================== */

/// Window `[start, end)` over a shared vector.
pub struct SliceSpliterator<T> {
    data: Arc<Vec<T>>,
    start: usize,
    end: usize,
}

impl<T> SliceSpliterator<T> {
    /// Spliterator over all of `data`.
    pub fn new(data: Vec<T>) -> Self {
        Self::from_arc(Arc::new(data))
    }

    /// Spliterator over all of an already shared vector.
    pub fn from_arc(data: Arc<Vec<T>>) -> Self {
        let end = data.len();
        Self { data, start: 0, end }
    }
}

impl<T: Clone + Send + Sync + 'static> Spliterator<T> for SliceSpliterator<T> {
    fn try_split(&mut self) -> Option<Box<dyn Spliterator<T>>> {
        let len = self.end - self.start;
        if len < 2 {
            return None;
        }
        let mid = self.start + len / 2;
        let prefix = Self {
            data: Arc::clone(&self.data),
            start: self.start,
            end: mid,
        };
        self.start = mid;
        Some(Box::new(prefix))
    }

    fn estimate_size(&self) -> Option<usize> {
        Some(self.end - self.start)
    }

    fn into_elem_iter(self: Box<Self>) -> ElemIter<T> {
        let Self { data, start, end } = *self;
        // Sole owner of the whole vector: move elements out instead of cloning.
        if start == 0 && end == data.len() {
            match Arc::try_unwrap(data) {
                Ok(owned) => return Box::new(owned.into_iter()),
                Err(shared) => return Box::new((start..end).map(move |i| shared[i].clone())),
            }
        }
        Box::new((start..end).map(move |i| data[i].clone()))
    }
}

/* ===================== RangeSpliterator ===================== */

/// Integer types usable as range source elements.
pub trait RangeElem: Copy + Send + Sync + 'static {
    /// Widen to `i128`.
    fn to_i128(self) -> i128;
    /// Narrow from `i128`; only called with values inside the original range.
    fn from_i128(v: i128) -> Self;
}

macro_rules! impl_range_elem {
    ($($t:ty),*) => {
        $(
            impl RangeElem for $t {
                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn from_i128(v: i128) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_range_elem!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

/// Half-open integer range `[start, end)`.
pub struct RangeSpliterator<T> {
    start: i128,
    end: i128,
    _t: std::marker::PhantomData<T>,
}

impl<T: RangeElem> RangeSpliterator<T> {
    /// Range `[start, end)`; empty when `end <= start`.
    pub fn new(start: T, end: T) -> Self {
        let (start, end) = (start.to_i128(), end.to_i128());
        Self {
            start,
            end: end.max(start),
            _t: std::marker::PhantomData,
        }
    }

    /// Range `[start, end]`; empty when `end < start`.
    pub fn closed(start: T, end: T) -> Self {
        let (start, end) = (start.to_i128(), end.to_i128() + 1);
        Self {
            start,
            end: end.max(start),
            _t: std::marker::PhantomData,
        }
    }
}

impl<T: RangeElem> Spliterator<T> for RangeSpliterator<T> {
    fn try_split(&mut self) -> Option<Box<dyn Spliterator<T>>> {
        let len = self.end - self.start;
        if len < 2 {
            return None;
        }
        let mid = self.start + len / 2;
        let prefix = Self {
            start: self.start,
            end: mid,
            _t: std::marker::PhantomData,
        };
        self.start = mid;
        Some(Box::new(prefix))
    }

    fn estimate_size(&self) -> Option<usize> {
        usize::try_from(self.end - self.start).ok()
    }

    fn into_elem_iter(self: Box<Self>) -> ElemIter<T> {
        Box::new((self.start..self.end).map(T::from_i128))
    }
}

/* ===================== IterSpliterator ===================== */

/// Wraps an arbitrary iterator. Never splits, so the parallel runner treats it
/// as a single leaf.
pub struct IterSpliterator<T> {
    iter: ElemIter<T>,
    size: Option<usize>,
}

impl<T: Send + 'static> IterSpliterator<T> {
    /// Iterator with a known number of elements.
    pub fn sized(iter: ElemIter<T>, size: usize) -> Self {
        Self {
            iter,
            size: Some(size),
        }
    }

    /// Iterator of unknown, possibly infinite, length.
    pub fn unsized_iter(iter: ElemIter<T>) -> Self {
        Self { iter, size: None }
    }
}

impl<T: Send + 'static> Spliterator<T> for IterSpliterator<T> {
    fn try_split(&mut self) -> Option<Box<dyn Spliterator<T>>> {
        None
    }

    fn estimate_size(&self) -> Option<usize> {
        self.size
    }

    fn into_elem_iter(self: Box<Self>) -> ElemIter<T> {
        self.iter
    }
}

//! Stateful stages: `distinct`, `sorted*`, `limit`, `skip`.
//!
//! Each stage has two renditions:
//! - a **streaming** one, wired lazily onto a single element stream (used by
//!   sequential runs and by parallel runs over one leaf, which keeps
//!   `limit`/`skip`/`distinct` usable on unbounded sources);
//! - a **cross-leaf** one, used when a parallel run has several leaves. By
//!   default the leaves are drained on rayon workers, concatenated in source
//!   order, the stage is applied to the whole vector, and the result is split
//!   again. `limit` and `skip` instead walk the leaves in source order and
//!   pull only what they need.
//!
//! `sorted*` always needs the whole input. Never apply it to an unbounded
//! stream.

use crate::node::{DynOp, Node};
use crate::spliterator::{SliceSpliterator, SplitPolicy, Spliterator, split_leaves};
use crate::type_token::{ElemIter, Partition, from_partition, into_partition};
use crate::{PCollection, RFBound};
use anyhow::Result;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// One stateful stage in both renditions.
trait Barrier<T: RFBound>: Send + Sync + 'static {
    const NAME: &'static str;
    fn stream(&self, input: ElemIter<T>) -> ElemIter<T>;
    fn materialized(&self, input: Vec<T>) -> Vec<T>;

    /// Apply across ordered leaves.
    fn across(&self, leaves: Vec<ElemIter<T>>, policy: &SplitPolicy) -> Vec<ElemIter<T>> {
        let count = leaves.len();
        let chunks: Vec<Vec<T>> = leaves.into_par_iter().map(|leaf| leaf.collect::<Vec<T>>()).collect();
        let gathered: Vec<T> = chunks.into_iter().flatten().collect();
        trace!(stage = Self::NAME, leaves = count, elements = gathered.len(), "materialized barrier");
        resplit(self.materialized(gathered), policy)
    }
}

fn resplit<T: RFBound>(data: Vec<T>, policy: &SplitPolicy) -> Vec<ElemIter<T>> {
    let root: Box<dyn Spliterator<T>> = Box::new(SliceSpliterator::new(data));
    split_leaves(root, policy)
        .into_iter()
        .map(|leaf| leaf.into_elem_iter())
        .collect()
}

struct BarrierOp<T, B>(B, PhantomData<fn(T)>);

impl<T: RFBound, B: Barrier<T>> DynOp for BarrierOp<T, B> {
    fn apply(&self, input: Partition) -> Result<Partition> {
        Ok(into_partition(self.0.stream(from_partition::<T>(input)?)))
    }

    fn name(&self) -> &'static str {
        B::NAME
    }

    fn is_barrier(&self) -> bool {
        true
    }

    fn apply_barrier(&self, parts: Vec<Partition>, policy: &SplitPolicy) -> Result<Vec<Partition>> {
        let leaves = parts
            .into_iter()
            .map(from_partition::<T>)
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .0
            .across(leaves, policy)
            .into_iter()
            .map(into_partition)
            .collect())
    }
}

/* ===================== Distinct ===================== */

struct Distinct;
impl<T: RFBound + Eq + Hash> Barrier<T> for Distinct {
    const NAME: &'static str = "distinct";

    fn stream(&self, input: ElemIter<T>) -> ElemIter<T> {
        let mut seen: HashSet<T> = HashSet::new();
        Box::new(input.filter(move |t| seen.insert(t.clone())))
    }

    fn materialized(&self, input: Vec<T>) -> Vec<T> {
        let mut seen: HashSet<T> = HashSet::with_capacity(input.len());
        input.into_iter().filter(|t| seen.insert(t.clone())).collect()
    }
}

/* ===================== Sorted ===================== */

struct SortedBy<F>(Arc<F>);
impl<T, F> Barrier<T> for SortedBy<F>
where
    T: RFBound,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    const NAME: &'static str = "sorted";

    fn stream(&self, input: ElemIter<T>) -> ElemIter<T> {
        Box::new(SortedIter {
            pending: Some((input, Arc::clone(&self.0))),
            ready: Vec::new().into_iter(),
        })
    }

    fn materialized(&self, mut input: Vec<T>) -> Vec<T> {
        let cmp = &self.0;
        input.par_sort_by(|a, b| cmp(a, b));
        input
    }
}

/// Sorts its input on first pull.
struct SortedIter<T, F> {
    pending: Option<(ElemIter<T>, Arc<F>)>,
    ready: std::vec::IntoIter<T>,
}

impl<T, F> Iterator for SortedIter<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some((input, cmp)) = self.pending.take() {
            let mut all: Vec<T> = input.collect();
            all.sort_by(|a, b| cmp(a, b));
            self.ready = all.into_iter();
        }
        self.ready.next()
    }
}

/* ===================== Limit / Skip ===================== */

struct Limit(usize);
impl<T: RFBound> Barrier<T> for Limit {
    const NAME: &'static str = "limit";

    fn stream(&self, input: ElemIter<T>) -> ElemIter<T> {
        Box::new(input.take(self.0))
    }

    fn materialized(&self, mut input: Vec<T>) -> Vec<T> {
        input.truncate(self.0);
        input
    }

    /// Pulls leaves in order until `n` elements are buffered; later leaves
    /// are dropped unread.
    fn across(&self, leaves: Vec<ElemIter<T>>, policy: &SplitPolicy) -> Vec<ElemIter<T>> {
        let mut kept: Vec<T> = Vec::new();
        for leaf in leaves {
            let wanted = self.0 - kept.len();
            if wanted == 0 {
                break;
            }
            kept.extend(leaf.take(wanted));
        }
        trace!(stage = "limit", elements = kept.len(), "bounded leaves");
        resplit(kept, policy)
    }
}

struct Skip(usize);
impl<T: RFBound> Barrier<T> for Skip {
    const NAME: &'static str = "skip";

    fn stream(&self, input: ElemIter<T>) -> ElemIter<T> {
        Box::new(input.skip(self.0))
    }

    fn materialized(&self, mut input: Vec<T>) -> Vec<T> {
        let n = self.0.min(input.len());
        input.drain(..n);
        input
    }

    /// Discards from the leading leaves in order; the leaf where the count
    /// runs out and every later leaf pass through untouched.
    fn across(&self, leaves: Vec<ElemIter<T>>, _policy: &SplitPolicy) -> Vec<ElemIter<T>> {
        let mut remaining = self.0;
        let mut out = Vec::with_capacity(leaves.len());
        for mut leaf in leaves {
            if remaining > 0 {
                remaining -= leaf.by_ref().take(remaining).count();
                if remaining > 0 {
                    continue;
                }
            }
            out.push(leaf);
        }
        if out.is_empty() {
            out.push(Box::new(std::iter::empty()));
        }
        out
    }
}

impl<T: RFBound> PCollection<T> {
    fn barrier<B: Barrier<T>>(self, stage: B) -> Self {
        let op: Arc<dyn DynOp> = Arc::new(BarrierOp::<T, B>(stage, PhantomData));
        self.chain(Node::Stateful(op))
    }

    /// Keep at most the first `n` elements.
    ///
    /// This is what makes an unbounded source safe to force.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn limit(self, n: usize) -> Self {
        self.barrier(Limit(n))
    }

    /// Drop the first `n` elements.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn skip(self, n: usize) -> Self {
        self.barrier(Skip(n))
    }

    /// Stable sort with `cmp`. Buffers the whole stream.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn sorted_by<F>(self, cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.barrier(SortedBy(Arc::new(cmp)))
    }

    /// Stable sort by the key `f` extracts.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn sorted_by_key<K, F>(self, f: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_by(move |a, b| f(a).cmp(&f(b)))
    }
}

impl<T: RFBound + Ord> PCollection<T> {
    /// Stable sort in natural order. Buffers the whole stream.
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn sorted(self) -> Self {
        self.sorted_by(T::cmp)
    }
}

impl<T: RFBound + Eq + Hash> PCollection<T> {
    /// Drop elements equal to an earlier one, keeping first occurrences in
    /// source order.
    ///
    /// Remembers every distinct element seen, so memory grows with the number
    /// of distinct values.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let out = from_vec(&p, vec![1, 2, 2, 3, 1]).distinct().to_vec().unwrap();
    /// assert_eq!(out, vec![1, 2, 3]);
    /// ```
    ///
    /// # Panics
    /// If this handle was already operated upon or consumed.
    #[must_use]
    pub fn distinct(self) -> Self {
        self.barrier(Distinct)
    }
}

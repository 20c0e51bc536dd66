//! Terminal stages.
//!
//! A terminal links its handle (so the stream cannot be reused), runs the
//! chain through a [`Runner`] in the handle's [`ExecMode`], and returns the
//! result. Every terminal here reduces to the same shape: a `local` fold over
//! one element stream, plus a `merge` of two partial results that the
//! parallel runner applies in source order.
//!
//! Empty streams are never a fault: `reduce`, `sum` and `count` return their
//! identity, while `average`, `min`, `max`, `find_first` and `reduce_opt`
//! return `None`.
//!
//! Forcing terminals (`count`, `sum`, `to_vec`, `reduce`, ...) over an
//! unbounded source never return; bound the stream with
//! [`limit`](PCollection::limit) first.

use crate::collection::{CombineFn, Count};
use crate::combiners::{
    AverageF64, Joining, Max, MaxBy, Min, MinBy, Sum, Summarizing, ToBTreeSet, ToMap, ToSet, ToVec,
};
use crate::planner::{PlanExplanation, build_plan};
use crate::stats::SummaryStatistics;
use crate::type_token::ElemIter;
use crate::{ExecMode, PCollection, RFBound, Runner};
use anyhow::Result;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;
use tracing::debug;

impl<T: RFBound> PCollection<T> {
    /// Link this handle and run `local`/`merge` over the chain.
    fn run<A, L, M>(self, local: L, merge: M) -> Result<A>
    where
        A: Send,
        L: Fn(ElemIter<T>) -> A + Send + Sync,
        M: Fn(A, A) -> A + Send + Sync,
    {
        self.pipeline.consume(self.id)?;
        let out = Runner::for_mode(self.mode).execute::<T, A, L, M>(&self.pipeline, self.id, local, merge);
        debug!(node = self.id.raw(), ok = out.is_ok(), "terminal finished");
        out
    }

    /// Run a [`CombineFn`] over every element.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let set = of(&p, [3, 1, 3, 2]).combine_globally(ToBTreeSet::new())?;
    /// assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn combine_globally<C, A, O>(self, comb: C) -> Result<O>
    where
        C: CombineFn<T, A, O>,
        A: Send,
    {
        let c = &comb;
        let acc = self.run(
            |it| {
                let mut acc = c.create();
                for v in it {
                    c.add_input(&mut acc, v);
                }
                acc
            },
            |mut a, b| {
                c.merge(&mut a, b);
                a
            },
        )?;
        Ok(comb.finish(acc))
    }

    /// Invoke `action` on every element.
    ///
    /// Sequential runs visit elements in source order; parallel runs visit
    /// them from worker threads in no particular order. Use
    /// [`for_each_ordered`](Self::for_each_ordered) when order matters.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn for_each<F>(self, action: F) -> Result<()>
    where
        F: Fn(T) + Send + Sync,
    {
        self.run(|it| it.for_each(&action), |(), ()| ())
    }

    /// Invoke `action` on every element in source order, on the caller's
    /// thread.
    ///
    /// In parallel mode the upstream stages still run on workers; their output
    /// is gathered before `action` sees it.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn for_each_ordered<F>(self, action: F) -> Result<()>
    where
        F: FnMut(T),
    {
        match self.mode {
            ExecMode::Sequential => {
                self.pipeline.consume(self.id)?;
                Runner::drain_seq(&self.pipeline, self.id, action)
            }
            ExecMode::Parallel { .. } => {
                self.to_vec()?.into_iter().for_each(action);
                Ok(())
            }
        }
    }

    /// Fold with an identity and an associative `op`.
    ///
    /// `identity` must really be an identity for `op`: parallel runs start
    /// every leaf from it.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let total = range_closed(&p, 1u64, 100).parallel().reduce(0, |a, b| a + b)?;
    /// assert_eq!(total, 5050);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn reduce<F>(self, identity: T, op: F) -> Result<T>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.run(|it| it.fold(identity.clone(), &op), &op)
    }

    /// Fold with an associative `op` and no identity; `None` when empty.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn reduce_opt<F>(self, op: F) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        self.run(
            |it| it.reduce(&op),
            |a: Option<T>, b: Option<T>| match (a, b) {
                (Some(a), Some(b)) => Some(op(a, b)),
                (a, b) => a.or(b),
            },
        )
    }

    /// Three-argument fold: `accumulator` folds elements of one leaf into a
    /// `U` starting from `identity`, and `combiner` joins two leaf results.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn fold<U, F, C>(self, identity: U, accumulator: F, combiner: C) -> Result<U>
    where
        U: Clone + Send + Sync,
        F: Fn(U, T) -> U + Send + Sync,
        C: Fn(U, U) -> U + Send + Sync,
    {
        self.run(|it| it.fold(identity.clone(), &accumulator), combiner)
    }

    /// Mutable reduction into a container.
    ///
    /// `supplier` creates an empty container per leaf, `accumulator` adds one
    /// element, and `combiner` appends the right container into the left one.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let s = of(&p, ["a", "b", "c"])
    ///     .collect(String::new, |acc, s| acc.push_str(s), |acc, rhs| acc.push_str(&rhs))?;
    /// assert_eq!(s, "abc");
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn collect<R, S, F, C>(self, supplier: S, accumulator: F, combiner: C) -> Result<R>
    where
        R: Send,
        S: Fn() -> R + Send + Sync,
        F: Fn(&mut R, T) + Send + Sync,
        C: Fn(&mut R, R) + Send + Sync,
    {
        self.run(
            |it| {
                let mut acc = supplier();
                for v in it {
                    accumulator(&mut acc, v);
                }
                acc
            },
            |mut a, b| {
                combiner(&mut a, b);
                a
            },
        )
    }

    /// Number of elements.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn count(self) -> Result<u64> {
        self.combine_globally(Count)
    }

    /// Every element, in source order.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn to_vec(self) -> Result<Vec<T>> {
        self.combine_globally(ToVec::new())
    }

    /// First element in source order, even under parallel execution.
    ///
    /// Each leaf stops pulling after its first element.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn find_first(self) -> Result<Option<T>> {
        self.run(|mut it| it.next(), Option::or)
    }

    /// Whether any element satisfies `pred`. Stops at the first match.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn any_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync,
    {
        self.run(|mut it| it.any(|t| pred(&t)), |a: bool, b: bool| a || b)
    }

    /// Whether every element satisfies `pred`; `true` for an empty stream.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn all_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync,
    {
        self.run(|mut it| it.all(|t| pred(&t)), |a: bool, b: bool| a && b)
    }

    /// Whether no element satisfies `pred`; `true` for an empty stream.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn none_match<P>(self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync,
    {
        self.any_match(pred).map(|found| !found)
    }

    /// Smallest element under `cmp`; the first of equal minima wins.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn min_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.combine_globally(MinBy::new(cmp))
    }

    /// Largest element under `cmp`; the first of equal maxima wins.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let longest = of(&p, ["a", "abc", "ab", "xyz"]).max_by(|a, b| a.len().cmp(&b.len()))?;
    /// assert_eq!(longest, Some("abc"));
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn max_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.combine_globally(MaxBy::new(cmp))
    }

    /// Collect into a `HashMap` with `key` and `value` extractors.
    ///
    /// # Errors
    /// [`StreamError::DuplicateKey`](crate::StreamError::DuplicateKey) if two
    /// elements map to the same key; also if the stream was already operated
    /// upon or consumed, or its source failed.
    pub fn to_map<K, V, KF, VF>(self, key: KF, value: VF) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash + Debug + Send + 'static,
        V: Send + 'static,
        KF: Fn(&T) -> K + Send + Sync + 'static,
        VF: Fn(&T) -> V + Send + Sync + 'static,
    {
        Ok(self.combine_globally(ToMap::new(key, value))??)
    }

    /// Open the stream as an external iterator over a sequential traversal.
    ///
    /// The traversal runs on the caller's thread regardless of the handle's
    /// mode. A source that fails mid-traversal (a read error in
    /// [`lines`](fn@crate::io::lines)) ends the iterator early; use a terminal
    /// when the failure has to surface.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed.
    pub fn iterator(self) -> Result<ElemIter<T>> {
        self.pipeline.consume(self.id)?;
        Runner::open_seq(&self.pipeline, self.id)
    }

    /// Describe how a terminal on this handle would run, without running it
    /// or consuming the stream.
    ///
    /// # Errors
    /// If the chain behind this handle is broken.
    pub fn explain(&self) -> Result<PlanExplanation> {
        Ok(build_plan(&self.pipeline, self.id)?.explain(self.mode))
    }
}

impl<T: RFBound + Ord> PCollection<T> {
    /// Smallest element in natural order; `None` when empty.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn min(self) -> Result<Option<T>> {
        self.combine_globally(Min::new())
    }

    /// Largest element in natural order; `None` when empty.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn max(self) -> Result<Option<T>> {
        self.combine_globally(Max::new())
    }

    /// Distinct elements in ascending order.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn to_btree_set(self) -> Result<BTreeSet<T>> {
        self.combine_globally(ToBTreeSet::new())
    }
}

impl<T: RFBound + Eq + Hash> PCollection<T> {
    /// Distinct elements.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn to_set(self) -> Result<HashSet<T>> {
        self.combine_globally(ToSet::new())
    }
}

impl<T: RFBound + Add<Output = T> + Default> PCollection<T> {
    /// Sum of all elements; `T::default()` when empty.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn sum(self) -> Result<T> {
        self.combine_globally(Sum::new())
    }
}

impl<T: RFBound + Into<f64>> PCollection<T> {
    /// Arithmetic mean; `None` when empty.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// assert_eq!(from_vec(&p, vec![2u32, 4]).average()?, Some(3.0));
    /// assert_eq!(from_vec(&p, Vec::<u32>::new()).average()?, None);
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn average(self) -> Result<Option<f64>> {
        self.combine_globally(AverageF64)
    }
}

impl<T: RFBound + Copy + Ord + Into<i64>> PCollection<T> {
    /// Count, sum, min and max in one pass.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn summary_statistics(self) -> Result<SummaryStatistics<T>> {
        self.combine_globally(Summarizing::new())
    }
}

impl<T: RFBound + AsRef<str>> PCollection<T> {
    /// Concatenate elements separated by `delimiter`.
    ///
    /// ```
    /// use ironstream::*;
    ///
    /// let p = Pipeline::default();
    /// let s = of(&p, ["Using", "Stream", "API"]).joining(" ")?;
    /// assert_eq!(s, "Using Stream API");
    /// # anyhow::Result::<()>::Ok(())
    /// ```
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn joining(self, delimiter: &str) -> Result<String> {
        self.combine_globally(Joining::new(delimiter))
    }

    /// Like [`joining`](Self::joining), wrapped in `prefix` and `suffix`.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, or its source
    /// failed.
    pub fn joining_with(self, delimiter: &str, prefix: &str, suffix: &str) -> Result<String> {
        self.combine_globally(Joining::new(delimiter).with_affixes(prefix, suffix))
    }
}

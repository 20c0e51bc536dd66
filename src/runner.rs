//! Execution engine.
//!
//! Terminals hand the runner two closures: `local`, which drains one element
//! stream into a partial result, and `merge`, which combines two partial
//! results. The runner then executes the plan:
//!
//! * **Sequential** -- open the source whole, wire every step onto it and call
//!   `local` once on the caller's thread.
//! * **Parallel** -- split the source into ordered leaves, wire fused stateless
//!   steps onto each leaf, pass barriers across all leaves, then run `local` per
//!   leaf on rayon workers and fold the partials pairwise with `merge`
//!   (fork-join, source order preserved).

use crate::planner::{Plan, Step, build_plan};
use crate::spliterator::SplitPolicy;
use crate::type_token::{ElemIter, Partition, from_partition};
use crate::{NodeId, Pipeline, RFBound};
use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::debug;

/// How a terminal drives its pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Single traversal on the caller's thread.
    #[default]
    Sequential,
    /// Fork-join over source leaves.
    ///
    /// `threads` runs the job on a dedicated pool of that size instead of the
    /// global rayon pool; `min_split_len` fixes the leaf size instead of
    /// deriving it from the source size.
    Parallel {
        threads: Option<usize>,
        min_split_len: Option<usize>,
    },
}

pub struct Runner {
    pub mode: ExecMode,
    /// Worker count assumed when sizing leaves for the global pool.
    pub parallelism: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Sequential,
            parallelism: rayon::current_num_threads().max(num_cpus::get()).max(1),
        }
    }
}

impl Runner {
    #[must_use]
    pub fn for_mode(mode: ExecMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Execute the chain ending at `terminal` and fold its elements.
    ///
    /// # Errors
    /// On a broken chain, an already opened source, a pool build failure, or a
    /// fault raised by the source during traversal.
    pub fn execute<T, A, L, M>(&self, p: &Pipeline, terminal: NodeId, local: L, merge: M) -> Result<A>
    where
        T: RFBound,
        A: Send,
        L: Fn(ElemIter<T>) -> A + Send + Sync,
        M: Fn(A, A) -> A + Send + Sync,
    {
        let plan = build_plan(p, terminal)?;
        debug!(mode = ?self.mode, source = %plan.source_label, "running pipeline");

        let out = match self.mode {
            ExecMode::Sequential => exec_seq(&plan, &local),
            ExecMode::Parallel {
                threads,
                min_split_len,
            } => {
                let policy = SplitPolicy::new(threads.unwrap_or(self.parallelism), min_split_len);
                match threads {
                    Some(t) => {
                        let pool = rayon::ThreadPoolBuilder::new()
                            .num_threads(t)
                            .build()
                            .with_context(|| format!("build rayon pool with {t} threads"))?;
                        pool.install(|| exec_par(&plan, &policy, &local, &merge))
                    }
                    None => exec_par(&plan, &policy, &local, &merge),
                }
            }
        };

        if let Some(fault) = plan.source.take_fault() {
            return Err(fault.context(format!("traversing {}", plan.source_label)));
        }
        out
    }

    /// Open the chain ending at `terminal` as one sequential element stream.
    ///
    /// # Errors
    /// On a broken chain or an already opened source.
    pub fn open_seq<T: RFBound>(p: &Pipeline, terminal: NodeId) -> Result<ElemIter<T>> {
        let plan = build_plan(p, terminal)?;
        from_partition::<T>(wire_seq(&plan)?)
    }

    /// Drain the chain ending at `terminal` on the caller's thread, handing
    /// each element to `f` in source order.
    ///
    /// # Errors
    /// On a broken chain, an already opened source, or a source fault.
    pub fn drain_seq<T, F>(p: &Pipeline, terminal: NodeId, f: F) -> Result<()>
    where
        T: RFBound,
        F: FnMut(T),
    {
        let plan = build_plan(p, terminal)?;
        from_partition::<T>(wire_seq(&plan)?)?.for_each(f);
        match plan.source.take_fault() {
            Some(fault) => Err(fault.context(format!("traversing {}", plan.source_label))),
            None => Ok(()),
        }
    }
}

fn wire_seq(plan: &Plan) -> Result<Partition> {
    let mut part = plan.source.open()?;
    for step in &plan.steps {
        part = match step {
            Step::Fused(ops) => ops.iter().try_fold(part, |acc, op| op.apply(acc))?,
            Step::Barrier(op) => op.apply(part)?,
        };
    }
    Ok(part)
}

/// Sequential executor (single partition on the caller's thread)
fn exec_seq<T, A, L>(plan: &Plan, local: &L) -> Result<A>
where
    T: RFBound,
    L: Fn(ElemIter<T>) -> A,
{
    let iter = from_partition::<T>(wire_seq(plan)?)?;
    Ok(local(iter))
}

/// Parallel executor (split source → fuse stateless per leaf → barriers → fold)
fn exec_par<T, A, L, M>(plan: &Plan, policy: &SplitPolicy, local: &L, merge: &M) -> Result<A>
where
    T: RFBound,
    A: Send,
    L: Fn(ElemIter<T>) -> A + Send + Sync,
    M: Fn(A, A) -> A + Send + Sync,
{
    let mut parts = plan.source.split(policy)?;
    debug!(leaves = parts.len(), "split source");

    for step in &plan.steps {
        parts = match step {
            Step::Fused(ops) => parts
                .into_iter()
                .map(|part| ops.iter().try_fold(part, |acc, op| op.apply(acc)))
                .collect::<Result<Vec<_>>>()?,
            // One leaf (unsplittable or unbounded source): stay lazy so that
            // limit/skip over an infinite stream never materializes it.
            Step::Barrier(op) if parts.len() == 1 => {
                parts.into_iter().map(|part| op.apply(part)).collect::<Result<Vec<_>>>()?
            }
            Step::Barrier(op) => op.apply_barrier(parts, policy)?,
        };
    }

    let iters = parts
        .into_iter()
        .map(from_partition::<T>)
        .collect::<Result<Vec<_>>>()?;
    let partials: Vec<A> = iters.into_par_iter().map(local).collect();
    merge_tree(partials, merge).ok_or_else(|| anyhow!("parallel run produced no leaves"))
}

/// Pairwise fork-join merge that keeps left-to-right order.
fn merge_tree<A, M>(mut parts: Vec<A>, merge: &M) -> Option<A>
where
    A: Send,
    M: Fn(A, A) -> A + Send + Sync,
{
    if parts.len() <= 1 {
        return parts.pop();
    }
    let right = parts.split_off(parts.len() / 2);
    let (l, r) = rayon::join(|| merge_tree(parts, merge), || merge_tree(right, merge));
    match (l, r) {
        (Some(a), Some(b)) => Some(merge(a, b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::merge_tree;

    #[test]
    fn merge_tree_preserves_order() {
        let parts: Vec<String> = (0..9).map(|i| i.to_string()).collect();
        let out = merge_tree(parts, &|a: String, b: String| a + &b);
        assert_eq!(out.as_deref(), Some("012345678"));
    }

    #[test]
    fn merge_tree_of_nothing_is_none() {
        let out = merge_tree(Vec::<u8>::new(), &|a, b| a + b);
        assert!(out.is_none());
    }
}

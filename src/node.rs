use crate::spliterator::SplitPolicy;
use crate::type_token::{Partition, SourceOps, TypeTag};
use anyhow::Result;
use std::sync::Arc;

/// A type-erased stage operating on [`Partition`]s.
///
/// `apply` wires the stage onto one lazily evaluated partition; no element is
/// pulled until the terminal drains it. Stateful stages are *barriers*: when a
/// parallel run has more than one leaf, the runner hands all leaves to
/// [`apply_barrier`](DynOp::apply_barrier) instead.
pub trait DynOp: Send + Sync {
    fn apply(&self, input: Partition) -> Result<Partition>;

    /// Short stage label used by plan explanations.
    fn name(&self) -> &'static str;

    fn is_barrier(&self) -> bool {
        false
    }

    /// Apply across all leaves at once, returning re-split leaves.
    fn apply_barrier(&self, parts: Vec<Partition>, _policy: &SplitPolicy) -> Result<Vec<Partition>> {
        parts.into_iter().map(|p| self.apply(p)).collect()
    }
}

#[derive(Clone)]
pub enum Node {
    Source {
        ops: Arc<dyn SourceOps>,
        elem_tag: TypeTag,
        label: String,
    },
    Stateless(Vec<Arc<dyn DynOp>>),

    /// Stage that must see every upstream element (distinct, sorted, limit, skip).
    Stateful(Arc<dyn DynOp>),
}

//! Type tags, type-erased partitions and source handles.
//!
//! This module provides:
//! - [`Partition`]: the opaque buffer carried between nodes at runtime. Every
//!   partition holds an [`ElemIter<T>`], a lazily evaluated element stream.
//! - [`TypeTag`]: a lightweight runtime type identifier attached to sources so
//!   the planner can describe element types without a generic parameter.
//! - [`SourceOps`]: a type-erased interface over a source's [`Spliterator`],
//!   used by the runner to open the source whole (sequential) or as ordered
//!   leaves (parallel). Concrete handles come from [`source_ops_for`].

use crate::error::StreamError;
use crate::spliterator::{SplitPolicy, Spliterator, split_leaves};
use anyhow::Result;
use std::any::{Any, TypeId, type_name};
use std::sync::{Arc, Mutex, PoisonError};

/// A boxed, lazily evaluated stream of elements.
pub type ElemIter<T> = Box<dyn Iterator<Item = T> + Send>;

/// A partition buffer carried between nodes at runtime.
///
/// Always an [`ElemIter<T>`] behind `dyn Any`; stages downcast with
/// [`from_partition`].
pub type Partition = Box<dyn Any + Send>;

/// Slot where a source parks the first fault it hit mid-traversal.
pub(crate) type FaultSlot = Arc<Mutex<Option<anyhow::Error>>>;

/// Box an element stream as a [`Partition`].
pub fn into_partition<T: Send + 'static>(iter: ElemIter<T>) -> Partition {
    Box::new(iter)
}

/// Recover the element stream from a [`Partition`].
///
/// # Errors
/// [`StreamError::TypeMismatch`] if the partition carries a different element type.
pub fn from_partition<T: Send + 'static>(part: Partition) -> Result<ElemIter<T>> {
    part.downcast::<ElemIter<T>>()
        .map(|b| *b)
        .map_err(|_| {
            StreamError::TypeMismatch {
                expected: type_name::<T>(),
            }
            .into()
        })
}

/// A lightweight runtime type tag for debugging and plan explanations.
///
/// ```
/// use ironstream::type_token::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Type-erased access to a source.
///
/// A source hands out its elements exactly once: the first `open` or `split`
/// takes the underlying spliterator and any later call fails with
/// [`StreamError::AlreadyConsumed`].
pub trait SourceOps: Send + Sync {
    /// Open the whole source as a single partition.
    ///
    /// # Errors
    /// [`StreamError::AlreadyConsumed`] if the source was already opened.
    fn open(&self) -> Result<Partition>;

    /// Open the source as ordered leaves split according to `policy`.
    ///
    /// # Errors
    /// [`StreamError::AlreadyConsumed`] if the source was already opened.
    fn split(&self, policy: &SplitPolicy) -> Result<Vec<Partition>>;

    /// Size estimate recorded when the source was built; `None` if unknown.
    fn estimate_size(&self) -> Option<usize>;

    /// Take the fault raised during traversal, if any.
    fn take_fault(&self) -> Option<anyhow::Error>;
}

/// [`SourceOps`] over a boxed [`Spliterator<T>`].
pub struct SpliteratorSource<T: Send + 'static> {
    spl: Mutex<Option<Box<dyn Spliterator<T>>>>,
    estimate: Option<usize>,
    fault: Option<FaultSlot>,
}

impl<T: Send + 'static> SpliteratorSource<T> {
    fn take(&self) -> Result<Box<dyn Spliterator<T>>> {
        self.spl
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| StreamError::AlreadyConsumed.into())
    }
}

impl<T: Send + 'static> SourceOps for SpliteratorSource<T> {
    fn open(&self) -> Result<Partition> {
        Ok(into_partition(self.take()?.into_elem_iter()))
    }

    fn split(&self, policy: &SplitPolicy) -> Result<Vec<Partition>> {
        let leaves = split_leaves(self.take()?, policy);
        Ok(leaves
            .into_iter()
            .map(|leaf| into_partition(leaf.into_elem_iter()))
            .collect())
    }

    fn estimate_size(&self) -> Option<usize> {
        self.estimate
    }

    fn take_fault(&self) -> Option<anyhow::Error> {
        self.fault
            .as_ref()
            .and_then(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).take())
    }
}

/// Create a type-erased [`SourceOps`] over `spl`.
///
/// `fault` is checked by the runner after the terminal drained the source; a
/// parked error turns the run into a failure.
pub(crate) fn source_ops_for<T: Send + 'static>(
    spl: Box<dyn Spliterator<T>>,
    fault: Option<FaultSlot>,
) -> Arc<dyn SourceOps> {
    let estimate = spl.estimate_size();
    Arc::new(SpliteratorSource {
        spl: Mutex::new(Some(spl)),
        estimate,
        fault,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spliterator::SliceSpliterator;

    #[test]
    fn partition_round_trips_element_stream() -> Result<()> {
        let part = into_partition::<u8>(Box::new(vec![1u8, 2, 3].into_iter()));
        let back: Vec<u8> = from_partition::<u8>(part)?.collect();
        assert_eq!(back, vec![1, 2, 3]);
        Ok(())
    }

    #[test]
    fn wrong_element_type_is_reported() {
        let part = into_partition::<u8>(Box::new(std::iter::empty()));
        let err = from_partition::<String>(part).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<StreamError>(),
            Some(StreamError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn source_opens_once() {
        let ops = source_ops_for::<i32>(Box::new(SliceSpliterator::new(vec![1, 2])), None);
        assert_eq!(ops.estimate_size(), Some(2));
        assert!(ops.open().is_ok());
        let err = ops.open().err().unwrap();
        assert!(StreamError::is_already_consumed(&err));
    }
}

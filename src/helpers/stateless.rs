use crate::node::{DynOp, Node};
use crate::type_token::{Partition, from_partition, into_partition};
use crate::{PCollection, RFBound};
use anyhow::Result;
use std::marker::PhantomData;
use std::sync::Arc;

/// ---- Stateless DynOps ----
struct MapOp<I, O, F>(Arc<F>, PhantomData<fn(I) -> O>);
impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> O + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let f = Arc::clone(&self.0);
        let it = from_partition::<I>(input)?;
        Ok(into_partition::<O>(Box::new(it.map(move |i| f(&i)))))
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

struct FilterOp<T, P>(Arc<P>, PhantomData<fn(T)>);
impl<T, P> DynOp for FilterOp<T, P>
where
    T: RFBound,
    P: Send + Sync + Fn(&T) -> bool + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let pred = Arc::clone(&self.0);
        let it = from_partition::<T>(input)?;
        Ok(into_partition::<T>(Box::new(it.filter(move |t| pred(t)))))
    }

    fn name(&self) -> &'static str {
        "filter"
    }
}

struct FlatMapOp<I, O, J, F>(Arc<F>, PhantomData<fn(I) -> (O, J)>);
impl<I, O, J, F> DynOp for FlatMapOp<I, O, J, F>
where
    I: RFBound,
    O: RFBound,
    J: IntoIterator<Item = O> + 'static,
    J::IntoIter: Send + 'static,
    F: Send + Sync + Fn(&I) -> J + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let f = Arc::clone(&self.0);
        let it = from_partition::<I>(input)?;
        Ok(into_partition::<O>(Box::new(it.flat_map(move |i| f(&i)))))
    }

    fn name(&self) -> &'static str {
        "flat_map"
    }
}

struct PeekOp<T, F>(Arc<F>, PhantomData<fn(T)>);
impl<T, F> DynOp for PeekOp<T, F>
where
    T: RFBound,
    F: Send + Sync + Fn(&T) + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let f = Arc::clone(&self.0);
        let it = from_partition::<T>(input)?;
        Ok(into_partition::<T>(Box::new(it.inspect(move |t| f(t)))))
    }

    fn name(&self) -> &'static str {
        "peek"
    }
}

/// Stateless element-wise stages. All of them preserve source order and run
/// per leaf under parallel execution.
///
/// # Panics
/// Every stage panics if this handle was already operated upon or consumed.
impl<T: RFBound> PCollection<T> {
    /// Replace each element with `f(element)`.
    pub fn map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        let op: Arc<dyn DynOp> = Arc::new(MapOp::<T, O, F>(Arc::new(f), PhantomData));
        self.chain(Node::Stateless(vec![op]))
    }

    /// Keep elements for which `pred` returns `true`.
    pub fn filter<F>(self, pred: F) -> Self
    where
        F: 'static + Send + Sync + Fn(&T) -> bool,
    {
        let op: Arc<dyn DynOp> = Arc::new(FilterOp::<T, F>(Arc::new(pred), PhantomData));
        self.chain(Node::Stateless(vec![op]))
    }

    /// Replace each element with the zero or more elements of `f(element)`,
    /// concatenated in source order.
    pub fn flat_map<O, J, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        J: IntoIterator<Item = O> + 'static,
        J::IntoIter: Send + 'static,
        F: 'static + Send + Sync + Fn(&T) -> J,
    {
        let op: Arc<dyn DynOp> = Arc::new(FlatMapOp::<T, O, J, F>(Arc::new(f), PhantomData));
        self.chain(Node::Stateless(vec![op]))
    }

    /// Observe each element as it flows past, without changing the stream.
    ///
    /// Runs only for elements a terminal actually pulls.
    pub fn peek<F>(self, f: F) -> Self
    where
        F: 'static + Send + Sync + Fn(&T),
    {
        let op: Arc<dyn DynOp> = Arc::new(PeekOp::<T, F>(Arc::new(f), PhantomData));
        self.chain(Node::Stateless(vec![op]))
    }
}

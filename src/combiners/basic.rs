//! Basic arithmetic combiners: Sum, Min, Max, MinBy, MaxBy

use crate::RFBound;
use crate::collection::CombineFn;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;
use std::sync::Arc;

/* ===================== Sum<T> ===================== */

/// Sum of all elements.
///
/// - Accumulator: `T`
/// - Output: `T` (`T::default()` for an empty stream)
///
/// Requires `T: Add<Output=T> + Default`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(pub PhantomData<T>);
impl<T> Sum<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: RFBound + Add<Output = T> + Default,
{
    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = take(acc) + v;
    }

    fn merge(&self, acc: &mut T, other: T) {
        *acc = take(acc) + other;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Min<T> ===================== */

/// Minimum element (requires `Ord`); the first of equal minima wins.
///
/// - Accumulator: `Option<T>`
/// - Output: `Option<T>` (`None` for an empty stream)
#[derive(Clone, Copy, Debug, Default)]
pub struct Min<T>(pub PhantomData<T>);
impl<T> Min<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Min<T>
where
    T: RFBound + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) => {
                if v < *cur {
                    *cur = v
                }
            }
            None => *acc = Some(v),
        }
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            self.add_input(acc, b);
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/* ===================== Max<T> ===================== */

/// Maximum element (requires `Ord`); the first of equal maxima wins.
///
/// - Accumulator: `Option<T>`
/// - Output: `Option<T>` (`None` for an empty stream)
#[derive(Clone, Copy, Debug, Default)]
pub struct Max<T>(pub PhantomData<T>);
impl<T> Max<T> {
    /// Convenience constructor (same as `Default`).
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Max<T>
where
    T: RFBound + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) => {
                if v > *cur {
                    *cur = v
                }
            }
            None => *acc = Some(v),
        }
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            self.add_input(acc, b);
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/* ===================== MinBy<T> / MaxBy<T> ===================== */

/// Minimum under a caller-supplied comparator; the first of equal minima wins.
pub struct MinBy<T> {
    cmp: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
}

impl<T> MinBy<T> {
    pub fn new(cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self { cmp: Arc::new(cmp) }
    }
}

impl<T: RFBound> CombineFn<T, Option<T>, Option<T>> for MinBy<T> {
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) if (self.cmp)(&v, cur) != Ordering::Less => {}
            _ => *acc = Some(v),
        }
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            self.add_input(acc, b);
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Maximum under a caller-supplied comparator; the first of equal maxima wins.
pub struct MaxBy<T> {
    cmp: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
}

impl<T> MaxBy<T> {
    pub fn new(cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self { cmp: Arc::new(cmp) }
    }
}

impl<T: RFBound> CombineFn<T, Option<T>, Option<T>> for MaxBy<T> {
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) if (self.cmp)(&v, cur) != Ordering::Greater => {}
            _ => *acc = Some(v),
        }
    }

    fn merge(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(b) = other {
            self.add_input(acc, b);
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

//! Statistical combiners: `AverageF64`, `Summarizing`

use crate::RFBound;
use crate::collection::CombineFn;
use crate::stats::SummaryStatistics;
use std::marker::PhantomData;

/* ===================== AverageF64 ===================== */

/// Arithmetic mean as `f64`.
///
/// Values must be convertible into `f64` via `Into<f64>`.
///
/// - Accumulator: `(sum_f64, count_u64)`
/// - Output: `Option<f64>`, `None` for an empty stream (no division by zero)
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageF64;

impl<V> CombineFn<V, (f64, u64), Option<f64>> for AverageF64
where
    V: RFBound + Into<f64>,
{
    fn create(&self) -> (f64, u64) {
        (0.0, 0)
    }

    fn add_input(&self, acc: &mut (f64, u64), v: V) {
        acc.0 += v.into();
        acc.1 += 1;
    }

    fn merge(&self, acc: &mut (f64, u64), other: (f64, u64)) {
        acc.0 += other.0;
        acc.1 += other.1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: (f64, u64)) -> Option<f64> {
        (acc.1 > 0).then(|| acc.0 / acc.1 as f64)
    }
}

/* ===================== Summarizing ===================== */

/// Count, sum, min and max in a single pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Summarizing<T>(pub PhantomData<T>);
impl<T> Summarizing<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, SummaryStatistics<T>, SummaryStatistics<T>> for Summarizing<T>
where
    T: RFBound + Copy + Ord + Into<i64>,
{
    fn create(&self) -> SummaryStatistics<T> {
        SummaryStatistics::default()
    }

    fn add_input(&self, acc: &mut SummaryStatistics<T>, v: T) {
        acc.accept(v);
    }

    fn merge(&self, acc: &mut SummaryStatistics<T>, other: SummaryStatistics<T>) {
        acc.combine(other);
    }

    fn finish(&self, acc: SummaryStatistics<T>) -> SummaryStatistics<T> {
        acc
    }
}

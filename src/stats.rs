//! Summary statistics over integer elements.

/// Count, sum, minimum and maximum of a stream of integers.
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// let stats = from_vec(&p, vec![31u32, 25, 40]).summary_statistics().unwrap();
/// assert_eq!(stats.count(), 3);
/// assert_eq!(stats.sum(), 96);
/// assert_eq!(stats.min(), Some(25));
/// assert_eq!(stats.max(), Some(40));
/// assert_eq!(stats.average(), Some(32.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryStatistics<T> {
    count: u64,
    sum: i64,
    min: Option<T>,
    max: Option<T>,
}

impl<T> Default for SummaryStatistics<T> {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0,
            min: None,
            max: None,
        }
    }
}

impl<T: Copy + Ord + Into<i64>> SummaryStatistics<T> {
    /// Record one value.
    pub fn accept(&mut self, v: T) {
        self.count += 1;
        self.sum += v.into();
        self.min = Some(self.min.map_or(v, |m| m.min(v)));
        self.max = Some(self.max.map_or(v, |m| m.max(v)));
    }

    /// Fold another partial summary into this one.
    pub fn combine(&mut self, other: Self) {
        self.count += other.count;
        self.sum += other.sum;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub fn sum(&self) -> i64 {
        self.sum
    }

    #[must_use]
    pub fn min(&self) -> Option<T> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<T> {
        self.max
    }

    /// Mean of the recorded values; `None` when nothing was recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

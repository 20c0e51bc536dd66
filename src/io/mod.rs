//! External sources.
//!
//! - [`lines`](fn@lines): a line-oriented text file, streamed lazily.
//! - [`RecordSource`]: anything that can hand back all of its records at once,
//!   consumed through [`from_record_source`](crate::from_record_source).
//!   [`VecRecordSource`] wraps an in-memory list and
//!   [`JsonlRecordSource`] reads newline-delimited JSON.

#[cfg_attr(docsrs, doc(cfg(feature = "io-jsonl")))]
#[cfg(feature = "io-jsonl")]
pub mod jsonl;
pub mod lines;

#[cfg(feature = "io-jsonl")]
pub use jsonl::{JsonlRecordSource, read_jsonl, read_jsonl_vec, write_jsonl_vec};
pub use lines::lines;

use anyhow::Result;

/// A repository-style provider of records.
///
/// ```
/// use ironstream::*;
///
/// let p = Pipeline::default();
/// let src = VecRecordSource::new(vec!["x".to_string(), "y".to_string()]);
/// let n = from_record_source(&p, &src)?.count()?;
/// assert_eq!(n, 2);
/// # anyhow::Result::<()>::Ok(())
/// ```
pub trait RecordSource<T> {
    /// Every record, in the order the source defines.
    ///
    /// # Errors
    /// Whatever prevented the source from producing its records.
    fn find_all(&self) -> Result<Vec<T>>;

    /// Short label used in plan explanations.
    fn describe(&self) -> String {
        "records".to_string()
    }
}

/// [`RecordSource`] over a fixed list.
#[derive(Clone, Debug, Default)]
pub struct VecRecordSource<T> {
    records: Vec<T>,
}

impl<T> VecRecordSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }
}

impl<T: Clone> RecordSource<T> for VecRecordSource<T> {
    fn find_all(&self) -> Result<Vec<T>> {
        Ok(self.records.clone())
    }
}

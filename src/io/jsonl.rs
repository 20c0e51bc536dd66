//! JSON Lines (JSONL) records.
//!
//! Files are newline-delimited JSON; empty and whitespace-only lines are
//! skipped on read.

use crate::helpers::sources::from_record_source;
use crate::io::RecordSource;
use crate::{PCollection, Pipeline, RFBound};
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a JSONL file into a typed `Vec<T>`.
///
/// # Errors
/// If the file cannot be opened or read, or a line fails to parse into `T`.
/// Errors name the offending line.
pub fn read_jsonl_vec<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::<T>::new();
    for (i, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("read line {} in {}", i + 1, path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let v: T = serde_json::from_str(&line).with_context(|| {
            format!("parse JSONL line {} in {}: {}", i + 1, path.display(), line)
        })?;
        out.push(v);
    }
    debug!(path = %path.display(), records = out.len(), "read jsonl");
    Ok(out)
}

/// Write a slice as JSONL (one compact JSON value per line), creating parent
/// directories as needed. Returns the number of records written.
///
/// # Errors
/// If the file cannot be created or written, or a record fails to serialize.
pub fn write_jsonl_vec<T: Serialize>(path: impl AsRef<Path>, data: &[T]) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    for (i, v) in data.iter().enumerate() {
        serde_json::to_writer(&mut w, v)
            .with_context(|| format!("serialize record {} to {}", i, path.display()))?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(data.len())
}

/// [`RecordSource`] reading every record of a JSONL file.
#[derive(Clone, Debug)]
pub struct JsonlRecordSource<T> {
    path: PathBuf,
    _t: PhantomData<fn() -> T>,
}

impl<T> JsonlRecordSource<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _t: PhantomData,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: DeserializeOwned> RecordSource<T> for JsonlRecordSource<T> {
    fn find_all(&self) -> Result<Vec<T>> {
        read_jsonl_vec(&self.path)
    }

    fn describe(&self) -> String {
        format!("jsonl({})", self.path.display())
    }
}

/// Read a JSONL file into a typed `PCollection<T>`.
///
/// # Errors
/// See [`read_jsonl_vec`].
pub fn read_jsonl<T>(p: &Pipeline, path: impl AsRef<Path>) -> Result<PCollection<T>>
where
    T: RFBound + DeserializeOwned,
{
    from_record_source(p, &JsonlRecordSource::<T>::new(path.as_ref()))
}

impl<T: RFBound + Serialize> PCollection<T> {
    /// Run the stream and write its elements to a JSONL file, in source order.
    /// Returns the number of records written.
    ///
    /// # Errors
    /// If the stream was already operated upon or consumed, its source failed,
    /// or the file could not be written.
    pub fn write_jsonl(self, path: impl AsRef<Path>) -> Result<usize> {
        let data = self.to_vec()?;
        write_jsonl_vec(path, &data)
    }
}

//! Temporary files for source tests.

#[cfg(feature = "io-jsonl")]
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new, empty temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write raw bytes to a temporary file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn mock_bytes_file(bytes: &[u8]) -> std::io::Result<TempFilePath> {
    let tmp = TempFilePath::new()?;
    let mut f = File::create(tmp.path())?;
    f.write_all(bytes)?;
    f.flush()?;
    Ok(tmp)
}

/// Write `lines` to a temporary text file, one per line.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::mock_lines_file;
///
/// let file = mock_lines_file(&["a", "bb", "ccc"])?;
/// let p = Pipeline::default();
/// assert_eq!(lines(&p, file.path())?.count()?, 3);
/// # anyhow::Result::<()>::Ok(())
/// ```
pub fn mock_lines_file<S: AsRef<str>>(lines: &[S]) -> std::io::Result<TempFilePath> {
    let tmp = TempFilePath::with_extension("txt")?;
    let mut w = BufWriter::new(File::create(tmp.path())?);
    for line in lines {
        writeln!(w, "{}", line.as_ref())?;
    }
    w.flush()?;
    Ok(tmp)
}

#[cfg(feature = "io-jsonl")]
/// Serialize `data` to a temporary JSONL file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn mock_jsonl_file<T: Serialize>(data: &[T]) -> std::io::Result<TempFilePath> {
    let tmp = TempFilePath::with_extension("jsonl")?;
    let mut w = BufWriter::new(File::create(tmp.path())?);
    for item in data {
        let json = serde_json::to_string(item).map_err(std::io::Error::other)?;
        writeln!(w, "{json}")?;
    }
    w.flush()?;
    Ok(tmp)
}

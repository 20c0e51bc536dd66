use crate::error::StreamError;
use crate::helpers::sources::from_spliterator_labeled;
use crate::spliterator::IterSpliterator;
use crate::type_token::FaultSlot;
use crate::{PCollection, Pipeline};
use anyhow::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, PoisonError};
use tracing::warn;

/// Stream the lines of a text file, without their line terminators.
///
/// The file is opened here, so a missing or unreadable file fails
/// immediately with [`StreamError::Resource`]. The handle is held by the
/// traversal and closed when the traversal ends, whether it drained the file,
/// stopped early (`find_first`, `limit`, ...), or failed.
///
/// A read error partway through (for example invalid UTF-8) ends the
/// traversal and the terminal returns that error. The source never splits.
///
/// ```
/// use ironstream::*;
/// use std::io::Write;
///
/// let mut f = tempfile::NamedTempFile::new()?;
/// writeln!(f, "alpha")?;
/// writeln!(f, "beta")?;
///
/// let p = Pipeline::default();
/// let upper = lines(&p, f.path())?.map(|l| l.to_uppercase()).to_vec()?;
/// assert_eq!(upper, vec!["ALPHA", "BETA"]);
/// # anyhow::Result::<()>::Ok(())
/// ```
///
/// # Errors
/// [`StreamError::Resource`] if the file cannot be opened.
pub fn lines(p: &Pipeline, path: impl AsRef<Path>) -> Result<PCollection<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| StreamError::Resource {
        path: path.to_path_buf(),
        source,
    })?;

    let fault = FaultSlot::default();
    let slot = Arc::clone(&fault);
    let shown = path.display().to_string();
    let iter = BufReader::new(file)
        .lines()
        .enumerate()
        .map_while(move |(idx, line)| match line {
            Ok(line) => Some(line),
            Err(e) => {
                warn!(path = %shown, line = idx + 1, error = %e, "read failed, ending traversal");
                let err = anyhow::Error::new(e).context(format!("read line {} in {shown}", idx + 1));
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
                None
            }
        });

    Ok(from_spliterator_labeled(
        p,
        Box::new(IterSpliterator::unsized_iter(Box::new(iter))),
        Some(fault),
        format!("lines({})", path.display()),
    ))
}

use anyhow::Result;
use ironstream::testing::*;
use ironstream::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn lines_streams_file_contents() -> Result<()> {
    let file = mock_lines_file(&["alpha", "", "gamma delta"])?;
    let p = TestPipeline::new();
    let out = lines(&p, file.path())?.to_vec()?;
    assert_collections_equal(
        &out,
        &["alpha".to_string(), String::new(), "gamma delta".to_string()],
    );
    Ok(())
}

#[test]
fn lines_word_count() -> Result<()> {
    let file = mock_lines_file(&["the quick brown fox", "jumps over the lazy dog"])?;
    let p = TestPipeline::new();
    let words = lines(&p, file.path())?
        .flat_map(|l| l.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .count()?;
    assert_eq!(words, 9);
    Ok(())
}

#[test]
fn lines_in_parallel_mode_runs_as_one_leaf() -> Result<()> {
    let file = mock_lines_file(&["1", "2", "3", "4"])?;
    let p = TestPipeline::new();
    let total = lines(&p, file.path())?
        .parallel()
        .map(|l| l.parse::<u32>().unwrap_or_default())
        .sum()?;
    assert_eq!(total, 10);
    Ok(())
}

#[test]
fn missing_file_fails_at_construction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    let p = TestPipeline::new();
    let err = lines(&p, &path).err().expect("missing file must fail");
    match err.downcast_ref::<StreamError>() {
        Some(StreamError::Resource { path: failed, .. }) => assert_eq!(failed, &path),
        other => panic!("expected a resource fault, got {other:?}"),
    }
    assert_eq!(p.node_count(), 0);
}

#[test]
fn read_error_mid_traversal_fails_the_terminal() -> Result<()> {
    let file = mock_bytes_file(b"ok line\n\xff\xfe broken\nnever read\n")?;
    let p = TestPipeline::new();
    let err = lines(&p, file.path())?.count().unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("read line 2"), "unexpected error: {msg}");
    Ok(())
}

/// Counts upward and records when it is dropped.
struct Tracked {
    next: u32,
    dropped: Arc<AtomicBool>,
}

impl Iterator for Tracked {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.next += 1;
        Some(self.next)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn tracked_source(p: &Pipeline) -> (PCollection<u32>, Arc<AtomicBool>) {
    let dropped = Arc::new(AtomicBool::new(false));
    let iter = Tracked {
        next: 0,
        dropped: Arc::clone(&dropped),
    };
    let s = from_spliterator(p, IterSpliterator::unsized_iter(Box::new(iter)));
    (s, dropped)
}

#[test]
fn early_stop_releases_the_source() -> Result<()> {
    let p = TestPipeline::new();

    let (s, dropped) = tracked_source(&p);
    assert!(!dropped.load(Ordering::SeqCst));
    assert_eq!(s.find_first()?, Some(1));
    assert!(dropped.load(Ordering::SeqCst));

    let (s, dropped) = tracked_source(&p);
    assert_eq!(s.parallel().limit(3).to_vec()?, vec![1, 2, 3]);
    assert!(dropped.load(Ordering::SeqCst));

    let (s, dropped) = tracked_source(&p);
    assert!(s.any_match(|n| *n == 4)?);
    assert!(dropped.load(Ordering::SeqCst));
    Ok(())
}

#[test]
fn unforced_source_is_released_with_its_pipeline() {
    let p = TestPipeline::new();
    let (s, dropped) = tracked_source(&p);
    let mapped = s.map(|n| n + 1);
    assert!(!dropped.load(Ordering::SeqCst));

    drop(mapped);
    assert!(!dropped.load(Ordering::SeqCst));
    drop(p);
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn early_stop_on_lines_reads_only_the_head() -> Result<()> {
    let file = mock_lines_file(&["first", "second", "third"])?;
    let p = TestPipeline::new();
    let first = lines(&p, file.path())?.find_first()?;
    assert_eq!(first.as_deref(), Some("first"));
    assert_eq!(lines(&p, file.path())?.limit(2).count()?, 2);
    Ok(())
}

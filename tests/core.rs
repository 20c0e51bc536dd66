use ironstream::testing::*;
use ironstream::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn map_filter_flatmap_chain() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let lines = from_vec(
        &p,
        vec![
            "The quick brown fox".to_string(),
            "jumps over the lazy dog".to_string(),
        ],
    );

    let words = lines.flat_map(|s: &String| {
        s.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
    });
    let filtered = words.filter(|w: &String| w.len() >= 4);

    let out = filtered.to_vec()?;

    assert_collections_equal(
        &out,
        &[
            "quick".to_string(),
            "brown".to_string(),
            "jumps".to_string(),
            "over".to_string(),
            "lazy".to_string(),
        ],
    );
    Ok(())
}

#[test]
fn flat_map_keeps_source_order_and_drops_empty_expansions() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, vec![0u32, 3, 1, 2])
        .flat_map(|&n| (0..n).map(move |i| n * 10 + i))
        .to_vec()?;
    assert_collections_equal(&out, &[30, 31, 32, 10, 20, 21]);
    Ok(())
}

#[test]
fn nothing_runs_before_a_terminal() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let calls = std::sync::Arc::new(AtomicUsize::new(0));
    let seen = std::sync::Arc::clone(&calls);
    let mapped = from_vec(&p, vec![1, 2, 3]).map(move |x: &i32| {
        seen.fetch_add(1, Ordering::SeqCst);
        x + 1
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(mapped.to_vec()?, vec![2, 3, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn peek_sees_every_pulled_element() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
    let log = std::sync::Arc::clone(&seen);
    let total = from_vec(&p, vec![5, 6, 7])
        .peek(move |x: &i32| log.lock().unwrap().push(*x))
        .sum()?;
    assert_eq!(total, 18);
    assert_eq!(*seen.lock().unwrap(), vec![5, 6, 7]);
    Ok(())
}

#[test]
fn find_first_stops_pulling() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let pulled = std::sync::Arc::new(AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&pulled);
    let first = range(&p, 0u32, 1_000)
        .peek(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .filter(|n| n % 7 == 3)
        .find_first()?;
    assert_eq!(first, Some(3));
    assert_eq!(pulled.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn find_first_on_empty_is_none() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let first = from_vec(&p, vec![1, 3, 5]).filter(|n| n % 2 == 0).find_first()?;
    assert_eq!(first, None);
    Ok(())
}

#[test]
fn match_terminals() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    assert!(from_vec(&p, vec![1, 2, 3]).any_match(|n| *n == 2)?);
    assert!(!from_vec(&p, vec![1, 2, 3]).all_match(|n| *n < 3)?);
    assert!(from_vec(&p, vec![1, 2, 3]).none_match(|n| *n > 3)?);

    // Vacuous truth on empty streams.
    assert!(from_vec(&p, Vec::<i32>::new()).all_match(|_| false)?);
    assert!(from_vec(&p, Vec::<i32>::new()).none_match(|_| true)?);
    assert!(!from_vec(&p, Vec::<i32>::new()).any_match(|_| true)?);
    Ok(())
}

#[test]
fn any_match_short_circuits_on_unbounded_source() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let found = iterate(&p, 1u64, |n| n * 2).any_match(|n| *n > 1_000)?;
    assert!(found);
    Ok(())
}

#[test]
fn words_pipeline() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, sample_words())
        .filter(|w| w.len() > 3)
        .map(|w| w.to_uppercase())
        .to_vec()?;
    assert_collections_equal(
        &out,
        &[
            "USING".to_string(),
            "STREAM".to_string(),
            "FROM".to_string(),
            "JAVA8".to_string(),
            "STREAM".to_string(),
        ],
    );
    Ok(())
}

#[test]
fn iterator_yields_in_source_order() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let mut it = range(&p, 10i32, 13).map(|n| n * 2).iterator()?;
    assert_eq!(it.next(), Some(20));
    assert_eq!(it.next(), Some(22));
    assert_eq!(it.next(), Some(24));
    assert_eq!(it.next(), None);
    Ok(())
}

#[test]
fn iterator_over_unbounded_source_is_lazy() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let mut n = 0u32;
    let firsts: Vec<u32> = generate(&p, move || {
        n += 1;
        n
    })
    .iterator()?
    .take(3)
    .collect();
    assert_eq!(firsts, vec![1, 2, 3]);
    Ok(())
}

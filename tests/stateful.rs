use ironstream::testing::*;
use ironstream::*;

#[test]
fn distinct_keeps_first_occurrences() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, vec![1, 2, 2, 3, 1]).distinct().to_vec()?;
    assert_collections_equal(&out, &[1, 2, 3]);
    Ok(())
}

#[test]
fn distinct_on_strings() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, sample_words()).distinct().to_vec()?;
    assert_eq!(out, vec!["Using", "Stream", "API", "from", "Java8"]);
    Ok(())
}

#[test]
fn sorted_natural_and_by_comparator() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let asc = from_vec(&p, vec![5, 3, 9, 1]).sorted().to_vec()?;
    assert_collections_equal(&asc, &[1, 3, 5, 9]);

    let desc = from_vec(&p, vec![5, 3, 9, 1]).sorted_by(|a, b| b.cmp(a)).to_vec()?;
    assert_collections_equal(&desc, &[9, 5, 3, 1]);
    Ok(())
}

#[test]
fn sorted_by_key_is_stable() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, vec!["bb", "a", "cc", "d", "eee"])
        .sorted_by_key(|s| s.len())
        .to_vec()?;
    assert_eq!(out, vec!["a", "d", "bb", "cc", "eee"]);
    Ok(())
}

#[test]
fn limit_bounds_an_infinite_generator() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = iterate(&p, 0u64, |n| n + 1).limit(5).to_vec()?;
    assert_collections_equal(&out, &[0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn limit_then_forcing_terminal_on_generate() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let total = generate(&p, || 7u32).limit(6).sum()?;
    assert_eq!(total, 42);
    Ok(())
}

#[test]
fn skip_and_limit_page_through() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let page = range(&p, 0i32, 100).skip(20).limit(5).to_vec()?;
    assert_collections_equal(&page, &[20, 21, 22, 23, 24]);

    let beyond = range(&p, 0i32, 3).skip(10).to_vec()?;
    assert!(beyond.is_empty());

    let none = range(&p, 0i32, 3).limit(0).count()?;
    assert_eq!(none, 0);
    Ok(())
}

#[test]
fn skip_on_unbounded_source_then_limit() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = iterate(&p, 1u64, |n| n * 3).skip(2).limit(3).to_vec()?;
    assert_eq!(out, vec![9, 27, 81]);
    Ok(())
}

#[test]
fn stages_after_a_barrier_still_stream() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, vec![4, 1, 4, 2, 1])
        .distinct()
        .map(|n| n * 10)
        .sorted()
        .filter(|n| *n > 10)
        .to_vec()?;
    assert_eq!(out, vec![20, 40]);
    Ok(())
}

use ironstream::testing::*;
use ironstream::*;

#[test]
fn test_pipeline_tracks_graph_and_links() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let s = from_vec(&p, vec![1, 2, 3]).map(|n| n + 1).limit(2);
    assert_eq!(p.node_count(), 3);
    assert_eq!(p.edge_count(), 2);
    assert_eq!(p.linked_count(), 2);

    assert_eq!(s.to_vec()?, vec![2, 3]);
    assert_eq!(p.linked_count(), 3);
    Ok(())
}

#[test]
fn sample_contacts_fixture() {
    let contacts = sample_contacts();
    assert_eq!(contacts.len(), 10);
    assert!(contacts.iter().all(|c| c.email.ends_with("@example.com")));
    assert_eq!(contacts.iter().filter(|c| c.is_in_state("FL")).count(), 4);
}

#[test]
fn unordered_assertion_respects_multiplicity() {
    assert_collections_unordered_equal(&[1, 1, 2], &[1, 2, 1]);
    let mismatch = std::panic::catch_unwind(|| {
        assert_collections_unordered_equal(&[1, 1, 2], &[1, 2, 2]);
    });
    assert!(mismatch.is_err());
}

#[test]
fn predicate_assertions() {
    assert_all(&[2, 4, 6], |n| n % 2 == 0);
    assert_none(&[1, 3, 5], |n| n % 2 == 0);
}

#[test]
#[should_panic(expected = "expected an already-consumed fault")]
fn already_consumed_assertion_rejects_success() {
    let p = TestPipeline::new();
    assert_already_consumed(from_vec(&p, vec![1]).count());
}

#[test]
fn temp_files_are_removed_on_drop() -> anyhow::Result<()> {
    let file = mock_lines_file(&["x"])?;
    let path = file.path().to_path_buf();
    assert!(path.exists());
    drop(file);
    assert!(!path.exists());
    Ok(())
}

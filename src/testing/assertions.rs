//! Assertion functions for testing pipeline outputs.

use crate::error::StreamError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
///
/// # Example
///
/// ```
/// use ironstream::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two collections hold the same elements with the same
/// multiplicities, ignoring order.
///
/// Useful for parallel `for_each` side effects, whose order is unspecified.
///
/// # Panics
///
/// Panics if some element occurs a different number of times in each.
///
/// # Example
///
/// ```
/// use ironstream::testing::assert_collections_unordered_equal;
///
/// assert_collections_unordered_equal(&[3, 1, 2, 1], &[1, 1, 2, 3]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn counts<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
        let mut m = HashMap::new();
        for t in items {
            *m.entry(t).or_insert(0) += 1;
        }
        m
    }

    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    let (a, e) = (counts(actual), counts(expected));
    if a != e {
        let missing: Vec<_> = e.keys().filter(|k| a.get(*k) != e.get(*k)).collect();
        panic!(
            "Collection content mismatch:\n  Differing elements: {missing:?}\n  Expected: {expected:?}\n  Actual: {actual:?}"
        );
    }
}

/// Assert that every element satisfies `predicate`.
///
/// # Panics
///
/// Panics on the first element that does not.
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(
            predicate(item),
            "Element at index {i} does not satisfy predicate: {item:?}\n  Full collection: {collection:?}"
        );
    }
}

/// Assert that no element satisfies `predicate`.
///
/// # Panics
///
/// Panics on the first element that does.
pub fn assert_none<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    for (i, item) in collection.iter().enumerate() {
        assert!(
            !predicate(item),
            "Element at index {i} unexpectedly satisfies predicate: {item:?}\n  Full collection: {collection:?}"
        );
    }
}

/// Assert that a terminal failed because its stream was already operated
/// upon or consumed.
///
/// # Panics
///
/// Panics if `result` is `Ok` or failed for another reason.
///
/// # Example
///
/// ```
/// use ironstream::*;
/// use ironstream::testing::assert_already_consumed;
///
/// let p = Pipeline::default();
/// let s = from_vec(&p, vec![1, 2, 3]);
/// let reused = s.clone();
/// s.count().unwrap();
/// assert_already_consumed(reused.count());
/// ```
pub fn assert_already_consumed<T: Debug>(result: anyhow::Result<T>) {
    match result {
        Ok(v) => panic!("expected an already-consumed fault, got Ok({v:?})"),
        Err(e) => assert!(
            StreamError::is_already_consumed(&e),
            "expected an already-consumed fault, got: {e:#}"
        ),
    }
}

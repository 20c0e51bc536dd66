//! Container-building combiners: `ToVec`, `ToSet`, `ToBTreeSet`, `ToMap`, `Joining`.

use crate::RFBound;
use crate::collection::CombineFn;
use crate::error::StreamError;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/* ===================== ToVec<T> ===================== */

/// Collect every element into a `Vec<T>`, in source order.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToVec<T>(pub PhantomData<T>);
impl<T> ToVec<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: RFBound> CombineFn<T, Vec<T>, Vec<T>> for ToVec<T> {
    fn create(&self) -> Vec<T> {
        Vec::new()
    }
    fn add_input(&self, acc: &mut Vec<T>, v: T) {
        acc.push(v);
    }
    fn merge(&self, acc: &mut Vec<T>, mut other: Vec<T>) {
        acc.append(&mut other);
    }
    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/* ===================== ToSet<T> / ToBTreeSet<T> ===================== */

/// Collect distinct elements into a `HashSet<T>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToSet<T>(pub PhantomData<T>);
impl<T> ToSet<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: RFBound + Eq + Hash> CombineFn<T, HashSet<T>, HashSet<T>> for ToSet<T> {
    fn create(&self) -> HashSet<T> {
        HashSet::new()
    }
    fn add_input(&self, acc: &mut HashSet<T>, v: T) {
        acc.insert(v);
    }
    fn merge(&self, acc: &mut HashSet<T>, other: HashSet<T>) {
        acc.extend(other);
    }
    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }
}

/// Collect distinct elements into an ordered `BTreeSet<T>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToBTreeSet<T>(pub PhantomData<T>);
impl<T> ToBTreeSet<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: RFBound + Ord> CombineFn<T, BTreeSet<T>, BTreeSet<T>> for ToBTreeSet<T> {
    fn create(&self) -> BTreeSet<T> {
        BTreeSet::new()
    }
    fn add_input(&self, acc: &mut BTreeSet<T>, v: T) {
        acc.insert(v);
    }
    fn merge(&self, acc: &mut BTreeSet<T>, mut other: BTreeSet<T>) {
        acc.append(&mut other);
    }
    fn finish(&self, acc: BTreeSet<T>) -> BTreeSet<T> {
        acc
    }
}

/* ===================== ToMap<T, K, V> ===================== */

/// Accumulator for [`ToMap`]: the map so far, plus the first key seen twice.
pub struct MapAcc<K, V> {
    map: HashMap<K, V>,
    duplicate: Option<K>,
}

/// Collect elements into a `HashMap<K, V>` using key and value extractors.
///
/// Two elements mapping to the same key make the whole collection fail with
/// [`StreamError::DuplicateKey`].
pub struct ToMap<T, K, V> {
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
    value: Arc<dyn Fn(&T) -> V + Send + Sync>,
}

impl<T, K, V> ToMap<T, K, V> {
    pub fn new<KF, VF>(key: KF, value: VF) -> Self
    where
        KF: Fn(&T) -> K + Send + Sync + 'static,
        VF: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            key: Arc::new(key),
            value: Arc::new(value),
        }
    }
}

impl<T, K, V> ToMap<T, K, V>
where
    K: Eq + Hash,
{
    fn put(acc: &mut MapAcc<K, V>, k: K, v: V) {
        if acc.duplicate.is_some() {
            return;
        }
        if acc.map.contains_key(&k) {
            acc.duplicate = Some(k);
        } else {
            acc.map.insert(k, v);
        }
    }
}

impl<T, K, V> CombineFn<T, MapAcc<K, V>, Result<HashMap<K, V>, StreamError>> for ToMap<T, K, V>
where
    T: RFBound,
    K: Eq + Hash + Debug + Send + 'static,
    V: Send + 'static,
{
    fn create(&self) -> MapAcc<K, V> {
        MapAcc {
            map: HashMap::new(),
            duplicate: None,
        }
    }

    fn add_input(&self, acc: &mut MapAcc<K, V>, t: T) {
        Self::put(acc, (self.key)(&t), (self.value)(&t));
    }

    fn merge(&self, acc: &mut MapAcc<K, V>, other: MapAcc<K, V>) {
        if acc.duplicate.is_none() {
            acc.duplicate = other.duplicate;
        }
        for (k, v) in other.map {
            Self::put(acc, k, v);
        }
    }

    fn finish(&self, acc: MapAcc<K, V>) -> Result<HashMap<K, V>, StreamError> {
        match acc.duplicate {
            Some(k) => Err(StreamError::DuplicateKey(format!("{k:?}"))),
            None => Ok(acc.map),
        }
    }
}

/* ===================== Joining ===================== */

/// Concatenate string-like elements with a delimiter, wrapped in a prefix and
/// suffix.
///
/// The accumulator stays `None` until the first element so that merging an
/// empty leaf never introduces a stray delimiter.
#[derive(Clone, Debug, Default)]
pub struct Joining {
    delimiter: String,
    prefix: String,
    suffix: String,
}

impl Joining {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self.suffix = suffix.into();
        self
    }

    fn push(&self, acc: &mut Option<String>, v: &str) {
        match acc {
            Some(buf) => {
                buf.push_str(&self.delimiter);
                buf.push_str(v);
            }
            None => *acc = Some(v.to_owned()),
        }
    }
}

impl<S> CombineFn<S, Option<String>, String> for Joining
where
    S: AsRef<str>,
{
    fn create(&self) -> Option<String> {
        None
    }

    fn add_input(&self, acc: &mut Option<String>, v: S) {
        self.push(acc, v.as_ref());
    }

    fn merge(&self, acc: &mut Option<String>, other: Option<String>) {
        if let Some(rhs) = other {
            self.push(acc, &rhs);
        }
    }

    fn finish(&self, acc: Option<String>) -> String {
        format!("{}{}{}", self.prefix, acc.unwrap_or_default(), self.suffix)
    }
}

//! Endpoint label sets
//!
//! Labels are semantically unordered. Sort order goes through
//! [`LabelSet::canonical`]; identity is equality of the pairs themselves,
//! since the canonical string is not injective (`{a: "b,c=d"}` and
//! `{a: "b", c: "d"}` render the same).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Set of `key=value` labels identifying an endpoint
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    /// Create an empty label set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse labels in Hubble's `key=value` string form.
    ///
    /// Splits at the first `=`. A string without `=` becomes a key with an
    /// empty value; empty strings are ignored. Later duplicates win.
    pub fn parse<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() {
                continue;
            }
            match label.split_once('=') {
                Some((key, value)) => map.insert(key.to_string(), value.to_string()),
                None => map.insert(label.to_string(), String::new()),
            };
        }
        Self(map)
    }

    /// Add or replace a label
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a label value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// True when the set carries no labels
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate labels in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical text form: sorted `key=value` pairs joined by `,`
    ///
    /// Two label sets holding the same pairs always yield the same string.
    pub fn canonical(&self) -> String {
        let mut pairs: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        pairs.join(",")
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<LabelSet> for BTreeMap<String, String> {
    fn from(labels: LabelSet) -> Self {
        labels.0
    }
}

impl<K, V> FromIterator<(K, V)> for LabelSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

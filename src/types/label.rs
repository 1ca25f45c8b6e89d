//! Label maps: classification tags carrying confidence weights.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Set of labels with weights dropped. Comparisons work on these.
pub type LabelSet = BTreeSet<String>;

/// Mapping from label to weight for one node or edge.
///
/// Uses BTreeMap for deterministic iteration order. Weights stored here have
/// already passed validation in the graph that owns the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap(BTreeMap<String, f64>);

impl LabelMap {
    /// Create an empty label map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map holding a single label.
    pub fn single(label: impl Into<String>, weight: f64) -> Self {
        let mut map = Self::new();
        map.insert(label, weight);
        map
    }

    /// Insert or replace a label, returning the previous weight.
    pub fn insert(&mut self, label: impl Into<String>, weight: f64) -> Option<f64> {
        self.0.insert(label.into(), weight)
    }

    /// Add `weight` to a label, inserting it if missing.
    pub fn accumulate(&mut self, label: &str, weight: f64) {
        match self.0.get_mut(label) {
            Some(w) => *w += weight,
            None => {
                self.0.insert(label.to_string(), weight);
            }
        }
    }

    /// Weight of a label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    /// Whether the label is present.
    pub fn contains(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    /// Remove a label, returning its weight.
    pub fn remove(&mut self, label: &str) -> Option<f64> {
        self.0.remove(label)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The label set, weights ignored.
    pub fn labels(&self) -> LabelSet {
        self.0.keys().cloned().collect()
    }

    /// Whether the label set is exactly `{label}`.
    pub fn is_only(&self, label: &str) -> bool {
        self.0.len() == 1 && self.0.contains_key(label)
    }

    /// Whether both maps carry the same label set.
    pub fn same_labels(&self, other: &LabelMap) -> bool {
        self.0.len() == other.0.len() && self.0.keys().eq(other.0.keys())
    }

    /// Iterate over (label, weight) pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(l, w)| (l.as_str(), *w))
    }

    /// Iterate mutably over weights in label order.
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, f64> {
        self.0.iter_mut()
    }

    /// Keep only the label(s) with maximum weight. Ties are all kept.
    pub fn retain_max(&mut self) {
        let max = self.0.values().copied().fold(f64::NEG_INFINITY, f64::max);
        self.0.retain(|_, w| *w == max);
    }
}

impl FromIterator<(String, f64)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, w)| (l.to_string(), w)).collect())
    }
}

impl IntoIterator for LabelMap {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

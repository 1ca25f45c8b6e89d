//! Weighted combination of two graphs' labels.
//!
//! ## Algorithm
//!
//! Both graphs are reconciled and every ordered pair the first graph leaves
//! unlisted is labeled `{no_relation: 1.0}`. Then, per object (primitive or
//! edge) and label:
//!
//! - label in both: `f(value_a, weight_a, value_b, weight_b)`
//! - label only in B: `weight_b * value_b`
//! - label only in A: `weight_a * value_a`
//!
//! An object missing from one graph counts as `{no_relation: 1.0}` there, so
//! unseen objects read as confidently unrelated rather than uninformative.

use std::collections::BTreeMap;

use crate::policy::{self, CombineFn, LabelConventions};
use crate::reconcile::Reconciler;
use crate::types::{LabelGraph, LabelMap};

/// Combine the labels of one object.
pub fn merge_label_lists<F: CombineFn>(
    labels_a: &LabelMap,
    weight_a: f64,
    labels_b: &LabelMap,
    weight_b: f64,
    combine: &F,
) -> LabelMap {
    let mut merged = LabelMap::new();
    for (label, value_a) in labels_a.iter() {
        let value = match labels_b.get(label) {
            Some(value_b) => combine(value_a, weight_a, value_b, weight_b),
            None => weight_a * value_a,
        };
        merged.insert(label, value);
    }
    for (label, value_b) in labels_b.iter() {
        if !labels_a.contains(label) {
            merged.insert(label, weight_b * value_b);
        }
    }
    merged
}

/// Combine two object → labels maps.
///
/// Objects present in only one map are merged against `{no_relation: 1.0}`.
pub fn merge_label_maps<K, F>(
    map_a: &BTreeMap<K, LabelMap>,
    weight_a: f64,
    map_b: &BTreeMap<K, LabelMap>,
    weight_b: f64,
    combine: &F,
    no_relation: &str,
) -> BTreeMap<K, LabelMap>
where
    K: Ord + Clone,
    F: CombineFn,
{
    let unrelated = LabelMap::single(no_relation, 1.0);
    let mut merged = BTreeMap::new();

    for (object, labels_a) in map_a {
        let labels_b = map_b.get(object).unwrap_or(&unrelated);
        merged.insert(
            object.clone(),
            merge_label_lists(labels_a, weight_a, labels_b, weight_b, combine),
        );
    }
    for (object, labels_b) in map_b {
        if !map_a.contains_key(object) {
            merged.insert(
                object.clone(),
                merge_label_lists(&unrelated, weight_a, labels_b, weight_b, combine),
            );
        }
    }
    merged
}

/// Merges graphs under a combination rule.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    conventions: LabelConventions,
    reconciler: Reconciler,
}

impl Merger {
    /// Create a merger with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self {
            reconciler: Reconciler::with_conventions(conventions.clone()),
            conventions,
        }
    }

    /// Merge `b` into `a`, combining node and edge labels with separate rules.
    ///
    /// The result keeps `a`'s source name, weight and ABSENT bookkeeping.
    pub fn merge<N, E>(&self, a: LabelGraph, b: LabelGraph, node_fn: N, edge_fn: E) -> LabelGraph
    where
        N: CombineFn,
        E: CombineFn,
    {
        let no_relation = self.conventions.no_relation_label.as_str();
        let (mut a, b) = self.reconciler.reconcile(a, b);
        a.label_missing_edges(no_relation);

        a.nodes = merge_label_maps(&a.nodes, a.weight, &b.nodes, b.weight, &node_fn, no_relation);
        a.edges = merge_label_maps(&a.edges, a.weight, &b.edges, b.weight, &edge_fn, no_relation);

        tracing::trace!(
            graph = a.name(),
            other = b.name(),
            nodes = a.nodes.len(),
            edges = a.edges.len(),
            "merged label graphs"
        );
        a
    }

    /// Merge with the weighted sum on both nodes and edges.
    pub fn weighted_sum(&self, a: LabelGraph, b: LabelGraph) -> LabelGraph {
        self.merge(a, b, policy::weighted_sum, policy::weighted_sum)
    }
}

//! The label graph value type.
//!
//! A label graph is bipartite over two identical copies of a primitive set:
//! every primitive carries a node label map, and every ordered pair of
//! distinct primitives may carry an edge label map. The graph also records
//! which primitives and edges were synthesized as ABSENT placeholders during
//! reconciliation, plus a side channel holding no-relation edges that have
//! been set aside.
//!
//! ## Invariants
//!
//! - Edge keys are ordered pairs of distinct primitives (see [`EdgeKey`]).
//! - Every primitive referenced by an edge key has a node label map;
//!   missing ones are synthesized with the no-relation label and reported
//!   as a structural issue.
//! - Weights are finite. Non-finite input weights are rejected.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::issue::GraphIssue;
use crate::policy::DEFAULT_NO_RELATION_LABEL;
use super::label::LabelMap;
use super::primitive::{EdgeKey, PrimitiveId};

/// Labeled bipartite relation graph over a set of primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGraph {
    /// Source name for diagnostics (file path, test name, ...).
    pub(crate) source: Option<String>,
    /// Graph-level weight, used when merging.
    pub(crate) weight: f64,
    /// Node label maps by primitive.
    pub(crate) nodes: BTreeMap<PrimitiveId, LabelMap>,
    /// Edge label maps by ordered primitive pair.
    pub(crate) edges: BTreeMap<EdgeKey, LabelMap>,
    /// Set when any issue has been recorded.
    pub(crate) error: bool,
    /// Issues recorded so far, in order.
    pub(crate) issues: Vec<GraphIssue>,
    /// Primitives referenced by an edge before being labeled.
    pub(crate) implicit_nodes: BTreeSet<PrimitiveId>,
    /// Primitives synthesized as ABSENT.
    pub(crate) absent_nodes: BTreeSet<PrimitiveId>,
    /// Edges synthesized as ABSENT.
    pub(crate) absent_edges: BTreeSet<EdgeKey>,
    /// No-relation edges temporarily set aside.
    pub(crate) hidden_edges: BTreeMap<EdgeKey, LabelMap>,
}

impl Default for LabelGraph {
    fn default() -> Self {
        Self {
            source: None,
            weight: 1.0,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            error: false,
            issues: Vec::new(),
            implicit_nodes: BTreeSet::new(),
            absent_nodes: BTreeSet::new(),
            absent_edges: BTreeSet::new(),
            hidden_edges: BTreeMap::new(),
        }
    }
}

impl LabelGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph tagged with a source name.
    pub fn named(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Build a graph from raw node and edge label maps.
    ///
    /// Self-pairs and non-finite weights are skipped with a format issue.
    /// Primitives referenced only by edges are added with `no_label`.
    pub fn from_label_maps<N, E>(nodes: N, edges: E, no_label: &str) -> Self
    where
        N: IntoIterator<Item = (PrimitiveId, LabelMap)>,
        E: IntoIterator<Item = ((PrimitiveId, PrimitiveId), LabelMap)>,
    {
        let mut graph = Self::new();
        for (id, labels) in nodes {
            // Keep primitives whose every label was rejected.
            graph.nodes.entry(id.clone()).or_default();
            for (label, weight) in labels {
                graph.add_node_label(id.clone(), label, weight);
            }
        }
        for ((from, to), labels) in edges {
            for (label, weight) in labels {
                graph.add_edge_entry(from.clone(), to.clone(), label, weight, no_label);
            }
        }
        graph
    }

    /// Source name used in diagnostics.
    pub fn name(&self) -> &str {
        self.source.as_deref().unwrap_or("<memory>")
    }

    /// Graph-level weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Set the graph-level weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Builder form of [`set_weight`](Self::set_weight).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Node label maps.
    pub fn nodes(&self) -> &BTreeMap<PrimitiveId, LabelMap> {
        &self.nodes
    }

    /// Edge label maps.
    pub fn edges(&self) -> &BTreeMap<EdgeKey, LabelMap> {
        &self.edges
    }

    /// Label map of a primitive.
    pub fn node_labels(&self, id: &str) -> Option<&LabelMap> {
        self.nodes.get(id)
    }

    /// Label map of an edge.
    pub fn edge_labels(&self, key: &EdgeKey) -> Option<&LabelMap> {
        self.edges.get(key)
    }

    /// Primitive ids in canonical order.
    pub fn primitives(&self) -> impl Iterator<Item = &PrimitiveId> {
        self.nodes.keys()
    }

    /// Number of primitives.
    pub fn primitive_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the primitive exists.
    pub fn contains_primitive(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether any issue has been recorded.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Recorded issues.
    pub fn issues(&self) -> &[GraphIssue] {
        &self.issues
    }

    /// Primitives synthesized as ABSENT.
    pub fn absent_nodes(&self) -> &BTreeSet<PrimitiveId> {
        &self.absent_nodes
    }

    /// Edges synthesized as ABSENT.
    pub fn absent_edges(&self) -> &BTreeSet<EdgeKey> {
        &self.absent_edges
    }

    /// No-relation edges currently set aside.
    pub fn hidden_edges(&self) -> &BTreeMap<EdgeKey, LabelMap> {
        &self.hidden_edges
    }

    /// Record an issue: logs it and sets the error flag.
    pub fn record_issue(&mut self, issue: GraphIssue) {
        issue.log(self.name());
        self.error = true;
        self.issues.push(issue);
    }

    /// Add (or replace) a node label.
    ///
    /// Returns `false` if the entry was rejected. Replacing an existing
    /// label is accepted but reported. Labeling an anonymous primitive
    /// drops its placeholder label.
    pub fn add_node_label(
        &mut self,
        id: impl Into<PrimitiveId>,
        label: impl Into<String>,
        weight: f64,
    ) -> bool {
        let id = id.into();
        let label = label.into();
        if !weight.is_finite() {
            self.record_issue(GraphIssue::Format {
                line: None,
                reason: format!("invalid weight {weight} for node {id}, label {label:?}"),
            });
            return false;
        }
        if self.implicit_nodes.remove(&id) {
            self.nodes.insert(id.clone(), LabelMap::new());
        }
        if self.insert_node_label(id.clone(), label.clone(), weight).is_some() {
            self.record_issue(GraphIssue::Format {
                line: None,
                reason: format!("repeated label {label:?} for node {id}"),
            });
        }
        true
    }

    /// Add (or replace) an edge label. Self-pairs are rejected.
    ///
    /// Endpoints without a node entry are added as anonymous primitives
    /// labeled [`DEFAULT_NO_RELATION_LABEL`] and reported.
    pub fn add_edge_label(
        &mut self,
        from: impl Into<PrimitiveId>,
        to: impl Into<PrimitiveId>,
        label: impl Into<String>,
        weight: f64,
    ) -> bool {
        self.add_edge_entry(from, to, label, weight, DEFAULT_NO_RELATION_LABEL)
    }

    fn add_edge_entry(
        &mut self,
        from: impl Into<PrimitiveId>,
        to: impl Into<PrimitiveId>,
        label: impl Into<String>,
        weight: f64,
        no_label: &str,
    ) -> bool {
        let label = label.into();
        let key = match EdgeKey::new(from, to) {
            Ok(key) => key,
            Err(issue) => {
                self.record_issue(issue);
                return false;
            }
        };
        if !weight.is_finite() {
            self.record_issue(GraphIssue::Format {
                line: None,
                reason: format!("invalid weight {weight} for edge {key}, label {label:?}"),
            });
            return false;
        }
        self.add_anonymous(&[&key.from, &key.to], no_label);
        if self.insert_edge_label(key.clone(), label.clone(), weight).is_some() {
            self.record_issue(GraphIssue::Format {
                line: None,
                reason: format!("repeated label {label:?} for edge {key}"),
            });
        }
        true
    }

    pub(crate) fn insert_node_label(
        &mut self,
        id: PrimitiveId,
        label: String,
        weight: f64,
    ) -> Option<f64> {
        self.nodes.entry(id).or_default().insert(label, weight)
    }

    pub(crate) fn insert_edge_label(
        &mut self,
        key: EdgeKey,
        label: String,
        weight: f64,
    ) -> Option<f64> {
        self.edges.entry(key).or_default().insert(label, weight)
    }

    /// Add primitives referenced by edges but never labeled.
    pub(crate) fn fill_implicit_primitives(&mut self, no_label: &str) {
        let referenced: Vec<PrimitiveId> = self
            .edges
            .keys()
            .flat_map(|key| [key.from.clone(), key.to.clone()])
            .collect();
        let ids: Vec<&PrimitiveId> = referenced.iter().collect();
        self.add_anonymous(&ids, no_label);
    }

    /// Give every unknown id a `{no_label: 1.0}` node, reporting them once.
    fn add_anonymous(&mut self, ids: &[&PrimitiveId], no_label: &str) {
        let anonymous: BTreeSet<PrimitiveId> = ids
            .iter()
            .filter(|id| !self.nodes.contains_key(**id))
            .map(|id| (*id).clone())
            .collect();
        if anonymous.is_empty() {
            return;
        }

        for id in &anonymous {
            self.nodes.insert(id.clone(), LabelMap::single(no_label, 1.0));
        }
        self.implicit_nodes.extend(anonymous.iter().cloned());
        let ids: Vec<&str> = anonymous.iter().map(|id| id.as_str()).collect();
        self.record_issue(GraphIssue::structural(format!(
            "anonymous labels created for primitives [{}]",
            ids.join(", ")
        )));
    }

    /// Label every unlisted ordered pair with `{no_relation: 1.0}`.
    pub fn label_missing_edges(&mut self, no_relation: &str) {
        let ids: Vec<PrimitiveId> = self.nodes.keys().cloned().collect();
        for from in &ids {
            for to in &ids {
                if from == to {
                    continue;
                }
                let key = EdgeKey {
                    from: from.clone(),
                    to: to.clone(),
                };
                self.edges
                    .entry(key)
                    .or_insert_with(|| LabelMap::single(no_relation, 1.0));
            }
        }
    }

    /// Move edges labeled exactly `{no_relation}` into the hidden side channel.
    pub fn hide_unlabeled_edges(&mut self, no_relation: &str) {
        let hidden: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, labels)| labels.is_only(no_relation))
            .map(|(key, _)| key.clone())
            .collect();
        for key in hidden {
            if let Some(labels) = self.edges.remove(&key) {
                self.hidden_edges.insert(key, labels);
            }
        }
    }

    /// Move every hidden edge back into the edge map, unchanged.
    pub fn restore_unlabeled_edges(&mut self) {
        let hidden = std::mem::take(&mut self.hidden_edges);
        self.edges.extend(hidden);
    }

    /// Remove every ABSENT primitive and edge and clear the absent sets.
    pub fn remove_absent(&mut self) {
        for key in std::mem::take(&mut self.absent_edges) {
            self.edges.remove(&key);
        }
        for id in std::mem::take(&mut self.absent_nodes) {
            self.nodes.remove(&id);
        }
    }

    /// Copy of this graph with ABSENT content removed.
    pub fn without_absent(&self) -> Self {
        let mut copy = self.clone();
        copy.remove_absent();
        copy
    }

    /// Keep only the maximum-weight label(s) of every node and edge.
    pub fn select_max_labels(&mut self) {
        for labels in self.nodes.values_mut().chain(self.edges.values_mut()) {
            labels.retain_max();
        }
    }

    /// Replace every value `v` by `1 - v`.
    ///
    /// Values outside [0, 1] are left unchanged and reported.
    pub fn invert_values(&mut self) {
        let mut violations = Vec::new();

        for (id, labels) in self.nodes.iter_mut() {
            invert_map(labels, &mut violations, || format!("node {id}"));
        }
        for (key, labels) in self.edges.iter_mut() {
            invert_map(labels, &mut violations, || format!("edge {key}"));
        }

        for issue in violations {
            self.record_issue(issue);
        }
    }

    fn label_count(map: &BTreeMap<impl Ord, LabelMap>) -> usize {
        map.values().map(LabelMap::len).sum()
    }
}

fn invert_map(
    labels: &mut LabelMap,
    violations: &mut Vec<GraphIssue>,
    target: impl Fn() -> String,
) {
    for (label, value) in labels.iter_mut() {
        let current = *value;
        if (0.0..=1.0).contains(&current) {
            *value = 1.0 - current;
        } else {
            violations.push(GraphIssue::InvariantViolation {
                target: target(),
                label: label.clone(),
                value: current,
            });
        }
    }
}

impl fmt::Display for LabelGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nodes: {} (labels: {})   Edges: {} (labels: {})   Error: {}",
            self.nodes.len(),
            Self::label_count(&self.nodes),
            self.edges.len(),
            Self::label_count(&self.edges),
            self.error
        )
    }
}

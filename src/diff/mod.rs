//! Structural diff between an output graph and a reference graph.
//!
//! ## Passes
//!
//! 1. Node diff: label sets per primitive (weights ignored)
//! 2. Edge diff, two-sided: pairs listed in only one graph, unless that
//!    side is exactly `{no_relation}`; the missing side reads `{no_relation}`
//! 3. Edge diff, one-sided: pairs listed in both with different label sets
//! 4. Segment diff (see [`segments`])
//!
//! Detection is two-sided but normalization is not: the reference supplies
//! `n_nodes`, counted before ABSENT placeholders are added.
//!
//! A single-primitive output compared with ABSENT placeholders on either
//! side is total error: `d_l` and `d_s` are forced to 1.

pub mod metrics;
pub mod segments;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::canonical::canonical_hash_hex;
use crate::LABELGRAPH_KERNEL_SCHEMA_VERSION;
use crate::policy::LabelConventions;
use crate::reconcile::Reconciler;
use crate::segment::SegmentResolver;
use crate::types::{EdgeKey, LabelGraph, LabelMap, LabelSet, PrimitiveId, SegmentId, SegmentPair};

pub use metrics::Metrics;
pub use segments::SegmentConflict;

use metrics::Counts;
use segments::diff_segments;

/// A primitive whose label sets differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConflict {
    /// The primitive.
    pub primitive: PrimitiveId,
    /// Labels in the output.
    pub output: LabelSet,
    /// Labels in the reference.
    pub reference: LabelSet,
}

/// An ordered primitive pair whose label sets differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConflict {
    /// The pair.
    pub edge: EdgeKey,
    /// Labels in the output (`{no_relation}` when unlisted).
    pub output: LabelSet,
    /// Labels in the reference (`{no_relation}` when unlisted).
    pub reference: LabelSet,
}

/// Diff and metrics of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Schema version of this record.
    pub schema_version: String,
    /// Scalar metrics.
    pub metrics: Metrics,
    /// Node label disagreements, in primitive order.
    pub node_conflicts: Vec<NodeConflict>,
    /// Edge label disagreements, two-sided pass first.
    pub edge_conflicts: Vec<EdgeConflict>,
    /// Segmentation disagreements by primitive.
    pub segment_conflicts: BTreeMap<PrimitiveId, SegmentConflict>,
    /// Output segments matching the reference exactly.
    pub correct_segments: Vec<(SegmentId, BTreeSet<PrimitiveId>)>,
    /// Output segment edges with disagreeing primitive pairs.
    pub segment_relation_conflicts: Vec<SegmentPair>,
}

impl Comparison {
    /// xxh64 hex fingerprint of the canonical JSON encoding.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Whether nothing disagrees.
    pub fn is_clean(&self) -> bool {
        self.metrics.is_clean()
            && self.node_conflicts.is_empty()
            && self.edge_conflicts.is_empty()
            && self.segment_conflicts.is_empty()
            && self.segment_relation_conflicts.is_empty()
    }
}

/// Compares label graphs.
///
/// # Example
///
/// ```
/// use labelgraph_kernel::{DiffEngine, LabelGraph};
///
/// let output = LabelGraph::parse_lg("N,1,x\n");
/// let reference = LabelGraph::parse_lg("N,1,y\n");
/// let result = DiffEngine::new().compare(output, reference);
/// assert_eq!(result.metrics.d_c, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    conventions: LabelConventions,
    resolver: SegmentResolver,
    reconciler: Reconciler,
}

impl DiffEngine {
    /// Create an engine with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self {
            resolver: SegmentResolver::with_conventions(conventions.clone()),
            reconciler: Reconciler::with_conventions(conventions.clone()),
            conventions,
        }
    }

    /// Get the conventions.
    pub fn conventions(&self) -> &LabelConventions {
        &self.conventions
    }

    /// Reconcile and compare two graphs.
    pub fn compare(&self, output: LabelGraph, reference: LabelGraph) -> Comparison {
        let (output, reference) = self.reconciler.reconcile(output, reference);
        self.compare_reconciled(&output, &reference)
    }

    /// Compare two graphs that have already been reconciled.
    ///
    /// Primitives only the reference knows are not examined; reconcile
    /// first (or use [`compare`](Self::compare)) to have them counted.
    pub fn compare_reconciled(&self, output: &LabelGraph, reference: &LabelGraph) -> Comparison {
        let no_relation = self.conventions.no_relation_label.as_str();
        let unlisted: LabelSet = LabelSet::from([no_relation.to_string()]);

        let base_reference = reference.without_absent();
        let n_nodes = base_reference.primitive_count();
        let n_seg_rel_edges = self.resolver.resolve(&base_reference).edges.len();

        let node_conflicts: Vec<NodeConflict> = output
            .nodes()
            .iter()
            .filter_map(|(id, labels)| match reference.node_labels(id.as_str()) {
                Some(other) if other.same_labels(labels) => None,
                other => Some(NodeConflict {
                    primitive: id.clone(),
                    output: labels.labels(),
                    reference: other.map(LabelMap::labels).unwrap_or_default(),
                }),
            })
            .collect();

        let mut edge_conflicts = Vec::new();
        for (key, labels) in output.edges() {
            if !reference.edges().contains_key(key) && !labels.is_only(no_relation) {
                edge_conflicts.push(EdgeConflict {
                    edge: key.clone(),
                    output: labels.labels(),
                    reference: unlisted.clone(),
                });
            }
        }
        for (key, labels) in reference.edges() {
            if !output.edges().contains_key(key) && !labels.is_only(no_relation) {
                edge_conflicts.push(EdgeConflict {
                    edge: key.clone(),
                    output: unlisted.clone(),
                    reference: labels.labels(),
                });
            }
        }
        for (key, labels) in output.edges() {
            if let Some(other) = reference.edge_labels(key) {
                if !labels.same_labels(other) {
                    edge_conflicts.push(EdgeConflict {
                        edge: key.clone(),
                        output: labels.labels(),
                        reference: other.labels(),
                    });
                }
            }
        }

        let segments = diff_segments(
            output,
            &self.resolver.resolve(output),
            reference,
            &self.resolver.resolve(reference),
            no_relation,
        );

        let mut nodes_in_error: BTreeSet<&PrimitiveId> =
            node_conflicts.iter().map(|c| &c.primitive).collect();
        for conflict in &edge_conflicts {
            nodes_in_error.insert(&conflict.edge.from);
            nodes_in_error.insert(&conflict.edge.to);
        }

        let mismatched_pairs: BTreeSet<(PrimitiveId, PrimitiveId)> =
            edge_conflicts.iter().map(|c| c.edge.undirected()).collect();

        let mut seg_pairs: BTreeSet<(&PrimitiveId, &PrimitiveId)> = BTreeSet::new();
        for (id, conflict) in &segments.conflicts {
            for other in conflict.only_in_output.iter().chain(&conflict.only_in_reference) {
                seg_pairs.insert(if id <= other { (id, other) } else { (other, id) });
            }
        }

        let mut d_l = edge_conflicts.len();
        let mut d_s = segments.d_s;
        let degenerate = output.primitive_count() == 1
            && (!output.absent_nodes().is_empty() || !reference.absent_nodes().is_empty());
        if degenerate {
            d_l = 1;
            d_s = 1;
        }

        let metrics = Metrics::from_counts(Counts {
            d_c: node_conflicts.len(),
            d_l,
            d_s,
            n_nodes,
            n_seg_rel_edges,
            mismatched_pairs: mismatched_pairs.len(),
            seg_pair_errors: seg_pairs.len(),
            nodes_in_error: nodes_in_error.len(),
            seg_error: segments.seg_error,
            class_error: segments.class_error,
            n_seg: segments.n_seg,
            detected_seg: segments.detected_seg,
            detected_seg_rel_edges: segments.detected_seg_rel_edges,
            seg_rel_error: segments.seg_rel_error,
        });

        tracing::debug!(
            output = output.name(),
            reference = reference.name(),
            d_c = metrics.d_c,
            d_l = metrics.d_l,
            d_s = metrics.d_s,
            d_e = metrics.d_e,
            degenerate,
            "compared label graphs"
        );

        Comparison {
            schema_version: LABELGRAPH_KERNEL_SCHEMA_VERSION.to_string(),
            metrics,
            node_conflicts,
            edge_conflicts,
            segment_conflicts: segments.conflicts,
            correct_segments: segments.correct,
            segment_relation_conflicts: segments.relation_conflicts,
        }
    }
}

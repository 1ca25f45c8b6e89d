//! Scalar accuracy metrics of a comparison.
//!
//! ## Normalization
//!
//! Counts are normalized by the reference size: `n_nodes` primitives and
//! `n_edges = n_nodes * (n_nodes - 1)` ordered pairs. Every ratio is 0.0
//! when its denominator is 0.
//!
//! ```text
//! d_e = ( sqrt(d_s / n_edges) + sqrt(d_l / n_edges) + d_c / n_nodes ) / 3
//! ```

use serde::{Deserialize, Serialize};

/// Raw mismatch counts gathered by the diff passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counts {
    pub d_c: usize,
    pub d_l: usize,
    pub d_s: usize,
    pub n_nodes: usize,
    pub n_seg_rel_edges: usize,
    pub mismatched_pairs: usize,
    pub seg_pair_errors: usize,
    pub nodes_in_error: usize,
    pub seg_error: i64,
    pub class_error: i64,
    pub n_seg: i64,
    pub detected_seg: usize,
    pub detected_seg_rel_edges: usize,
    pub seg_rel_error: usize,
}

/// Metrics of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Primitives whose label sets differ.
    pub d_c: usize,
    /// Ordered primitive pairs whose label sets differ.
    pub d_l: usize,
    /// Segmentation disagreements, counted per primitive pair.
    pub d_s: usize,
    /// `d_c + d_l`.
    pub d_b: usize,
    /// `d_c / n_nodes`.
    pub d_c_pct: f64,
    /// `d_l / n_edges`.
    pub d_l_pct: f64,
    /// `d_s / n_edges`.
    pub d_s_pct: f64,
    /// `d_b / (n_nodes + n_edges)`.
    pub d_b_pct: f64,
    /// Composite error.
    pub d_e: f64,
    /// Reference primitive count.
    pub n_nodes: usize,
    /// Ordered pairs over the reference primitives.
    pub n_edges: usize,
    /// Aggregated segment edges in the reference.
    pub n_seg_rel_edges: usize,
    /// Undirected primitive pairs with an edge conflict.
    pub mismatched_pairs: usize,
    /// Undirected primitive pairs with a segmentation conflict.
    pub seg_pair_errors: usize,
    /// Reference primitives with no node or edge conflict. May go negative
    /// when the output has more primitives in error than the reference has.
    pub node_correct: i64,
    /// Reference segments not matched exactly.
    pub seg_error: i64,
    /// Reference segments not matched exactly with identical labels.
    pub class_error: i64,
    /// Reference segments, ABSENT placeholders excluded.
    pub n_seg: i64,
    /// Output segments.
    pub detected_seg: usize,
    /// Aggregated segment edges in the output.
    pub detected_seg_rel_edges: usize,
    /// Primitive pairs under output segment edges whose labels disagree.
    pub seg_rel_error: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Metrics {
    pub(crate) fn from_counts(counts: Counts) -> Self {
        let n_nodes = counts.n_nodes;
        let n_edges = n_nodes * n_nodes.saturating_sub(1);
        let d_b = counts.d_c + counts.d_l;

        let d_e = (ratio(counts.d_s, n_edges).sqrt()
            + ratio(counts.d_l, n_edges).sqrt()
            + ratio(counts.d_c, n_nodes))
            / 3.0;

        Self {
            d_c: counts.d_c,
            d_l: counts.d_l,
            d_s: counts.d_s,
            d_b,
            d_c_pct: ratio(counts.d_c, n_nodes),
            d_l_pct: ratio(counts.d_l, n_edges),
            d_s_pct: ratio(counts.d_s, n_edges),
            d_b_pct: ratio(d_b, n_nodes + n_edges),
            d_e,
            n_nodes,
            n_edges,
            n_seg_rel_edges: counts.n_seg_rel_edges,
            mismatched_pairs: counts.mismatched_pairs,
            seg_pair_errors: counts.seg_pair_errors,
            node_correct: n_nodes as i64 - counts.nodes_in_error as i64,
            seg_error: counts.seg_error,
            class_error: counts.class_error,
            n_seg: counts.n_seg,
            detected_seg: counts.detected_seg,
            detected_seg_rel_edges: counts.detected_seg_rel_edges,
            seg_rel_error: counts.seg_rel_error,
        }
    }

    /// Whether every mismatch count is zero.
    pub fn is_clean(&self) -> bool {
        self.d_c == 0 && self.d_l == 0 && self.d_s == 0 && self.seg_rel_error == 0
    }

    /// Metrics as `(name, value)` pairs under their conventional names.
    pub fn as_pairs(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("D_C", self.d_c as f64),
            ("D_S", self.d_s as f64),
            ("D_L", self.d_l as f64),
            ("D_Bn(%)", self.d_b_pct),
            ("D_E(%)", self.d_e),
            ("D_C(%)", self.d_c_pct),
            ("D_S(%)", self.d_s_pct),
            ("D_L(%)", self.d_l_pct),
            ("D_B", self.d_b as f64),
            ("nNodes", self.n_nodes as f64),
            ("nEdges", self.n_edges as f64),
            ("nSegRelEdges", self.n_seg_rel_edges as f64),
            ("dPairs", self.mismatched_pairs as f64),
            ("segPairErrors", self.seg_pair_errors as f64),
            ("nodeCorrect", self.node_correct as f64),
            ("SegError", self.seg_error as f64),
            ("ClassError", self.class_error as f64),
            ("nSeg", self.n_seg as f64),
            ("detectedSeg", self.detected_seg as f64),
            ("dSegRelEdges", self.detected_seg_rel_edges as f64),
            ("SegRelError", self.seg_rel_error as f64),
        ]
    }
}

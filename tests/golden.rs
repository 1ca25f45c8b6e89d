//! Golden tests for the label graph kernel.
//!
//! These tests pin the comparison, reconciliation and merge results for
//! small hand-checked graphs.

use std::collections::BTreeMap;

use labelgraph_kernel::{
    DiffEngine, EdgeKey, IssueKind, LabelGraph, LabelMap, LabelSet, LgReader, Merger,
    PrimitiveId, Reconciler, TreeExtractor,
    merge_label_maps, weighted_sum,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn set(labels: &[&str]) -> LabelSet {
    labels.iter().map(|l| l.to_string()).collect()
}

/// Two-symbol expression: "x" made of strokes s1+s2, superscript "2" (s3).
const EXPRESSION: &str = "\
# x^2
N,s1,x
N,s2,x
N,s3,2
E,s1,s2,*
E,s2,s1,*
E,s1,s3,Sup
E,s2,s3,Sup
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("labelgraph_kernel=debug")
        .try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_node_label_disagreement() {
    let mut a = LabelGraph::new();
    a.add_node_label("1", "x", 1.0);
    let mut b = LabelGraph::new();
    b.add_node_label("1", "y", 1.0);

    let result = DiffEngine::new().compare(a, b);

    assert_eq!(result.metrics.d_c, 1);
    assert_eq!(result.metrics.d_l, 0);
    assert_eq!(result.node_conflicts.len(), 1);
    let conflict = &result.node_conflicts[0];
    assert_eq!(conflict.primitive, PrimitiveId::from("1"));
    assert_eq!(conflict.output, set(&["x"]));
    assert_eq!(conflict.reference, set(&["y"]));
}

#[test]
fn test_edge_missing_from_reference() {
    let mut a = LabelGraph::new();
    a.add_node_label("n1", "x", 1.0);
    a.add_node_label("n2", "y", 1.0);
    a.add_edge_label("n1", "n2", "R", 1.0);
    let mut b = LabelGraph::new();
    b.add_node_label("n1", "x", 1.0);
    b.add_node_label("n2", "y", 1.0);

    let result = DiffEngine::new().compare(a, b);

    assert_eq!(result.metrics.d_l, 1);
    let conflict = &result.edge_conflicts[0];
    assert_eq!(conflict.edge, EdgeKey::new("n1", "n2").unwrap());
    assert_eq!(conflict.output, set(&["R"]));
    assert_eq!(conflict.reference, set(&["_"]));
}

#[test]
fn test_single_primitive_against_empty_reference() {
    init_tracing();
    let mut a = LabelGraph::named("output");
    a.add_node_label("p", "x", 1.0);
    let b = LabelGraph::named("reference");

    let result = DiffEngine::new().compare(a, b);

    assert_eq!(result.metrics.d_l, 1);
    assert_eq!(result.metrics.d_s, 1);
    assert_eq!(result.metrics.n_nodes, 0);
}

#[test]
fn test_merge_object_absent_from_other_graph() {
    let a = BTreeMap::from([(PrimitiveId::from("o"), LabelMap::single("a", 0.8))]);
    let b: BTreeMap<PrimitiveId, LabelMap> = BTreeMap::new();

    let merged = merge_label_maps(&a, 1.0, &b, 1.0, &weighted_sum, "_");

    let o = &merged[&PrimitiveId::from("o")];
    assert_eq!(o.get("a"), Some(0.8));
    assert_eq!(o.get("_"), Some(1.0));
}

#[test]
fn test_built_graph_matches_parsed_graph() {
    let mut built = LabelGraph::new();
    built.add_node_label("a", "x", 1.0);
    built.add_edge_label("a", "b", "R", 1.0);
    let parsed = LabelGraph::parse_lg("N,a,x\nE,a,b,R\n");
    let reference = LabelGraph::parse_lg("N,a,x\n");

    assert_eq!(built.primitive_count(), parsed.primitive_count());
    assert!(built.contains_primitive("b"));
    assert_eq!(built.has_error(), parsed.has_error());

    let engine = DiffEngine::new();
    let from_built = engine.compare(built.clone(), reference.clone());
    let from_parsed = engine.compare(parsed.clone(), reference.clone());
    assert_eq!(from_built, from_parsed);
    assert!(from_built.metrics.d_l > 0);
    assert!(from_built.metrics.d_e > 0.0);

    // Same graphs in the reference role.
    let against_built = engine.compare(reference.clone(), built);
    let against_parsed = engine.compare(reference, parsed);
    assert_eq!(against_built, against_parsed);
    assert_eq!(against_built.metrics.n_nodes, 2);
    assert_eq!(against_built.metrics.n_edges, 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Golden Comparisons
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_identical_graphs_are_clean() {
    let g = LabelGraph::parse_lg(EXPRESSION);
    let result = DiffEngine::new().compare(g.clone(), g);

    assert!(result.is_clean());
    assert_eq!(result.metrics.d_e, 0.0);
    assert_eq!(result.metrics.n_nodes, 3);
    assert_eq!(result.metrics.n_edges, 6);
    assert_eq!(result.metrics.n_seg, 2);
    assert_eq!(result.metrics.seg_error, 0);
    assert_eq!(result.metrics.class_error, 0);
    assert_eq!(result.metrics.node_correct, 3);
}

#[test]
fn test_missed_merge() {
    // Output reads the two strokes of "x" as separate symbols.
    let output = LabelGraph::parse_lg(
        "N,s1,x\nN,s2,x\nN,s3,2\nE,s1,s3,Sup\nE,s2,s3,Sup\n",
    );
    let reference = LabelGraph::parse_lg(EXPRESSION);

    let result = DiffEngine::new().compare(output, reference);
    let m = &result.metrics;

    assert_eq!(m.d_c, 0);
    // (s1,s2) and (s2,s1) unlisted in the output.
    assert_eq!(m.d_l, 2);
    assert_eq!(m.mismatched_pairs, 1);
    // s1 and s2 each miss one partner.
    assert_eq!(m.d_s, 2);
    assert_eq!(m.seg_pair_errors, 1);
    assert_eq!(m.seg_error, 1);
    assert_eq!(m.detected_seg, 3);
    assert_eq!(m.node_correct, 1);

    let expected = ((2.0f64 / 6.0).sqrt() * 2.0) / 3.0;
    assert!((m.d_e - expected).abs() < 1e-12);
}

#[test]
fn test_metric_pairs_follow_struct() {
    let output = LabelGraph::parse_lg("N,a,x\nN,b,y\n");
    let reference = LabelGraph::parse_lg("N,a,x\nN,b,z\n");
    let result = DiffEngine::new().compare(output, reference);

    let pairs: BTreeMap<&str, f64> = result.metrics.as_pairs().into_iter().collect();
    assert_eq!(pairs["D_C"], 1.0);
    assert_eq!(pairs["D_C(%)"], 0.5);
    assert_eq!(pairs["nNodes"], 2.0);
    assert_eq!(pairs["nodeCorrect"], 1.0);
}

#[test]
fn test_fingerprint_determinism() {
    let run = || {
        DiffEngine::new().compare(
            LabelGraph::parse_lg("N,s1,x\nN,s2,y\nN,s3,2\nE,s1,s3,Sup\n"),
            LabelGraph::parse_lg(EXPRESSION),
        )
    };
    let first = run();
    for _ in 0..5 {
        assert_eq!(run().fingerprint(), first.fingerprint());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reconcile_twice_is_stable() {
    let a = LabelGraph::parse_lg("N,1,x\nN,2,y\n");
    let b = LabelGraph::parse_lg("N,2,y\nN,3,z\nN,4,w\n");
    let reconciler = Reconciler::new();

    let (a1, b1) = reconciler.reconcile(a, b);
    let (a2, b2) = reconciler.reconcile(a1.clone(), b1.clone());

    assert_eq!(a1.absent_nodes(), a2.absent_nodes());
    assert_eq!(b1.absent_nodes(), b2.absent_nodes());
    assert_eq!(a2.to_lg_string(), a1.to_lg_string());
    assert_eq!(b2.to_lg_string(), b1.to_lg_string());
    assert!(a2.issues().iter().any(|i| i.kind() == IssueKind::Structural));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Extraction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_expression_forest() {
    let g = LabelGraph::parse_lg(EXPRESSION);
    let forest = TreeExtractor::new().separate_tree_edges(&g);

    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.tree_edges.len(), 1);
    assert!(forest.non_tree_edges.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Merging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_weighted_vote_then_max() {
    let a = LabelGraph::parse_lg("N,1,x,0.75\nN,1,y,0.25\n");
    let b = LabelGraph::parse_lg("N,1,y,0.5\nN,1,x,0.25\n").with_weight(2.0);

    let mut merged = Merger::new().weighted_sum(a, b);
    merged.select_max_labels();

    // x: 0.75 + 0.5 = 1.25, y: 0.25 + 1.0 = 1.25 (tie kept)
    let labels = merged.node_labels("1").unwrap();
    assert_eq!(labels.len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("labelgraph-golden-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("expression.lg");

    let g = LabelGraph::parse_lg(EXPRESSION);
    std::fs::write(&path, g.to_lg_string()).unwrap();

    let read = LgReader::new().read_path(&path);
    assert_eq!(read.name(), path.display().to_string());
    assert!(!read.has_error());
    assert_eq!(read.to_lg_string(), g.to_lg_string());
    assert_eq!(read.fingerprint(), g.fingerprint());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_unreadable_file_compares_as_empty() {
    let missing = LgReader::new().read_path("/nonexistent/labelgraph/missing.lg");
    assert!(missing.has_error());

    let result = DiffEngine::new().compare(missing, LabelGraph::parse_lg("N,a,x\nN,b,y\n"));
    assert_eq!(result.metrics.n_nodes, 2);
    assert_eq!(result.metrics.d_c, 2);
}

//! Reconciliation of primitive universes between two graphs.
//!
//! Each graph receives an ABSENT placeholder for every primitive only the
//! other graph has, plus an ABSENT edge from each placeholder to every other
//! primitive. Afterwards both graphs have identical primitive sets, so no
//! comparison can reference an undefined primitive.
//!
//! Reconciliation first removes placeholders left by earlier calls, so
//! running it twice is the same as running it once. A structural issue is
//! recorded only when a graph's placeholder set changes.

use std::collections::BTreeSet;

use crate::policy::LabelConventions;
use crate::types::{EdgeKey, GraphIssue, LabelGraph, LabelMap, PrimitiveId};

/// Aligns the primitive sets of two graphs.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    conventions: LabelConventions,
}

impl Reconciler {
    /// Create a reconciler with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self { conventions }
    }

    /// Reconcile two graphs, returning them with identical primitive sets.
    pub fn reconcile(&self, mut a: LabelGraph, mut b: LabelGraph) -> (LabelGraph, LabelGraph) {
        self.reconcile_in_place(&mut a, &mut b);
        (a, b)
    }

    pub(crate) fn reconcile_in_place(&self, a: &mut LabelGraph, b: &mut LabelGraph) {
        let previous_a = a.absent_nodes.clone();
        let previous_b = b.absent_nodes.clone();
        a.remove_absent();
        b.remove_absent();
        self.add_absent(a, b, &previous_a);
        self.add_absent(b, a, &previous_b);
    }

    /// Add placeholders to `target` for primitives only `other` has.
    fn add_absent(
        &self,
        target: &mut LabelGraph,
        other: &LabelGraph,
        previous: &BTreeSet<PrimitiveId>,
    ) {
        let missing: BTreeSet<PrimitiveId> = other
            .primitives()
            .filter(|id| !target.contains_primitive(id.as_str()))
            .cloned()
            .collect();
        if missing.is_empty() {
            return;
        }

        let absent = self.conventions.absent_label.as_str();
        for id in &missing {
            target.nodes.insert(id.clone(), LabelMap::single(absent, 1.0));
        }

        let all: Vec<PrimitiveId> = target.nodes.keys().cloned().collect();
        for id in &missing {
            for node in &all {
                if node == id {
                    continue;
                }
                let key = EdgeKey {
                    from: id.clone(),
                    to: node.clone(),
                };
                if !target.edges.contains_key(&key) {
                    target.edges.insert(key.clone(), LabelMap::single(absent, 1.0));
                    target.absent_edges.insert(key);
                }
            }
        }

        let ids: Vec<&str> = missing.iter().map(|id| id.as_str()).collect();
        let message = format!(
            "inserted {} ABSENT primitives relative to {}: [{}]",
            missing.len(),
            other.name(),
            ids.join(", ")
        );
        let changed = &missing != previous;
        target.absent_nodes.extend(missing);
        if changed {
            target.record_issue(GraphIssue::structural(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universes_match_after_reconcile() {
        let a = LabelGraph::parse_lg("N,1,x\nN,2,y\n");
        let b = LabelGraph::parse_lg("N,2,y\nN,3,z\n");
        let (a, b) = Reconciler::new().reconcile(a, b);

        let ua: Vec<_> = a.primitives().collect();
        let ub: Vec<_> = b.primitives().collect();
        assert_eq!(ua, ub);
        assert_eq!(a.absent_nodes(), &BTreeSet::from([PrimitiveId::from("3")]));
        assert_eq!(b.absent_nodes(), &BTreeSet::from([PrimitiveId::from("1")]));
        assert!(a.node_labels("3").unwrap().is_only("ABSENT"));
        assert!(a.has_error() && b.has_error());
    }

    #[test]
    fn test_absent_edges_from_placeholder_to_all_others() {
        let a = LabelGraph::parse_lg("N,1,x\nN,2,y\n");
        let b = LabelGraph::parse_lg("N,1,x\nN,2,y\nN,3,z\n");
        let (a, b) = Reconciler::new().reconcile(a, b);

        assert_eq!(a.absent_edges().len(), 2);
        for key in a.absent_edges() {
            assert_eq!(key.from.as_str(), "3");
            assert!(a.edge_labels(key).unwrap().is_only("ABSENT"));
        }
        assert!(b.absent_nodes().is_empty());
        assert!(!b.has_error());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let a = LabelGraph::parse_lg("N,1,x\nE,1,2,R\n");
        let b = LabelGraph::parse_lg("N,3,z\n");
        let reconciler = Reconciler::new();

        let (a1, b1) = reconciler.reconcile(a, b);
        let (a2, b2) = reconciler.reconcile(a1.clone(), b1.clone());

        assert_eq!(a1.nodes(), a2.nodes());
        assert_eq!(a1.edges(), a2.edges());
        assert_eq!(a1.absent_nodes(), a2.absent_nodes());
        assert_eq!(b1.absent_edges(), b2.absent_edges());
        assert_eq!(b1.nodes(), b2.nodes());
    }

    #[test]
    fn test_repeated_reconcile_records_no_new_issue() {
        let a = LabelGraph::parse_lg("N,1,x\n");
        let b = LabelGraph::parse_lg("N,2,y\n");
        let reconciler = Reconciler::new();

        let (a1, b1) = reconciler.reconcile(a, b);
        let (a2, b2) = reconciler.reconcile(a1.clone(), b1.clone());

        assert_eq!(a1.issues().len(), 1);
        assert_eq!(a2, a1);
        assert_eq!(b2, b1);
    }

    #[test]
    fn test_changed_placeholders_are_reported() {
        let reconciler = Reconciler::new();
        let (a1, _) = reconciler.reconcile(
            LabelGraph::parse_lg("N,1,x\n"),
            LabelGraph::parse_lg("N,2,y\n"),
        );
        let (a2, _) = reconciler.reconcile(a1, LabelGraph::parse_lg("N,3,z\n"));

        assert_eq!(a2.absent_nodes(), &BTreeSet::from([PrimitiveId::from("3")]));
        assert_eq!(a2.issues().len(), 2);
    }

    #[test]
    fn test_remove_absent_restores_original() {
        let a = LabelGraph::parse_lg("N,1,x\n");
        let b = LabelGraph::parse_lg("N,1,x\nN,2,y\n");
        let original = a.to_lg_string();
        let (a, _) = Reconciler::new().reconcile(a, b);

        assert_ne!(a.to_lg_string(), original);
        assert_eq!(a.without_absent().to_lg_string(), original);
    }
}

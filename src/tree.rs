//! Spanning forest over a segment graph.
//!
//! ## Algorithm
//!
//! Breadth-first from the root segments (FIFO, roots in id order):
//!
//! 1. Pop a segment; visit its remaining children in id order
//! 2. A child whose remaining-parent count is exactly 1 gets a tree edge
//!    and is queued
//! 3. Otherwise the link is dropped as a non-tree edge and the child's
//!    remaining-parent count decreases, so the last parent to reach a
//!    shared child keeps the tree edge
//!
//! Edges the traversal never examines (unreachable from a root, or locked
//! in a cycle) are non-tree edges. Every segment therefore has at most one
//! tree parent and the tree edges never form a cycle.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::policy::LabelConventions;
use crate::segment::SegmentResolver;
use crate::types::{LabelGraph, SegmentGraph, SegmentId, SegmentPair};

/// Partition of segment edges into a forest and the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestSplit {
    /// Segments without incoming edges.
    pub roots: BTreeSet<SegmentId>,
    /// Forest edges (parent, child).
    pub tree_edges: BTreeSet<SegmentPair>,
    /// Every other segment edge.
    pub non_tree_edges: BTreeSet<SegmentPair>,
}

impl ForestSplit {
    /// Tree parent of a segment.
    pub fn parent_of(&self, child: SegmentId) -> Option<SegmentId> {
        self.tree_edges
            .iter()
            .find(|(_, c)| *c == child)
            .map(|(parent, _)| *parent)
    }
}

/// Extracts a spanning forest from segment graphs.
#[derive(Debug, Clone, Default)]
pub struct TreeExtractor {
    resolver: SegmentResolver,
}

impl TreeExtractor {
    /// Create an extractor with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self {
            resolver: SegmentResolver::with_conventions(conventions),
        }
    }

    /// Resolve a label graph's segments and split their edges.
    pub fn separate_tree_edges(&self, graph: &LabelGraph) -> ForestSplit {
        self.extract(&self.resolver.resolve(graph))
    }

    /// Split the edges of a segment graph into tree and non-tree edges.
    pub fn extract(&self, segments: &SegmentGraph) -> ForestSplit {
        let mut children: BTreeMap<SegmentId, BTreeSet<SegmentId>> = BTreeMap::new();
        let mut parent_count: BTreeMap<SegmentId, usize> = BTreeMap::new();
        for (parent, child) in segments.edges.keys() {
            children.entry(*parent).or_default().insert(*child);
            *parent_count.entry(*child).or_default() += 1;
        }

        let mut split = ForestSplit {
            roots: segments.roots.clone(),
            ..ForestSplit::default()
        };
        let mut queue: VecDeque<SegmentId> = segments.roots.iter().copied().collect();

        while let Some(parent) = queue.pop_front() {
            let Some(current) = children.get(&parent).cloned() else {
                continue;
            };
            for child in current {
                let count = parent_count.entry(child).or_default();
                if *count == 1 {
                    split.tree_edges.insert((parent, child));
                    queue.push_back(child);
                } else {
                    *count -= 1;
                    split.non_tree_edges.insert((parent, child));
                    if let Some(list) = children.get_mut(&parent) {
                        list.remove(&child);
                    }
                }
            }
        }

        for pair in segments.edges.keys() {
            if !split.tree_edges.contains(pair) {
                split.non_tree_edges.insert(*pair);
            }
        }

        tracing::trace!(
            roots = split.roots.len(),
            tree_edges = split.tree_edges.len(),
            non_tree_edges = split.non_tree_edges.len(),
            "separated tree edges"
        );
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> (SegmentGraph, ForestSplit) {
        let graph = LabelGraph::parse_lg(text);
        let segments = SegmentResolver::new().resolve(&graph);
        let split = TreeExtractor::new().extract(&segments);
        (segments, split)
    }

    fn seg(segments: &SegmentGraph, id: &str) -> SegmentId {
        segments.primitive_segments[id]
    }

    #[test]
    fn test_chain_is_all_tree() {
        let (s, f) = split("N,a,x\nN,b,y\nN,c,z\nE,a,b,R\nE,b,c,R\n");
        assert_eq!(f.roots, BTreeSet::from([seg(&s, "a")]));
        assert_eq!(f.tree_edges.len(), 2);
        assert!(f.non_tree_edges.is_empty());
        assert_eq!(f.parent_of(seg(&s, "c")), Some(seg(&s, "b")));
    }

    #[test]
    fn test_shared_child_gets_one_tree_parent() {
        // a -> b, a -> c, b -> c
        let (s, f) = split("N,a,x\nN,b,y\nN,c,z\nE,a,b,R\nE,a,c,R\nE,b,c,R\n");
        let (a, b, c) = (seg(&s, "a"), seg(&s, "b"), seg(&s, "c"));
        assert_eq!(f.tree_edges, BTreeSet::from([(a, b), (b, c)]));
        assert_eq!(f.non_tree_edges, BTreeSet::from([(a, c)]));
    }

    #[test]
    fn test_cycle_edges_are_non_tree() {
        // r -> a, a -> b, b -> a
        let (s, f) = split("N,r,x\nN,a,y\nN,b,z\nE,r,a,R\nE,a,b,R\nE,b,a,R\n");
        assert_eq!(f.roots, BTreeSet::from([seg(&s, "r")]));
        assert!(f.tree_edges.is_empty());
        assert_eq!(f.non_tree_edges.len(), 3);
    }

    #[test]
    fn test_every_edge_classified_once() {
        let (s, f) = split(
            "N,a,x\nN,b,y\nN,c,z\nN,d,w\n\
             E,a,b,R\nE,a,c,R\nE,b,d,R\nE,c,d,R\nE,d,c,R\n",
        );
        assert_eq!(f.tree_edges.len() + f.non_tree_edges.len(), s.edges.len());
        assert!(f.tree_edges.is_disjoint(&f.non_tree_edges));
    }

    #[test]
    fn test_segments_not_primitives() {
        let extractor = TreeExtractor::new();
        let graph = LabelGraph::parse_lg("N,a,x\nN,b,x\nN,c,y\nE,a,b,*\nE,a,c,R\nE,b,c,R\n");
        let f = extractor.separate_tree_edges(&graph);
        assert_eq!(f.roots.len(), 1);
        assert_eq!(f.tree_edges.len(), 1);
    }
}

//! Segment resolution: collapsing primitives into objects.
//!
//! Primitives joined (in either direction) by an edge carrying the
//! segmentation label are merged transitively into one segment. Every other
//! edge label is lifted onto the segment pair it spans, summing weights when
//! several primitive pairs carry the same label between the same segments.
//!
//! ## Algorithm
//!
//! 1. Skip edges labeled exactly `{no_relation}`; they neither merge
//!    primitives nor produce segment edges
//! 2. Union primitives over segmentation edges (disjoint sets)
//! 3. Walk primitives in the iteration order, opening a new segment the
//!    first time each set is seen; the opening primitive's labels become
//!    the segment's labels
//! 4. Aggregate remaining edge labels over segment pairs
//! 5. Roots are segments with no incoming aggregated edge

use std::collections::{BTreeMap, BTreeSet};

use crate::policy::LabelConventions;
use crate::types::{LabelGraph, LabelMap, PrimitiveId, Segment, SegmentGraph, SegmentId};

/// Disjoint sets over primitive indices.
struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Builds the segment graph of a label graph.
#[derive(Debug, Clone, Default)]
pub struct SegmentResolver {
    conventions: LabelConventions,
}

impl SegmentResolver {
    /// Create a resolver with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self { conventions }
    }

    /// Get the conventions.
    pub fn conventions(&self) -> &LabelConventions {
        &self.conventions
    }

    /// Resolve segments, numbering them in canonical primitive order.
    pub fn resolve(&self, graph: &LabelGraph) -> SegmentGraph {
        self.resolve_in_order(graph, std::iter::empty::<&PrimitiveId>())
    }

    /// Resolve segments, numbering them in the given primitive order.
    ///
    /// Primitives not listed (or unknown ids) follow in canonical order.
    pub fn resolve_in_order<'a, I>(&self, graph: &LabelGraph, order: I) -> SegmentGraph
    where
        I: IntoIterator<Item = &'a PrimitiveId>,
    {
        let no_relation = self.conventions.no_relation_label.as_str();
        let segmentation = self.conventions.segmentation_label.as_str();

        // Iteration order: caller's order first, then the rest.
        let mut seen: BTreeSet<&PrimitiveId> = BTreeSet::new();
        let mut primitives: Vec<&PrimitiveId> = Vec::with_capacity(graph.primitive_count());
        for id in order {
            if let Some((known, _)) = graph.nodes().get_key_value(id.as_str()) {
                if seen.insert(known) {
                    primitives.push(known);
                }
            }
        }
        for id in graph.primitives() {
            if seen.insert(id) {
                primitives.push(id);
            }
        }
        let index: BTreeMap<&PrimitiveId, usize> =
            primitives.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let relations: Vec<(usize, usize, &LabelMap)> = graph
            .edges()
            .iter()
            .filter(|(_, labels)| !labels.is_only(no_relation))
            .filter_map(|(key, labels)| {
                let from = index.get(&key.from)?;
                let to = index.get(&key.to)?;
                Some((*from, *to, labels))
            })
            .collect();

        let mut sets = DisjointSets::new(primitives.len());
        for (from, to, labels) in &relations {
            if labels.contains(segmentation) {
                sets.union(*from, *to);
            }
        }

        let mut result = SegmentGraph::default();
        let mut set_segments: BTreeMap<usize, SegmentId> = BTreeMap::new();
        let mut primitive_segment: Vec<SegmentId> = Vec::with_capacity(primitives.len());
        for (i, id) in primitives.iter().enumerate() {
            let set = sets.find(i);
            let next = SegmentId::new(set_segments.len());
            let segment_id = *set_segments.entry(set).or_insert(next);
            let segment = result.segments.entry(segment_id).or_insert_with(|| Segment {
                id: segment_id,
                primitives: BTreeSet::new(),
                labels: graph.nodes()[*id].clone(),
            });
            segment.primitives.insert((*id).clone());
            result.primitive_segments.insert((*id).clone(), segment_id);
            primitive_segment.push(segment_id);
        }

        for (from, to, labels) in &relations {
            let pair = (primitive_segment[*from], primitive_segment[*to]);
            if pair.0 == pair.1 {
                continue;
            }
            for (label, weight) in labels.iter() {
                if label == segmentation {
                    continue;
                }
                result.edges.entry(pair).or_default().accumulate(label, weight);
            }
        }

        let children: BTreeSet<SegmentId> = result.edges.keys().map(|(_, child)| *child).collect();
        result.roots = result
            .segments
            .keys()
            .filter(|id| !children.contains(id))
            .copied()
            .collect();

        tracing::trace!(
            graph = graph.name(),
            primitives = primitives.len(),
            segments = result.segments.len(),
            segment_edges = result.edges.len(),
            "resolved segments"
        );
        result
    }
}

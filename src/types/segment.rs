//! Segment (object-level) view of a label graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::label::LabelMap;
use super::primitive::PrimitiveId;

/// Identifier of a segment, assigned in discovery order.
///
/// Displays as `seg0`, `seg1`, ... but orders numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(usize);

impl SegmentId {
    /// Create a segment id from its index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Discovery index of the segment.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seg{}", self.0)
    }
}

/// Directed pair of segments keying an aggregated inter-segment edge.
pub type SegmentPair = (SegmentId, SegmentId);

/// A recognized object: primitives merged by segmentation edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Segment identifier.
    pub id: SegmentId,
    /// Member primitives.
    pub primitives: BTreeSet<PrimitiveId>,
    /// Labels inherited from the member that opened the segment.
    pub labels: LabelMap,
}

/// Derived object-level graph. Ephemeral; recomputed on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentGraph {
    /// Segments by id.
    pub segments: BTreeMap<SegmentId, Segment>,
    /// Segment of every primitive.
    pub primitive_segments: BTreeMap<PrimitiveId, SegmentId>,
    /// Segments without incoming inter-segment edges.
    pub roots: BTreeSet<SegmentId>,
    /// Aggregated inter-segment edges (weights summed per label).
    pub edges: BTreeMap<SegmentPair, LabelMap>,
}

impl SegmentGraph {
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment containing a primitive.
    pub fn segment_of(&self, id: &str) -> Option<&Segment> {
        self.primitive_segments
            .get(id)
            .and_then(|seg| self.segments.get(seg))
    }

    /// Member primitives of a segment.
    pub fn members(&self, id: SegmentId) -> Option<&BTreeSet<PrimitiveId>> {
        self.segments.get(&id).map(|s| &s.primitives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_display_and_order() {
        assert_eq!(SegmentId::new(3).to_string(), "seg3");
        // Numeric, unlike the text form.
        assert!(SegmentId::new(2) < SegmentId::new(10));
    }
}

//! Segment-level diff: segmentation, classification and segment relations.
//!
//! ## Algorithm
//!
//! For every primitive known to both graphs:
//!
//! 1. Neither side ABSENT: the symmetric difference of its two segments'
//!    member sets counts toward `d_s` and is recorded when non-empty
//! 2. ABSENT on one side (and the output has more than one primitive): the
//!    placeholder side is taken to disagree with the other side about every
//!    other primitive, so all `n - 1` pairs count
//!
//! Segment relations are checked per output segment edge by comparing the
//! label sets of every primitive pair spanning the two segments.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::types::{EdgeKey, LabelGraph, PrimitiveId, SegmentGraph, SegmentId, SegmentPair};

/// Primitives a segment has in one graph but not the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConflict {
    /// Segment partners found only in the output.
    pub only_in_output: BTreeSet<PrimitiveId>,
    /// Segment partners found only in the reference.
    pub only_in_reference: BTreeSet<PrimitiveId>,
}

impl SegmentConflict {
    /// Number of disagreeing primitive pairs.
    pub fn size(&self) -> usize {
        self.only_in_output.len() + self.only_in_reference.len()
    }
}

/// Result of the segment-level diff.
#[derive(Debug, Clone, Default)]
pub(crate) struct SegmentDiff {
    pub d_s: usize,
    pub conflicts: BTreeMap<PrimitiveId, SegmentConflict>,
    pub correct: Vec<(SegmentId, BTreeSet<PrimitiveId>)>,
    pub relation_conflicts: Vec<SegmentPair>,
    pub seg_error: i64,
    pub class_error: i64,
    pub n_seg: i64,
    pub detected_seg: usize,
    pub detected_seg_rel_edges: usize,
    pub seg_rel_error: usize,
}

/// Compare the segmentations of `output` and `reference`.
pub(crate) fn diff_segments(
    output: &LabelGraph,
    output_segments: &SegmentGraph,
    reference: &LabelGraph,
    reference_segments: &SegmentGraph,
    no_relation: &str,
) -> SegmentDiff {
    let mut diff = SegmentDiff::default();
    let all: BTreeSet<&PrimitiveId> = output.primitives().collect();
    let several = output.primitive_count() > 1;
    let mut correct_ids: BTreeSet<SegmentId> = BTreeSet::new();

    for id in output.primitives() {
        let (Some(seg_out), Some(seg_ref)) = (
            output_segments.segment_of(id.as_str()),
            reference_segments.segment_of(id.as_str()),
        ) else {
            continue;
        };
        let absent_out = output.absent_nodes().contains(id);
        let absent_ref = reference.absent_nodes().contains(id);

        let conflict = match (absent_out, absent_ref) {
            (false, false) => {
                let conflict = SegmentConflict {
                    only_in_output: seg_out.primitives.difference(&seg_ref.primitives).cloned().collect(),
                    only_in_reference: seg_ref.primitives.difference(&seg_out.primitives).cloned().collect(),
                };
                if conflict.size() == 0 {
                    if correct_ids.insert(seg_out.id) {
                        diff.correct.push((seg_out.id, seg_out.primitives.clone()));
                    }
                    continue;
                }
                conflict
            }
            (true, false) if several => {
                let partners = partners_of(&seg_ref.primitives, id);
                SegmentConflict {
                    only_in_output: complement(&all, id, &partners),
                    only_in_reference: partners,
                }
            }
            (false, true) if several => {
                let partners = partners_of(&seg_out.primitives, id);
                SegmentConflict {
                    only_in_reference: complement(&all, id, &partners),
                    only_in_output: partners,
                }
            }
            _ => continue,
        };
        diff.d_s += conflict.size();
        diff.conflicts.insert(id.clone(), conflict);
    }

    let correct_class = diff
        .correct
        .iter()
        .filter(|(_, members)| {
            members.iter().all(|p| {
                match (output.node_labels(p.as_str()), reference.node_labels(p.as_str())) {
                    (Some(a), Some(b)) => a.same_labels(b),
                    _ => false,
                }
            })
        })
        .count();

    let reference_count = reference_segments.len() as i64;
    diff.seg_error = reference_count - diff.correct.len() as i64;
    diff.class_error = reference_count - correct_class as i64;
    diff.n_seg = reference_count - reference.absent_nodes().len() as i64;
    diff.detected_seg = output_segments.len();
    diff.detected_seg_rel_edges = output_segments.edges.len();

    for pair in output_segments.edges.keys() {
        let (Some(parents), Some(children)) =
            (output_segments.members(pair.0), output_segments.members(pair.1))
        else {
            continue;
        };
        let mut disagrees = false;
        for parent in parents {
            for child in children {
                let key = EdgeKey {
                    from: parent.clone(),
                    to: child.clone(),
                };
                let same = match (output.edge_labels(&key), reference.edge_labels(&key)) {
                    (Some(a), Some(b)) => a.same_labels(b),
                    (Some(only), None) | (None, Some(only)) => only.is_only(no_relation),
                    (None, None) => true,
                };
                if !same {
                    diff.seg_rel_error += 1;
                    disagrees = true;
                }
            }
        }
        if disagrees {
            diff.relation_conflicts.push(*pair);
        }
    }

    diff
}

/// Segment members other than `id`.
fn partners_of(members: &BTreeSet<PrimitiveId>, id: &PrimitiveId) -> BTreeSet<PrimitiveId> {
    members.iter().filter(|p| *p != id).cloned().collect()
}

/// Primitives other than `id` and not in `partners`.
fn complement(
    all: &BTreeSet<&PrimitiveId>,
    id: &PrimitiveId,
    partners: &BTreeSet<PrimitiveId>,
) -> BTreeSet<PrimitiveId> {
    all.iter()
        .filter(|p| **p != id && !partners.contains(**p))
        .map(|p| (*p).clone())
        .collect()
}

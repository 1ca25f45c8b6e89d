//! Core types for the label graph kernel.

pub mod primitive;
pub mod label;
pub mod issue;
pub mod graph;
pub mod segment;

pub use primitive::{PrimitiveId, EdgeKey};
pub use label::{LabelMap, LabelSet};
pub use issue::{GraphIssue, IssueKind};
pub use graph::LabelGraph;
pub use segment::{SegmentId, Segment, SegmentGraph, SegmentPair};

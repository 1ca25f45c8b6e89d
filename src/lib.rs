//! # labelgraph-kernel
//!
//! Deterministic comparison of labeled bipartite relation graphs.
//!
//! The kernel answers one question:
//!
//! > Given an output graph and a reference graph over the same primitives,
//! > **where do they disagree, and by how much?**
//!
//! ## Core Contract
//!
//! 1. Align both graphs onto one primitive universe (ABSENT placeholders)
//! 2. Diff node labels, edge labels and segmentations (label sets, weights ignored)
//! 3. Report conflicts plus scalar metrics normalized by the reference
//!
//! ## Architecture
//!
//! ```text
//! LgReader → LabelGraph ─┬→ Reconciler → DiffEngine → Comparison
//!                        │                   ↓
//!                        │            SegmentResolver → TreeExtractor
//!                        └→ Merger (weighted label combination)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Maps and sets are ordered (BTreeMap/BTreeSet) throughout
//! - Serialized graphs are sorted row by row, so round-trips are exact
//! - Segment ids follow primitive order unless the caller supplies one
//! - Same inputs + same conventions → identical comparison fingerprint

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod store;
pub mod canonical;
pub mod segment;
pub mod reconcile;
pub mod diff;
pub mod tree;
pub mod merge;

// Re-exports
pub use types::{
    PrimitiveId, EdgeKey, LabelMap, LabelSet, LabelGraph,
    GraphIssue, IssueKind, SegmentId, Segment, SegmentGraph, SegmentPair,
};
pub use policy::{
    LabelConventions, ConventionsError, CombineFn, weighted_sum, weighted_max,
    DEFAULT_NO_RELATION_LABEL,
};
pub use store::{LgReader, LgWriter};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use segment::SegmentResolver;
pub use reconcile::Reconciler;
pub use diff::{
    DiffEngine, Comparison, Metrics,
    NodeConflict, EdgeConflict, SegmentConflict,
};
pub use tree::{TreeExtractor, ForestSplit};
pub use merge::{Merger, merge_label_maps, merge_label_lists};

/// Schema version for comparison records.
/// Increment on breaking changes to any serialized type.
pub const LABELGRAPH_KERNEL_SCHEMA_VERSION: &str = "1.0.0";

/// Default conventions version identifier.
pub const DEFAULT_CONVENTIONS_VERSION: &str = "label_conventions_v1";

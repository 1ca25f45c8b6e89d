//! Primitive identifiers and ordered primitive pairs.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use super::issue::GraphIssue;

/// Identifier of a primitive (one stroke, symbol region, ...) in a label graph.
///
/// Wraps the textual identifier and orders lexicographically, so `"10"`
/// precedes `"2"`, exactly as in the canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimitiveId(String);

impl PrimitiveId {
    /// Create a primitive id, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Get the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PrimitiveId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrimitiveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PrimitiveId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Ordered pair of distinct primitives keying an edge label map.
///
/// Ordering is canonical: `from`, then `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Source primitive.
    pub from: PrimitiveId,
    /// Target primitive.
    pub to: PrimitiveId,
}

impl EdgeKey {
    /// Create an edge key, rejecting self-pairs.
    pub fn new(from: impl Into<PrimitiveId>, to: impl Into<PrimitiveId>) -> Result<Self, GraphIssue> {
        let from = from.into();
        let to = to.into();
        if from == to {
            return Err(GraphIssue::Format {
                line: None,
                reason: format!("self-edge on primitive {from}"),
            });
        }
        Ok(Self { from, to })
    }

    /// The same pair in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Direction-free form of the pair (smaller id first).
    pub fn undirected(&self) -> (PrimitiveId, PrimitiveId) {
        if self.from <= self.to {
            (self.from.clone(), self.to.clone())
        } else {
            (self.to.clone(), self.from.clone())
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

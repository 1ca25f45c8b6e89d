//! Advisory issues recorded while building or transforming a label graph.
//!
//! ## Issue Kinds
//!
//! | Kind | Trigger | Response |
//! |------|---------|----------|
//! | SourceUnavailable | input cannot be read | empty graph |
//! | Format | malformed row, bad field count, bad weight, self-edge, repeated label | entry skipped or repaired |
//! | Structural | anonymous primitive from an edge reference, ABSENT content synthesized | proceed |
//! | InvariantViolation | value inversion outside [0, 1] | entry left unchanged |
//!
//! None of these abort processing. Each one sets the owning graph's error
//! flag, so callers can decide whether downstream metrics are trustworthy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a [`GraphIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Input source could not be read.
    SourceUnavailable,
    /// Malformed input entry.
    Format,
    /// Implicit or synthesized graph content.
    Structural,
    /// Operation attempted on a value outside its domain.
    InvariantViolation,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable => write!(f, "source_unavailable"),
            Self::Format => write!(f, "format"),
            Self::Structural => write!(f, "structural"),
            Self::InvariantViolation => write!(f, "invariant_violation"),
        }
    }
}

/// A non-fatal problem found in a label graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphIssue {
    /// Input could not be read; the graph is empty.
    #[error("cannot read graph source {source_name}: {reason}")]
    SourceUnavailable {
        /// Path or name of the source.
        source_name: String,
        /// Underlying I/O failure.
        reason: String,
    },
    /// Malformed entry, skipped or repaired.
    #[error("invalid entry{}: {reason}", line_suffix(.line))]
    Format {
        /// 1-based line number, when read from text.
        line: Option<usize>,
        /// What was wrong.
        reason: String,
    },
    /// Content created implicitly rather than read.
    #[error("{message}")]
    Structural {
        /// Description of what was synthesized.
        message: String,
    },
    /// Value outside the domain of an operation; left unchanged.
    #[error("cannot invert {target} label {label:?} with value {value}")]
    InvariantViolation {
        /// Node or edge the label belongs to.
        target: String,
        /// Offending label.
        label: String,
        /// Offending value.
        value: f64,
    },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

impl GraphIssue {
    /// Create a format issue for a text line.
    pub fn format_at(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line: Some(line),
            reason: reason.into(),
        }
    }

    /// Create a structural warning.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }

    /// Category of this issue.
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::SourceUnavailable { .. } => IssueKind::SourceUnavailable,
            Self::Format { .. } => IssueKind::Format,
            Self::Structural { .. } => IssueKind::Structural,
            Self::InvariantViolation { .. } => IssueKind::InvariantViolation,
        }
    }

    /// Emit this issue as a structured warning.
    pub fn log(&self, graph: &str) {
        tracing::warn!(
            kind = %self.kind(),
            graph = graph,
            "label graph issue: {}",
            self
        );
    }
}

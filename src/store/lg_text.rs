//! Line-oriented label graph text format.
//!
//! ```text
//! # comment
//! N,<id>,<label>[,<weight>]
//! E,<from>,<to>,<label>[,<weight>]
//! ```
//!
//! Reading never aborts: malformed rows are skipped (or repaired where the
//! intent is clear) and recorded as issues on the resulting graph. Writing
//! produces one row per label, sorted lexicographically by full row text, so
//! `write(read(write(g))) == write(g)`.

use std::path::Path;

use crate::canonical::text_hash_hex;
use crate::policy::LabelConventions;
use crate::types::{EdgeKey, GraphIssue, LabelGraph, PrimitiveId};

const NODE_MIN_FIELDS: usize = 3;
const NODE_MAX_FIELDS: usize = 4;
const EDGE_MIN_FIELDS: usize = 4;
const EDGE_MAX_FIELDS: usize = 5;

/// Parser for the text format.
#[derive(Debug, Clone, Default)]
pub struct LgReader {
    conventions: LabelConventions,
}

impl LgReader {
    /// Create a reader with default conventions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with explicit conventions.
    pub fn with_conventions(conventions: LabelConventions) -> Self {
        Self { conventions }
    }

    /// Read a graph from a file.
    ///
    /// An unreadable file yields an empty graph with a
    /// [`GraphIssue::SourceUnavailable`] issue.
    pub fn read_path(&self, path: impl AsRef<Path>) -> LabelGraph {
        let path = path.as_ref();
        let name = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => self.read_str(name, &text),
            Err(e) => {
                let mut graph = LabelGraph::named(name.clone());
                graph.record_issue(GraphIssue::SourceUnavailable {
                    source_name: name,
                    reason: e.to_string(),
                });
                graph
            }
        }
    }

    /// Read a graph from text, tagging it with `name` for diagnostics.
    pub fn read_str(&self, name: impl Into<String>, text: &str) -> LabelGraph {
        let mut graph = LabelGraph::named(name);

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            match fields[0] {
                "N" => self.read_node(&mut graph, line_no, &fields),
                "E" => self.read_edge(&mut graph, line_no, &fields),
                entry if entry.starts_with('#') => {}
                entry => graph.record_issue(GraphIssue::format_at(
                    line_no,
                    format!("invalid entry type {entry:?} (expected N or E)"),
                )),
            }
        }

        graph.fill_implicit_primitives(&self.conventions.no_relation_label);
        graph
    }

    fn read_node(&self, graph: &mut LabelGraph, line_no: usize, fields: &[&str]) {
        if fields.len() < NODE_MIN_FIELDS {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("node entry has {} fields, expected at least {NODE_MIN_FIELDS}", fields.len()),
            ));
            return;
        }
        if fields.len() > NODE_MAX_FIELDS {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("node entry has {} fields; extra fields ignored", fields.len()),
            ));
        }
        let (id, label) = (fields[1], fields[2]);
        if id.is_empty() || label.is_empty() {
            graph.record_issue(GraphIssue::format_at(line_no, "empty node id or label"));
            return;
        }
        let Some(weight) = self.read_weight(graph, line_no, fields.get(3).copied()) else {
            return;
        };

        if graph
            .insert_node_label(PrimitiveId::from(id), label.to_string(), weight)
            .is_some()
        {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("repeated label {label:?} for node {id}"),
            ));
        }
    }

    fn read_edge(&self, graph: &mut LabelGraph, line_no: usize, fields: &[&str]) {
        if fields.len() < EDGE_MIN_FIELDS {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("edge entry has {} fields, expected at least {EDGE_MIN_FIELDS}", fields.len()),
            ));
            return;
        }
        if fields.len() > EDGE_MAX_FIELDS {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("edge entry has {} fields; extra fields ignored", fields.len()),
            ));
        }
        let (from, to, label) = (fields[1], fields[2], fields[3]);
        if from.is_empty() || to.is_empty() || label.is_empty() {
            graph.record_issue(GraphIssue::format_at(line_no, "empty edge endpoint or label"));
            return;
        }
        let key = match EdgeKey::new(from, to) {
            Ok(key) => key,
            Err(_) => {
                graph.record_issue(GraphIssue::format_at(
                    line_no,
                    format!("self-edge on primitive {from}; row dropped"),
                ));
                return;
            }
        };
        let Some(weight) = self.read_weight(graph, line_no, fields.get(4).copied()) else {
            return;
        };

        if graph
            .insert_edge_label(key.clone(), label.to_string(), weight)
            .is_some()
        {
            graph.record_issue(GraphIssue::format_at(
                line_no,
                format!("repeated label {label:?} for edge {key}"),
            ));
        }
    }

    /// Parse an optional weight field. `None` means the entry must be skipped.
    fn read_weight(&self, graph: &mut LabelGraph, line_no: usize, field: Option<&str>) -> Option<f64> {
        match field {
            None | Some("") => Some(self.conventions.default_weight),
            Some(text) => match text.parse::<f64>() {
                Ok(weight) if weight.is_finite() => Some(weight),
                _ => {
                    graph.record_issue(GraphIssue::format_at(
                        line_no,
                        format!("non-numeric weight {text:?}"),
                    ));
                    None
                }
            },
        }
    }
}

/// Canonical serializer for the text format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LgWriter;

impl LgWriter {
    /// Serialize node and edge labels as sorted rows.
    ///
    /// Graph weight, absent sets and hidden edges are not part of the text form.
    pub fn write(graph: &LabelGraph) -> String {
        let mut rows: Vec<String> = Vec::new();
        for (id, labels) in graph.nodes() {
            for (label, weight) in labels.iter() {
                rows.push(format!("N,{id},{label},{weight:?}"));
            }
        }
        for (key, labels) in graph.edges() {
            for (label, weight) in labels.iter() {
                rows.push(format!("E,{},{},{label},{weight:?}", key.from, key.to));
            }
        }
        rows.sort();

        let mut text = String::with_capacity(rows.iter().map(|r| r.len() + 1).sum());
        for row in rows {
            text.push_str(&row);
            text.push('\n');
        }
        text
    }
}

impl LabelGraph {
    /// Parse text with default conventions.
    pub fn parse_lg(text: &str) -> Self {
        LgReader::new().read_str("<text>", text)
    }

    /// Canonical text form.
    pub fn to_lg_string(&self) -> String {
        LgWriter::write(self)
    }

    /// xxh64 fingerprint of the canonical text form.
    pub fn fingerprint(&self) -> String {
        text_hash_hex(&self.to_lg_string())
    }
}

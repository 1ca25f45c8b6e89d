//! Graph input and output.
//!
//! The text format is the only persisted form of a label graph; graphs built
//! in memory go through [`LabelGraph::from_label_maps`](crate::LabelGraph::from_label_maps).

pub mod lg_text;

pub use lg_text::{LgReader, LgWriter};

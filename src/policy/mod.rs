//! Configuration and combination policies.

pub mod conventions;
pub mod combine;

pub use conventions::{LabelConventions, ConventionsError, DEFAULT_NO_RELATION_LABEL};
pub use combine::{CombineFn, weighted_sum, weighted_max};

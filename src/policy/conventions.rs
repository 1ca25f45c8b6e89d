//! Label conventions: the distinguished labels the kernel interprets.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! The default weight is quantized to an integer before hashing (multiplied
//! by 1e6 and rounded to i64), so `conventions_hash` does not depend on float
//! formatting.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::DEFAULT_CONVENTIONS_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Error type for invalid conventions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConventionsError {
    /// A distinguished label is empty.
    #[error("{0} label must not be empty")]
    EmptyLabel(&'static str),
    /// Two distinguished labels coincide.
    #[error("{0} and {1} labels must differ (both {2:?})")]
    DuplicateLabel(&'static str, &'static str, String),
    /// Default weight is not a positive finite number.
    #[error("default weight must be positive and finite, got {0}")]
    InvalidWeight(f64),
    /// JSON input could not be decoded.
    #[error("invalid conventions JSON: {0}")]
    Json(String),
}

/// Default no-relation label, also given to anonymous primitives.
pub const DEFAULT_NO_RELATION_LABEL: &str = "_";

/// Distinguished labels and defaults.
///
/// ## Parameters
///
/// - `segmentation_label`: edge label merging two primitives into one segment (`*`)
/// - `no_relation_label`: explicit "no relation" marker, also the label of
///   anonymous primitives (`_`)
/// - `absent_label`: label of synthesized placeholder primitives and edges (`ABSENT`)
/// - `default_weight`: weight used when an input row omits it (`1.0`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConventions {
    /// Conventions version identifier.
    pub version: String,
    /// Segmentation (merge) edge label.
    pub segmentation_label: String,
    /// No-relation label.
    pub no_relation_label: String,
    /// ABSENT placeholder label.
    pub absent_label: String,
    /// Weight for entries that omit one.
    pub default_weight: f64,
}

/// Quantized conventions for deterministic hashing.
#[derive(Serialize)]
struct QuantizedConventions<'a> {
    version: &'a str,
    segmentation_label: &'a str,
    no_relation_label: &'a str,
    absent_label: &'a str,
    default_weight: i64,
}

impl LabelConventions {
    /// Decode and validate conventions from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConventionsError> {
        let conventions: Self =
            serde_json::from_str(json).map_err(|e| ConventionsError::Json(e.to_string()))?;
        conventions.validate()?;
        Ok(conventions)
    }

    /// Check that labels are non-empty and distinct and the weight is usable.
    pub fn validate(&self) -> Result<(), ConventionsError> {
        let labels = [
            ("segmentation", &self.segmentation_label),
            ("no-relation", &self.no_relation_label),
            ("absent", &self.absent_label),
        ];
        for (name, label) in labels {
            if label.trim().is_empty() {
                return Err(ConventionsError::EmptyLabel(name));
            }
        }
        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                if labels[i].1 == labels[j].1 {
                    return Err(ConventionsError::DuplicateLabel(
                        labels[i].0,
                        labels[j].0,
                        labels[i].1.clone(),
                    ));
                }
            }
        }
        if !(self.default_weight.is_finite() && self.default_weight > 0.0) {
            return Err(ConventionsError::InvalidWeight(self.default_weight));
        }
        Ok(())
    }

    /// Stable hash identifying this configuration.
    pub fn conventions_hash(&self) -> String {
        canonical_hash_hex(&QuantizedConventions {
            version: &self.version,
            segmentation_label: &self.segmentation_label,
            no_relation_label: &self.no_relation_label,
            absent_label: &self.absent_label,
            default_weight: (self.default_weight * FLOAT_QUANTIZATION_FACTOR).round() as i64,
        })
    }
}

impl Default for LabelConventions {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONVENTIONS_VERSION.to_string(),
            segmentation_label: "*".to_string(),
            no_relation_label: DEFAULT_NO_RELATION_LABEL.to_string(),
            absent_label: "ABSENT".to_string(),
            default_weight: 1.0,
        }
    }
}

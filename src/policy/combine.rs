//! Label value combination rules for merging graphs.

/// Rule combining a label's value from two graphs:
/// `f(value_a, weight_a, value_b, weight_b) -> value`.
pub trait CombineFn: Fn(f64, f64, f64, f64) -> f64 {}

impl<F: Fn(f64, f64, f64, f64) -> f64> CombineFn for F {}

/// Weighted sum of both values.
///
/// ```text
/// combined = weight_a * value_a + weight_b * value_b
/// ```
pub fn weighted_sum(value_a: f64, weight_a: f64, value_b: f64, weight_b: f64) -> f64 {
    weight_a * value_a + weight_b * value_b
}

/// Larger of the two weighted values.
pub fn weighted_max(value_a: f64, weight_a: f64, value_b: f64, weight_b: f64) -> f64 {
    (weight_a * value_a).max(weight_b * value_b)
}

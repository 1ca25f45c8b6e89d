//! Canonical encoding and fingerprints.
//!
//! Comparison records and configurations are hashed through their canonical
//! JSON encoding; graphs are hashed through their canonical text form.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields encode in declaration order
//! - Maps are BTreeMap/BTreeSet throughout, so key order is stable
//! - Floats encode with the shortest round-trip representation

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Encode a value as canonical JSON bytes.
///
/// Only used with in-crate record types whose encoding cannot fail
/// (string map keys, no non-serializable fields).
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("canonical record encoding is infallible")
}

/// xxh64 of a value's canonical encoding.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Canonical hash as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// xxh64 of raw text as a 16-digit hex string.
pub fn text_hash_hex(text: &str) -> String {
    format!("{:016x}", xxh64(text.as_bytes(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_map_order_independent_of_insertion() {
        let mut a = BTreeMap::new();
        a.insert("x", 1.0);
        a.insert("y", 0.5);
        let mut b = BTreeMap::new();
        b.insert("y", 0.5);
        b.insert("x", 1.0);

        assert_eq!(canonical_hash_hex(&a), canonical_hash_hex(&b));
    }

    #[test]
    fn test_text_hash_width() {
        assert_eq!(text_hash_hex("N,a,x,1.0\n").len(), 16);
        assert_ne!(text_hash_hex("a"), text_hash_hex("b"));
    }
}

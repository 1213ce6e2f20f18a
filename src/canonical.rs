//! Canonical serialization for hierarchy fingerprints.
//!
//! Snapshot records serialize with fields in declaration order and child
//! lists in creation order. Maps inside hashed data must be `BTreeMap`.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    // Plain structs, strings, vectors and BTreeMaps cannot fail to serialize.
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// xxh64 of the canonical bytes of `value`.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// [`canonical_hash`] as a zero-padded 16 character hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_map_order_is_stable() {
        let mut a = BTreeMap::new();
        a.insert("port", 8080);
        a.insert("cpu_cores", 4);

        let mut b = BTreeMap::new();
        b.insert("cpu_cores", 4);
        b.insert("port", 8080);

        assert_eq!(canonical_hash(&a), canonical_hash(&b));
        assert_eq!(canonical_hash_hex(&a).len(), 16);
    }
}

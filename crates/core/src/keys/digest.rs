//! Argument digests for derived cache keys.
//!
//! Arguments are serialized with serde, canonicalised through
//! [`serde_json::Value`] (object keys sorted), and hashed into a 128-bit
//! digest rendered as 32 lowercase hex characters. The digest only has to be
//! unique per argument list, not cryptographically strong.

use cacheable_common::CacheResult;
use serde::Serialize;

/// Digest width in bytes.
pub const DIGEST_BYTES: usize = 16;

/// Canonical JSON text for an argument list.
///
/// Sequence order is preserved, so `(1, 2)` and `(2, 1)` differ. Map keys
/// are emitted in sorted order so `HashMap` iteration order never leaks into
/// the key.
pub fn canonical_args<A: Serialize + ?Sized>(args: &A) -> CacheResult<Vec<u8>> {
    let canonical = serde_json::to_value(args)?;
    Ok(serde_json::to_vec(&canonical)?)
}

/// Hex digest of the canonical serialization of `args`.
pub fn args_digest<A: Serialize + ?Sized>(args: &A) -> CacheResult<String> {
    let canonical = canonical_args(args)?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(&canonical);

    let mut digest = [0u8; DIGEST_BYTES];
    hasher.finalize_xof().fill(&mut digest);
    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_digest_is_128_bit_hex() {
        let digest = args_digest(&(1, "two")).unwrap();
        assert_eq!(digest.len(), DIGEST_BYTES * 2);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_is_order_sensitive() {
        assert_ne!(args_digest(&[1, 2]).unwrap(), args_digest(&[2, 1]).unwrap());
    }

    #[test]
    fn test_map_key_order_does_not_matter() {
        let mut forward = HashMap::new();
        let mut backward = HashMap::new();
        for i in 0..32 {
            forward.insert(format!("k{i}"), i);
        }
        for i in (0..32).rev() {
            backward.insert(format!("k{i}"), i);
        }
        assert_eq!(args_digest(&forward).unwrap(), args_digest(&backward).unwrap());
    }

    #[test]
    fn test_nested_structures_are_hashed() {
        let a = serde_json::json!([{ "user": { "id": 1, "tags": ["a"] } }]);
        let b = serde_json::json!([{ "user": { "id": 1, "tags": ["b"] } }]);
        assert_ne!(args_digest(&a).unwrap(), args_digest(&b).unwrap());
    }
}

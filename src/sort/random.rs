//! Seeded shuffle positions.
//!
//! A random order is the ascending order of `(hash(seed, pk), pk)`. The
//! hash is the first 8 bytes of SHA-256 over the big-endian seed followed
//! by the canonical text of the primary key, masked to 63 bits so it fits
//! a non-negative `Int`. The same seed always reproduces the same order
//! and nothing about the shuffle is stored server-side.

use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

use crate::value::Value;

const POSITION_MASK: u64 = i64::MAX as u64;

/// Generates a fresh 63-bit seed
pub fn fresh_seed() -> u64 {
    rand::random::<u64>() & POSITION_MASK
}

fn hash_text(seed: u64, text: &str) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_be_bytes());
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) & POSITION_MASK) as i64
}

/// Position of a primary key in the shuffle for `seed`
pub fn seeded_hash(seed: u64, pk: &Value) -> i64 {
    hash_text(seed, &pk.canonical_text())
}

/// Same as `seeded_hash` for a raw JSON primary key field.
///
/// Returns `None` for JSON shapes a primary key cannot have.
pub fn seeded_hash_json(seed: u64, pk: &JsonValue) -> Option<i64> {
    match pk {
        JsonValue::Number(n) => n.as_i64().map(|i| hash_text(seed, &i.to_string())),
        JsonValue::String(s) => Some(hash_text(seed, s)),
        _ => None,
    }
}

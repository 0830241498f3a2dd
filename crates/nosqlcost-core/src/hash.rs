//! Stable hashing helpers for estimate inputs and reports.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Order-sensitive combination of two digests.
    pub fn chain(&self, next: &Hash256) -> Hash256 {
        digest(&[self.0.as_slice(), next.0.as_slice()])
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn digest(parts: &[&[u8]]) -> Hash256 {
    let mut h = Hasher::new();
    for part in parts {
        h.update(part);
    }
    Hash256(h.finalize().into())
}

/// Digest of a value's JSON encoding. Maps must be ordered (`BTreeMap`) for
/// the digest to be stable across runs.
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v).map_err(|e| crate::error::Error::Hash(e.to_string()))?;
    Ok(digest(&[bytes.as_slice()]))
}

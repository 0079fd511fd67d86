//! Leaf and node hashing.
//!
//! Hash domain separation:
//! - Leaf nodes:     `H(H(value))`
//! - Internal nodes: `H(min(a, b) || max(a, b))`
//!
//! The outer leaf round hashes a 32-byte preimage while internal nodes hash
//! 64 bytes, so a leaf can never be presented as an internal node.

use crate::{MerkleTreeError, Result};

/// A 32-byte node hash.
pub type Hash = [u8; 32];

/// Hash function used for leaves and internal nodes.
pub trait MerkleHasher {
    /// Name recorded in tree dumps.
    const NAME: &'static str;

    /// Hash arbitrary bytes to 32 bytes.
    fn hash(data: &[u8]) -> Hash;
}

/// Keccak-256 as used by the EVM. The default hasher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak256;

impl MerkleHasher for Keccak256 {
    const NAME: &'static str = "keccak256";

    fn hash(data: &[u8]) -> Hash {
        use tiny_keccak::Hasher;

        let mut output = [0u8; 32];
        let mut hasher = tiny_keccak::Keccak::v256();
        hasher.update(data);
        hasher.finalize(&mut output);
        output
    }
}

/// Blake3, for trees that are never checked on-chain.
#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

#[cfg(feature = "blake3")]
impl MerkleHasher for Blake3 {
    const NAME: &'static str = "blake3";

    fn hash(data: &[u8]) -> Hash {
        *blake3::hash(data).as_bytes()
    }
}

/// Compute the leaf hash of a value: `H(H(value))`.
pub fn leaf_hash<H: MerkleHasher>(value: &[u8]) -> Hash {
    H::hash(&H::hash(value))
}

/// Hash two nodes into their parent.
///
/// The pair is sorted by unsigned byte order first, so
/// `hash_pair(a, b) == hash_pair(b, a)`.
pub fn hash_pair<H: MerkleHasher>(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    H::hash(&buf)
}

/// Format bytes as `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse `0x`-prefixed (or bare) hex into bytes.
pub fn bytes_from_hex(s: &str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits)
        .map_err(|e| MerkleTreeError::InvalidData(format!("bad hex string '{}': {}", s, e)))
}

/// Parse `0x`-prefixed (or bare) hex into a 32-byte hash.
pub fn hash_from_hex(s: &str) -> Result<Hash> {
    let bytes = bytes_from_hex(s)?;
    bytes.as_slice().try_into().map_err(|_| {
        MerkleTreeError::InvalidData(format!(
            "expected 32-byte hash, got {} bytes in '{}'",
            bytes.len(),
            s
        ))
    })
}

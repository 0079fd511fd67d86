//! Standardized Merkle tree with sorted-pair hashing.
//!
//! Builds a static binary hash tree over a fixed set of values, compatible
//! with OpenZeppelin's `StandardMerkleTree` and its Solidity `MerkleProof`
//! verifier:
//!
//! - leaves are `H(H(value))`, sorted by unsigned byte order;
//! - the tree is a flat array of `2L - 1` nodes with the leaves at the end;
//! - internal nodes are `H(min(a, b) || max(a, b))`.
//!
//! # Core types
//!
//! - [`StandardMerkleTree`]: values, node array, proofs, dump/load.
//! - [`MultiProof`]: combined proof for several leaves.
//! - [`TreeDump`]: versioned serialized description.
//!
//! The free functions ([`make_merkle_tree`], [`get_proof`],
//! [`get_multi_proof`], …) work directly on pre-hashed 32-byte leaves.

#![warn(missing_docs)]

mod error;
mod dump;
pub mod hash;
mod multiproof;
mod proof;
mod report;
mod standard;
mod tree;

#[cfg(test)]
mod tests;

pub use dump::{DumpedValue, FORMAT_STANDARD_V1, LEAF_ENCODING_BYTES, LoadOptions, TreeDump};
pub use error::{DuplicateLeafWarning, MerkleTreeError, Result};
#[cfg(feature = "blake3")]
pub use hash::Blake3;
pub use hash::{Hash, Keccak256, MerkleHasher, hash_pair, leaf_hash, to_hex};
pub use multiproof::{MultiProof, get_multi_proof, process_multi_proof};
pub use proof::{get_proof, process_proof};
pub use report::{MultiProofReport, SingleProofReport};
pub use standard::{LeafValue, StandardMerkleTree, TreeOptions, ValueMultiProof};
pub use tree::{is_valid_merkle_tree, make_merkle_tree, render_merkle_tree};

use thiserror::Error;

/// Alias for `core::result::Result<T, MerkleTreeError>`.
pub type Result<T> = core::result::Result<T, MerkleTreeError>;

/// Errors from Merkle tree construction, proof generation and loading.
///
/// Every variant is recoverable; a failed query leaves the tree untouched.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MerkleTreeError {
    /// A tree needs at least one leaf.
    #[error("expected non-zero number of leaves")]
    EmptyInput,
    /// The index does not name a leaf.
    #[error("index {index} is not a leaf (leaf count {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        len: usize,
    },
    /// A multiproof was requested with a repeated index.
    #[error("cannot prove duplicated index {0}")]
    DuplicateIndex(usize),
    /// A multiproof was requested for no leaves.
    #[error("expected non-zero number of leaves to prove")]
    EmptyProof,
    /// Stored hashes disagree with the values or with each other.
    #[error("merkle tree is invalid: {0}")]
    CorruptTree(String),
    /// The dump uses an unsupported schema version.
    #[error("unknown format '{found}'")]
    FormatVersion {
        /// Format string found in the dump.
        found: String,
    },
    /// No value with this leaf hash.
    #[error("leaf is not in tree: {0}")]
    LeafNotFound(String),
    /// A proof is malformed.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// Input could not be parsed.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Non-fatal notice that several values hash to the same leaf.
///
/// Raised at build time. Proofs stay correct because values are resolved by
/// tree index, but a verifier holding only leaf hashes cannot tell the
/// values apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLeafWarning {
    /// The shared leaf hash.
    pub leaf_hash: [u8; 32],
    /// Value indices (input order) of every value with this hash.
    pub value_indices: Vec<usize>,
}

//! Portable tree description.
//!
//! A [`TreeDump`] holds the full node array and every value tagged with its
//! tree index, so a tree can be reloaded without re-hashing:
//!
//! ```json
//! {
//!   "format": "standard-v1",
//!   "leafEncoding": ["bytes"],
//!   "tree": ["0x…", "0x…", "0x…"],
//!   "values": [{ "value": "0x…", "treeIndex": 2 }, { "value": "0x…", "treeIndex": 1 }]
//! }
//! ```
//!
//! `hash` is present only for hashers other than keccak256.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Hash, Keccak256, MerkleTreeError, Result,
    hash::{MerkleHasher, bytes_from_hex, hash_from_hex, to_hex},
    standard::{LeafValue, StandardMerkleTree},
    tree::is_leaf_node,
};

/// The only format this crate reads and writes.
pub const FORMAT_STANDARD_V1: &str = "standard-v1";

/// Leaf encoding of raw byte values.
pub const LEAF_ENCODING_BYTES: &str = "bytes";

/// Options for [`StandardMerkleTree::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Re-hash every leaf and internal node after loading.
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// A value entry in a [`TreeDump`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpedValue {
    /// `0x`-prefixed hex of the raw value.
    pub value: String,
    /// Position of the value's leaf in `tree`.
    pub tree_index: usize,
}

/// Serialized form of a [`StandardMerkleTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDump {
    /// Schema version, e.g. `standard-v1`.
    pub format: String,
    /// Encoding of each value.
    pub leaf_encoding: Vec<String>,
    /// Hasher name; absent means keccak256.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Node array as `0x`-prefixed hex, root first.
    pub tree: Vec<String>,
    /// Values in input order.
    pub values: Vec<DumpedValue>,
}

impl TreeDump {
    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| MerkleTreeError::InvalidData(format!("json encode error: {}", e)))
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MerkleTreeError::InvalidData(format!("json encode error: {}", e)))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MerkleTreeError::InvalidData(format!("json decode error: {}", e)))
    }
}

impl<H: MerkleHasher> StandardMerkleTree<H> {
    /// Describe the tree for storage or distribution.
    ///
    /// Deterministic for a given tree.
    pub fn dump(&self) -> TreeDump {
        let dump = TreeDump {
            format: FORMAT_STANDARD_V1.to_string(),
            leaf_encoding: vec![LEAF_ENCODING_BYTES.to_string()],
            hash: (H::NAME != Keccak256::NAME).then(|| H::NAME.to_string()),
            tree: self.tree().iter().map(|node| to_hex(node)).collect(),
            values: self
                .values()
                .iter()
                .map(|leaf| DumpedValue {
                    value: to_hex(&leaf.value),
                    tree_index: leaf.tree_index,
                })
                .collect(),
        };
        debug!(values = dump.values.len(), "dumped merkle tree");
        dump
    }

    /// Rebuild a tree from its description without re-hashing it.
    ///
    /// Shape checks always run. With [`LoadOptions::validate`] every hash is
    /// recomputed as well.
    pub fn load(dump: &TreeDump, options: LoadOptions) -> Result<Self> {
        if dump.format != FORMAT_STANDARD_V1 {
            return Err(MerkleTreeError::FormatVersion {
                found: dump.format.clone(),
            });
        }
        if dump.leaf_encoding.len() != 1 || dump.leaf_encoding[0] != LEAF_ENCODING_BYTES {
            return Err(MerkleTreeError::InvalidData(format!(
                "unsupported leaf encoding {:?}",
                dump.leaf_encoding
            )));
        }
        let hasher = dump.hash.as_deref().unwrap_or(Keccak256::NAME);
        if hasher != H::NAME {
            return Err(MerkleTreeError::InvalidData(format!(
                "tree was built with {}, loading as {}",
                hasher,
                H::NAME
            )));
        }

        let tree = dump
            .tree
            .iter()
            .map(|node| hash_from_hex(node))
            .collect::<Result<Vec<Hash>>>()?;
        let values = dump
            .values
            .iter()
            .map(|entry| {
                Ok(LeafValue {
                    value: bytes_from_hex(&entry.value)?,
                    tree_index: entry.tree_index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Err(e) = check_shape(&tree, &values) {
            warn!(error = %e, "rejected malformed merkle tree dump");
            return Err(e);
        }

        let loaded = Self::from_parts(tree, values);
        if options.validate {
            if let Err(e) = loaded.validate() {
                warn!(error = %e, "loaded merkle tree failed validation");
                return Err(e);
            }
        }

        debug!(
            hasher = H::NAME,
            values = loaded.len(),
            validated = options.validate,
            root = %to_hex(&loaded.root()),
            "loaded merkle tree"
        );
        Ok(loaded)
    }
}

/// Structural checks that need no hashing.
fn check_shape(tree: &[Hash], values: &[LeafValue]) -> Result<()> {
    if values.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }
    if tree.len() != 2 * values.len() - 1 {
        return Err(MerkleTreeError::CorruptTree(format!(
            "{} nodes for {} values, expected {}",
            tree.len(),
            values.len(),
            2 * values.len() - 1
        )));
    }
    let mut seen = BTreeSet::new();
    for leaf in values {
        if !is_leaf_node(tree, leaf.tree_index) {
            return Err(MerkleTreeError::CorruptTree(format!(
                "tree index {} is not a leaf",
                leaf.tree_index
            )));
        }
        if !seen.insert(leaf.tree_index) {
            return Err(MerkleTreeError::CorruptTree(format!(
                "tree index {} used by more than one value",
                leaf.tree_index
            )));
        }
    }
    Ok(())
}

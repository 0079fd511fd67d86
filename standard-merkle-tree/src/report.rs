//! Records handed to an external verifier for differential testing.
//!
//! An on-chain verifier receives the leaves in sorted order, so every index
//! here is a *sorted leaf index* rather than a value index or tree index.

use serde::{Serialize, Serializer};

use crate::{
    Hash, Result,
    hash::{MerkleHasher, to_hex},
    standard::StandardMerkleTree,
};

fn hex_hash<S: Serializer>(hash: &Hash, serializer: S) -> core::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(hash))
}

fn hex_hashes<S: Serializer>(
    hashes: &[Hash],
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(hashes.iter().map(|hash| to_hex(hash)))
}

/// Everything needed to check one leaf's proof externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleProofReport {
    /// All leaf hashes in sorted order.
    #[serde(serialize_with = "hex_hashes")]
    pub leaves: Vec<Hash>,
    /// Sorted leaf index of the proven leaf.
    pub index_to_prove: usize,
    /// Tree root.
    #[serde(serialize_with = "hex_hash")]
    pub root: Hash,
    /// Sibling path.
    #[serde(serialize_with = "hex_hashes")]
    pub proof: Vec<Hash>,
}

/// Everything needed to check a multiproof externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiProofReport {
    /// All leaf hashes in sorted order.
    #[serde(serialize_with = "hex_hashes")]
    pub leaves: Vec<Hash>,
    /// Sorted leaf indices of the proven leaves, ascending.
    pub indices: Vec<usize>,
    /// Tree root.
    #[serde(serialize_with = "hex_hash")]
    pub root: Hash,
    /// Extra proof hashes.
    #[serde(serialize_with = "hex_hashes")]
    pub proof: Vec<Hash>,
    /// Combine-step flags.
    pub proof_flags: Vec<bool>,
}

impl<H: MerkleHasher> StandardMerkleTree<H> {
    /// Proof report for the value at `value_index`.
    pub fn single_proof_report(&self, value_index: usize) -> Result<SingleProofReport> {
        Ok(SingleProofReport {
            leaves: self.sorted_leaves(),
            index_to_prove: self.sorted_leaf_index(value_index)?,
            root: self.root(),
            proof: self.get_proof(value_index)?,
        })
    }

    /// Multiproof report for the values at `value_indices`.
    ///
    /// Because multiproof leaves are ordered by descending tree index, the
    /// ascending sorted leaf indices line up with `multiproof.leaves`.
    pub fn multi_proof_report(&self, value_indices: &[usize]) -> Result<MultiProofReport> {
        let proof = self.get_multi_proof(value_indices)?;
        let mut indices = value_indices
            .iter()
            .map(|&i| self.sorted_leaf_index(i))
            .collect::<Result<Vec<_>>>()?;
        indices.sort_unstable();
        Ok(MultiProofReport {
            leaves: self.sorted_leaves(),
            indices,
            root: self.root(),
            proof: proof.multiproof.proof,
            proof_flags: proof.multiproof.proof_flags,
        })
    }
}

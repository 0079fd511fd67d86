//! Multiproofs: one combined proof for several leaves.
//!
//! The verifier keeps a FIFO queue seeded with the proven leaves. Each flag
//! describes one combine step: it pops one known node and pairs it either
//! with the next known node (`true`) or with the next external proof hash
//! (`false`), then pushes the parent. After the last flag the queue holds
//! only the root.

use std::collections::VecDeque;

use bincode::{Decode, Encode};
use tracing::trace;

use crate::{
    Hash, MerkleTreeError, Result,
    hash::{MerkleHasher, hash_pair},
    tree::{check_leaf_node, parent_index, sibling_index},
};

/// A combined inclusion proof for several leaves.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MultiProof {
    /// Proven leaf hashes, ordered by descending tree index.
    pub leaves: Vec<Hash>,
    /// Sibling hashes that cannot be derived from the proven leaves.
    pub proof: Vec<Hash>,
    /// One flag per combine step; `true` pairs two known nodes.
    pub proof_flags: Vec<bool>,
}

impl MultiProof {
    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects trailing bytes and proofs whose flag count does not match the
    /// leaf and hash counts.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>(); // 100MB limit
        let (proof, read): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("decode error: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} trailing bytes after multiproof",
                bytes.len() - read
            )));
        }
        proof.check_shape()?;
        Ok(proof)
    }

    /// Check the combine-step identity `flags = leaves + proof - 1` and that
    /// there are enough proof hashes for every `false` flag.
    pub(crate) fn check_shape(&self) -> Result<()> {
        let external_steps = self.proof_flags.iter().filter(|flag| !**flag).count();
        if self.proof.len() < external_steps {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} proof hashes for {} external combine steps",
                self.proof.len(),
                external_steps
            )));
        }
        if self.leaves.len() + self.proof.len() != self.proof_flags.len() + 1 {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} leaves and {} proof hashes are not compatible with {} flags",
                self.leaves.len(),
                self.proof.len(),
                self.proof_flags.len()
            )));
        }
        Ok(())
    }
}

/// Build a multiproof for the given leaf positions.
///
/// Positions may come in any order; they are proven in descending order.
/// Errors with [`EmptyProof`](MerkleTreeError::EmptyProof) for an empty
/// set, [`IndexOutOfRange`](MerkleTreeError::IndexOutOfRange) for a
/// non-leaf position and [`DuplicateIndex`](MerkleTreeError::DuplicateIndex)
/// for a repeated one.
pub fn get_multi_proof(tree: &[Hash], indices: &[usize]) -> Result<MultiProof> {
    if indices.is_empty() {
        return Err(MerkleTreeError::EmptyProof);
    }
    for &i in indices {
        check_leaf_node(tree, i)?;
    }

    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(MerkleTreeError::DuplicateIndex(pair[0]));
    }

    let mut queue: VecDeque<usize> = sorted.iter().copied().collect();
    let mut proof = Vec::new();
    let mut proof_flags = Vec::new();

    while let Some(&j) = queue.front() {
        if j == 0 {
            break;
        }
        queue.pop_front();
        let s = sibling_index(j);
        if queue.front() == Some(&s) {
            proof_flags.push(true);
            queue.pop_front();
        } else {
            proof_flags.push(false);
            proof.push(tree[s]);
        }
        queue.push_back(parent_index(j));
    }

    trace!(
        leaves = sorted.len(),
        proof_hashes = proof.len(),
        flags = proof_flags.len(),
        "generated multiproof"
    );

    Ok(MultiProof {
        leaves: sorted.iter().map(|&i| tree[i]).collect(),
        proof,
        proof_flags,
    })
}

/// Recompute the root from a multiproof.
///
/// A multiproof with no leaves is accepted when its only proof hash is the
/// root itself.
pub fn process_multi_proof<H: MerkleHasher>(multiproof: &MultiProof) -> Result<Hash> {
    multiproof.check_shape()?;

    let mut stack: VecDeque<Hash> = multiproof.leaves.iter().copied().collect();
    let mut proof = multiproof.proof.iter();

    for &flag in &multiproof.proof_flags {
        let a = stack.pop_front().ok_or_else(|| {
            MerkleTreeError::InvalidProof("ran out of known nodes".into())
        })?;
        let b = if flag {
            stack.pop_front().ok_or_else(|| {
                MerkleTreeError::InvalidProof("ran out of known nodes for sibling".into())
            })?
        } else {
            *proof.next().ok_or_else(|| {
                MerkleTreeError::InvalidProof("ran out of proof hashes".into())
            })?
        };
        stack.push_back(hash_pair::<H>(&a, &b));
    }

    match stack.pop_back() {
        Some(root) => Ok(root),
        None => proof
            .next()
            .copied()
            .ok_or_else(|| MerkleTreeError::InvalidProof("multiproof has no nodes".into())),
    }
}

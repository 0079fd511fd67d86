//! Single-leaf inclusion proofs.
//!
//! A proof is the list of sibling hashes on the path from a leaf to the
//! root. Because node hashing sorts each pair, the proof carries no
//! left/right markers: folding the leaf with every sibling in order yields
//! the root.

use tracing::trace;

use crate::{
    Hash, Result,
    hash::{MerkleHasher, hash_pair},
    tree::{check_leaf_node, parent_index, sibling_index},
};

/// Collect the sibling hashes from leaf position `index` up to the root.
///
/// Errors with [`IndexOutOfRange`](crate::MerkleTreeError::IndexOutOfRange)
/// unless `index` is a leaf position.
pub fn get_proof(tree: &[Hash], mut index: usize) -> Result<Vec<Hash>> {
    check_leaf_node(tree, index)?;

    let leaf_position = index;
    let mut proof = Vec::new();
    while index > 0 {
        proof.push(tree[sibling_index(index)]);
        index = parent_index(index);
    }

    trace!(tree_index = leaf_position, depth = proof.len(), "generated proof");
    Ok(proof)
}

/// Recompute the root from a leaf hash and its proof.
pub fn process_proof<H: MerkleHasher>(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |node, sibling| hash_pair::<H>(&node, sibling))
}

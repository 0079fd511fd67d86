//! The value-level Merkle tree.
//!
//! [`StandardMerkleTree`] hashes application values into leaves, sorts the
//! leaves so the tree shape does not depend on input order, and answers
//! proof queries by *value index* (position in the caller's input).

use std::{collections::HashMap, marker::PhantomData};

use tracing::{debug, warn};

use crate::{
    DuplicateLeafWarning, Hash, Keccak256, MerkleTreeError, Result,
    hash::{MerkleHasher, leaf_hash, to_hex},
    multiproof::{MultiProof, get_multi_proof, process_multi_proof},
    proof::{get_proof, process_proof},
    tree::{first_invalid_node, leaf_count, make_merkle_tree, render_merkle_tree},
};

/// Build-time options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Sort leaves by hash before building. Disabling this keeps input order
    /// in the tree and makes the root depend on it.
    pub sort_leaves: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self { sort_leaves: true }
    }
}

/// A value together with the position of its leaf in the tree array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafValue {
    /// The raw application value.
    pub value: Vec<u8>,
    /// Position of the value's leaf hash in the tree array.
    pub tree_index: usize,
}

/// A multiproof together with the values it proves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMultiProof {
    /// Proven values, in the same order as `multiproof.leaves`.
    pub values: Vec<Vec<u8>>,
    /// The hash-level multiproof.
    pub multiproof: MultiProof,
}

/// A static Merkle tree over a fixed set of byte values.
///
/// Immutable once built; all queries take `&self`, so a tree can be shared
/// between threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct StandardMerkleTree<H: MerkleHasher = Keccak256> {
    tree: Vec<Hash>,
    values: Vec<LeafValue>,
    hash_lookup: HashMap<Hash, usize>,
    duplicates: Vec<DuplicateLeafWarning>,
    _hasher: PhantomData<fn() -> H>,
}

impl<H: MerkleHasher> StandardMerkleTree<H> {
    /// Build a tree from values using default options.
    pub fn of<V: AsRef<[u8]>>(values: &[V]) -> Result<Self> {
        Self::of_with_options(values, TreeOptions::default())
    }

    /// Build a tree from values.
    ///
    /// Errors with [`EmptyInput`](MerkleTreeError::EmptyInput) if `values`
    /// is empty. Values sharing a leaf hash are reported through
    /// [`duplicate_leaves`](Self::duplicate_leaves).
    pub fn of_with_options<V: AsRef<[u8]>>(values: &[V], options: TreeOptions) -> Result<Self> {
        if values.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        let mut hashed: Vec<(usize, Hash)> = values
            .iter()
            .enumerate()
            .map(|(value_index, value)| (value_index, leaf_hash::<H>(value.as_ref())))
            .collect();
        if options.sort_leaves {
            // stable: equal hashes keep input order
            hashed.sort_by(|a, b| a.1.cmp(&b.1));
        }

        let leaves: Vec<Hash> = hashed.iter().map(|(_, hash)| *hash).collect();
        let tree = make_merkle_tree::<H>(&leaves)?;

        let mut indexed: Vec<LeafValue> = values
            .iter()
            .map(|value| LeafValue {
                value: value.as_ref().to_vec(),
                tree_index: 0,
            })
            .collect();
        for (leaf_index, (value_index, _)) in hashed.iter().enumerate() {
            indexed[*value_index].tree_index = tree.len() - 1 - leaf_index;
        }

        let result = Self::from_parts(tree, indexed);
        debug!(
            hasher = H::NAME,
            values = result.values.len(),
            sorted = options.sort_leaves,
            root = %to_hex(&result.root()),
            "built standard merkle tree"
        );
        Ok(result)
    }

    /// Assemble a tree from a trusted array and indexed values.
    pub(crate) fn from_parts(tree: Vec<Hash>, values: Vec<LeafValue>) -> Self {
        let mut hash_lookup = HashMap::with_capacity(values.len());
        let mut by_hash: HashMap<Hash, Vec<usize>> = HashMap::new();
        for (value_index, leaf) in values.iter().enumerate() {
            let hash = tree[leaf.tree_index];
            hash_lookup.entry(hash).or_insert(value_index);
            by_hash.entry(hash).or_default().push(value_index);
        }

        let mut duplicates: Vec<DuplicateLeafWarning> = by_hash
            .into_iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(leaf_hash, value_indices)| DuplicateLeafWarning {
                leaf_hash,
                value_indices,
            })
            .collect();
        duplicates.sort_by_key(|warning| warning.value_indices[0]);
        for warning in &duplicates {
            warn!(
                leaf = %to_hex(&warning.leaf_hash),
                value_indices = ?warning.value_indices,
                "duplicate leaf in merkle tree"
            );
        }

        Self {
            tree,
            values,
            hash_lookup,
            duplicates,
            _hasher: PhantomData,
        }
    }

    /// The root hash.
    pub fn root(&self) -> Hash {
        self.tree[0]
    }

    /// Number of values (and leaves).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a tree holds at least one value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The full node array, root first.
    pub fn tree(&self) -> &[Hash] {
        &self.tree
    }

    /// Values in input order with their tree positions.
    pub fn values(&self) -> &[LeafValue] {
        &self.values
    }

    /// Iterate `(value_index, value)` pairs in input order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &[u8])> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, leaf)| (i, leaf.value.as_slice()))
    }

    /// The value at `value_index`.
    pub fn at(&self, value_index: usize) -> Option<&[u8]> {
        self.values.get(value_index).map(|leaf| leaf.value.as_slice())
    }

    /// Tree array position of the leaf for `value_index`.
    pub fn tree_index(&self, value_index: usize) -> Result<usize> {
        self.leaf_value(value_index).map(|leaf| leaf.tree_index)
    }

    /// Position of the value's leaf among the sorted leaves, as seen by a
    /// verifier given [`sorted_leaves`](Self::sorted_leaves).
    pub fn sorted_leaf_index(&self, value_index: usize) -> Result<usize> {
        Ok(self.tree.len() - 1 - self.tree_index(value_index)?)
    }

    /// Leaf hashes in canonical order (the tail of the array, reversed).
    pub fn sorted_leaves(&self) -> Vec<Hash> {
        let first_leaf = self.tree.len() - leaf_count(&self.tree);
        self.tree[first_leaf..].iter().rev().copied().collect()
    }

    /// Groups of values that share a leaf hash.
    pub fn duplicate_leaves(&self) -> &[DuplicateLeafWarning] {
        &self.duplicates
    }

    /// Leaf hash of an arbitrary value under this tree's hasher.
    pub fn leaf_hash(value: &[u8]) -> Hash {
        leaf_hash::<H>(value)
    }

    /// Value index of `value`, if it is in the tree.
    ///
    /// When several values share a leaf hash the first one is returned.
    pub fn leaf_lookup(&self, value: &[u8]) -> Result<usize> {
        let hash = leaf_hash::<H>(value);
        self.hash_lookup
            .get(&hash)
            .copied()
            .ok_or_else(|| MerkleTreeError::LeafNotFound(to_hex(value)))
    }

    fn leaf_value(&self, value_index: usize) -> Result<&LeafValue> {
        self.values
            .get(value_index)
            .ok_or(MerkleTreeError::IndexOutOfRange {
                index: value_index,
                len: self.values.len(),
            })
    }

    /// Leaf hash for `value_index`, checked against the stored array.
    fn validated_leaf(&self, value_index: usize) -> Result<(usize, Hash)> {
        let leaf = self.leaf_value(value_index)?;
        let hash = leaf_hash::<H>(&leaf.value);
        if self.tree.get(leaf.tree_index) != Some(&hash) {
            return Err(MerkleTreeError::CorruptTree(format!(
                "stored leaf at tree index {} does not match value {}",
                leaf.tree_index, value_index
            )));
        }
        Ok((leaf.tree_index, hash))
    }

    /// Inclusion proof for the value at `value_index`.
    ///
    /// The proof is checked against the root before it is returned.
    pub fn get_proof(&self, value_index: usize) -> Result<Vec<Hash>> {
        let (tree_index, hash) = self.validated_leaf(value_index)?;
        let proof = get_proof(&self.tree, tree_index)?;
        if process_proof::<H>(&hash, &proof) != self.root() {
            return Err(MerkleTreeError::CorruptTree(format!(
                "unable to prove value {}",
                value_index
            )));
        }
        Ok(proof)
    }

    /// Inclusion proof for `value`, located by its leaf hash.
    pub fn get_proof_for_value(&self, value: &[u8]) -> Result<Vec<Hash>> {
        self.get_proof(self.leaf_lookup(value)?)
    }

    /// Inclusion proofs for several values.
    pub fn get_proofs(&self, value_indices: &[usize]) -> Result<Vec<Vec<Hash>>> {
        value_indices.iter().map(|&i| self.get_proof(i)).collect()
    }

    /// Multiproof for the values at `value_indices`.
    ///
    /// Errors with [`EmptyProof`](MerkleTreeError::EmptyProof) for an empty
    /// set and [`DuplicateIndex`](MerkleTreeError::DuplicateIndex) (carrying
    /// the value index) for a repeated one.
    pub fn get_multi_proof(&self, value_indices: &[usize]) -> Result<ValueMultiProof> {
        if value_indices.is_empty() {
            return Err(MerkleTreeError::EmptyProof);
        }

        let mut by_tree_index: HashMap<usize, usize> = HashMap::with_capacity(value_indices.len());
        for &value_index in value_indices {
            let (tree_index, _) = self.validated_leaf(value_index)?;
            if by_tree_index.insert(tree_index, value_index).is_some() {
                return Err(MerkleTreeError::DuplicateIndex(value_index));
            }
        }

        let tree_indices: Vec<usize> = by_tree_index.keys().copied().collect();
        let multiproof = get_multi_proof(&self.tree, &tree_indices)?;
        if process_multi_proof::<H>(&multiproof)? != self.root() {
            return Err(MerkleTreeError::CorruptTree(format!(
                "unable to prove values {:?}",
                value_indices
            )));
        }

        // leaves come back in descending tree index order
        let mut ordered: Vec<usize> = tree_indices;
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        let values = ordered
            .iter()
            .map(|tree_index| self.values[by_tree_index[tree_index]].value.clone())
            .collect();

        Ok(ValueMultiProof { values, multiproof })
    }

    /// Multiproof for values, each located by its leaf hash.
    pub fn get_multi_proof_for_values<V: AsRef<[u8]>>(
        &self,
        values: &[V],
    ) -> Result<ValueMultiProof> {
        let indices = values
            .iter()
            .map(|value| self.leaf_lookup(value.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.get_multi_proof(&indices)
    }

    /// Check `proof` for the value at `value_index` against this tree's root.
    pub fn verify(&self, value_index: usize, proof: &[Hash]) -> Result<bool> {
        let (_, hash) = self.validated_leaf(value_index)?;
        Ok(process_proof::<H>(&hash, proof) == self.root())
    }

    /// Check a proof for a raw leaf hash against any root.
    pub fn verify_proof(root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
        process_proof::<H>(leaf, proof) == *root
    }

    /// Check a multiproof against this tree's root.
    pub fn verify_multi_proof(&self, multiproof: &MultiProof) -> Result<bool> {
        Self::verify_multi_proof_against(&self.root(), multiproof)
    }

    /// Check a multiproof against any root.
    pub fn verify_multi_proof_against(root: &Hash, multiproof: &MultiProof) -> Result<bool> {
        Ok(process_multi_proof::<H>(multiproof)? == *root)
    }

    /// Re-hash every value and every internal node.
    ///
    /// Errors with [`CorruptTree`](MerkleTreeError::CorruptTree) on the first
    /// mismatch.
    pub fn validate(&self) -> Result<()> {
        for value_index in 0..self.values.len() {
            self.validated_leaf(value_index)?;
        }
        if let Some(i) = first_invalid_node::<H>(&self.tree) {
            return Err(MerkleTreeError::CorruptTree(format!(
                "node {} does not match its children",
                i
            )));
        }
        Ok(())
    }

    /// ASCII rendering of the node array.
    pub fn render(&self) -> Result<String> {
        render_merkle_tree(&self.tree)
    }
}

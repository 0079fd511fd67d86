//! Tree construction over raw leaf hashes.
//!
//! Positions are indexed level-order: root=0, left child=2i+1, right
//! child=2i+2. A tree of `L` leaves has `2L - 1` positions and the leaves
//! occupy the last `L` of them, the first given leaf at the highest
//! index. No padding is added for odd leaf counts; the shape is whatever
//! heap the array arithmetic implies.

use tracing::debug;

use crate::{
    Hash, MerkleTreeError, Result,
    hash::{MerkleHasher, hash_pair, to_hex},
};

pub(crate) fn left_child_index(i: usize) -> usize {
    2 * i + 1
}

pub(crate) fn right_child_index(i: usize) -> usize {
    2 * i + 2
}

/// Parent of a non-root position.
pub(crate) fn parent_index(i: usize) -> usize {
    debug_assert!(i > 0, "root has no parent");
    (i - 1) / 2
}

/// Sibling of a non-root position: odd positions are left children.
pub(crate) fn sibling_index(i: usize) -> usize {
    debug_assert!(i > 0, "root has no siblings");
    if i % 2 == 1 { i + 1 } else { i - 1 }
}

pub(crate) fn is_tree_node(tree: &[Hash], i: usize) -> bool {
    i < tree.len()
}

pub(crate) fn is_internal_node(tree: &[Hash], i: usize) -> bool {
    is_tree_node(tree, left_child_index(i))
}

pub(crate) fn is_leaf_node(tree: &[Hash], i: usize) -> bool {
    is_tree_node(tree, i) && !is_internal_node(tree, i)
}

/// Number of leaves in a tree array of `2L - 1` positions.
pub(crate) fn leaf_count(tree: &[Hash]) -> usize {
    tree.len().div_ceil(2)
}

/// Error unless `i` is a leaf position of `tree`.
pub(crate) fn check_leaf_node(tree: &[Hash], i: usize) -> Result<()> {
    if is_leaf_node(tree, i) {
        Ok(())
    } else {
        Err(MerkleTreeError::IndexOutOfRange {
            index: i,
            len: leaf_count(tree),
        })
    }
}

/// Build the flat tree array from leaf hashes.
///
/// Leaf `i` lands at position `2L - 2 - i`; internal nodes are hashed from
/// position `L - 2` down to the root at `0`.
pub fn make_merkle_tree<H: MerkleHasher>(leaves: &[Hash]) -> Result<Vec<Hash>> {
    if leaves.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }

    let size = 2 * leaves.len() - 1;
    let mut tree = vec![[0u8; 32]; size];

    for (i, leaf) in leaves.iter().enumerate() {
        tree[size - 1 - i] = *leaf;
    }
    for i in (0..size - leaves.len()).rev() {
        tree[i] = hash_pair::<H>(&tree[left_child_index(i)], &tree[right_child_index(i)]);
    }

    debug!(
        leaves = leaves.len(),
        nodes = size,
        root = %to_hex(&tree[0]),
        "built merkle tree"
    );
    Ok(tree)
}

/// Check that every internal node is the pair hash of its children.
///
/// An empty array is not a valid tree.
pub fn is_valid_merkle_tree<H: MerkleHasher>(tree: &[Hash]) -> bool {
    first_invalid_node::<H>(tree).is_none() && !tree.is_empty()
}

/// Position of the first node that disagrees with its children, if any.
pub(crate) fn first_invalid_node<H: MerkleHasher>(tree: &[Hash]) -> Option<usize> {
    for (i, node) in tree.iter().enumerate() {
        let l = left_child_index(i);
        let r = right_child_index(i);
        if r >= tree.len() {
            // a node with only a left child cannot occur in a 2L - 1 array
            if l < tree.len() {
                return Some(i);
            }
        } else if *node != hash_pair::<H>(&tree[l], &tree[r]) {
            return Some(i);
        }
    }
    None
}

/// Render the tree as indented ASCII art, one node per line.
///
/// ```text
/// 0) 0x…
/// ├─ 1) 0x…
/// │  ├─ 3) 0x…
/// │  └─ 4) 0x…
/// └─ 2) 0x…
/// ```
pub fn render_merkle_tree(tree: &[Hash]) -> Result<String> {
    if tree.is_empty() {
        return Err(MerkleTreeError::EmptyInput);
    }

    // path entries: true = more siblings follow, false = last child
    let mut stack: Vec<(usize, Vec<bool>)> = vec![(0, Vec::new())];
    let mut lines = Vec::with_capacity(tree.len());

    while let Some((i, path)) = stack.pop() {
        let mut line = String::new();
        if let Some((last, init)) = path.split_last() {
            for &more in init {
                line.push_str(if more { "│  " } else { "   " });
            }
            line.push_str(if *last { "├─ " } else { "└─ " });
        }
        line.push_str(&format!("{}) {}", i, to_hex(&tree[i])));
        lines.push(line);

        if right_child_index(i) < tree.len() {
            let mut right_path = path.clone();
            right_path.push(false);
            stack.push((right_child_index(i), right_path));
            let mut left_path = path;
            left_path.push(true);
            stack.push((left_child_index(i), left_path));
        }
    }

    Ok(lines.join("\n"))
}

//! Merkle root over an ordered batch of transaction hashes.
//!
//! Leaves and interior nodes are hashed under different domains so a leaf can
//! never be mistaken for a node. A level with an odd number of nodes pairs its
//! last node with itself. The root of an empty batch is the zero hash.

use crate::crypto::Blake3Hash;

const LEAF_DOMAIN: &[u8] = b"ledgerline/merkle-leaf/v1";
const NODE_DOMAIN: &[u8] = b"ledgerline/merkle-node/v1";

fn leaf_hash(item: &Blake3Hash) -> Blake3Hash {
    Blake3Hash::hash_with_domain(LEAF_DOMAIN, item.as_bytes())
}

fn node_hash(left: &Blake3Hash, right: &Blake3Hash) -> Blake3Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left.as_bytes());
    data[32..].copy_from_slice(right.as_bytes());
    Blake3Hash::hash_with_domain(NODE_DOMAIN, &data)
}

/// Compute the root over `hashes`, preserving their order.
pub fn merkle_root(hashes: &[Blake3Hash]) -> Blake3Hash {
    if hashes.is_empty() {
        return Blake3Hash::ZERO;
    }

    let mut level: Vec<Blake3Hash> = hashes.iter().map(leaf_hash).collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let left = &pair[0];
                node_hash(left, pair.get(1).unwrap_or(left))
            })
            .collect();
    }
    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(n: usize) -> Vec<Blake3Hash> {
        (0..n).map(|i| Blake3Hash::hash(&[i as u8])).collect()
    }

    #[test]
    fn test_empty_root_is_zero() {
        assert_eq!(merkle_root(&[]), Blake3Hash::ZERO);
    }

    #[test]
    fn test_single_leaf() {
        let h = hashes(1);
        assert_eq!(merkle_root(&h), leaf_hash(&h[0]));
        assert_ne!(merkle_root(&h), h[0]);
    }

    #[test]
    fn test_two_leaves() {
        let h = hashes(2);
        let expected = node_hash(&leaf_hash(&h[0]), &leaf_hash(&h[1]));
        assert_eq!(merkle_root(&h), expected);
    }

    #[test]
    fn test_odd_level_duplicates_last() {
        let h = hashes(3);
        let (a, b, c) = (leaf_hash(&h[0]), leaf_hash(&h[1]), leaf_hash(&h[2]));
        let expected = node_hash(&node_hash(&a, &b), &node_hash(&c, &c));
        assert_eq!(merkle_root(&h), expected);
    }

    #[test]
    fn test_order_matters() {
        let mut h = hashes(4);
        let root = merkle_root(&h);
        h.swap(0, 3);
        assert_ne!(merkle_root(&h), root);
    }

    #[test]
    fn test_deterministic() {
        let h = hashes(7);
        assert_eq!(merkle_root(&h), merkle_root(&h.clone()));
    }
}

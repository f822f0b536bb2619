//! SHA-256, the compression function of the Merkle tree
//!
//! Everything goes through the `sha2` crate; the Merkleizer only ever hashes
//! 64-byte node pairs and 64-byte length mixins.

use crate::types::Hash;
use sha2::{Digest, Sha256};

/// SHA-256 hasher used for every tree node
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeHasher;

impl NodeHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash arbitrary data
    pub fn hash(&self, data: &[u8]) -> Hash {
        let digest = Sha256::digest(data);
        let mut result = [0u8; 32];
        result.copy_from_slice(&digest);
        result
    }

    /// Hash the concatenation of two 32-byte nodes
    #[inline]
    pub fn hash_concat(&self, left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        let digest = hasher.finalize();
        let mut result = [0u8; 32];
        result.copy_from_slice(&digest);
        result
    }
}

/// Convenience function for a single SHA-256 hash
pub fn sha256(data: &[u8]) -> Hash {
    NodeHasher::new().hash(data)
}

/// Convenience function for hashing two concatenated nodes
pub fn hash_concat(left: &Hash, right: &Hash) -> Hash {
    NodeHasher::new().hash_concat(left, right)
}

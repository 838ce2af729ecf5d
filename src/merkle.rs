//! Keccak-256 Merkle trees and inclusion proofs.
//!
//! Parents are `keccak256(left || right)`. Leaves are used as given (they are
//! already hashes). When a layer has an odd number of nodes the last node is
//! promoted to the next layer unchanged, so proofs for that node have no step
//! at that level.

use crate::encoding::to_bytes;
use crate::error::Error;
use crate::keccak_hash::{bytes_to_lowerhex, keccak256};
use crate::vc::{MerkleProofShare, Position};

/// A proof step with the sibling hash as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProofNode {
    pub position: Position,
    pub data: Vec<u8>,
}

fn hash_pair(left: &[u8], right: &[u8]) -> [u8; 32] {
    keccak256(&[left, right].concat())
}

/// Fold `proof` from `leaf` upward and compare the result with `root`.
pub fn verify_merkle_proof(proof: &[MerkleProofNode], leaf: &[u8], root: &[u8]) -> bool {
    let mut hash = leaf.to_vec();
    for node in proof {
        hash = match node.position {
            Position::Left => hash_pair(&node.data, &hash),
            Position::Right => hash_pair(&hash, &node.data),
        }
        .to_vec();
    }
    hash == root
}

#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<[u8; 32]>) -> Result<Self, Error> {
        if leaves.is_empty() {
            return Err(Error::EmptyMerkleTree);
        }
        let mut layers = vec![leaves];
        while let Some(layer) = layers.last().filter(|layer| layer.len() > 1) {
            let parent = layer
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            layers.push(parent);
        }
        Ok(MerkleTree { layers })
    }

    pub fn leaves(&self) -> &[[u8; 32]] {
        &self.layers[0]
    }

    pub fn root(&self) -> [u8; 32] {
        // `new` guarantees at least one layer, and the last layer holds one node.
        self.layers[self.layers.len() - 1][0]
    }

    pub fn root_hex(&self) -> String {
        bytes_to_lowerhex(&self.root())
    }

    /// Sibling path from `leaf` to the root. The first matching leaf is used.
    pub fn get_proof(&self, leaf: &[u8; 32]) -> Result<Vec<MerkleProofNode>, Error> {
        let mut index = self
            .leaves()
            .iter()
            .position(|candidate| candidate == leaf)
            .ok_or_else(|| Error::UnknownLeaf(bytes_to_lowerhex(leaf)))?;
        let mut proof = Vec::new();
        for layer in &self.layers[..self.layers.len() - 1] {
            let is_right = index % 2 == 1;
            let sibling = if is_right { index - 1 } else { index + 1 };
            if let Some(data) = layer.get(sibling) {
                proof.push(MerkleProofNode {
                    position: if is_right {
                        Position::Left
                    } else {
                        Position::Right
                    },
                    data: data.to_vec(),
                });
            }
            index /= 2;
        }
        Ok(proof)
    }
}

/// Hex-encode proof steps for transport.
pub fn format_merkle_proof_for_share(proof: &[MerkleProofNode]) -> Vec<MerkleProofShare> {
    proof
        .iter()
        .map(|node| MerkleProofShare {
            position: node.position,
            data: bytes_to_lowerhex(&node.data),
        })
        .collect()
}

/// Decode transported proof steps back to raw bytes.
pub fn format_merkle_proof_for_verify(
    proof: &[MerkleProofShare],
) -> Result<Vec<MerkleProofNode>, Error> {
    proof
        .iter()
        .map(|share| {
            Ok(MerkleProofNode {
                position: share.position,
                data: to_bytes(&share.data)?,
            })
        })
        .collect()
}

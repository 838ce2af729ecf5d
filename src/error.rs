use hex::FromHexError;
use k256::ecdsa::Error as EcdsaError;
use serde_json::Error as SerdeJSONError;

/// Failure of one of the primitive operations (hex decoding, hashing input
/// preparation, signature recovery, Merkle tree construction).
///
/// Document validation never surfaces these: a primitive failing inside a
/// rule makes that rule fail. See [`crate::validator::Verdict`].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Missing 0x prefix in hex string")]
    HexPrefix,
    #[error("Expected {expected} bytes, found {found}")]
    ByteLength { expected: usize, found: usize },
    #[error("Invalid recovery id: {0}")]
    RecoveryId(u8),
    #[error("Missing property: {0}")]
    MissingProperty(&'static str),
    #[error("Cannot build a Merkle tree without leaves")]
    EmptyMerkleTree,
    #[error("Leaf not found in Merkle tree: {0}")]
    UnknownLeaf(String),
    #[error(transparent)]
    Hex(#[from] FromHexError),
    #[error(transparent)]
    Ecdsa(#[from] EcdsaError),
    #[error(transparent)]
    SerdeJSON(#[from] SerdeJSONError),
}

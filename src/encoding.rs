//! Canonical JSON and hex byte conversions.
//!
//! Hashes and signatures are always computed over the output of
//! [`ordered_stringify`], so a document re-serialized by a different producer
//! still hashes to the same value as long as its JSON data model is unchanged.

use serde::Serialize;

use crate::error::Error;

/// Deterministic JSON serialization: object keys sorted, no insignificant
/// whitespace ([RFC 8785] JSON Canonicalization Scheme).
///
/// [RFC 8785]: https://www.rfc-editor.org/rfc/rfc8785
pub fn ordered_stringify<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    Ok(serde_jcs::to_string(value)?)
}

/// Decode a `0x`-prefixed hex string into bytes.
pub fn to_bytes(hex_str: &str) -> Result<Vec<u8>, Error> {
    let hex_str = hex_str.strip_prefix("0x").ok_or(Error::HexPrefix)?;
    Ok(hex::decode(hex_str)?)
}

/// Decode a `0x`-prefixed hex string that must hold exactly 32 bytes.
pub fn to_hash_bytes(hex_str: &str) -> Result<[u8; 32], Error> {
    let bytes = to_bytes(hex_str)?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| Error::ByteLength {
        expected: 32,
        found: bytes.len(),
    })
}

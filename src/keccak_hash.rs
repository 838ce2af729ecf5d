use k256::elliptic_curve::sec1::ToEncodedPoint;
use keccak_hash::keccak;

/// Length in hex digits of a 20-byte account address, without the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

pub fn bytes_to_lowerhex(bytes: &[u8]) -> String {
    "0x".to_string()
        + &bytes
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect::<String>()
}

/// Keccak-256 digest of raw bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    keccak(data).to_fixed_bytes()
}

/// Hash a UTF-8 message with Keccak-256, returning `0x`-prefixed lowercase hex.
///
/// No personal-message prefix is applied: the digest is over the message bytes
/// only. Every hash compared by the validators (leaf hashes, packed data,
/// credential hashes) goes through this function.
pub fn hash_message(msg: &str) -> String {
    bytes_to_lowerhex(&keccak256(msg.as_bytes()))
}

/// Compute a hash of a public key as an account address.
///
/// The hash is of the uncompressed public key without its leading tag byte
/// (64 bytes), using Keccak. The hash is truncated to the last 20 bytes,
/// lowercase-hex-encoded, and prefixed with "0x".
pub fn hash_public_key(pk: &k256::PublicKey) -> String {
    let pk_ec = pk.to_encoded_point(false);
    let pk_bytes = pk_ec.as_bytes();
    let hash = keccak256(&pk_bytes[1..65]);
    let hash_last20 = &hash[12..32];
    bytes_to_lowerhex(hash_last20)
}

/// Check that a string is a `0x`-prefixed, 20-byte hex address.
///
/// Mixed case is accepted without checking the EIP-55 checksum.
pub fn is_valid_address(addr: &str) -> bool {
    match addr.strip_prefix("0x") {
        Some(hex) => hex.len() == ADDRESS_HEX_LEN && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

//! secp256k1 signatures over 32-byte digests, in the `0x`-hex `r || s || v`
//! encoding produced by account wallets (`v` offset by 27).

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::encoding::to_bytes;
use crate::error::Error;
use crate::keccak_hash::{bytes_to_lowerhex, hash_public_key};

const SIGNATURE_LEN: usize = 65;

/// Recover the address that produced `signature` over the digest `hash`.
///
/// The recovery byte may be given either as 0/1 or as 27/28.
pub fn recover_hash_signer(hash: &[u8], signature: &str) -> Result<String, Error> {
    let signature = to_bytes(signature)?;
    if signature.len() != SIGNATURE_LEN {
        return Err(Error::ByteLength {
            expected: SIGNATURE_LEN,
            found: signature.len(),
        });
    }
    let sig = Signature::try_from(&signature[..64])?;
    let v = signature[64];
    let rec_id = RecoveryId::try_from(if v >= 27 { v - 27 } else { v })
        .map_err(|_| Error::RecoveryId(v))?;
    let recovered_key = VerifyingKey::recover_from_prehash(hash, &sig, rec_id)?;
    Ok(hash_public_key(&k256::PublicKey::from(&recovered_key)))
}

/// Sign the digest `hash`, returning the `0x`-hex `r || s || v` encoding
/// accepted by [`recover_hash_signer`].
pub fn sign_hash(hash: &[u8], key: &SigningKey) -> Result<String, Error> {
    let (sig, rec_id) = key.sign_prehash_recoverable(hash)?;
    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(rec_id.to_byte() + 27);
    Ok(bytes_to_lowerhex(&bytes))
}

/// Address controlled by a signing key.
pub fn signer_address(key: &SigningKey) -> String {
    hash_public_key(&k256::PublicKey::from(key.verifying_key()))
}

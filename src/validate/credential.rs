//! Verified data, credential proofs and verifiable credentials.
//!
//! Verified data comes in three shapes, selected by its `version` tag. Each
//! variant schema starts with the tag check itself, so a record carrying the
//! wrong tag fails on `version` whichever schema it is run against.

use serde_json::{json, Value};

use super::claim::{is_valid_claim_node, is_valid_legacy_data_node};
use super::fields::{
    is_non_empty_array_of, is_not_empty_string, is_optional_array_of_authorizations,
    is_valid_address, is_valid_hash, is_valid_position_string, is_valid_rfc3339_date_time,
    is_valid_signature_string, is_valid_stage_string,
};
use crate::encoding::{ordered_stringify, to_bytes};
use crate::error::Error;
use crate::keccak_hash::keccak256;
use crate::merkle::{format_merkle_proof_for_verify, verify_merkle_proof};
use crate::recovery::recover_hash_signer;
use crate::validator::Predicate::{Field, Record, Tag};
use crate::validator::{FailureKind, Invalid, Rule, Schema, Verdict};
use crate::vc::{
    CredentialProof, CredentialSubject, DataVersion, MerkleProofShare, VerifiableCredential,
    VerifiedData,
};

pub const PROOF_SHARE: Schema = Schema::new(
    "merkle proof share",
    &[
        Rule::new("position", &[Field(is_valid_position_string)], "Position is left or right"),
        Rule::new("data", &[Field(is_valid_hash)], "Sibling hash format"),
    ],
);

/// A non-empty array of well-formed proof steps.
pub fn is_valid_merkle_proof_array(value: &Value) -> bool {
    is_non_empty_array_of(value, |share| PROOF_SHARE.is_valid(share))
}

pub const VERIFIED_DATA_LEGACY: Schema = Schema::new(
    "legacy verified data",
    &[
        Rule::new("version", &[Tag("legacy")], "Version is legacy"),
        Rule::new("tx", &[Field(is_valid_hash)], "Transaction hash format"),
        Rule::new("layer2Hash", &[Field(is_valid_hash)], "Layer 2 hash format"),
        Rule::new("rootHash", &[Field(is_valid_hash)], "Root hash format"),
        Rule::new("rootHashNonce", &[Field(is_valid_hash)], "Root hash nonce format"),
        Rule::new("proof", &[Field(is_valid_merkle_proof_array)], "Merkle proof format"),
        Rule::new("stage", &[Field(is_valid_stage_string)], "Stage is known"),
        Rule::new("target", &[Field(is_valid_legacy_data_node)], "Target is a legacy data node"),
        Rule::new("attester", &[Field(is_valid_address)], "Attester address format"),
    ],
);

pub const VERIFIED_DATA_ON_CHAIN: Schema = Schema::new(
    "on-chain verified data",
    &[
        Rule::new("version", &[Tag("onChain")], "Version is onChain"),
        Rule::new("tx", &[Field(is_valid_hash)], "Transaction hash format"),
        Rule::new("layer2Hash", &[Field(is_valid_hash)], "Layer 2 hash format"),
        Rule::new("rootHash", &[Field(is_valid_hash)], "Root hash format"),
        Rule::new("rootHashNonce", &[Field(is_valid_hash)], "Root hash nonce format"),
        Rule::new("proof", &[Field(is_valid_merkle_proof_array)], "Merkle proof format"),
        Rule::new("stage", &[Field(is_valid_stage_string)], "Stage is known"),
        Rule::new("target", &[Field(is_valid_claim_node)], "Target is a signed claim node"),
        Rule::new("attester", &[Field(is_valid_address)], "Attester address format"),
    ],
);

pub const VERIFIED_DATA_BATCH: Schema = Schema::new(
    "batch verified data",
    &[
        Rule::new("version", &[Tag("batch")], "Version is batch"),
        Rule::new("batchLayer2Hash", &[Field(is_valid_hash)], "Batch layer 2 hash format"),
        Rule::new(
            "batchAttesterSig",
            &[
                Field(is_valid_signature_string),
                Record(validate_batch_attester_sig),
            ],
            "Batch attester signature recovers to the attester",
        ),
        Rule::new("subjectSig", &[Field(is_valid_signature_string)], "Subject signature format"),
        Rule::new("requestNonce", &[Field(is_valid_hash)], "Request nonce format"),
        Rule::new("layer2Hash", &[Field(is_valid_hash)], "Layer 2 hash format"),
        Rule::new("rootHash", &[Field(is_valid_hash)], "Root hash format"),
        Rule::new("rootHashNonce", &[Field(is_valid_hash)], "Root hash nonce format"),
        Rule::new("proof", &[Field(is_valid_merkle_proof_array)], "Merkle proof format"),
        Rule::new("stage", &[Field(is_valid_stage_string)], "Stage is known"),
        Rule::new("target", &[Field(is_valid_claim_node)], "Target is a signed claim node"),
        Rule::new("attester", &[Field(is_valid_address)], "Attester address format"),
        Rule::new("subject", &[Field(is_valid_address)], "Subject address format"),
    ],
);

/// Digest the attester signs to bind a batch to its subject: the canonical
/// form of `{"subject", "rootHash"}`, where `rootHash` is the layer 2 hash.
pub fn batch_attester_digest(subject: &Value, layer2_hash: &Value) -> Result<[u8; 32], Error> {
    let message = ordered_stringify(&json!({
        "subject": subject,
        "rootHash": layer2_hash,
    }))?;
    Ok(keccak256(message.as_bytes()))
}

fn validate_batch_attester_sig(value: &Value, record: &Value) -> Result<bool, Error> {
    let signature = value
        .as_str()
        .ok_or(Error::MissingProperty("batchAttesterSig"))?;
    let attester = record["attester"]
        .as_str()
        .ok_or(Error::MissingProperty("attester"))?;
    let digest = batch_attester_digest(&record["subject"], &record["layer2Hash"])?;
    let signer = recover_hash_signer(&digest, signature)?;
    Ok(signer.eq_ignore_ascii_case(attester))
}

/// Validate verified data against the schema its `version` tag selects.
///
/// A missing tag is reported as a missing `version`; a tag outside
/// `legacy`, `onChain` and `batch` (including `batchProof`) as an unknown
/// variant.
pub fn validate_verified_data(value: &Value) -> Verdict<VerifiedData> {
    let tag = match value.get("version") {
        Some(tag) => tag,
        None => return Verdict::Invalid(Invalid::missing("version")),
    };
    let schema = match tag.as_str().and_then(DataVersion::from_tag) {
        Some(DataVersion::Legacy) => VERIFIED_DATA_LEGACY,
        Some(DataVersion::OnChain) => VERIFIED_DATA_ON_CHAIN,
        Some(DataVersion::Batch) => VERIFIED_DATA_BATCH,
        Some(DataVersion::BatchProof) | None => {
            log::debug!("verified data: unsupported version {}", tag);
            return Verdict::Invalid(Invalid::new("version", FailureKind::UnknownVariant, tag));
        }
    };
    schema.validate(value)
}

pub fn is_valid_verified_data(value: &Value) -> bool {
    validate_verified_data(value).is_validated()
}

fn str_property<'a>(value: &'a Value, name: &'static str) -> Result<&'a str, Error> {
    value[name].as_str().ok_or(Error::MissingProperty(name))
}

/// Check that the Merkle proof in `data` leads from its target to its
/// `rootHash`.
///
/// The leaf is the hash of the target's signature text: `signedAttestation`
/// for legacy data and `attesterSig` otherwise.
pub fn verify_credential_merkle_proof(data: &Value) -> Result<bool, Error> {
    let signature = match data["version"].as_str().and_then(DataVersion::from_tag) {
        Some(DataVersion::Legacy) => str_property(&data["target"], "signedAttestation")?,
        Some(DataVersion::OnChain) | Some(DataVersion::Batch) => {
            str_property(&data["target"], "attesterSig")?
        }
        _ => return Ok(false),
    };
    let shares: Vec<MerkleProofShare> = serde_json::from_value(data["proof"].clone())?;
    let proof = format_merkle_proof_for_verify(&shares)?;
    let root = to_bytes(str_property(data, "rootHash")?)?;
    Ok(verify_merkle_proof(
        &proof,
        &keccak256(signature.as_bytes()),
        &root,
    ))
}

fn data_proves_target(value: &Value, _record: &Value) -> Result<bool, Error> {
    verify_credential_merkle_proof(value)
}

pub const CREDENTIAL_PROOF: Schema = Schema::new(
    "credential proof",
    &[
        Rule::new("type", &[Field(is_not_empty_string)], "Proof type is present"),
        Rule::new("created", &[Field(is_valid_rfc3339_date_time)], "Created is valid RFC3339 format"),
        Rule::new("creator", &[Field(is_valid_address)], "Creator address format"),
        Rule::new(
            "data",
            &[Field(is_valid_verified_data), Record(data_proves_target)],
            "Merkle proof passed validation",
        ),
    ],
);

pub fn validate_credential_proof(value: &Value) -> Verdict<CredentialProof> {
    CREDENTIAL_PROOF.validate(value)
}

pub fn is_valid_credential_proof(value: &Value) -> bool {
    CREDENTIAL_PROOF.is_valid(value)
}

pub const CREDENTIAL_SUBJECT: Schema = Schema::new(
    "credential subject",
    &[
        Rule::new("subject", &[Field(is_valid_address)], "Subject address format"),
        Rule::new("data", &[Field(is_not_empty_string)], "Subject data is present"),
        Rule::new(
            "authorization",
            &[Field(is_optional_array_of_authorizations)],
            "Authorization is an array",
        ),
    ],
);

pub fn validate_credential_subject(value: &Value) -> Verdict<CredentialSubject> {
    CREDENTIAL_SUBJECT.validate(value)
}

pub fn is_valid_credential_subject(value: &Value) -> bool {
    CREDENTIAL_SUBJECT.is_valid(value)
}

// The claim value in the proven target must be the one the credential
// presents.
fn proof_matches_subject(value: &Value, record: &Value) -> Result<bool, Error> {
    let data = &value["data"];
    let claim = match data["version"].as_str().and_then(DataVersion::from_tag) {
        Some(DataVersion::Legacy) => &data["target"]["attestationNode"]["data"]["data"],
        Some(DataVersion::OnChain) | Some(DataVersion::Batch) => {
            &data["target"]["claimNode"]["data"]["data"]
        }
        _ => return Ok(false),
    };
    let claim = claim.as_str().ok_or(Error::MissingProperty("data"))?;
    Ok(record["credentialSubject"]["data"].as_str() == Some(claim))
}

pub const VERIFIABLE_CREDENTIAL: Schema = Schema::new(
    "verifiable credential",
    &[
        Rule::new("id", &[Field(is_not_empty_string)], "Id is present"),
        Rule::new("type", &[Field(is_not_empty_string)], "Type is present"),
        Rule::new("issuer", &[Field(is_valid_address)], "Issuer address format"),
        Rule::new(
            "issuanceDate",
            &[Field(is_valid_rfc3339_date_time)],
            "Issuance date is valid RFC3339 format",
        ),
        Rule::new(
            "credentialSubject",
            &[Field(is_valid_credential_subject)],
            "Credential subject passed validation",
        ),
        Rule::new(
            "proof",
            &[Field(is_valid_credential_proof), Record(proof_matches_subject)],
            "Proof passed validation and matches the subject data",
        ),
    ],
);

pub fn validate_verifiable_credential(value: &Value) -> Verdict<VerifiableCredential> {
    VERIFIABLE_CREDENTIAL.validate(value)
}

pub fn is_valid_verifiable_credential(value: &Value) -> bool {
    VERIFIABLE_CREDENTIAL.is_valid(value)
}

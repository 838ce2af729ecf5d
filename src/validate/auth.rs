//! Signed authentication challenges.

use serde_json::Value;

use super::fields::{
    is_array_of_non_empty_strings, is_not_empty_string, is_valid_address,
    is_valid_rfc3339_date_time, is_valid_signature_string,
};
use crate::encoding::ordered_stringify;
use crate::error::Error;
use crate::keccak_hash::keccak256;
use crate::recovery::recover_hash_signer;
use crate::validator::Predicate::{Field, Literal, Record};
use crate::validator::{Rule, Schema, ValidationResponse, Verdict};
use crate::vc::{AuthProof, VerifiableAuth};

pub const AUTH_PROOF: Schema = Schema::new(
    "auth proof",
    &[
        Rule::new("type", &[Field(is_not_empty_string)], "Proof type is present"),
        Rule::new("created", &[Field(is_valid_rfc3339_date_time)], "Created is valid RFC3339 format"),
        Rule::new("creator", &[Field(is_valid_address)], "Creator address format"),
        Rule::new("nonce", &[Field(is_not_empty_string)], "Nonce is present"),
        Rule::new("domain", &[Field(is_not_empty_string)], "Domain is present"),
    ],
);

pub fn validate_auth_proof(value: &Value) -> Verdict<AuthProof> {
    AUTH_PROOF.validate(value)
}

pub fn is_valid_auth_proof(value: &Value) -> bool {
    AUTH_PROOF.is_valid(value)
}

fn validate_auth_signature(value: &Value, record: &Value) -> Result<bool, Error> {
    let signature = value.as_str().ok_or(Error::MissingProperty("signature"))?;
    let creator = record["proof"]["creator"]
        .as_str()
        .ok_or(Error::MissingProperty("creator"))?;
    let digest = keccak256(ordered_stringify(&record["proof"])?.as_bytes());
    let signer = recover_hash_signer(&digest, signature)?;
    Ok(signer.eq_ignore_ascii_case(creator))
}

pub const VERIFIABLE_AUTH: Schema = Schema::new(
    "verifiable auth",
    &[
        Rule::new("context", &[Field(is_array_of_non_empty_strings)], "Context is present"),
        Rule::new("type", &[Literal("VerifiableAuth")], "Type is VerifiableAuth"),
        Rule::new("proof", &[Field(is_valid_auth_proof)], "Proof passed validation"),
        Rule::new(
            "signature",
            &[Field(is_valid_signature_string), Record(validate_auth_signature)],
            "Signature matches the proof creator",
        ),
    ],
);

pub fn validate_verifiable_auth(value: &Value) -> Verdict<VerifiableAuth> {
    VERIFIABLE_AUTH.validate(value)
}

pub fn is_valid_verifiable_auth(value: &Value) -> bool {
    VERIFIABLE_AUTH.is_valid(value)
}

/// [`validate_verifiable_auth`] in the shape returned to HTTP clients.
pub fn validate_verifiable_auth_response(value: &Value) -> ValidationResponse<VerifiableAuth> {
    validate_verifiable_auth(value).into()
}

//! Verifiable presentations: a set of credentials shared under a proof signed
//! by the presenter.

use serde_json::Value;

use super::credential::is_valid_verifiable_credential;
use super::fields::{
    is_array_of_non_empty_strings, is_non_empty_array_of, is_not_empty_string, is_valid_address,
    is_valid_hash, is_valid_rfc3339_date_time, is_valid_signature_string,
};
use crate::encoding::{ordered_stringify, to_bytes};
use crate::error::Error;
use crate::keccak_hash::hash_message;
use crate::recovery::recover_hash_signer;
use crate::validator::Predicate::{Field, Literal, Record};
use crate::validator::{Rule, Schema, Verdict};
use crate::vc::{PresentationProof, VerifiableCredential, VerifiablePresentation};

fn hash_layer2_hashes(mut hashes: Vec<&str>) -> Result<String, Error> {
    hashes.sort_unstable();
    Ok(hash_message(&serde_json::to_string(&hashes)?))
}

/// Order-independent digest of a set of credentials: the hash of the JSON
/// array of their sorted `layer2Hash` values.
pub fn hash_credentials(credentials: &[VerifiableCredential]) -> Result<String, Error> {
    hash_layer2_hashes(
        credentials
            .iter()
            .map(|credential| credential.proof.data.layer2_hash())
            .collect(),
    )
}

/// [`hash_credentials`] over credentials that have not been converted to
/// their typed form.
pub fn hash_credential_values(credentials: &Value) -> Result<String, Error> {
    let credentials = credentials
        .as_array()
        .ok_or(Error::MissingProperty("verifiableCredential"))?;
    let hashes = credentials
        .iter()
        .map(|credential| {
            credential["proof"]["data"]["layer2Hash"]
                .as_str()
                .ok_or(Error::MissingProperty("layer2Hash"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    hash_layer2_hashes(hashes)
}

pub const PRESENTATION_PROOF: Schema = Schema::new(
    "presentation proof",
    &[
        Rule::new("type", &[Field(is_not_empty_string)], "Proof type is present"),
        Rule::new("created", &[Field(is_valid_rfc3339_date_time)], "Created is valid RFC3339 format"),
        Rule::new("creator", &[Field(is_valid_address)], "Creator address format"),
        Rule::new("nonce", &[Field(is_not_empty_string)], "Nonce is present"),
        Rule::new("domain", &[Field(is_not_empty_string)], "Domain is present"),
        Rule::new("credentialHash", &[Field(is_valid_hash)], "Credential hash format"),
    ],
);

pub fn validate_presentation_proof(value: &Value) -> Verdict<PresentationProof> {
    PRESENTATION_PROOF.validate(value)
}

pub fn is_valid_presentation_proof(value: &Value) -> bool {
    PRESENTATION_PROOF.is_valid(value)
}

fn is_array_of_verifiable_credentials(value: &Value) -> bool {
    is_non_empty_array_of(value, is_valid_verifiable_credential)
}

fn proof_matches_credential(value: &Value, record: &Value) -> Result<bool, Error> {
    let declared = value["credentialHash"]
        .as_str()
        .ok_or(Error::MissingProperty("credentialHash"))?;
    let computed = hash_credential_values(&record["verifiableCredential"])?;
    Ok(declared.eq_ignore_ascii_case(&computed))
}

fn packed_data_matches_proof(value: &Value, record: &Value) -> Result<bool, Error> {
    let packed_data = value.as_str().ok_or(Error::MissingProperty("packedData"))?;
    let computed = hash_message(&ordered_stringify(&record["proof"])?);
    Ok(packed_data.eq_ignore_ascii_case(&computed))
}

fn validate_presentation_signature(value: &Value, record: &Value) -> Result<bool, Error> {
    let signature = value.as_str().ok_or(Error::MissingProperty("signature"))?;
    let packed_data = record["packedData"]
        .as_str()
        .ok_or(Error::MissingProperty("packedData"))?;
    let creator = record["proof"]["creator"]
        .as_str()
        .ok_or(Error::MissingProperty("creator"))?;
    let signer = recover_hash_signer(&to_bytes(packed_data)?, signature)?;
    Ok(signer.eq_ignore_ascii_case(creator))
}

fn token_matches_proof(value: &Value, record: &Value) -> Result<bool, Error> {
    let token = value.as_str().ok_or(Error::MissingProperty("token"))?;
    let nonce = record["proof"]["nonce"]
        .as_str()
        .ok_or(Error::MissingProperty("nonce"))?;
    Ok(token.eq_ignore_ascii_case(nonce))
}

pub const VERIFIABLE_PRESENTATION: Schema = Schema::new(
    "verifiable presentation",
    &[
        Rule::new("context", &[Field(is_array_of_non_empty_strings)], "Context is present"),
        Rule::new("type", &[Literal("VerifiablePresentation")], "Type is VerifiablePresentation"),
        Rule::new(
            "verifiableCredential",
            &[Field(is_array_of_verifiable_credentials)],
            "Credentials passed validation",
        ),
        Rule::new(
            "proof",
            &[
                Field(is_valid_presentation_proof),
                Record(proof_matches_credential),
            ],
            "Proof passed validation and hashes the credentials",
        ),
        Rule::new(
            "packedData",
            &[Record(packed_data_matches_proof)],
            "Packed data is the hash of the proof",
        ),
        Rule::new(
            "signature",
            &[
                Field(is_valid_signature_string),
                Record(validate_presentation_signature),
            ],
            "Signature matches the proof creator",
        ),
        Rule::new("token", &[Record(token_matches_proof)], "Token matches the proof nonce"),
    ],
);

pub fn validate_verifiable_presentation(value: &Value) -> Verdict<VerifiablePresentation> {
    VERIFIABLE_PRESENTATION.validate(value)
}

pub fn is_valid_verifiable_presentation(value: &Value) -> bool {
    VERIFIABLE_PRESENTATION.is_valid(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::validator::FailureKind;
    use serde_json::json;

    fn presentation() -> Value {
        let credentials = vec![fixtures::batch_credential(), fixtures::on_chain_credential()];
        serde_json::to_value(&fixtures::presentation(credentials)).unwrap()
    }

    #[test]
    fn credential_hash_ignores_order() {
        let a = fixtures::batch_credential();
        let b = fixtures::on_chain_credential();
        assert_eq!(
            hash_credentials(&[a.clone(), b.clone()]).unwrap(),
            hash_credentials(&[b.clone(), a.clone()]).unwrap()
        );
        let values = serde_json::to_value(vec![b.clone(), a.clone()]).unwrap();
        assert_eq!(
            hash_credential_values(&values).unwrap(),
            hash_credentials(&[a, b]).unwrap()
        );
        assert!(hash_credential_values(&json!([{"proof": {}}])).is_err());
    }

    #[test]
    fn credential_hash_format() {
        let mut hashes = vec!["0xbb", "0xaa"];
        hashes.sort_unstable();
        assert_eq!(serde_json::to_string(&hashes).unwrap(), r#"["0xaa","0xbb"]"#);
        assert_eq!(
            hash_layer2_hashes(vec!["0xbb", "0xaa"]).unwrap(),
            hash_message(r#"["0xaa","0xbb"]"#)
        );
    }

    #[test]
    fn validated() {
        let presentation = presentation();
        let verdict = validate_verifiable_presentation(&presentation);
        let typed = verdict.into_result().unwrap();
        assert_eq!(typed.verifiable_credential.len(), 2);
        assert!(is_valid_presentation_proof(&presentation["proof"]));
    }

    #[test]
    fn cross_field_failures() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Value)>)> = vec![
            (
                "proof",
                Box::new(|p: &mut Value| {
                    p["verifiableCredential"].as_array_mut().unwrap().pop();
                }),
            ),
            (
                "packedData",
                Box::new(|p: &mut Value| {
                    p["packedData"] = p["proof"]["credentialHash"].clone();
                }),
            ),
            (
                "signature",
                Box::new(|p: &mut Value| {
                    let other = fixtures::key(fixtures::ATTESTER_KEY);
                    let packed = to_bytes(p["packedData"].as_str().unwrap()).unwrap();
                    p["signature"] = json!(crate::recovery::sign_hash(&packed, &other).unwrap());
                }),
            ),
            (
                "token",
                Box::new(|p: &mut Value| {
                    p["token"] = json!("0x00");
                }),
            ),
        ];
        for (field, mutate) in cases {
            let mut presentation = presentation();
            mutate(&mut presentation);
            let invalid = VERIFIABLE_PRESENTATION.check(&presentation).unwrap_err();
            assert_eq!(invalid.field, field);
            assert_eq!(invalid.failure, FailureKind::CrossFieldMismatch);
        }
    }

    #[test]
    fn structural_failures() {
        let mut wrong_type = presentation();
        wrong_type["type"] = json!("VerifiableAuth");
        let invalid = VERIFIABLE_PRESENTATION.check(&wrong_type).unwrap_err();
        assert_eq!(invalid.field, "type");
        assert_eq!(invalid.failure, FailureKind::FormatInvalid);

        let mut empty = presentation();
        empty["verifiableCredential"] = json!([]);
        assert_eq!(
            VERIFIABLE_PRESENTATION.check(&empty).unwrap_err().field,
            "verifiableCredential"
        );

        let mut no_token = presentation();
        no_token.as_object_mut().unwrap().remove("token");
        assert_eq!(
            validate_verifiable_presentation(&no_token).into_result().unwrap_err().message,
            "Missing token"
        );
    }

    #[test]
    fn hex_case_is_ignored() {
        let mut presentation = presentation();
        for field in ["packedData", "signature", "token"] {
            let upper = presentation[field]
                .as_str()
                .unwrap()
                .to_uppercase()
                .replacen("0X", "0x", 1);
            presentation[field] = json!(upper);
        }
        assert!(is_valid_verifiable_presentation(&presentation));
    }
}

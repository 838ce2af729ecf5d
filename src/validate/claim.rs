//! Structure of the attested payloads carried in `target`.

use serde_json::Value;

use super::fields::{
    is_not_empty_string, is_valid_address, is_valid_hash, is_valid_rfc3339_date_time,
    is_valid_signature_string,
};
use crate::validator::Predicate::Field;
use crate::validator::{Rule, Schema};

pub const CLAIM_DATA: Schema = Schema::new(
    "claim data",
    &[
        Rule::new("data", &[Field(is_not_empty_string)], "Claim data is present"),
        Rule::new("nonce", &[Field(is_valid_hash)], "Claim data nonce format"),
        Rule::new("version", &[Field(is_not_empty_string)], "Claim data version is present"),
    ],
);

pub const CLAIM_TYPE: Schema = Schema::new(
    "claim type",
    &[
        Rule::new("type", &[Field(is_not_empty_string)], "Claim type is present"),
        Rule::new("nonce", &[Field(is_valid_hash)], "Claim type nonce format"),
    ],
);

pub const ISSUANCE: Schema = Schema::new(
    "issuance",
    &[
        Rule::new(
            "localRevocationToken",
            &[Field(is_valid_hash)],
            "Local revocation token format",
        ),
        Rule::new(
            "globalRevocationToken",
            &[Field(is_valid_hash)],
            "Global revocation token format",
        ),
        Rule::new("dataHash", &[Field(is_valid_hash)], "Data hash format"),
        Rule::new("typeHash", &[Field(is_valid_hash)], "Type hash format"),
        Rule::new(
            "issuanceDate",
            &[Field(is_valid_rfc3339_date_time)],
            "Issuance date is valid RFC3339 format",
        ),
        Rule::new(
            "expirationDate",
            &[Field(is_valid_rfc3339_date_time)],
            "Expiration date is valid RFC3339 format",
        ),
    ],
);

fn is_valid_claim_data(value: &Value) -> bool {
    CLAIM_DATA.is_valid(value)
}

fn is_valid_claim_type(value: &Value) -> bool {
    CLAIM_TYPE.is_valid(value)
}

fn is_valid_issuance(value: &Value) -> bool {
    ISSUANCE.is_valid(value)
}

pub const CLAIM_NODE: Schema = Schema::new(
    "claim node",
    &[
        Rule::new("data", &[Field(is_valid_claim_data)], "Claim data passed validation"),
        Rule::new("type", &[Field(is_valid_claim_type)], "Claim type passed validation"),
        Rule::new("aux", &[Field(is_valid_hash)], "Aux hash format"),
        Rule::new("issuance", &[Field(is_valid_issuance)], "Issuance passed validation"),
    ],
);

fn is_valid_unsigned_claim_node(value: &Value) -> bool {
    CLAIM_NODE.is_valid(value)
}

pub const SIGNED_CLAIM_NODE: Schema = Schema::new(
    "signed claim node",
    &[
        Rule::new(
            "claimNode",
            &[Field(is_valid_unsigned_claim_node)],
            "Claim node passed validation",
        ),
        Rule::new("attester", &[Field(is_valid_address)], "Attester address format"),
        Rule::new(
            "attesterSig",
            &[Field(is_valid_signature_string)],
            "Attester signature format",
        ),
    ],
);

pub const ATTESTATION_NODE: Schema = Schema::new(
    "attestation node",
    &[
        Rule::new("data", &[Field(is_valid_claim_data)], "Attestation data passed validation"),
        Rule::new("type", &[Field(is_valid_claim_type)], "Attestation type passed validation"),
        Rule::new("aux", &[Field(is_valid_hash)], "Aux hash format"),
    ],
);

fn is_valid_attestation_node(value: &Value) -> bool {
    ATTESTATION_NODE.is_valid(value)
}

pub const LEGACY_DATA_NODE: Schema = Schema::new(
    "legacy data node",
    &[
        Rule::new(
            "attestationNode",
            &[Field(is_valid_attestation_node)],
            "Attestation node passed validation",
        ),
        Rule::new(
            "signedAttestation",
            &[Field(is_valid_signature_string)],
            "Signed attestation format",
        ),
    ],
);

/// Target of the on-chain and batch data versions.
pub fn is_valid_claim_node(value: &Value) -> bool {
    SIGNED_CLAIM_NODE.is_valid(value)
}

/// Target of the legacy data version.
pub fn is_valid_legacy_data_node(value: &Value) -> bool {
    LEGACY_DATA_NODE.is_valid(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signed_claim_node() -> Value {
        json!({
            "claimNode": {
                "data": {
                    "data": "{\"lastupdated\":\"2019-09-17\",\"source\":\"2\",\"classification\":\"C\",\"value\":\"myinfotesting@gmail.com\"}",
                    "nonce": "0x11fae6c815db249290ae59268feb09207f3c91da64da6d7cfaa3c5ca6452d1e8",
                    "version": "3.0.0"
                },
                "type": {
                    "type": "email",
                    "provider": "NDI",
                    "nonce": "0x3c4c524b8c99ca2be8105b66e053f29540b128d78fefdd2f4a05b38c81ee5027"
                },
                "aux": "0xe1b4bcfc7d057e71bb1a494c638205af5b5e6c35a846c21d3c95cd76cb9b7af9",
                "issuance": {
                    "localRevocationToken": "0xc8fa244fe2ea038099aaaddbe76f5d9c15a0095e909785d7684662c9a7fe511f",
                    "globalRevocationToken": "0xa3c5b2d6e93f8298b8cbe18119913e6ebc1d302a399d03db7a1eba13cd98ea14",
                    "dataHash": "0xf3d64565b745d9957e3e5017e93f52acb2efa650932d89504f4b7ca528c126e4",
                    "typeHash": "0x238d2cd9e0c60dfda85d7146210858bcd7812289d60694d368e465b5c6f96428",
                    "issuanceDate": "2018-02-01T00:00:00.000Z",
                    "expirationDate": "2020-02-01T00:00:00.000Z"
                }
            },
            "attester": "0x627306090abab3a6e1400e9345bc60c78a8bef57",
            "attesterSig": "0xd589aa56d08967c66967a3a6b9ad69deedbf959f8616add43b87a4c1ad52d3392c8bf391c3e41988b6ea936609f6eb51dea693d1d2a5ddcd8dd1d47dc233b1201c"
        })
    }

    #[test]
    fn signed_claim_node_shape() {
        let node = signed_claim_node();
        assert!(is_valid_claim_node(&node));
        assert!(!is_valid_legacy_data_node(&node));

        let mut no_provider = node.clone();
        no_provider["claimNode"]["type"]
            .as_object_mut()
            .unwrap()
            .remove("provider");
        assert!(is_valid_claim_node(&no_provider));

        let mut bad_date = node.clone();
        bad_date["claimNode"]["issuance"]["expirationDate"] = json!("2020-02-01");
        assert!(!is_valid_claim_node(&bad_date));

        let mut bad_sig = node.clone();
        bad_sig["attesterSig"] = json!("0x1234");
        assert_eq!(
            SIGNED_CLAIM_NODE.check(&bad_sig).unwrap_err().field,
            "attesterSig"
        );

        let mut no_aux = node;
        no_aux["claimNode"].as_object_mut().unwrap().remove("aux");
        assert_eq!(SIGNED_CLAIM_NODE.check(&no_aux).unwrap_err().field, "claimNode");
        assert_eq!(
            CLAIM_NODE.check(&no_aux["claimNode"]).unwrap_err().message,
            "Missing aux"
        );
    }

    #[test]
    fn legacy_data_node_shape() {
        let claim = signed_claim_node();
        let node = json!({
            "attestationNode": {
                "data": claim["claimNode"]["data"],
                "type": claim["claimNode"]["type"],
                "aux": claim["claimNode"]["aux"]
            },
            "signedAttestation": claim["attesterSig"]
        });
        assert!(is_valid_legacy_data_node(&node));
        assert!(!is_valid_claim_node(&node));

        let mut empty_data = node;
        empty_data["attestationNode"]["data"]["data"] = json!("");
        assert!(!is_valid_legacy_data_node(&empty_data));
    }
}

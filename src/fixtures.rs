//! Deterministic documents signed with well-known development keys.

use k256::ecdsa::SigningKey;
use serde_json::{json, Value};

use crate::build::{
    auth_digest, build_auth_proof, build_batch_credential, build_on_chain_credential,
    build_presentation_proof, build_verifiable_auth, build_verifiable_presentation,
    merkle_tree_from_components, presentation_packed_data,
};
use crate::encoding::{ordered_stringify, to_bytes};
use crate::keccak_hash::{hash_message, keccak256};
use crate::merkle::{format_merkle_proof_for_share, MerkleTree};
use crate::recovery::{sign_hash, signer_address};
use crate::vc::{
    BatchMerkleTreeComponents, ClaimData, ClaimNode, ClaimType, Issuance, MerkleTreeComponents,
    SignedClaimNode, Stage, VerifiableAuth, VerifiableCredential, VerifiablePresentation,
};

pub const ATTESTER_KEY: &str = "c87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";
pub const SUBJECT_KEY: &str = "ae6ae8e5ccbfb04590405997ee2d52d2b330726137b875053c36d94e974d162f";
pub const DOMAIN: &str = "https://bloom.co/receiveData";

const CLAIMS: [(&str, &str); 5] = [
    (
        "full-name",
        r#"{"lastupdated":"2019-09-17","source":"1","classification":"C","value":"TAN XIAO HUI"}"#,
    ),
    (
        "address",
        r#"{"country":{"code":"SG","desc":"SINGAPORE"},"unit":{"value":"128"},"street":{"value":"BEDOK NORTH AVENUE 4"},"lastupdated":"2019-09-17","block":{"value":"102"},"source":"2","postal":{"value":"460102"},"classification":"C","floor":{"value":"9"},"type":"SG","building":{"value":"PEARL GARDEN"}}"#,
    ),
    (
        "email",
        r#"{"lastupdated":"2019-09-17","source":"2","classification":"C","value":"myinfotesting@gmail.com"}"#,
    ),
    (
        "phone",
        r#"{"lastupdated":"2019-09-17","source":"2","classification":"C","areacode":{"value":"65"},"prefix":{"value":"+"},"nbr":{"value":"97399245"}}"#,
    ),
    (
        "income",
        r#"{"lastupdated":"2019-09-17","high":{"value":4999},"source":"2","classification":"C","low":{"value":4000}}"#,
    ),
];

pub fn key(hex_str: &str) -> SigningKey {
    SigningKey::from_slice(&hex::decode(hex_str).unwrap()).unwrap()
}

pub fn attester_address() -> String {
    signer_address(&key(ATTESTER_KEY))
}

pub fn subject_address() -> String {
    signer_address(&key(SUBJECT_KEY))
}

fn sign_text(text: &str, signer: &SigningKey) -> String {
    sign_hash(&keccak256(text.as_bytes()), signer).unwrap()
}

pub fn claim_node(kind: &str, value: &str) -> SignedClaimNode {
    let attester = key(ATTESTER_KEY);
    let data = ClaimData {
        data: value.to_string(),
        nonce: hash_message(&format!("{}/data", kind)),
        version: "3.0.0".to_string(),
    };
    let type_ = ClaimType {
        type_: kind.to_string(),
        provider: Some("NDI".to_string()),
        nonce: hash_message(&format!("{}/type", kind)),
    };
    let issuance = Issuance {
        local_revocation_token: hash_message(&format!("{}/revocation", kind)),
        global_revocation_token: hash_message("global-revocation"),
        data_hash: hash_message(&ordered_stringify(&data).unwrap()),
        type_hash: hash_message(&ordered_stringify(&type_).unwrap()),
        issuance_date: "2018-02-01T00:00:00.000Z".to_string(),
        expiration_date: "2020-02-01T00:00:00.000Z".to_string(),
    };
    let claim_node = ClaimNode {
        data,
        type_,
        aux: hash_message(&format!("{}/aux", kind)),
        issuance,
    };
    let attester_sig = sign_text(&ordered_stringify(&claim_node).unwrap(), &attester);
    SignedClaimNode {
        claim_node,
        attester: signer_address(&attester),
        attester_sig,
    }
}

pub fn claim_nodes() -> Vec<SignedClaimNode> {
    CLAIMS
        .iter()
        .map(|(kind, value)| claim_node(kind, value))
        .collect()
}

fn padding_nodes() -> Vec<String> {
    (0..10).map(|i| hash_message(&format!("padding/{}", i))).collect()
}

pub fn on_chain_components() -> MerkleTreeComponents {
    let attester = key(ATTESTER_KEY);
    let mut components = MerkleTreeComponents {
        layer2_hash: String::new(),
        root_hash: String::new(),
        root_hash_nonce: hash_message("root-nonce"),
        attester: signer_address(&attester),
        checksum_sig: sign_text("checksum", &attester),
        claim_nodes: claim_nodes(),
        padding_nodes: padding_nodes(),
    };
    components.root_hash = merkle_tree_from_components(&components).unwrap().root_hex();
    components.layer2_hash = hash_message(
        &ordered_stringify(&json!({
            "attester": components.attester,
            "rootHash": components.root_hash,
        }))
        .unwrap(),
    );
    components
}

/// Five NDI claims attested in one batch by the attester development key and
/// countersigned by the subject development key.
pub fn batch_components() -> BatchMerkleTreeComponents {
    serde_json::from_str(include_str!("../tests/ndi-batch-components.json")).unwrap()
}

/// Credential over the income claim of [`batch_components`].
pub fn batch_credential() -> VerifiableCredential {
    let components = batch_components();
    let target = components.claim_nodes[4].clone();
    build_batch_credential(vec![], Stage::Mainnet, &components, &target).unwrap()
}

/// Credential over the email claim of [`on_chain_components`].
pub fn on_chain_credential() -> VerifiableCredential {
    let components = on_chain_components();
    let target = components.claim_nodes[2].clone();
    build_on_chain_credential(
        &subject_address(),
        vec![],
        &hash_message("tx"),
        Stage::Rinkeby,
        &components,
        &target,
    )
    .unwrap()
}

/// Legacy verified data whose tree holds three signed attestations.
pub fn legacy_verified_data() -> Value {
    let attester = key(ATTESTER_KEY);
    let node = claim_node("email", CLAIMS[2].1);
    let signatures: Vec<String> = ["first", "second", "third"]
        .iter()
        .map(|text| sign_text(text, &attester))
        .collect();
    let tree = MerkleTree::new(
        signatures
            .iter()
            .map(|signature| keccak256(signature.as_bytes()))
            .collect(),
    )
    .unwrap();
    let proof = tree
        .get_proof(&keccak256(signatures[1].as_bytes()))
        .unwrap();
    json!({
        "version": "legacy",
        "tx": hash_message("legacy-tx"),
        "layer2Hash": hash_message("legacy-layer2"),
        "rootHash": tree.root_hex(),
        "rootHashNonce": hash_message("legacy-nonce"),
        "proof": format_merkle_proof_for_share(&proof),
        "stage": "local",
        "target": {
            "attestationNode": {
                "data": node.claim_node.data,
                "type": node.claim_node.type_,
                "aux": node.claim_node.aux,
            },
            "signedAttestation": signatures[1],
        },
        "attester": signer_address(&attester),
    })
}

/// Credential over [`legacy_verified_data`], presenting the attested email
/// claim.
pub fn legacy_credential() -> Value {
    let data = legacy_verified_data();
    json!({
        "id": "placeholder",
        "type": "email",
        "issuer": attester_address(),
        "issuanceDate": "2018-02-01T00:00:00.000Z",
        "credentialSubject": {
            "subject": subject_address(),
            "data": data["target"]["attestationNode"]["data"]["data"].clone(),
            "authorization": [],
        },
        "proof": {
            "type": "Bloom-Legacy-Proof-1.0.0",
            "created": "2018-02-01T00:00:00.000Z",
            "creator": attester_address(),
            "data": data,
        },
    })
}

pub fn presentation(credentials: Vec<VerifiableCredential>) -> VerifiablePresentation {
    let subject = key(SUBJECT_KEY);
    let token = hash_message("presentation-token");
    let proof =
        build_presentation_proof(&signer_address(&subject), &token, DOMAIN, &credentials).unwrap();
    let packed_data = presentation_packed_data(&proof).unwrap();
    let signature = sign_hash(&to_bytes(&packed_data).unwrap(), &subject).unwrap();
    build_verifiable_presentation(&token, credentials, proof, &signature).unwrap()
}

pub fn auth() -> VerifiableAuth {
    let subject = key(SUBJECT_KEY);
    let proof = build_auth_proof(&signer_address(&subject), &hash_message("auth-nonce"), DOMAIN);
    let signature = sign_hash(&auth_digest(&proof).unwrap(), &subject).unwrap();
    build_verifiable_auth(proof, &signature)
}

#[test]
fn development_keys() {
    assert_eq!(attester_address(), "0x627306090abab3a6e1400e9345bc60c78a8bef57");
    assert_eq!(subject_address(), "0xf17f52151ebef6c7334fad080c5704d77216b732");
}

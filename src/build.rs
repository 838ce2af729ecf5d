//! Assembly of credentials, presentations and auth documents from attested
//! data. Builders do not validate what they produce; run the result through
//! the matching validator before trusting it.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::encoding::{ordered_stringify, to_hash_bytes};
use crate::error::Error;
use crate::keccak_hash::{hash_message, keccak256};
use crate::merkle::{format_merkle_proof_for_share, MerkleTree};
use crate::validate::hash_credentials;
use crate::vc::{
    AuthProof, BatchMerkleTreeComponents, CredentialProof, CredentialSubject,
    MerkleProofShare, MerkleTreeComponents, PresentationProof, SignedClaimNode, Stage,
    VerifiableAuth, VerifiableCredential, VerifiablePresentation, VerifiedData,
    VerifiedDataBatch, VerifiedDataOnChain,
};

pub const ON_CHAIN_PROOF_TYPE: &str = "Bloom-On-Chain-Proof-1.0.0";
pub const BATCH_PROOF_TYPE: &str = "Bloom-Batch-Proof-1.0.0";
pub const PRESENTATION_PROOF_TYPE: &str = "Bloom-Presentation-1.0.0";
pub const AUTH_PROOF_TYPE: &str = "Bloom-Auth-1.0.0";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";
pub const VERIFIABLE_AUTH_TYPE: &str = "VerifiableAuth";
pub const PLACEHOLDER_ID: &str = "placeholder";
pub const PLACEHOLDER_CONTEXT: &str = "placeholder";

/// The parts of an attestation tree the leaves are derived from.
pub trait TreeComponents {
    fn claim_nodes(&self) -> &[SignedClaimNode];
    fn checksum_sig(&self) -> &str;
    fn padding_nodes(&self) -> &[String];
}

impl TreeComponents for MerkleTreeComponents {
    fn claim_nodes(&self) -> &[SignedClaimNode] {
        &self.claim_nodes
    }

    fn checksum_sig(&self) -> &str {
        &self.checksum_sig
    }

    fn padding_nodes(&self) -> &[String] {
        &self.padding_nodes
    }
}

impl TreeComponents for BatchMerkleTreeComponents {
    fn claim_nodes(&self) -> &[SignedClaimNode] {
        &self.claim_nodes
    }

    fn checksum_sig(&self) -> &str {
        &self.checksum_sig
    }

    fn padding_nodes(&self) -> &[String] {
        &self.padding_nodes
    }
}

fn signature_leaf(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// Rebuild the attestation tree. The leaves are the hashes of each claim node
/// signature and of the checksum signature, plus the padding nodes, sorted in
/// byte order before the tree is built.
pub fn merkle_tree_from_components<C: TreeComponents + ?Sized>(
    components: &C,
) -> Result<MerkleTree, Error> {
    let mut leaves: Vec<[u8; 32]> = components
        .claim_nodes()
        .iter()
        .map(|node| signature_leaf(&node.attester_sig))
        .collect();
    leaves.push(signature_leaf(components.checksum_sig()));
    for padding in components.padding_nodes() {
        leaves.push(to_hash_bytes(padding)?);
    }
    leaves.sort_unstable();
    MerkleTree::new(leaves)
}

fn target_proof<C: TreeComponents + ?Sized>(
    components: &C,
    target: &SignedClaimNode,
) -> Result<Vec<MerkleProofShare>, Error> {
    let tree = merkle_tree_from_components(components)?;
    let proof = tree.get_proof(&signature_leaf(&target.attester_sig))?;
    Ok(format_merkle_proof_for_share(&proof))
}

pub fn build_on_chain_credential_proof(
    tx: &str,
    stage: Stage,
    components: &MerkleTreeComponents,
    target: &SignedClaimNode,
) -> Result<CredentialProof, Error> {
    Ok(CredentialProof {
        type_: ON_CHAIN_PROOF_TYPE.to_string(),
        created: target.claim_node.issuance.issuance_date.clone(),
        creator: components.attester.clone(),
        data: VerifiedData::OnChain(VerifiedDataOnChain {
            tx: tx.to_string(),
            layer2_hash: components.layer2_hash.clone(),
            root_hash: components.root_hash.clone(),
            root_hash_nonce: components.root_hash_nonce.clone(),
            proof: target_proof(components, target)?,
            stage,
            target: target.clone(),
            attester: components.attester.clone(),
        }),
    })
}

pub fn build_on_chain_credential(
    subject: &str,
    authorization: Vec<Value>,
    tx: &str,
    stage: Stage,
    components: &MerkleTreeComponents,
    target: &SignedClaimNode,
) -> Result<VerifiableCredential, Error> {
    Ok(VerifiableCredential {
        id: PLACEHOLDER_ID.to_string(),
        type_: target.claim_node.type_.type_.clone(),
        issuer: components.attester.clone(),
        issuance_date: target.claim_node.issuance.issuance_date.clone(),
        credential_subject: CredentialSubject {
            subject: subject.to_string(),
            data: target.claim_node.data.data.clone(),
            authorization,
        },
        proof: build_on_chain_credential_proof(tx, stage, components, target)?,
    })
}

pub fn build_batch_credential_proof(
    stage: Stage,
    components: &BatchMerkleTreeComponents,
    target: &SignedClaimNode,
) -> Result<CredentialProof, Error> {
    Ok(CredentialProof {
        type_: BATCH_PROOF_TYPE.to_string(),
        created: target.claim_node.issuance.issuance_date.clone(),
        creator: components.attester.clone(),
        data: VerifiedData::Batch(VerifiedDataBatch {
            batch_layer2_hash: components.batch_layer2_hash.clone(),
            batch_attester_sig: components.batch_attester_sig.clone(),
            subject_sig: components.subject_sig.clone(),
            request_nonce: components.request_nonce.clone(),
            layer2_hash: components.layer2_hash.clone(),
            root_hash: components.root_hash.clone(),
            root_hash_nonce: components.root_hash_nonce.clone(),
            proof: target_proof(components, target)?,
            stage,
            target: target.clone(),
            attester: components.attester.clone(),
            subject: components.subject.clone(),
        }),
    })
}

/// Credential over a batch attestation. The subject is the one who
/// countersigned the batch.
pub fn build_batch_credential(
    authorization: Vec<Value>,
    stage: Stage,
    components: &BatchMerkleTreeComponents,
    target: &SignedClaimNode,
) -> Result<VerifiableCredential, Error> {
    Ok(VerifiableCredential {
        id: PLACEHOLDER_ID.to_string(),
        type_: target.claim_node.type_.type_.clone(),
        issuer: components.attester.clone(),
        issuance_date: target.claim_node.issuance.issuance_date.clone(),
        credential_subject: CredentialSubject {
            subject: components.subject.clone(),
            data: target.claim_node.data.data.clone(),
            authorization,
        },
        proof: build_batch_credential_proof(stage, components, target)?,
    })
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn build_presentation_proof(
    creator: &str,
    nonce: &str,
    domain: &str,
    credentials: &[VerifiableCredential],
) -> Result<PresentationProof, Error> {
    Ok(PresentationProof {
        type_: PRESENTATION_PROOF_TYPE.to_string(),
        created: now(),
        creator: creator.to_string(),
        nonce: nonce.to_string(),
        domain: domain.to_string(),
        credential_hash: hash_credentials(credentials)?,
    })
}

/// Digest the presenter signs: the hash of the canonical form of `proof`.
pub fn presentation_packed_data(proof: &PresentationProof) -> Result<String, Error> {
    Ok(hash_message(&ordered_stringify(proof)?))
}

pub fn build_verifiable_presentation(
    token: &str,
    credentials: Vec<VerifiableCredential>,
    proof: PresentationProof,
    signature: &str,
) -> Result<VerifiablePresentation, Error> {
    Ok(VerifiablePresentation {
        context: vec![PLACEHOLDER_CONTEXT.to_string()],
        type_: VERIFIABLE_PRESENTATION_TYPE.to_string(),
        verifiable_credential: credentials,
        packed_data: presentation_packed_data(&proof)?,
        proof,
        signature: signature.to_string(),
        token: token.to_string(),
    })
}

pub fn build_auth_proof(creator: &str, nonce: &str, domain: &str) -> AuthProof {
    AuthProof {
        type_: AUTH_PROOF_TYPE.to_string(),
        created: now(),
        creator: creator.to_string(),
        nonce: nonce.to_string(),
        domain: domain.to_string(),
    }
}

/// Digest an auth signer signs: the keccak-256 of the canonical form of
/// `proof`.
pub fn auth_digest(proof: &AuthProof) -> Result<[u8; 32], Error> {
    Ok(keccak256(ordered_stringify(proof)?.as_bytes()))
}

pub fn build_verifiable_auth(proof: AuthProof, signature: &str) -> VerifiableAuth {
    VerifiableAuth {
        context: vec![PLACEHOLDER_CONTEXT.to_string()],
        type_: VERIFIABLE_AUTH_TYPE.to_string(),
        proof,
        signature: signature.to_string(),
    }
}

/// 32 random bytes as `0x` hex, for presentation tokens and auth nonces.
#[cfg(feature = "rand")]
pub fn generate_nonce() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    crate::keccak_hash::bytes_to_lowerhex(&bytes)
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ********************************************
// * Data structures for Merkle-anchored
// * verifiable credentials and presentations
// ********************************************
// Dates are kept as the exact RFC3339 strings that were received or built:
// proofs are hashed over their JSON text, so re-rendering a timestamp would
// change the digest.

/// Side on which a sibling hash sits when folding a Merkle proof.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
}

/// One step of a Merkle inclusion proof, with the sibling hash as `0x` hex so
/// that it survives JSON transport.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MerkleProofShare {
    pub position: Position,
    pub data: String,
}

/// Network on which the anchoring transaction can be found.
///
/// Only these three values are accepted; `ropsten` is not.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Mainnet,
    Rinkeby,
    Local,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Mainnet, Stage::Rinkeby, Stage::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Mainnet => "mainnet",
            Stage::Rinkeby => "rinkeby",
            Stage::Local => "local",
        }
    }
}

/// Discriminant of [`VerifiedData`].
///
/// `BatchProof` exists in the wire vocabulary but no verified-data schema
/// accepts it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DataVersion {
    Legacy,
    OnChain,
    Batch,
    BatchProof,
}

impl DataVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataVersion::Legacy => "legacy",
            DataVersion::OnChain => "onChain",
            DataVersion::Batch => "batch",
            DataVersion::BatchProof => "batchProof",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "legacy" => Some(DataVersion::Legacy),
            "onChain" => Some(DataVersion::OnChain),
            "batch" => Some(DataVersion::Batch),
            "batchProof" => Some(DataVersion::BatchProof),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimData {
    pub data: String,
    pub nonce: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimType {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub nonce: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issuance {
    pub local_revocation_token: String,
    pub global_revocation_token: String,
    pub data_hash: String,
    pub type_hash: String,
    pub issuance_date: String,
    pub expiration_date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimNode {
    pub data: ClaimData,
    #[serde(rename = "type")]
    pub type_: ClaimType,
    pub aux: String,
    pub issuance: Issuance,
}

/// Attested payload of the on-chain and batch data versions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignedClaimNode {
    pub claim_node: ClaimNode,
    pub attester: String,
    pub attester_sig: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AttestationNode {
    pub data: ClaimData,
    #[serde(rename = "type")]
    pub type_: ClaimType,
    pub aux: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,
}

/// Attested payload of the legacy data version.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDataNode {
    pub attestation_node: AttestationNode,
    pub signed_attestation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDataLegacy {
    pub tx: String,
    pub layer2_hash: String,
    pub root_hash: String,
    pub root_hash_nonce: String,
    pub proof: Vec<MerkleProofShare>,
    pub stage: Stage,
    pub target: LegacyDataNode,
    pub attester: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDataOnChain {
    pub tx: String,
    pub layer2_hash: String,
    pub root_hash: String,
    pub root_hash_nonce: String,
    pub proof: Vec<MerkleProofShare>,
    pub stage: Stage,
    pub target: SignedClaimNode,
    pub attester: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDataBatch {
    pub batch_layer2_hash: String,
    pub batch_attester_sig: String,
    pub subject_sig: String,
    pub request_nonce: String,
    pub layer2_hash: String,
    pub root_hash: String,
    pub root_hash_nonce: String,
    pub proof: Vec<MerkleProofShare>,
    pub stage: Stage,
    pub target: SignedClaimNode,
    pub attester: String,
    pub subject: String,
}

/// Shared data plus its provenance, tagged by `version`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "version")]
pub enum VerifiedData {
    #[serde(rename = "legacy")]
    Legacy(VerifiedDataLegacy),
    #[serde(rename = "onChain")]
    OnChain(VerifiedDataOnChain),
    #[serde(rename = "batch")]
    Batch(VerifiedDataBatch),
}

impl VerifiedData {
    pub fn version(&self) -> DataVersion {
        match self {
            VerifiedData::Legacy(_) => DataVersion::Legacy,
            VerifiedData::OnChain(_) => DataVersion::OnChain,
            VerifiedData::Batch(_) => DataVersion::Batch,
        }
    }

    pub fn layer2_hash(&self) -> &str {
        match self {
            VerifiedData::Legacy(data) => &data.layer2_hash,
            VerifiedData::OnChain(data) => &data.layer2_hash,
            VerifiedData::Batch(data) => &data.layer2_hash,
        }
    }

    pub fn root_hash(&self) -> &str {
        match self {
            VerifiedData::Legacy(data) => &data.root_hash,
            VerifiedData::OnChain(data) => &data.root_hash,
            VerifiedData::Batch(data) => &data.root_hash,
        }
    }

    pub fn proof(&self) -> &[MerkleProofShare] {
        match self {
            VerifiedData::Legacy(data) => &data.proof,
            VerifiedData::OnChain(data) => &data.proof,
            VerifiedData::Batch(data) => &data.proof,
        }
    }

    /// The claim value carried by the attested payload.
    pub fn claim_data(&self) -> &str {
        match self {
            VerifiedData::Legacy(data) => &data.target.attestation_node.data.data,
            VerifiedData::OnChain(data) => &data.target.claim_node.data.data,
            VerifiedData::Batch(data) => &data.target.claim_node.data.data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CredentialProof {
    #[serde(rename = "type")]
    pub type_: String,
    pub created: String,
    pub creator: String,
    pub data: VerifiedData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CredentialSubject {
    pub subject: String,
    pub data: String,
    // Contents are not interpreted yet; only the array shape is checked.
    pub authorization: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub issuer: String,
    pub issuance_date: String,
    pub credential_subject: CredentialSubject,
    pub proof: CredentialProof,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationProof {
    #[serde(rename = "type")]
    pub type_: String,
    pub created: String,
    pub creator: String,
    pub nonce: String,
    pub domain: String,
    pub credential_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiablePresentation {
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub verifiable_credential: Vec<VerifiableCredential>,
    pub proof: PresentationProof,
    pub packed_data: String,
    pub signature: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AuthProof {
    #[serde(rename = "type")]
    pub type_: String,
    pub created: String,
    pub creator: String,
    pub nonce: String,
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerifiableAuth {
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub proof: AuthProof,
    pub signature: String,
}

/// Inputs to an on-chain attestation tree.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerkleTreeComponents {
    pub layer2_hash: String,
    pub root_hash: String,
    pub root_hash_nonce: String,
    pub attester: String,
    pub checksum_sig: String,
    pub claim_nodes: Vec<SignedClaimNode>,
    pub padding_nodes: Vec<String>,
}

/// Inputs to a batch attestation tree, countersigned by the subject.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchMerkleTreeComponents {
    pub layer2_hash: String,
    pub root_hash: String,
    pub root_hash_nonce: String,
    pub attester: String,
    pub attester_sig: String,
    pub checksum_sig: String,
    pub claim_nodes: Vec<SignedClaimNode>,
    pub padding_nodes: Vec<String>,
    pub batch_layer2_hash: String,
    pub batch_attester_sig: String,
    pub subject: String,
    pub subject_sig: String,
    pub request_nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

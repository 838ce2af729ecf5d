//! Schemas and validators for every document exchanged in a share.

pub mod auth;
pub mod claim;
pub mod credential;
pub mod fields;
pub mod presentation;

pub use auth::{
    is_valid_auth_proof, is_valid_verifiable_auth, validate_auth_proof, validate_verifiable_auth,
    validate_verifiable_auth_response,
};
pub use claim::{is_valid_claim_node, is_valid_legacy_data_node};
pub use credential::{
    is_valid_credential_proof, is_valid_credential_subject, is_valid_merkle_proof_array,
    is_valid_verifiable_credential, is_valid_verified_data, validate_credential_proof,
    validate_credential_subject, validate_verifiable_credential, validate_verified_data,
    verify_credential_merkle_proof,
};
pub use presentation::{
    hash_credential_values, hash_credentials, is_valid_presentation_proof,
    is_valid_verifiable_presentation, validate_presentation_proof,
    validate_verifiable_presentation,
};

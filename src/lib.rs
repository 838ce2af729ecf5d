//! Validation and construction of Merkle-anchored verifiable credentials.
//!
//! A credential proves that a piece of user data (a *claim*) was signed by an
//! attester and committed to a Merkle tree whose root was anchored on chain.
//! Credentials are shared inside a *presentation* signed by the presenter, and
//! sessions are opened with a signed *auth* challenge.
//!
//! Documents arrive as untyped JSON. Every validator in [`validate`] takes a
//! [`serde_json::Value`] and returns a [`Verdict`]: either the typed document,
//! or the first field that failed and why. Validators check structure first
//! and then the cryptographic chain tying the fields together:
//!
//! - the Merkle proof leads from the attested target to `rootHash`;
//! - the credential subject data is the data carried by the proven target;
//! - a presentation's `credentialHash`, `packedData`, `signature` and `token`
//!   agree with its proof and credentials;
//! - batch and auth signatures recover to the declared signer.
//!
//! The [`build`] module goes the other way, assembling documents from attested
//! components.
//!
//! # Basic Usage
//!
//! ```
//! use attestation_vc::{validate, FailureKind};
//! use serde_json::json;
//!
//! let auth = json!({
//!     "context": ["placeholder"],
//!     "type": "VerifiableAuth",
//!     "proof": {
//!         "type": "Bloom-Auth-1.0.0",
//!         "created": "2019-09-17T10:11:12.000Z",
//!         "creator": "0xf17f52151ebef6c7334fad080c5704d77216b732",
//!         "nonce": "0x01",
//!         "domain": "https://bloom.co/receiveData"
//!     }
//! });
//!
//! let invalid = validate::validate_verifiable_auth(&auth).into_result().unwrap_err();
//! assert_eq!(invalid.field, "signature");
//! assert_eq!(invalid.failure, FailureKind::MissingField);
//! assert_eq!(invalid.message, "Missing signature");
//! ```
//!
//! # Logging
//!
//! Validators report each failing rule at `debug` level and each passing rule
//! at `trace` level through the [`log`] facade.
#![cfg_attr(docsrs, feature(doc_auto_cfg), feature(doc_cfg))]

pub mod build;
pub mod encoding;
pub mod error;
pub mod keccak_hash;
pub mod merkle;
pub mod recovery;
pub mod validate;
pub mod validator;
pub mod vc;

#[cfg(test)]
mod fixtures;

pub use error::Error;
pub use validator::{FailureKind, Invalid, ValidationResponse, Verdict};

#[doc(inline)]
pub use keccak_hash::hash_message;

#[doc(inline)]
pub use encoding::ordered_stringify;

#[doc(inline)]
pub use recovery::{recover_hash_signer, sign_hash};

//! Single-value predicates. Each accepts any JSON value and never panics.

use chrono::DateTime;
use serde_json::Value;

use crate::keccak_hash;
use crate::vc::Stage;

const HASH_HEX_LEN: usize = 64;
const SIGNATURE_HEX_LEN: usize = 130;

fn is_prefixed_hex(value: &Value, digits: usize) -> bool {
    match value.as_str().and_then(|s| s.strip_prefix("0x")) {
        Some(hex) => hex.len() == digits && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// `0x` followed by 32 bytes of hex.
pub fn is_valid_hash(value: &Value) -> bool {
    is_prefixed_hex(value, HASH_HEX_LEN)
}

/// `0x` followed by a 65-byte `r || s || v` signature in hex.
pub fn is_valid_signature_string(value: &Value) -> bool {
    is_prefixed_hex(value, SIGNATURE_HEX_LEN)
}

pub fn is_valid_address(value: &Value) -> bool {
    value.as_str().map_or(false, keccak_hash::is_valid_address)
}

pub fn is_valid_rfc3339_date_time(value: &Value) -> bool {
    value
        .as_str()
        .map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok())
}

pub fn is_not_empty_string(value: &Value) -> bool {
    value.as_str().map_or(false, |s| !s.trim().is_empty())
}

pub fn is_valid_position_string(value: &Value) -> bool {
    matches!(value.as_str(), Some("left") | Some("right"))
}

pub fn is_valid_stage_string(value: &Value) -> bool {
    value
        .as_str()
        .map_or(false, |s| Stage::ALL.iter().any(|stage| stage.as_str() == s))
}

/// A non-empty array whose every element satisfies `check`.
pub fn is_non_empty_array_of(value: &Value, check: impl Fn(&Value) -> bool) -> bool {
    match value.as_array() {
        Some(items) => !items.is_empty() && items.iter().all(check),
        None => false,
    }
}

pub fn is_array_of_non_empty_strings(value: &Value) -> bool {
    is_non_empty_array_of(value, is_not_empty_string)
}

// Authorization entries are not interpreted yet.
pub fn is_optional_array_of_authorizations(value: &Value) -> bool {
    value.is_array()
}

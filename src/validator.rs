//! Declarative record validation.
//!
//! A [`Schema`] is an ordered list of [`Rule`]s. Each rule names a field and
//! the [`Predicate`]s that field must satisfy. Validation first requires every
//! declared field to be present, then evaluates the rules in declaration
//! order, stopping at the first failing predicate. The record itself is never
//! modified: on success it is converted to its typed form as-is.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Check over a field value alone.
pub type FieldCheck = fn(&Value) -> bool;

/// Check over a field value and the whole record it belongs to. An `Err`
/// counts as a failed check.
pub type RecordCheck = fn(&Value, &Value) -> Result<bool, Error>;

#[derive(Clone, Copy)]
pub enum Predicate {
    /// The field is the variant discriminant and must equal this tag.
    Tag(&'static str),
    /// The field must equal this string.
    Literal(&'static str),
    Field(FieldCheck),
    Record(RecordCheck),
}

impl Predicate {
    fn failure_kind(&self) -> FailureKind {
        match self {
            Predicate::Tag(_) => FailureKind::UnknownVariant,
            Predicate::Literal(_) | Predicate::Field(_) => FailureKind::FormatInvalid,
            Predicate::Record(_) => FailureKind::CrossFieldMismatch,
        }
    }

    fn evaluate(&self, value: &Value, record: &Value) -> Result<bool, Error> {
        match self {
            Predicate::Tag(expected) | Predicate::Literal(expected) => {
                Ok(value.as_str() == Some(*expected))
            }
            Predicate::Field(check) => Ok(check(value)),
            Predicate::Record(check) => check(value, record),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Tag(tag) => write!(f, "Tag({:?})", tag),
            Predicate::Literal(literal) => write!(f, "Literal({:?})", literal),
            Predicate::Field(_) => write!(f, "Field"),
            Predicate::Record(_) => write!(f, "Record"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub predicates: &'static [Predicate],
    pub description: &'static str,
}

impl Rule {
    pub const fn new(
        field: &'static str,
        predicates: &'static [Predicate],
        description: &'static str,
    ) -> Self {
        Rule {
            field,
            predicates,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

impl Schema {
    pub const fn new(name: &'static str, rules: &'static [Rule]) -> Self {
        Schema { name, rules }
    }

    /// Run the rules against `record`, reporting the first failure.
    pub fn check(&self, record: &Value) -> Result<(), Invalid> {
        for rule in self.rules {
            if record.get(rule.field).is_none() {
                log::debug!("{}: missing {}", self.name, rule.field);
                return Err(Invalid::missing(rule.field));
            }
        }
        for rule in self.rules {
            let value = &record[rule.field];
            for predicate in rule.predicates {
                let passed = match predicate.evaluate(value, record) {
                    Ok(passed) => passed,
                    Err(err) => {
                        log::debug!("{}: {} errored: {}", self.name, rule.description, err);
                        false
                    }
                };
                if !passed {
                    log::debug!("{}: {} failed", self.name, rule.description);
                    return Err(Invalid::new(rule.field, predicate.failure_kind(), value));
                }
            }
            log::trace!("{}: {} passed", self.name, rule.description);
        }
        Ok(())
    }

    /// Run the rules and, on success, convert the record to its typed form.
    pub fn validate<T: DeserializeOwned>(&self, record: &Value) -> Verdict<T> {
        match self.check(record) {
            Ok(()) => Verdict::typed(self.name, record),
            Err(invalid) => Verdict::Invalid(invalid),
        }
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.check(record).is_ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    MissingField,
    FormatInvalid,
    CrossFieldMismatch,
    UnknownVariant,
}

/// The first field that failed validation.
#[derive(thiserror::Error, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Invalid {
    pub field: String,
    pub failure: FailureKind,
    pub message: String,
}

impl Invalid {
    pub fn missing(field: &str) -> Self {
        Invalid {
            field: field.to_string(),
            failure: FailureKind::MissingField,
            message: format!("Missing {}", field),
        }
    }

    pub fn new(field: &str, failure: FailureKind, value: &Value) -> Self {
        Invalid {
            field: field.to_string(),
            failure,
            message: format!("Invalid {}: {}", field, value),
        }
    }
}

/// Outcome of validating an untrusted record.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Verdict<T> {
    Validated { data: T },
    Invalid(Invalid),
}

impl<T> Verdict<T> {
    pub fn is_validated(&self) -> bool {
        matches!(self, Verdict::Validated { .. })
    }

    pub fn invalid(&self) -> Option<&Invalid> {
        match self {
            Verdict::Validated { .. } => None,
            Verdict::Invalid(invalid) => Some(invalid),
        }
    }

    pub fn into_result(self) -> Result<T, Invalid> {
        match self {
            Verdict::Validated { data } => Ok(data),
            Verdict::Invalid(invalid) => Err(invalid),
        }
    }
}

impl<T: DeserializeOwned> Verdict<T> {
    /// Convert an already-checked record. A record that passed its schema but
    /// does not fit the typed model is reported against the schema name.
    pub(crate) fn typed(name: &str, record: &Value) -> Self {
        match serde_json::from_value(record.clone()) {
            Ok(data) => Verdict::Validated { data },
            Err(err) => {
                log::debug!("{}: typed conversion failed: {}", name, err);
                Verdict::Invalid(Invalid {
                    field: name.to_string(),
                    failure: FailureKind::FormatInvalid,
                    message: format!("Invalid {}: {}", name, err),
                })
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResponseError {
    pub key: String,
    pub message: String,
}

/// Host-facing rendition of a [`Verdict`], with failures as a list of errors.
///
/// Each error's `key` is the name of the failing field, not a fixed error
/// kind, and its `message` is the [`Invalid`] message.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationResponse<T> {
    Validated { data: T },
    Invalid { errors: Vec<ResponseError> },
}

impl<T> From<Verdict<T>> for ValidationResponse<T> {
    fn from(verdict: Verdict<T>) -> Self {
        match verdict {
            Verdict::Validated { data } => ValidationResponse::Validated { data },
            Verdict::Invalid(invalid) => ValidationResponse::Invalid {
                errors: vec![ResponseError {
                    key: invalid.field,
                    message: invalid.message,
                }],
            },
        }
    }
}

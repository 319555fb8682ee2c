//! Validation results and structural form errors.
//!
//! Validation failure is normal, representable state: a [`ValidationErrors`]
//! map from error-kind key to metadata, never a Rust error. [`FormError`] is
//! reserved for structural faults such as an unknown path or a type-mismatched
//! write.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// The error set reported by a control's validators.
///
/// Keys are error-kind identifiers (`required`, `minlength`,
/// `doesNotContainQuestionMark`, ...); values carry kind-specific metadata,
/// `true` for flag-style kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, serde_json::Value>);

impl ValidationErrors {
    /// An empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set with a single entry.
    pub fn of(kind: impl Into<String>, detail: serde_json::Value) -> Self {
        let mut errors = Self::new();
        errors.insert(kind, detail);
        errors
    }

    /// A set with a single flag-style entry (`kind: true`).
    pub fn flag(kind: impl Into<String>) -> Self {
        Self::of(kind, serde_json::Value::Bool(true))
    }

    /// Add an entry, replacing any previous detail for the same kind.
    pub fn insert(&mut self, kind: impl Into<String>, detail: serde_json::Value) {
        self.0.insert(kind.into(), detail);
    }

    /// Fold another set into this one.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// Whether an error of the given kind is present.
    pub fn contains(&self, kind: &str) -> bool {
        self.0.contains_key(kind)
    }

    /// Metadata for the given kind, if present.
    pub fn detail(&self, kind: &str) -> Option<&serde_json::Value> {
        self.0.get(kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Structural errors raised by schema construction and form mutation.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown control path: {0}")]
    UnknownPath(String),

    #[error("Duplicate child name: {0}")]
    DuplicateChild(String),

    #[error("Control at '{0}' is not a field")]
    NotAField(String),

    #[error("Control at '{0}' is not an array")]
    NotAnArray(String),

    #[error("Type mismatch at '{path}': expected a {expected} value")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("Value '{value}' at '{path}' is not one of the declared options")]
    NotAnOption { path: String, value: String },

    #[error("Index {index} out of range at '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Form has been destroyed")]
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_same_kind() {
        let mut errors = ValidationErrors::of("minlength", serde_json::json!({ "actualLength": 4 }));
        errors.merge(ValidationErrors::of(
            "minlength",
            serde_json::json!({ "actualLength": 5 }),
        ));
        errors.merge(ValidationErrors::flag("required"));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.detail("minlength"),
            Some(&serde_json::json!({ "actualLength": 5 }))
        );
        assert!(errors.contains("required"));
    }

    #[test]
    fn flag_entry_is_true() {
        let errors = ValidationErrors::flag("notUnique");
        assert_eq!(errors.detail("notUnique"), Some(&serde_json::Value::Bool(true)));
    }
}

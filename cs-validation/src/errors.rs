// Validation errors

use crate::ErrorSink;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Result type for validation walks.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Outcome of a walk that did not pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value handed to the walker does not have the shape its schema
    /// expects. Raised before any field is inspected.
    #[error("Incorrect kind of argument. Must be struct, got {0}.")]
    NotAStruct(String),

    /// At least one field failed a rule. The messages are in the caller's sink.
    #[error("Validation failed with {count} error(s).")]
    Failed {
        /// Number of sink entries appended during the walk.
        count: usize,
    },
}

impl ValidationError {
    /// Whether this is a rule failure rather than a precondition violation.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Field-keyed error messages.
///
/// Appending to an existing key replaces its message, so each key holds the
/// last failure reported for it. Doubles as an error value once non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    errors: BTreeMap<String, String>,
}

impl ErrorMap {
    /// Create an empty error map
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Record a message for a field key
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Get the message for a field key
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Check whether a field key has a message
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterate over `(field, message)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold another map into this one
    pub fn merge(&mut self, other: ErrorMap) {
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when empty, otherwise the map itself as the error.
    pub fn into_result(self) -> std::result::Result<(), ErrorMap> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|(field, message)| {
                serde_json::json!({
                    "field": field,
                    "message": message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl ErrorSink for ErrorMap {
    fn append_error_field(&mut self, name: &str, message: &str) {
        self.insert(name, message);
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorMap {}

impl FromIterator<(String, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ErrorMap {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_message_replaces_earlier() {
        let mut errors = ErrorMap::new();
        errors.append_error_field("email", "first");
        errors.append_error_field("email", "second");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("second"));
    }

    #[test]
    fn test_merge_prefers_incoming_messages() {
        let mut errors = ErrorMap::new();
        errors.insert("email", "This is a required field");
        errors.insert("name", "This is a required field");

        let mut later = ErrorMap::new();
        later.insert("email", "This is not a valid email address");
        later.insert("program", "Invalid program passed");
        errors.merge(later);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("email"), Some("This is not a valid email address"));
        assert_eq!(errors.get("name"), Some("This is a required field"));
        assert!(errors.contains("program"));
    }

    #[test]
    fn test_into_result() {
        assert!(ErrorMap::new().into_result().is_ok());

        let mut errors = ErrorMap::new();
        errors.insert("landing", "Invalid landing passed");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "landing: Invalid landing passed");
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut errors = ErrorMap::new();
        errors.insert("a", "x");
        errors.insert("b", "y");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"a": "x", "b": "y"}));
        assert_eq!(errors.to_json()["errors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_error_kinds() {
        assert!(ValidationError::Failed { count: 2 }.is_failed());
        assert!(!ValidationError::NotAStruct("string".into()).is_failed());
    }
}

//! Custom error types for spendlog
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::fmt;

use thiserror::Error;

/// Per-field validation messages collected during create/update
///
/// Field errors are gathered into this structure and returned to the caller
/// instead of aborting on the first failure. Insertion order is preserved so
/// messages display in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error message for a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// Get the first message recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over (field, message) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// The main error type for spendlog operations
#[derive(Error, Debug)]
pub enum SpendlogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Field-level validation errors for expense data
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Record belongs to a different user
    #[error("{entity_type} {identifier} does not belong to the current user")]
    Forbidden {
        entity_type: &'static str,
        identifier: String,
    },

    /// Registration/login errors
    #[error("{0}")]
    Auth(String),

    /// Import pipeline errors (no valid rows, commit failure)
    #[error("Import error: {0}")]
    Import(String),

    /// Uploaded file could not be accepted
    #[error("Upload error: {0}")]
    Upload(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SpendlogError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "forbidden" error for an expense owned by another user
    pub fn expense_forbidden(identifier: impl Into<String>) -> Self {
        Self::Forbidden {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SpendlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SpendlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for spendlog operations
pub type SpendlogResult<T> = Result<T, SpendlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpendlogError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SpendlogError::expense_not_found("42");
        assert_eq!(err.to_string(), "Expense not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("amount", "Amount must be greater than 0");
        errors.add("description", "Description cannot be empty");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("amount"), Some("Amount must be greater than 0"));
        assert_eq!(errors.get("date"), None);

        let err = SpendlogError::Validation(errors);
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation failed: amount: Amount must be greater than 0; \
             description: Description cannot be empty"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SpendlogError = io_err.into();
        assert!(matches!(err, SpendlogError::Io(_)));
    }
}

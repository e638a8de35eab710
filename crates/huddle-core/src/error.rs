//! Validation error types.
//!
//! Record-level validation failures. These are local to a single record:
//! a failed record is skipped and reported, it never aborts a sync run.

use serde::Serialize;
use thiserror::Error;

/// Validation failure for a single entity record.
#[derive(Debug, Clone, Error, Serialize)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field carries a value that cannot be accepted.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl ValidationError {
    /// Create a missing-field error.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid-value error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::missing("name");
        assert_eq!(err.to_string(), "missing required field: name");

        let err = ValidationError::invalid("email", "not an address");
        assert!(err.to_string().contains("email"));
        assert!(err.to_string().contains("not an address"));
    }
}

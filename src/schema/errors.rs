//! Schema error types.
//!
//! Rejection reports carry every violation found in a candidate document,
//! not just the first, so a caller can correct the whole document in one
//! round trip.

use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// One rule a candidate document broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A required field is absent or null.
    #[error("missing required field '{field}'")]
    MissingRequiredField {
        /// Field name.
        field: String,
    },

    /// A present field does not match its declared type.
    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Declared type name.
        expected: &'static str,
        /// Runtime type name found.
        actual: &'static str,
    },

    /// A present enumerated field holds a value outside its closed set.
    #[error("field '{field}': '{value}' is not one of {allowed:?}")]
    InvalidEnumValue {
        /// Field name.
        field: String,
        /// The offending value.
        value: String,
        /// The closed value set.
        allowed: &'static [&'static str],
    },
}

impl Violation {
    /// The field this violation is anchored to.
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingRequiredField { field }
            | Violation::TypeMismatch { field, .. }
            | Violation::InvalidEnumValue { field, .. } => field,
        }
    }
}

/// Schema-layer errors.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A caller referenced an entity family that was never registered.
    /// This is a programmer error, not correctable input.
    #[error("unknown entity family '{0}'")]
    UnknownEntityFamily(String),

    /// A candidate document broke one or more schema rules. The document
    /// was not persisted; the caller must correct it and retry.
    #[error("document rejected for '{family}': {}", summarize(.violations))]
    DocumentRejected {
        /// The entity family the document was submitted to.
        family: String,
        /// Every violation found, in deterministic field order.
        violations: Vec<Violation>,
    },
}

impl SchemaError {
    /// The violations carried by a rejection, if this is one.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            SchemaError::DocumentRejected { violations, .. } => Some(violations),
            SchemaError::UnknownEntityFamily(_) => None,
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_lists_every_violation() {
        let err = SchemaError::DocumentRejected {
            family: "notifications".into(),
            violations: vec![
                Violation::MissingRequiredField {
                    field: "title".into(),
                },
                Violation::InvalidEnumValue {
                    field: "priority".into(),
                    value: "SEVERE".into(),
                    allowed: &["LOW", "MEDIUM", "HIGH", "URGENT"],
                },
            ],
        };

        let display = err.to_string();
        assert!(display.contains("title"));
        assert!(display.contains("SEVERE"));
        assert_eq!(err.violations().unwrap().len(), 2);
    }

    #[test]
    fn test_violation_field_accessor() {
        let v = Violation::TypeMismatch {
            field: "patientId".into(),
            expected: "long",
            actual: "string",
        };
        assert_eq!(v.field(), "patientId");
    }
}

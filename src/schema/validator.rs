//! Document validation.
//!
//! Validation is total and side-effect-free: it never mutates the
//! candidate and never touches storage. All violations are collected and
//! returned together so the caller gets a complete rejection report in one
//! round trip.
//!
//! Undeclared fields pass through untouched. The families here carry
//! freeform extension fields (`metadata`, `tags`, nested arrays and
//! objects) whose interiors are deliberately unvalidated; only declared
//! fields are checked, and only structurally.

use serde_json::Value;

use crate::store::Document;

use super::errors::{SchemaError, SchemaResult, Violation};
use super::registry::SchemaRegistry;
use super::types::value_type_name;

/// Validates candidate documents against the registry's schemas.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Checks a candidate document for admission into a family.
    ///
    /// Walks the declared fields in name order: a required field that is
    /// absent or null is a violation; a present field whose runtime type
    /// does not match its declaration is a violation; a present enumerated
    /// field holding a value outside its closed set is a violation. Every
    /// violation found is returned in one [`SchemaError::DocumentRejected`].
    pub fn validate(&self, family: &str, document: &Document) -> SchemaResult<()> {
        let spec = self.registry.family(family)?;

        let mut violations = Vec::new();
        for (name, def) in spec.schema().fields() {
            let value = match document.get(name) {
                None | Some(Value::Null) if def.required => {
                    violations.push(Violation::MissingRequiredField { field: name.into() });
                    continue;
                }
                None => continue,
                Some(Value::Null) => {
                    violations.push(Violation::TypeMismatch {
                        field: name.into(),
                        expected: def.field_type.type_name(),
                        actual: "null",
                    });
                    continue;
                }
                Some(value) => value,
            };

            if !def.field_type.matches(value) {
                violations.push(Violation::TypeMismatch {
                    field: name.into(),
                    expected: def.field_type.type_name(),
                    actual: value_type_name(value),
                });
                continue;
            }

            if let Some(allowed) = def.allowed {
                // matches() above guarantees a string here.
                let text = value.as_str().unwrap_or_default();
                if !allowed.contains(&text) {
                    violations.push(Violation::InvalidEnumValue {
                        field: name.into(),
                        value: text.to_string(),
                        allowed,
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::DocumentRejected {
                family: family.to_string(),
                violations,
            })
        }
    }
}

//! Schema value types.
//!
//! A [`Schema`] is an immutable description of one entity family's document
//! shape: which fields are required, what type each declared field carries,
//! and which fields are constrained to a closed value set. Documents arrive
//! at the boundary as untyped JSON, so every type here is paired with a
//! structural runtime check.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::store::clock::parse_timestamp;

/// Declared field types.
///
/// `Int` and `Long` are both JSON integers at the boundary; `Int` must
/// additionally fit in 32 bits. `Date` accepts an RFC 3339 string or a
/// signed 64-bit epoch-millisecond integer. `Array` and `Object` are
/// structural checks only; element and member shapes are freeform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer. Caller-supplied entity identifiers use this.
    Long,
    /// 64-bit floating point. Accepts integers as well.
    Float,
    /// Boolean.
    Bool,
    /// Temporal value: RFC 3339 string or epoch milliseconds.
    Date,
    /// Sequence with freeform elements.
    Array,
    /// Key-value mapping with freeform members.
    Object,
}

impl FieldType {
    /// Returns the type name used in rejection reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Structural check of a runtime value against this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Int => match value.as_i64() {
                Some(n) => i32::try_from(n).is_ok(),
                None => false,
            },
            FieldType::Long => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Date => parse_timestamp(value).is_some(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

/// Returns the runtime type name of a JSON value for rejection reports.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One declared field: type, required flag, optional closed value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Closed value set for enumerated string fields.
    pub allowed: Option<&'static [&'static str]>,
}

impl FieldDef {
    /// A required field of the given type.
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            allowed: None,
        }
    }

    /// An optional field of the given type.
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            allowed: None,
        }
    }

    /// A required string field constrained to a closed value set.
    pub fn required_enum(allowed: &'static [&'static str]) -> Self {
        Self {
            field_type: FieldType::String,
            required: true,
            allowed: Some(allowed),
        }
    }

    /// An optional string field constrained to a closed value set.
    pub fn optional_enum(allowed: &'static [&'static str]) -> Self {
        Self {
            field_type: FieldType::String,
            required: false,
            allowed: Some(allowed),
        }
    }
}

/// Immutable schema for one entity family.
///
/// Fields are kept in a sorted map so validation walks them in a
/// deterministic order and rejection reports are stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: BTreeMap<String, FieldDef>,
}

impl Schema {
    /// Creates an empty schema. Fields are added via [`Schema::with_field`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declared field, replacing any previous declaration.
    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// All declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of the required fields, in name order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.required)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_requires_32_bits() {
        assert!(FieldType::Int.matches(&json!(42)));
        assert!(FieldType::Int.matches(&json!(-42)));
        assert!(!FieldType::Int.matches(&json!(i64::from(i32::MAX) + 1)));
        assert!(!FieldType::Int.matches(&json!(1.5)));
    }

    #[test]
    fn test_long_accepts_any_integer() {
        assert!(FieldType::Long.matches(&json!(1)));
        assert!(FieldType::Long.matches(&json!(i64::MAX)));
        assert!(!FieldType::Long.matches(&json!(1.5)));
        assert!(!FieldType::Long.matches(&json!("1")));
    }

    #[test]
    fn test_float_accepts_integers() {
        assert!(FieldType::Float.matches(&json!(99.5)));
        assert!(FieldType::Float.matches(&json!(100)));
        assert!(!FieldType::Float.matches(&json!("100")));
    }

    #[test]
    fn test_date_representations() {
        assert!(FieldType::Date.matches(&json!("2025-03-01T10:00:00Z")));
        assert!(FieldType::Date.matches(&json!("2025-03-01T10:00:00.250+05:30")));
        assert!(FieldType::Date.matches(&json!(1_740_000_000_000_i64)));
        assert!(!FieldType::Date.matches(&json!("tomorrow")));
        assert!(!FieldType::Date.matches(&json!(true)));
    }

    #[test]
    fn test_structural_types() {
        assert!(FieldType::Array.matches(&json!(["a", 1])));
        assert!(!FieldType::Array.matches(&json!({"a": 1})));
        assert!(FieldType::Object.matches(&json!({"a": 1})));
        assert!(!FieldType::Object.matches(&json!([1])));
    }

    #[test]
    fn test_required_fields_sorted() {
        let schema = Schema::new()
            .with_field("zeta", FieldDef::required(FieldType::String))
            .with_field("alpha", FieldDef::required(FieldType::Long))
            .with_field("mid", FieldDef::optional(FieldType::Bool));

        let required: Vec<_> = schema.required_fields().collect();
        assert_eq!(required, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(1)), "integer");
        assert_eq!(value_type_name(&json!(1.5)), "float");
        assert_eq!(value_type_name(&json!("x")), "string");
    }
}

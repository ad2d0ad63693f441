//! Errors surfaced by construction.
//!
//! Primitive coercions never fail; these come from structured types whose
//! own construction rejects the input, and from the typed extraction layer.

/// Errors that can occur while constructing instances.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    /// A structured type name is not in the registry.
    #[error("unknown type: {name}")]
    UnknownType { name: String },

    /// Record construction was requested for a value class.
    #[error("type '{name}' is a value class, not a record type")]
    NotRecordType { name: String },

    /// A record type was given something other than an object.
    #[error("cannot construct '{type_name}' from {got}")]
    NotARecord { type_name: String, got: String },

    /// An array-typed position held something other than an array.
    #[error("expected an array for {context}, got {got}")]
    NotAnArray { context: String, got: String },

    /// A value class constructor rejected its input.
    #[error("cannot construct '{type_name}': {message}")]
    ValueClass { type_name: String, message: String },

    /// A required field was not present in the source record.
    #[error("missing field '{field}' on '{type_name}'")]
    MissingField { type_name: String, field: String },

    /// A field held a value of the wrong coerced kind for extraction.
    #[error("field '{type_name}.{field}': expected {expected}, got {got}")]
    FieldType {
        type_name: String,
        field: String,
        expected: &'static str,
        got: &'static str,
    },
}

/// Return a descriptive type name for a JSON value (for error messages).
pub(crate) fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CastError::NotARecord {
            type_name: "Pair".to_string(),
            got: "string".to_string(),
        };
        assert_eq!(err.to_string(), "cannot construct 'Pair' from string");

        let err = CastError::FieldType {
            type_name: "Product".to_string(),
            field: "price".to_string(),
            expected: "Number",
            got: "String",
        };
        assert_eq!(
            err.to_string(),
            "field 'Product.price': expected Number, got String"
        );
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(null)), "null");
        assert_eq!(json_type_name(&serde_json::json!([1])), "array");
        assert_eq!(json_type_name(&serde_json::json!({})), "object");
    }
}

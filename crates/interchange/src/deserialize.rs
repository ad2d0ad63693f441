//! Loading schema documents into a registry.
//!
//! The main entry point is [`load_registry`], which parses a schema
//! document and builds a [`Registry`] with the built-in value classes.

use castable_core::{DeclError, Registry, RegistryBuilder};
use serde::Deserialize;

use crate::types::SchemaDocument;

/// Errors while loading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    /// The document is not valid JSON or does not match the schema shape.
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// The declarations are inconsistent.
    #[error(transparent)]
    Decl(#[from] DeclError),
}

/// Parse a schema document from an already-deserialized JSON value.
pub fn from_json(value: &serde_json::Value) -> Result<SchemaDocument, InterchangeError> {
    Ok(SchemaDocument::deserialize(value)?)
}

/// Parse a schema document from JSON text.
pub fn from_str(text: &str) -> Result<SchemaDocument, InterchangeError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse `text` and build a registry from it.
pub fn load_registry(text: &str) -> Result<Registry, InterchangeError> {
    load_into(text, Registry::builder())
}

/// Parse `text` and add its types to an existing builder, so that
/// schema-declared records can refer to value classes registered in code.
pub fn load_into(text: &str, builder: RegistryBuilder) -> Result<Registry, InterchangeError> {
    let doc = from_str(text)?;
    Ok(doc.register(builder).build()?)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use castable_core::{Metadata, TypeKind, Value, DATETIME};
    use serde_json::json;

    const PRODUCT: &str = r#"{
        "types": [
            { "name": "Product", "fields": [
                { "name": "name", "type": "String" },
                { "name": "price", "type": "Number" },
                { "name": "date", "type": "String", "cast": "DateTime" },
                { "name": "onSale", "type": "Boolean" }
            ] },
            { "name": "OrderList", "fields": [
                { "name": "orders", "elements": ["Product"] },
                { "name": "grid", "type": "Array", "elements": ["Array", "Number"] }
            ] }
        ]
    }"#;

    #[test]
    fn loads_fields_and_overrides() {
        let reg = load_registry(PRODUCT).unwrap();
        assert_eq!(reg.declared_type("Product", "price"), Some(&TypeKind::Number));
        assert_eq!(
            reg.declared_type("Product", "date"),
            Some(&TypeKind::structured(DATETIME))
        );
    }

    #[test]
    fn loads_element_chains() {
        let reg = load_registry(PRODUCT).unwrap();
        assert_eq!(reg.declared_type("OrderList", "orders"), Some(&TypeKind::Array));
        assert_eq!(
            reg.element_type("OrderList", "orders", 0),
            Some(&TypeKind::structured("Product"))
        );
        assert_eq!(reg.element_type("OrderList", "grid", 1), Some(&TypeKind::Number));
    }

    #[test]
    fn from_json_value() {
        let doc = from_json(&json!({"types": [{"name": "Empty"}]})).unwrap();
        assert_eq!(doc.types.len(), 1);
        assert!(doc.types[0].fields.is_empty());
    }

    #[test]
    fn malformed_document_is_json_error() {
        let err = load_registry(r#"{"types": [{"fields": []}]}"#).unwrap_err();
        assert!(matches!(err, InterchangeError::Json(_)));
    }

    #[test]
    fn dangling_reference_is_decl_error() {
        let err = load_registry(
            r#"{"types": [{"name": "A", "fields": [{"name": "b", "type": "B"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InterchangeError::Decl(DeclError::UnknownType { ref name, .. }) if name == "B"
        ));
    }

    #[test]
    fn code_registered_value_classes_are_visible() {
        let builder = Registry::builder().value_class("Upper", |v| {
            Ok(Value::String(v.as_str().unwrap_or_default().to_uppercase()))
        });
        let reg = load_into(
            r#"{"types": [{"name": "A", "fields": [{"name": "code", "cast": "Upper"}]}]}"#,
            builder,
        )
        .unwrap();
        assert_eq!(
            reg.declared_type("A", "code"),
            Some(&TypeKind::structured("Upper"))
        );
    }

    #[test]
    fn document_round_trips_through_serde() {
        let doc = from_str(PRODUCT).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(from_str(&text).unwrap(), doc);
    }
}

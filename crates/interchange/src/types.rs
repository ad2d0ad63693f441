//! Serde structs for the schema document.
//!
//! ```json
//! { "types": [
//!   { "name": "Product", "fields": [
//!       { "name": "price", "type": "Number" },
//!       { "name": "date", "cast": "DateTime" },
//!       { "name": "tags", "type": "Array", "elements": ["String"] } ] } ] }
//! ```

use castable_core::{RegistryBuilder, TypeKind};
use serde::{Deserialize, Serialize};

/// Top-level schema document: a list of record types.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaDocument {
    #[serde(default)]
    pub types: Vec<TypeSchema>,
}

/// One record type and its field declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// Declarations for one field. Kind names are `Number`, `String`,
/// `Boolean`, `Array`, or the name of another registered type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    /// The field's natural type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    /// Override type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
    /// Element kinds by nesting depth, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<String>,
}

impl SchemaDocument {
    /// Add every declared type to `builder`.
    pub fn register(&self, mut builder: RegistryBuilder) -> RegistryBuilder {
        for ty in &self.types {
            builder = builder.record(ty.name.clone(), |t| {
                for field in &ty.fields {
                    if let Some(ref design) = field.design {
                        t.field(&field.name, TypeKind::from_name(design));
                    }
                    if let Some(ref cast) = field.cast {
                        t.cast(&field.name, TypeKind::from_name(cast));
                    }
                    if !field.elements.is_empty() {
                        t.elements(
                            &field.name,
                            field.elements.iter().map(|e| TypeKind::from_name(e)),
                        );
                    }
                }
            });
        }
        builder
    }
}

//! Type descriptors attached to declared fields.

use std::fmt;
use std::sync::Arc;

/// Name of a registered structured type (record type or value class).
///
/// Cheap to clone; resolved against a [`crate::Registry`] at conversion time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeRef(Arc<str>);

impl TypeRef {
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeRef(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::new(name)
    }
}

/// How a raw value is coerced for a field (or array element).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Number,
    String,
    Boolean,
    /// A sequence; element kinds come from the field's element type chain.
    Array,
    /// A nested record type or a value class, constructed recursively.
    Structured(TypeRef),
}

impl TypeKind {
    /// Shorthand for `TypeKind::Structured(TypeRef::new(name))`.
    pub fn structured(name: impl AsRef<str>) -> Self {
        TypeKind::Structured(TypeRef::new(name))
    }

    /// Parse a kind from its declared name.
    ///
    /// The four primitive names map to their kinds; every other name is
    /// a reference to a structured type.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Number" => TypeKind::Number,
            "String" => TypeKind::String,
            "Boolean" => TypeKind::Boolean,
            "Array" => TypeKind::Array,
            other => TypeKind::structured(other),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeKind::Number => "Number",
            TypeKind::String => "String",
            TypeKind::Boolean => "Boolean",
            TypeKind::Array => "Array",
            TypeKind::Structured(r) => r.name(),
        }
    }

    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            TypeKind::Structured(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

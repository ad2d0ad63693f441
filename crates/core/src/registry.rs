//! The field-type table consulted during conversion.
//!
//! Types are declared once through a [`RegistryBuilder`]; [`RegistryBuilder::build`]
//! checks every cross-type reference and freezes the table. A built
//! [`Registry`] has no mutation API, so it can be shared across threads by
//! reference or behind an `Arc`.

use std::collections::HashMap;

use tracing::debug;

use crate::decl::{parse_datetime, FieldDecl, TypeDecl, ValueClass, DATETIME};
use crate::error::DeclError;
use crate::kind::TypeKind;
use crate::values::Value;

// ──────────────────────────────────────────────
// Trait
// ──────────────────────────────────────────────

/// Read-only lookup of declared types, keyed by (owner type, field name).
///
/// [`Registry`] is the standard implementation. Implement this to source
/// declarations from elsewhere (generated tables, a schema service).
pub trait Metadata: Send + Sync {
    /// Resolve a registered type by name.
    fn type_decl(&self, name: &str) -> Option<&TypeDecl>;

    /// The coercion kind declared for `owner.field`, if any.
    fn declared_type(&self, owner: &str, field: &str) -> Option<&TypeKind> {
        self.type_decl(owner)?.field(field)?.declared_type()
    }

    /// The element kind declared for `owner.field` at array nesting `depth`.
    fn element_type(&self, owner: &str, field: &str, depth: usize) -> Option<&TypeKind> {
        self.type_decl(owner)?.field(field)?.element_type(depth)
    }
}

// ──────────────────────────────────────────────
// Registry
// ──────────────────────────────────────────────

/// Immutable table of record types and value classes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: HashMap<String, TypeDecl>,
}

impl Registry {
    /// Start declaring types. The built-in `DateTime` value class is
    /// pre-registered.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Metadata for Registry {
    fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }
}

// ──────────────────────────────────────────────
// Builders
// ──────────────────────────────────────────────

/// Collects declarations until [`build`](RegistryBuilder::build).
#[derive(Debug)]
pub struct RegistryBuilder {
    types: Vec<(String, TypeDecl)>,
    errors: Vec<DeclError>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder {
            types: vec![(
                DATETIME.to_string(),
                TypeDecl::Value(ValueClass::new(parse_datetime)),
            )],
            errors: Vec::new(),
        }
    }

    /// Declare a record type. `declare` receives a [`TypeBuilder`] for the
    /// type's fields.
    pub fn record<F>(mut self, name: impl Into<String>, declare: F) -> Self
    where
        F: FnOnce(&mut TypeBuilder),
    {
        let name = name.into();
        let mut builder = TypeBuilder::new(&name);
        declare(&mut builder);
        self.errors.append(&mut builder.errors);
        self.types.push((
            name,
            TypeDecl::Record {
                fields: builder.fields,
            },
        ));
        self
    }

    /// Declare a value class: a structured type built from one raw value.
    pub fn value_class<F>(mut self, name: impl Into<String>, ctor: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.types
            .push((name.into(), TypeDecl::Value(ValueClass::new(ctor))));
        self
    }

    /// Validate and freeze the declarations.
    ///
    /// Fails on the first duplicate type, duplicate field part, or
    /// reference to an unregistered type.
    pub fn build(self) -> Result<Registry, DeclError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut types = HashMap::with_capacity(self.types.len());
        for (name, decl) in self.types {
            if types.contains_key(&name) {
                return Err(DeclError::DuplicateType { name });
            }
            types.insert(name, decl);
        }

        for (owner, decl) in &types {
            let TypeDecl::Record { fields } = decl else {
                continue;
            };
            for (field, fd) in fields {
                for kind in fd.referenced() {
                    if let Some(r) = kind.type_ref() {
                        if !types.contains_key(r.name()) {
                            return Err(DeclError::UnknownType {
                                owner: owner.clone(),
                                field: field.clone(),
                                name: r.name().to_string(),
                            });
                        }
                    }
                }
            }
        }

        debug!(types = types.len(), "registry built");
        Ok(Registry { types })
    }
}

/// Declares the fields of one record type.
#[derive(Debug)]
pub struct TypeBuilder {
    owner: String,
    fields: Vec<(String, FieldDecl)>,
    /// Fields whose element chain has been declared, even if empty.
    chained: Vec<String>,
    errors: Vec<DeclError>,
}

impl TypeBuilder {
    fn new(owner: &str) -> Self {
        TypeBuilder {
            owner: owner.to_string(),
            fields: Vec::new(),
            chained: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Declare a field's natural type.
    pub fn field(&mut self, name: &str, kind: TypeKind) -> &mut Self {
        let slot = &mut self.entry(name).design;
        if slot.is_some() {
            self.duplicate(name, "type");
        } else {
            *slot = Some(kind);
        }
        self
    }

    /// Declare an override type for a field, taking precedence over its
    /// natural type.
    pub fn cast(&mut self, name: &str, kind: TypeKind) -> &mut Self {
        let slot = &mut self.entry(name).cast;
        if slot.is_some() {
            self.duplicate(name, "override");
        } else {
            *slot = Some(kind);
        }
        self
    }

    /// Declare the element kinds of an array field, outermost first.
    ///
    /// A field with no type yet becomes an `Array` field.
    pub fn elements<I>(&mut self, name: &str, kinds: I) -> &mut Self
    where
        I: IntoIterator<Item = TypeKind>,
    {
        if self.chained.iter().any(|n| n == name) {
            self.duplicate(name, "element types");
            return self;
        }
        self.chained.push(name.to_string());
        let entry = self.entry(name);
        entry.elements = kinds.into_iter().collect();
        if entry.design.is_none() {
            entry.design = Some(TypeKind::Array);
        }
        self
    }

    fn entry(&mut self, name: &str) -> &mut FieldDecl {
        let idx = match self.fields.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.fields.push((name.to_string(), FieldDecl::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[idx].1
    }

    fn duplicate(&mut self, field: &str, part: &'static str) {
        self.errors.push(DeclError::DuplicateField {
            owner: self.owner.clone(),
            field: field.to_string(),
            part,
        });
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

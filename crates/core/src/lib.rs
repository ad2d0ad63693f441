//! castable-core: type descriptors, the field-type registry, and coerced
//! values.
//!
//! Each record type declares, per field, how raw values should be coerced:
//! a natural type, an optional override, and for array fields one element
//! kind per nesting depth. The coercion engine in `castable-coerce` reads
//! these declarations through the [`Metadata`] trait.

pub mod decl;
pub mod error;
pub mod kind;
pub mod registry;
pub mod values;

pub use decl::{parse_datetime, FieldDecl, TypeDecl, ValueClass, DATETIME};
pub use error::DeclError;
pub use kind::{TypeKind, TypeRef};
pub use registry::{Metadata, Registry, RegistryBuilder, TypeBuilder};
pub use values::{Instance, Value};

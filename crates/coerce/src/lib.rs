//! castable-coerce: turns loosely-typed JSON into typed instances.
//!
//! Raw records (parsed JSON where any leaf may be a string, number, or
//! null regardless of its logical type) are converted field by field
//! against the declarations in a [`castable_core::Registry`]:
//!
//! - `Number` fields are parsed numerically; text that is not a number
//!   becomes `NaN` instead of an error.
//! - `String` fields take the value's natural textual form.
//! - `Boolean` fields go through a permissive heuristic ([`to_bool`]).
//! - `Array` fields convert each element with the kind declared for its
//!   nesting depth.
//! - Structured fields are constructed recursively.
//!
//! Keys the record type does not declare are copied through unchanged.

pub mod engine;
pub mod error;
pub mod options;
pub mod primitive;
pub mod typed;

pub use castable_core::{
    DeclError, Instance, Metadata, Registry, RegistryBuilder, TypeBuilder, TypeKind, TypeRef,
    Value,
};
pub use engine::{construct, construct_all, construct_with, convert, Coercer};
pub use error::CastError;
pub use options::{BoolMatch, ConvertOptions};
pub use primitive::{to_bool, to_bool_with, to_number, to_text};
pub use typed::{cast, Castable, Fields, FromValue, RegisterCastable};

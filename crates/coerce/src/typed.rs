//! Lifting constructed instances into Rust structs.
//!
//! A [`Castable`] type declares its fields once and pulls them back out of
//! a constructed [`Instance`] through [`Fields`].

use castable_core::{Instance, Metadata, RegistryBuilder, TypeBuilder, Value};
use time::OffsetDateTime;

use crate::engine::construct;
use crate::error::CastError;

// ──────────────────────────────────────────────
// FromValue
// ──────────────────────────────────────────────

/// Extract a Rust value from a coerced [`Value`].
pub trait FromValue: Sized {
    /// Name used in `FieldType` errors.
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "Number";

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

/// Integral numbers within `i64` range only; handy for numeric enum
/// ordinals.
impl FromValue for i64 {
    const EXPECTED: &'static str = "integral Number";

    fn from_value(value: Value) -> Option<Self> {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(n))
            .map(|n| n as i64)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "String";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "Boolean";

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for OffsetDateTime {
    const EXPECTED: &'static str = "DateTime";

    fn from_value(value: Value) -> Option<Self> {
        value.as_datetime()
    }
}

impl FromValue for Instance {
    const EXPECTED: &'static str = "Instance";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Any value, rendered back to JSON. Meant for passthrough fields.
impl FromValue for serde_json::Value {
    const EXPECTED: &'static str = "JSON";

    fn from_value(value: Value) -> Option<Self> {
        Some(match value {
            Value::Raw(raw) => raw,
            other => other.to_json(),
        })
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "Array";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// A raw `null` is `None`; anything else must extract as `T`.
impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Raw(serde_json::Value::Null) => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// ──────────────────────────────────────────────
// Castable
// ──────────────────────────────────────────────

/// A Rust struct backed by a registered record type.
pub trait Castable: Sized {
    /// The record type name in the registry.
    const TYPE_NAME: &'static str;

    /// Declare the record type's fields.
    fn declare(t: &mut TypeBuilder);

    /// Build the struct from a constructed instance.
    fn from_instance(instance: Instance) -> Result<Self, CastError>;
}

/// Construct `T` from a raw record.
pub fn cast<T: Castable, M: Metadata + ?Sized>(
    meta: &M,
    raw: &serde_json::Value,
) -> Result<T, CastError> {
    T::from_instance(construct(meta, T::TYPE_NAME, raw)?)
}

/// Register [`Castable`] types on a [`RegistryBuilder`].
pub trait RegisterCastable {
    fn castable<T: Castable>(self) -> Self;
}

impl RegisterCastable for RegistryBuilder {
    fn castable<T: Castable>(self) -> Self {
        self.record(T::TYPE_NAME, T::declare)
    }
}

// ──────────────────────────────────────────────
// Field extraction
// ──────────────────────────────────────────────

/// Moves fields out of an instance, reporting which field failed.
#[derive(Debug)]
pub struct Fields {
    instance: Instance,
}

impl Fields {
    pub fn new(instance: Instance) -> Self {
        Fields { instance }
    }

    /// A field that must be present.
    pub fn required<T: FromValue>(&mut self, field: &str) -> Result<T, CastError> {
        let value = self
            .instance
            .take(field)
            .ok_or_else(|| CastError::MissingField {
                type_name: self.instance.type_name().to_string(),
                field: field.to_string(),
            })?;
        self.extract(field, value)
    }

    /// A field that may be absent or a raw `null`.
    pub fn optional<T: FromValue>(&mut self, field: &str) -> Result<Option<T>, CastError> {
        match self.instance.take(field) {
            None | Some(Value::Raw(serde_json::Value::Null)) => Ok(None),
            Some(value) => self.extract(field, value).map(Some),
        }
    }

    /// A field holding a nested record of type `T`.
    pub fn nested<T: Castable>(&mut self, field: &str) -> Result<T, CastError> {
        let instance: Instance = self.required(field)?;
        T::from_instance(instance)
    }

    /// A field holding an array of nested records of type `T`.
    pub fn nested_list<T: Castable>(&mut self, field: &str) -> Result<Vec<T>, CastError> {
        let instances: Vec<Instance> = self.required(field)?;
        instances.into_iter().map(T::from_instance).collect()
    }

    /// Whatever was not extracted, including undeclared passthrough fields.
    pub fn rest(self) -> Instance {
        self.instance
    }

    fn extract<T: FromValue>(&self, field: &str, value: Value) -> Result<T, CastError> {
        let got = value.type_name();
        T::from_value(value).ok_or_else(|| CastError::FieldType {
            type_name: self.instance.type_name().to_string(),
            field: field.to_string(),
            expected: T::EXPECTED,
            got,
        })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

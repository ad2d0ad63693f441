//! Field and type declarations stored in the registry.

use std::fmt;
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::kind::TypeKind;
use crate::values::Value;

/// Name of the built-in date-time value class.
pub const DATETIME: &str = "DateTime";

// ──────────────────────────────────────────────
// Fields
// ──────────────────────────────────────────────

/// Declared coercion metadata for one field of a record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDecl {
    /// The field's natural type.
    pub design: Option<TypeKind>,
    /// Explicit override, used when the natural type is insufficient.
    pub cast: Option<TypeKind>,
    /// Element kinds by array nesting depth; index 0 is the outermost array.
    pub elements: Vec<TypeKind>,
}

impl FieldDecl {
    /// The kind the engine coerces to: the override if present, else the
    /// natural type.
    pub fn declared_type(&self) -> Option<&TypeKind> {
        self.cast.as_ref().or(self.design.as_ref())
    }

    pub fn element_type(&self, depth: usize) -> Option<&TypeKind> {
        self.elements.get(depth)
    }

    /// All structured types this field refers to.
    pub(crate) fn referenced(&self) -> impl Iterator<Item = &TypeKind> {
        self.design
            .iter()
            .chain(self.cast.iter())
            .chain(self.elements.iter())
    }
}

// ──────────────────────────────────────────────
// Value classes
// ──────────────────────────────────────────────

/// Constructor signature for a value class.
pub type ValueCtor = dyn Fn(&serde_json::Value) -> Result<Value, String> + Send + Sync;

/// A structured type built from a single raw value rather than from
/// annotated fields (dates, identifiers, money and the like).
#[derive(Clone)]
pub struct ValueClass {
    ctor: Arc<ValueCtor>,
}

impl ValueClass {
    pub fn new<F>(ctor: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        ValueClass {
            ctor: Arc::new(ctor),
        }
    }

    pub fn construct(&self, raw: &serde_json::Value) -> Result<Value, String> {
        (self.ctor)(raw)
    }
}

impl fmt::Debug for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueClass(..)")
    }
}

/// Built-in `DateTime` constructor.
///
/// Accepts an RFC 3339 string, an ISO date-time without an offset (read as
/// UTC), a bare `YYYY-MM-DD` date (midnight UTC), or a number of
/// milliseconds since the Unix epoch. `null` is the epoch itself.
pub fn parse_datetime(raw: &serde_json::Value) -> Result<Value, String> {
    match raw {
        serde_json::Value::String(s) => parse_datetime_text(s.trim())
            .map(Value::DateTime)
            .map_err(|e| format!("invalid date-time '{}': {}", s, e)),
        serde_json::Value::Null => Ok(Value::DateTime(OffsetDateTime::UNIX_EPOCH)),
        serde_json::Value::Number(n) => {
            let millis = n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i128))
                .ok_or_else(|| format!("invalid timestamp: {}", n))?;
            let nanos = millis
                .checked_mul(1_000_000)
                .ok_or_else(|| format!("timestamp out of range: {}", n))?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(Value::DateTime)
                .map_err(|e| format!("timestamp out of range: {}", e))
        }
        other => Err(format!("cannot build a date-time from {}", other)),
    }
}

fn parse_datetime_text(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }
    let local = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    if let Ok(dt) = PrimitiveDateTime::parse(s, local) {
        return Ok(dt.assume_utc());
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

/// A registered structured type.
#[derive(Debug, Clone)]
pub enum TypeDecl {
    /// A type composed of annotated fields, in declaration order.
    Record { fields: Vec<(String, FieldDecl)> },
    Value(ValueClass),
}

impl TypeDecl {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        match self {
            TypeDecl::Record { fields } => {
                fields.iter().find(|(n, _)| n == name).map(|(_, d)| d)
            }
            TypeDecl::Value(_) => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, TypeDecl::Record { .. })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

//! Coerced output values and their JSON rendering.

use std::collections::BTreeMap;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

// ──────────────────────────────────────────────
// Values
// ──────────────────────────────────────────────

/// A value produced by coercion.
///
/// Numbers are `f64` so that a soft mismatch can carry `NaN` instead of
/// failing. `Raw` holds passthrough data exactly as it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Bool(bool),
    Array(Vec<Value>),
    Instance(Instance),
    DateTime(OffsetDateTime),
    /// Output of a user-registered value class.
    Custom {
        type_name: String,
        value: serde_json::Value,
    },
    Raw(serde_json::Value),
}

impl Value {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Bool(_) => "Boolean",
            Value::Array(_) => "Array",
            Value::Instance(_) => "Instance",
            Value::DateTime(_) => "DateTime",
            Value::Custom { .. } => "Custom",
            Value::Raw(_) => "Raw",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// Render back to JSON.
    ///
    /// Non-finite numbers become `null`; integral numbers are written
    /// without a fraction; date-times use RFC 3339.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Instance(inst) => inst.to_json(),
            Value::DateTime(dt) => dt
                .format(&Rfc3339)
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Value::Custom { value, .. } => value.clone(),
            Value::Raw(v) => v.clone(),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

// ──────────────────────────────────────────────
// Instances
// ──────────────────────────────────────────────

/// A constructed record: the fields present in the source, coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    pub fn new(type_name: impl Into<String>) -> Self {
        Instance {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field. Returns the previous value, if any.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(field.into(), value)
    }

    /// Move a field out of the instance.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn numbers_render_without_fraction_when_integral() {
        assert_eq!(Value::Number(200.0).to_json(), json!(200));
        assert_eq!(Value::Number(1.5).to_json(), json!(1.5));
        assert_eq!(Value::Number(f64::NAN).to_json(), json!(null));
        assert_eq!(Value::Number(f64::INFINITY).to_json(), json!(null));
    }

    #[test]
    fn datetime_renders_rfc3339() {
        let v = Value::DateTime(datetime!(2017-10-20 06:28:08 UTC));
        assert_eq!(v.to_json(), json!("2017-10-20T06:28:08Z"));
    }

    #[test]
    fn instance_renders_as_object() {
        let mut inner = Instance::new("Pair");
        inner.insert("n", Value::Number(3.0));

        let mut inst = Instance::new("Holder");
        inst.insert("pair", Value::Instance(inner));
        inst.insert("extra", Value::Raw(json!({"a": [1, 2]})));
        inst.insert("ok", Value::Bool(true));

        assert_eq!(
            inst.to_json(),
            json!({"pair": {"n": 3}, "extra": {"a": [1, 2]}, "ok": true})
        );
    }

    #[test]
    fn take_removes_field() {
        let mut inst = Instance::new("T");
        inst.insert("a", Value::String("x".into()));
        assert_eq!(inst.take("a"), Some(Value::String("x".into())));
        assert!(inst.is_empty());
        assert_eq!(inst.take("a"), None);
    }
}

//! The recursive coercion engine and the construction entry points.
//!
//! [`Coercer::construct`] walks the keys present in a raw record, looks up
//! each key's declared kind, and hands the raw value to
//! [`Coercer::convert`]. Arrays recurse with one more level of depth so
//! that each nesting level reads its own entry of the field's element
//! chain; record types recurse back into `construct`.

use castable_core::{Instance, Metadata, TypeDecl, TypeKind, Value};
use tracing::{debug, trace};

use crate::error::{json_type_name, CastError};
use crate::options::ConvertOptions;
use crate::primitive::{to_bool_with, to_number, to_text};

/// Converts raw values against the declarations in `meta`.
///
/// Holds no state besides a borrowed registry and options, so one
/// `Coercer` can be reused for any number of conversions, from any thread.
pub struct Coercer<'m, M: Metadata + ?Sized> {
    meta: &'m M,
    options: ConvertOptions,
}

impl<M: Metadata + ?Sized> Clone for Coercer<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Metadata + ?Sized> Copy for Coercer<'_, M> {}

impl<'m, M: Metadata + ?Sized> Coercer<'m, M> {
    pub fn new(meta: &'m M) -> Self {
        Self::with_options(meta, ConvertOptions::default())
    }

    pub fn with_options(meta: &'m M, options: ConvertOptions) -> Self {
        Coercer { meta, options }
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Coerce `raw` to `kind`.
    ///
    /// `owner` and `field` locate the element chain for arrays; `depth` is
    /// the current array nesting (0 for the field itself). With no kind
    /// the value passes through untouched.
    pub fn convert(
        &self,
        owner: &str,
        raw: &serde_json::Value,
        kind: Option<&TypeKind>,
        field: &str,
        depth: usize,
    ) -> Result<Value, CastError> {
        let Some(kind) = kind else {
            trace!(owner, field, depth, "no declared type, passing through");
            return Ok(Value::Raw(raw.clone()));
        };

        match kind {
            TypeKind::Number => Ok(Value::Number(to_number(raw))),
            TypeKind::String => Ok(Value::String(to_text(raw))),
            TypeKind::Boolean => Ok(Value::Bool(to_bool_with(raw, self.options.bool_match))),
            TypeKind::Array => {
                let items = raw.as_array().ok_or_else(|| CastError::NotAnArray {
                    context: format!("{}.{}", owner, field),
                    got: json_type_name(raw).to_string(),
                })?;
                let element = self.meta.element_type(owner, field, depth);
                if element.is_none() {
                    trace!(owner, field, depth, "no element type at this depth");
                }
                let next = depth + 1;
                let converted: Result<Vec<Value>, _> = items
                    .iter()
                    .map(|item| self.convert(owner, item, element, field, next))
                    .collect();
                Ok(Value::Array(converted?))
            }
            TypeKind::Structured(r) => self.structured(r.name(), raw),
        }
    }

    /// Build a structured value: a nested instance for record types, or
    /// the value class's own result.
    fn structured(&self, type_name: &str, raw: &serde_json::Value) -> Result<Value, CastError> {
        match self.meta.type_decl(type_name) {
            Some(TypeDecl::Record { .. }) => self.construct(type_name, raw).map(Value::Instance),
            Some(TypeDecl::Value(class)) => {
                class.construct(raw).map_err(|message| CastError::ValueClass {
                    type_name: type_name.to_string(),
                    message,
                })
            }
            None => Err(CastError::UnknownType {
                name: type_name.to_string(),
            }),
        }
    }

    /// Construct an instance of the record type `type_name` from a raw
    /// record.
    ///
    /// Every key present in `raw` is converted and set, declared or not;
    /// declared fields missing from `raw` stay unset.
    pub fn construct(
        &self,
        type_name: &str,
        raw: &serde_json::Value,
    ) -> Result<Instance, CastError> {
        match self.meta.type_decl(type_name) {
            Some(decl) if decl.is_record() => {}
            Some(_) => {
                return Err(CastError::NotRecordType {
                    name: type_name.to_string(),
                })
            }
            None => {
                return Err(CastError::UnknownType {
                    name: type_name.to_string(),
                })
            }
        }

        let record = raw.as_object().ok_or_else(|| CastError::NotARecord {
            type_name: type_name.to_string(),
            got: json_type_name(raw).to_string(),
        })?;

        debug!(type_name, keys = record.len(), "constructing instance");
        let mut instance = Instance::new(type_name);
        for (key, value) in record {
            let kind = self.meta.declared_type(type_name, key);
            let converted = self.convert(type_name, value, kind, key, 0)?;
            instance.insert(key.clone(), converted);
        }
        Ok(instance)
    }

    /// Construct one instance per element of a raw array.
    pub fn construct_all(
        &self,
        type_name: &str,
        raw: &serde_json::Value,
    ) -> Result<Vec<Instance>, CastError> {
        let items = raw.as_array().ok_or_else(|| CastError::NotAnArray {
            context: format!("[{}]", type_name),
            got: json_type_name(raw).to_string(),
        })?;
        items
            .iter()
            .map(|item| self.construct(type_name, item))
            .collect()
    }
}

// ──────────────────────────────────────────────
// Free-function entry points
// ──────────────────────────────────────────────

/// Coerce one raw value with default options. See [`Coercer::convert`].
pub fn convert<M: Metadata + ?Sized>(
    meta: &M,
    owner: &str,
    raw: &serde_json::Value,
    kind: Option<&TypeKind>,
    field: &str,
    depth: usize,
) -> Result<Value, CastError> {
    Coercer::new(meta).convert(owner, raw, kind, field, depth)
}

/// Construct an instance of `type_name` with default options.
pub fn construct<M: Metadata + ?Sized>(
    meta: &M,
    type_name: &str,
    raw: &serde_json::Value,
) -> Result<Instance, CastError> {
    Coercer::new(meta).construct(type_name, raw)
}

/// Construct an instance of `type_name` with explicit options.
pub fn construct_with<M: Metadata + ?Sized>(
    meta: &M,
    type_name: &str,
    raw: &serde_json::Value,
    options: ConvertOptions,
) -> Result<Instance, CastError> {
    Coercer::with_options(meta, options).construct(type_name, raw)
}

/// Construct one instance of `type_name` per element of a raw array.
pub fn construct_all<M: Metadata + ?Sized>(
    meta: &M,
    type_name: &str,
    raw: &serde_json::Value,
) -> Result<Vec<Instance>, CastError> {
    Coercer::new(meta).construct_all(type_name, raw)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BoolMatch;
    use castable_core::{Registry, DATETIME};
    use serde_json::json;

    fn registry() -> Registry {
        Registry::builder()
            .record("Pair", |t| {
                t.field("name", TypeKind::String)
                    .field("n", TypeKind::Number);
            })
            .record("Holder", |t| {
                t.field("pair", TypeKind::structured("Pair"))
                    .field("flag", TypeKind::Boolean)
                    .field("tags", TypeKind::Array)
                    .elements("grid", [TypeKind::Array, TypeKind::Number])
                    .elements("shallow", [TypeKind::Array])
                    .cast("when", TypeKind::structured(DATETIME));
            })
            .build()
            .unwrap()
    }

    #[test]
    fn absent_kind_passes_through() {
        let reg = registry();
        let raw = json!({"nested": [1, "two"]});
        let v = convert(&reg, "Holder", &raw, None, "x", 0).unwrap();
        assert_eq!(v, Value::Raw(raw));
    }

    #[test]
    fn primitives_dispatch_by_kind() {
        let reg = registry();
        let c = Coercer::new(&reg);
        assert_eq!(
            c.convert("Pair", &json!("12"), Some(&TypeKind::Number), "n", 0).unwrap(),
            Value::Number(12.0)
        );
        assert_eq!(
            c.convert("Pair", &json!(12), Some(&TypeKind::String), "name", 0).unwrap(),
            Value::String("12".to_string())
        );
        assert_eq!(
            c.convert("Holder", &json!("yes"), Some(&TypeKind::Boolean), "flag", 0).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn soft_mismatch_yields_nan() {
        let reg = registry();
        let v = convert(&reg, "Pair", &json!("abc"), Some(&TypeKind::Number), "n", 0).unwrap();
        assert!(v.as_f64().unwrap().is_nan());
    }

    #[test]
    fn nested_record_is_constructed() {
        let reg = registry();
        let inst = construct(&reg, "Holder", &json!({"pair": {"name": 7, "n": "3"}})).unwrap();
        let pair = inst.get("pair").and_then(Value::as_instance).unwrap();
        assert_eq!(pair.type_name(), "Pair");
        assert_eq!(pair.get("name"), Some(&Value::String("7".to_string())));
        assert_eq!(pair.get("n"), Some(&Value::Number(3.0)));
    }

    #[test]
    fn array_without_chain_keeps_elements_raw() {
        let reg = registry();
        let inst = construct(&reg, "Holder", &json!({"tags": ["a", 1]})).unwrap();
        assert_eq!(
            inst.get("tags"),
            Some(&Value::Array(vec![Value::Raw(json!("a")), Value::Raw(json!(1))]))
        );
    }

    #[test]
    fn chain_is_consumed_per_depth() {
        let reg = registry();
        let inst = construct(&reg, "Holder", &json!({"grid": [["1", "2"], ["3"]]})).unwrap();
        assert_eq!(
            inst.get("grid"),
            Some(&Value::Array(vec![
                Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]),
                Value::Array(vec![Value::Number(3.0)]),
            ]))
        );
    }

    #[test]
    fn short_chain_passes_deepest_level_through() {
        let reg = registry();
        let inst = construct(&reg, "Holder", &json!({"shallow": [["1", {"k": 2}]]})).unwrap();
        assert_eq!(
            inst.get("shallow"),
            Some(&Value::Array(vec![Value::Array(vec![
                Value::Raw(json!("1")),
                Value::Raw(json!({"k": 2})),
            ])]))
        );
    }

    #[test]
    fn array_kind_on_scalar_is_an_error() {
        let reg = registry();
        let err = construct(&reg, "Holder", &json!({"grid": "nope"})).unwrap_err();
        assert_eq!(
            err,
            CastError::NotAnArray {
                context: "Holder.grid".to_string(),
                got: "string".to_string(),
            }
        );
    }

    #[test]
    fn nested_construction_failure_propagates() {
        let reg = registry();
        let err = construct(&reg, "Holder", &json!({"pair": "flat"})).unwrap_err();
        assert_eq!(
            err,
            CastError::NotARecord {
                type_name: "Pair".to_string(),
                got: "string".to_string(),
            }
        );

        let err = construct(&reg, "Holder", &json!({"when": "soon"})).unwrap_err();
        assert!(matches!(
            err,
            CastError::ValueClass { ref type_name, .. } if type_name == DATETIME
        ));
    }

    #[test]
    fn construct_rejects_unknown_and_value_class_types() {
        let reg = registry();
        assert_eq!(
            construct(&reg, "Missing", &json!({})).unwrap_err(),
            CastError::UnknownType {
                name: "Missing".to_string()
            }
        );
        assert_eq!(
            construct(&reg, DATETIME, &json!({})).unwrap_err(),
            CastError::NotRecordType {
                name: DATETIME.to_string()
            }
        );
    }

    #[test]
    fn unknown_structured_kind_is_an_error() {
        let reg = registry();
        let err = convert(&reg, "Holder", &json!({}), Some(&TypeKind::structured("Ghost")), "g", 0)
            .unwrap_err();
        assert_eq!(
            err,
            CastError::UnknownType {
                name: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn declared_fields_missing_from_source_stay_unset() {
        let reg = registry();
        let inst = construct(&reg, "Pair", &json!({"name": "x"})).unwrap();
        assert_eq!(inst.len(), 1);
        assert!(!inst.contains("n"));
    }

    #[test]
    fn construct_all_maps_each_record() {
        let reg = registry();
        let all = construct_all(&reg, "Pair", &json!([{"n": "1"}, {"n": "2"}])).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].get("n"), Some(&Value::Number(2.0)));

        let err = construct_all(&reg, "Pair", &json!({"n": 1})).unwrap_err();
        assert!(matches!(err, CastError::NotAnArray { .. }));
    }

    #[test]
    fn options_reach_the_boolean_heuristic() {
        let reg = registry();
        let opts = ConvertOptions {
            bool_match: BoolMatch::Exact,
        };
        let inst = construct_with(&reg, "Holder", &json!({"flag": "yup"}), opts).unwrap();
        assert_eq!(inst.get("flag"), Some(&Value::Bool(false)));

        let inst = construct(&reg, "Holder", &json!({"flag": "yup"})).unwrap();
        assert_eq!(inst.get("flag"), Some(&Value::Bool(true)));
    }

    #[test]
    fn coercer_reports_its_options() {
        let reg = registry();
        assert_eq!(Coercer::new(&reg).options(), ConvertOptions::default());

        let opts = ConvertOptions {
            bool_match: BoolMatch::Exact,
        };
        let coercer = Coercer::with_options(&reg, opts);
        assert_eq!(coercer.options().bool_match, BoolMatch::Exact);
    }

    #[test]
    fn works_through_a_trait_object() {
        let reg = registry();
        let meta: &dyn Metadata = &reg;
        let inst = construct(meta, "Pair", &json!({"n": "5"})).unwrap();
        assert_eq!(inst.get("n"), Some(&Value::Number(5.0)));
    }
}

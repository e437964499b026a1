//! Purpose: Materialize raw JSON payloads into `Object` instances from descriptors alone.
//! Exports: `build`, `build_many`.
//! Role: The generic recursive type builder and its collection specialization.
//! Invariants: Required fields are checked before any field is coerced or recursed into.
//! Invariants: All-or-nothing: any failure discards the whole instance or collection.
//! Invariants: Unknown payload keys are ignored; `null` counts as absent unless the kind allows it.
//! Notes: Pure over (descriptor, payload); no shared state, safe to call from any thread.

use super::error::{Error, ErrorKind};
use super::naming::to_domain_name;
use super::object::{FieldValue, Object};
use super::scalar::{coerce, json_kind};
use super::schema::{FieldDef, FieldSpec, TypeDescriptor};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Builds one instance of `descriptor` from a raw JSON object.
pub fn build(descriptor: &'static TypeDescriptor, raw: &Value) -> Result<Object, Error> {
    let Some(payload) = raw.as_object() else {
        return Err(Error::new(ErrorKind::ShapeMismatch)
            .with_message("payload must be an object")
            .with_type(descriptor.name)
            .with_expected("object")
            .with_actual(json_kind(raw)));
    };
    build_map(descriptor, payload).inspect_err(|err| {
        tracing::debug!(type_name = descriptor.name, error = %err, "build failed");
    })
}

/// Builds every element of a raw JSON array, preserving order.
///
/// The first failing element aborts the whole collection; its error is
/// returned with the element index attached.
pub fn build_many(descriptor: &'static TypeDescriptor, raw: &Value) -> Result<Vec<Object>, Error> {
    let Some(items) = raw.as_array() else {
        return Err(Error::new(ErrorKind::ShapeMismatch)
            .with_message("payload must be an array")
            .with_type(descriptor.name)
            .with_expected("array")
            .with_actual(json_kind(raw)));
    };
    build_items(descriptor, items)
}

fn build_items(descriptor: &'static TypeDescriptor, items: &[Value]) -> Result<Vec<Object>, Error> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        out.push(build(descriptor, item).map_err(|err| err.with_index(index))?);
    }
    Ok(out)
}

fn build_map(descriptor: &'static TypeDescriptor, payload: &Map<String, Value>) -> Result<Object, Error> {
    check_required(descriptor, payload)?;

    let mut fields = BTreeMap::new();
    for field in descriptor.fields {
        let value = match present_value(field, payload) {
            Some(raw) => build_field(descriptor, field, raw)?,
            None => FieldValue::Absent,
        };
        fields.insert(to_domain_name(field.name), value);
    }

    if tracing::enabled!(tracing::Level::TRACE) {
        for key in payload.keys() {
            if descriptor.field(key).is_none() {
                tracing::trace!(type_name = descriptor.name, field = %key, "ignoring unknown field");
            }
        }
    }

    Ok(Object::new(descriptor, fields))
}

/// Fails on the first required name, in declaration order, that is absent.
fn check_required(
    descriptor: &'static TypeDescriptor,
    payload: &Map<String, Value>,
) -> Result<(), Error> {
    for name in descriptor.required {
        let present = match descriptor.field(name) {
            Some(field) => present_value(field, payload).is_some(),
            None => payload.get(*name).is_some_and(|value| !value.is_null()),
        };
        if !present {
            return Err(Error::missing_field(descriptor.name, name));
        }
    }
    Ok(())
}

fn present_value<'a>(field: &FieldDef, payload: &'a Map<String, Value>) -> Option<&'a Value> {
    match payload.get(field.name) {
        Some(Value::Null) if !field.spec.allows_null() => None,
        other => other,
    }
}

fn build_field(
    descriptor: &'static TypeDescriptor,
    field: &FieldDef,
    raw: &Value,
) -> Result<FieldValue, Error> {
    match field.spec {
        FieldSpec::Scalar(kind) => coerce(kind, raw)
            .map(FieldValue::Scalar)
            .map_err(|actual| Error::type_mismatch(descriptor.name, field.name, kind.as_str(), actual)),
        FieldSpec::Nested(nested) => {
            let Some(map) = raw.as_object() else {
                return Err(Error::shape_mismatch(
                    descriptor.name,
                    field.name,
                    "object",
                    json_kind(raw),
                ));
            };
            build_map(nested, map)
                .map(|object| FieldValue::Object(Box::new(object)))
                .map_err(|err| Error::nested(descriptor.name, field.name, err))
        }
        FieldSpec::NestedSequence(nested) => {
            let Some(items) = raw.as_array() else {
                return Err(Error::shape_mismatch(
                    descriptor.name,
                    field.name,
                    "array",
                    json_kind(raw),
                ));
            };
            build_items(nested, items)
                .map(FieldValue::Sequence)
                .map_err(|err| Error::nested(descriptor.name, field.name, err))
        }
    }
}

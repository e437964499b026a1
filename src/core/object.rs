//! Purpose: Generic materialized instance of a `TypeDescriptor`.
//! Exports: `Object`, `FieldValue`.
//! Role: Output of the builder; input to typed `ApiType::from_object` conversions.
//! Invariants: Holds exactly one entry per declared field, keyed by domain name.
//! Invariants: Optional fields missing from the payload are `FieldValue::Absent`, never a default.
//! Invariants: Nested objects are owned by their parent.

use super::error::{Error, ErrorKind};
use super::naming::{to_domain_name, to_protocol_name};
use super::scalar::Scalar;
use super::schema::TypeDescriptor;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Absent,
    Scalar(Scalar),
    Object(Box<Object>),
    Sequence(Vec<Object>),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FieldValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            FieldValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Object]> {
        match self {
            FieldValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    fn to_json(&self, protocol_names: bool) -> Option<Value> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Scalar(scalar) => Some(scalar.to_json()),
            FieldValue::Object(object) => Some(object.to_json(protocol_names)),
            FieldValue::Sequence(items) => Some(Value::Array(
                items.iter().map(|item| item.to_json(protocol_names)).collect(),
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Object {
    descriptor: &'static TypeDescriptor,
    fields: BTreeMap<String, FieldValue>,
}

impl Object {
    pub(crate) fn new(
        descriptor: &'static TypeDescriptor,
        fields: BTreeMap<String, FieldValue>,
    ) -> Self {
        Self { descriptor, fields }
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Looks a field up by its domain name (`firstName`).
    pub fn get(&self, domain_name: &str) -> Option<&FieldValue> {
        self.fields.get(domain_name)
    }

    /// Looks a field up by its protocol name (`first_name`).
    pub fn get_protocol(&self, protocol_name: &str) -> Option<&FieldValue> {
        self.fields.get(&to_domain_name(protocol_name))
    }

    pub fn scalar(&self, domain_name: &str) -> Option<&Scalar> {
        self.get(domain_name).and_then(FieldValue::as_scalar)
    }

    pub fn is_present(&self, domain_name: &str) -> bool {
        self.get(domain_name).is_some_and(|value| !value.is_absent())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Moves a field out, leaving `Absent` behind.
    pub fn take(&mut self, domain_name: &str) -> FieldValue {
        self.fields
            .get_mut(domain_name)
            .map(|slot| std::mem::replace(slot, FieldValue::Absent))
            .unwrap_or(FieldValue::Absent)
    }

    pub fn take_string(&mut self, domain_name: &str) -> Result<Option<String>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Scalar(Scalar::String(value)) => Ok(Some(value)),
            other => Err(self.wrong_variant(domain_name, "string", &other)),
        }
    }

    pub fn take_i64(&mut self, domain_name: &str) -> Result<Option<i64>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Scalar(Scalar::Id(value) | Scalar::Integer(value)) => Ok(Some(value)),
            other => Err(self.wrong_variant(domain_name, "integer", &other)),
        }
    }

    pub fn take_bool(&mut self, domain_name: &str) -> Result<Option<bool>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Scalar(Scalar::Bool(value)) => Ok(Some(value)),
            other => Err(self.wrong_variant(domain_name, "bool", &other)),
        }
    }

    pub fn take_f64(&mut self, domain_name: &str) -> Result<Option<f64>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Scalar(Scalar::Float(value)) => Ok(Some(value)),
            other => Err(self.wrong_variant(domain_name, "float", &other)),
        }
    }

    pub fn take_any(&mut self, domain_name: &str) -> Result<Option<Value>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Scalar(Scalar::Any(value)) => Ok(Some(value)),
            other => Err(self.wrong_variant(domain_name, "any", &other)),
        }
    }

    pub fn take_object(&mut self, domain_name: &str) -> Result<Option<Object>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Object(object) => Ok(Some(*object)),
            other => Err(self.wrong_variant(domain_name, "object", &other)),
        }
    }

    pub fn take_sequence(&mut self, domain_name: &str) -> Result<Option<Vec<Object>>, Error> {
        match self.take(domain_name) {
            FieldValue::Absent => Ok(None),
            FieldValue::Sequence(items) => Ok(Some(items)),
            other => Err(self.wrong_variant(domain_name, "sequence", &other)),
        }
    }

    /// Unwraps a field the descriptor marks as required.
    pub fn require<T>(&self, domain_name: &str, value: Option<T>) -> Result<T, Error> {
        value.ok_or_else(|| {
            Error::new(ErrorKind::Internal)
                .with_message("required field absent after build")
                .with_type(self.descriptor.name)
                .with_field(to_protocol_name(domain_name))
        })
    }

    /// JSON keyed by domain names; absent fields are omitted.
    pub fn to_domain_json(&self) -> Value {
        self.to_json(false)
    }

    /// JSON keyed by protocol names; absent fields are omitted.
    pub fn to_protocol_json(&self) -> Value {
        self.to_json(true)
    }

    fn to_json(&self, protocol_names: bool) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            if let Some(json) = value.to_json(protocol_names) {
                let key = if protocol_names {
                    to_protocol_name(name)
                } else {
                    name.clone()
                };
                map.insert(key, json);
            }
        }
        Value::Object(map)
    }

    fn wrong_variant(&self, domain_name: &str, wanted: &str, found: &FieldValue) -> Error {
        let found = match found {
            FieldValue::Absent => "absent".to_string(),
            FieldValue::Scalar(scalar) => scalar.kind().to_string(),
            FieldValue::Object(object) => object.type_name().to_string(),
            FieldValue::Sequence(_) => "sequence".to_string(),
        };
        Error::new(ErrorKind::Internal)
            .with_message("typed conversion disagrees with descriptor")
            .with_type(self.descriptor.name)
            .with_field(to_protocol_name(domain_name))
            .with_expected(wanted)
            .with_actual(found)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor == other.descriptor && self.fields == other.fields
    }
}

//! Purpose: Coerce raw JSON values into declared scalar kinds.
//! Exports: `Scalar`, `coerce`, `json_kind`.
//! Role: One-directional raw -> domain conversion for scalar fields.
//! Invariants: Only `Id` accepts two representations (integer or numeric string).
//! Invariants: Coercion never loses information for the declared kind.

use super::schema::ScalarKind;
use serde_json::{Number, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Id(i64),
    Integer(i64),
    Bool(bool),
    Float(f64),
    Any(Value),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::String(_) => ScalarKind::String,
            Scalar::Id(_) => ScalarKind::Id,
            Scalar::Integer(_) => ScalarKind::Integer,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Any(_) => ScalarKind::Any,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Id(value) | Scalar::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Canonical JSON form. Identifiers always encode as numbers.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::String(value) => Value::String(value.clone()),
            Scalar::Id(value) | Scalar::Integer(value) => Value::Number((*value).into()),
            Scalar::Bool(value) => Value::Bool(*value),
            Scalar::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::Any(value) => value.clone(),
        }
    }
}

/// Coerces `raw` to `kind`; on failure returns the raw value's JSON kind.
pub fn coerce(kind: ScalarKind, raw: &Value) -> Result<Scalar, &'static str> {
    match (kind, raw) {
        (ScalarKind::String, Value::String(value)) => Ok(Scalar::String(value.clone())),
        (ScalarKind::Id, Value::Number(number)) => number.as_i64().map(Scalar::Id).ok_or("number"),
        (ScalarKind::Id, Value::String(text)) => parse_id(text).map(Scalar::Id).ok_or("string"),
        (ScalarKind::Integer, Value::Number(number)) => {
            number.as_i64().map(Scalar::Integer).ok_or("number")
        }
        (ScalarKind::Bool, Value::Bool(value)) => Ok(Scalar::Bool(*value)),
        (ScalarKind::Float, Value::Number(number)) => {
            exact_f64(number).map(Scalar::Float).ok_or("number")
        }
        (ScalarKind::Any, value) => Ok(Scalar::Any(value.clone())),
        (_, other) => Err(json_kind(other)),
    }
}

// Integers beyond 2^53 have no exact f64 form.
fn exact_f64(number: &Number) -> Option<f64> {
    const MAX_EXACT: u64 = 1 << 53;
    if let Some(value) = number.as_i64() {
        return (value.unsigned_abs() <= MAX_EXACT).then_some(value as f64);
    }
    if number.is_u64() {
        return None;
    }
    number.as_f64()
}

fn parse_id(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, coerce, json_kind};
    use crate::core::schema::ScalarKind;
    use serde_json::json;

    #[test]
    fn id_accepts_integer_and_numeric_string() {
        let from_number = coerce(ScalarKind::Id, &json!(123456789012i64)).expect("number");
        let from_string = coerce(ScalarKind::Id, &json!("123456789012")).expect("string");
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Scalar::Id(123456789012));
        assert_eq!(
            coerce(ScalarKind::Id, &json!("-1001234567890")).expect("negative"),
            Scalar::Id(-1001234567890)
        );
    }

    #[test]
    fn id_rejects_non_numeric_forms() {
        assert_eq!(coerce(ScalarKind::Id, &json!("12ab")), Err("string"));
        assert_eq!(coerce(ScalarKind::Id, &json!("+12")), Err("string"));
        assert_eq!(coerce(ScalarKind::Id, &json!("")), Err("string"));
        assert_eq!(coerce(ScalarKind::Id, &json!(1.5)), Err("number"));
        assert_eq!(coerce(ScalarKind::Id, &json!(true)), Err("bool"));
        assert_eq!(coerce(ScalarKind::Id, &json!("99999999999999999999")), Err("string"));
    }

    #[test]
    fn non_identifier_kinds_are_strict() {
        assert_eq!(coerce(ScalarKind::Integer, &json!("42")), Err("string"));
        assert_eq!(coerce(ScalarKind::Bool, &json!("true")), Err("string"));
        assert_eq!(coerce(ScalarKind::Bool, &json!(1)), Err("number"));
        assert_eq!(coerce(ScalarKind::Float, &json!("1.5")), Err("string"));
        assert_eq!(coerce(ScalarKind::String, &json!(7)), Err("number"));
        assert_eq!(coerce(ScalarKind::String, &json!(null)), Err("null"));
    }

    #[test]
    fn float_accepts_exactly_representable_numbers() {
        assert_eq!(coerce(ScalarKind::Float, &json!(2)), Ok(Scalar::Float(2.0)));
        assert_eq!(coerce(ScalarKind::Float, &json!(0.25)), Ok(Scalar::Float(0.25)));
        assert_eq!(
            coerce(ScalarKind::Float, &json!(9007199254740992i64)),
            Ok(Scalar::Float(9007199254740992.0))
        );
        assert_eq!(
            coerce(ScalarKind::Float, &json!(-9007199254740992i64)),
            Ok(Scalar::Float(-9007199254740992.0))
        );
    }

    #[test]
    fn float_rejects_integers_that_would_round() {
        assert_eq!(coerce(ScalarKind::Float, &json!(9007199254740993i64)), Err("number"));
        assert_eq!(coerce(ScalarKind::Float, &json!(i64::MIN)), Err("number"));
        assert_eq!(coerce(ScalarKind::Float, &json!(u64::MAX)), Err("number"));
    }

    #[test]
    fn any_passes_value_through() {
        assert_eq!(coerce(ScalarKind::Any, &json!(null)), Ok(Scalar::Any(json!(null))));
        assert_eq!(
            coerce(ScalarKind::Any, &json!({"k": [1]})),
            Ok(Scalar::Any(json!({"k": [1]})))
        );
    }

    #[test]
    fn identifiers_encode_as_numbers() {
        assert_eq!(Scalar::Id(42).to_json(), json!(42));
        assert_eq!(json_kind(&json!([])), "array");
    }
}

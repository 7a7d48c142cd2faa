//! Tool parameter values.
//!
//! Parameters travel as a name → scalar map. Anything that is not a scalar
//! (arrays, nested objects) is rejected at the boundary where JSON enters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Named parameters for a single tool call
pub type Parameters = BTreeMap<String, ParamValue>;

/// A scalar parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl ParamValue {
    /// Convert a JSON value, rejecting arrays and objects
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => Some(Self::Number(n)),
            Value::String(s) => Some(Self::String(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    /// Short type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Number::from_f64(v).map(Self::Number).unwrap_or(Self::Null)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Convert a JSON object into parameters.
///
/// Returns the offending key when a value is not a scalar.
pub fn parameters_from_json(value: Value) -> std::result::Result<Parameters, String> {
    match value {
        Value::Null => Ok(Parameters::new()),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, v)| match ParamValue::from_json(v) {
                Some(pv) => Ok((key, pv)),
                None => Err(format!("parameter '{}' must be a string, number, boolean or null", key)),
            })
            .collect(),
        other => Err(format!("parameters must be an object, got {}", json_type_name(&other))),
    }
}

/// Render parameters as a JSON object
pub fn parameters_to_json(params: &Parameters) -> Value {
    Value::Object(params.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_deserialization() {
        let params: Parameters = serde_json::from_value(json!({
            "a": 2,
            "b": 2.5,
            "city": "London",
            "flag": true,
            "none": null
        }))
        .unwrap();

        assert_eq!(params["a"], ParamValue::from(2));
        assert_eq!(params["b"], ParamValue::from(2.5));
        assert_eq!(params["city"], ParamValue::from("London"));
        assert_eq!(params["flag"], ParamValue::Bool(true));
        assert_eq!(params["none"], ParamValue::Null);
    }

    #[test]
    fn test_integers_keep_integer_form() {
        let value = ParamValue::from(2);
        assert_eq!(value.to_string(), "2");
        assert_eq!(serde_json::to_string(&value).unwrap(), "2");
    }

    #[test]
    fn test_from_json_rejects_compound_values() {
        assert!(ParamValue::from_json(json!([1, 2])).is_none());
        assert!(ParamValue::from_json(json!({"x": 1})).is_none());
        assert_eq!(ParamValue::from_json(json!("x")), Some(ParamValue::from("x")));
    }

    #[test]
    fn test_parameters_from_json_object() {
        let params = parameters_from_json(json!({"a": 10, "b": 5})).unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["a"].as_number().and_then(|n| n.as_i64()), Some(10));
    }

    #[test]
    fn test_parameters_from_json_null_is_empty() {
        assert!(parameters_from_json(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_parameters_from_json_nested_value() {
        let err = parameters_from_json(json!({"a": {"nested": true}})).unwrap_err();
        assert!(err.contains("'a'"));
    }

    #[test]
    fn test_parameters_from_json_non_object() {
        let err = parameters_from_json(json!([1, 2])).unwrap_err();
        assert!(err.contains("array"));
    }

    #[test]
    fn test_parameters_to_json() {
        let mut params = Parameters::new();
        params.insert("location".to_string(), "Tokyo".into());
        assert_eq!(parameters_to_json(&params), json!({"location": "Tokyo"}));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(ParamValue::from(f64::NAN), ParamValue::Null);
    }
}

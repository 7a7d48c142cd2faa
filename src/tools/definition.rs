//! Tool descriptors and parameter schemas
//!
//! A descriptor is what a tool server advertises for one tool: its name, a
//! description for the LLM, and the schema its parameters must satisfy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::{ParamValue, Parameters};

/// Declared type of a single parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    /// Any schema type we do not check (e.g. "array" from a foreign server)
    #[serde(other)]
    Any,
}

/// One property in a parameter schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub description: String,
}

/// JSON-schema style object description of a tool's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
    #[serde(default)]
    pub required: Vec<String>,
}

fn object_type() -> String {
    "object".to_string()
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self::object()
    }
}

impl ParameterSchema {
    /// Empty object schema
    pub fn object() -> Self {
        Self {
            schema_type: object_type(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add an optional property
    pub fn property(mut self, name: impl Into<String>, param_type: ParamType, description: impl Into<String>) -> Self {
        self.properties.insert(
            name.into(),
            PropertySpec {
                param_type,
                description: description.into(),
            },
        );
        self
    }

    /// Add a property that must be supplied
    pub fn required_property(
        mut self,
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.property(name, param_type, description)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Check parameters against the schema, coercing obvious encodings.
    ///
    /// LLMs frequently quote numbers (`"a": "2"`); a string that parses as
    /// the declared numeric or boolean type is converted. Anything else that
    /// does not match is a validation failure.
    pub fn validate(&self, params: &Parameters) -> std::result::Result<Parameters, String> {
        let mut checked = Parameters::new();

        for (name, value) in params {
            let Some(spec) = self.properties.get(name) else {
                return Err(format!("unexpected parameter '{}'", name));
            };

            if matches!(value, ParamValue::Null) {
                if self.is_required(name) {
                    return Err(format!("required parameter '{}' is null", name));
                }
                continue;
            }

            let coerced = coerce(value, spec.param_type).ok_or_else(|| {
                format!(
                    "parameter '{}' must be of type {}, got {}",
                    name,
                    type_label(spec.param_type),
                    value.type_name()
                )
            })?;
            checked.insert(name.clone(), coerced);
        }

        if let Some(missing) = self.required.iter().find(|r| !checked.contains_key(r.as_str())) {
            return Err(format!("missing required parameter '{}'", missing));
        }

        Ok(checked)
    }
}

fn type_label(param_type: ParamType) -> &'static str {
    match param_type {
        ParamType::String => "string",
        ParamType::Number => "number",
        ParamType::Integer => "integer",
        ParamType::Boolean => "boolean",
        ParamType::Any => "any",
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn coerce(value: &ParamValue, param_type: ParamType) -> Option<ParamValue> {
    match (param_type, value) {
        (ParamType::Any, v) => Some(v.clone()),
        (ParamType::String, ParamValue::String(_)) => Some(value.clone()),
        (ParamType::String, ParamValue::Number(n)) => Some(ParamValue::String(n.to_string())),
        (ParamType::Number, ParamValue::Number(_)) => Some(value.clone()),
        (ParamType::Number, ParamValue::String(s)) => parse_number(s).map(ParamValue::Number),
        (ParamType::Integer, ParamValue::Number(n)) if n.is_i64() || n.is_u64() => Some(value.clone()),
        (ParamType::Integer, ParamValue::String(s)) => s.trim().parse::<i64>().ok().map(ParamValue::from),
        (ParamType::Boolean, ParamValue::Bool(_)) => Some(value.clone()),
        (ParamType::Boolean, ParamValue::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Some(ParamValue::Bool(true)),
            "false" => Some(ParamValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// A tool as advertised in a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name; the key of the surrounding map on the wire
    #[serde(default, skip_serializing)]
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: ParameterSchema,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: ParameterSchema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Replace the description, keeping name and schema
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calculator_schema() -> ParameterSchema {
        ParameterSchema::object()
            .required_property("a", ParamType::Number, "First number")
            .required_property("b", ParamType::Number, "Second number")
    }

    fn params(value: serde_json::Value) -> Parameters {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_schema_serialization_shape() {
        let value = serde_json::to_value(calculator_schema()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number", "description": "First number"},
                    "b": {"type": "number", "description": "Second number"}
                },
                "required": ["a", "b"]
            })
        );
    }

    #[test]
    fn test_schema_deserialization_defaults() {
        let schema: ParameterSchema = serde_json::from_value(json!({})).unwrap();
        assert_eq!(schema.schema_type, "object");
        assert!(schema.properties.is_empty());
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_unknown_property_type_is_any() {
        let spec: PropertySpec = serde_json::from_value(json!({"type": "array"})).unwrap();
        assert_eq!(spec.param_type, ParamType::Any);
    }

    #[test]
    fn test_validate_accepts_numbers() {
        let checked = calculator_schema().validate(&params(json!({"a": 2, "b": 3}))).unwrap();
        assert_eq!(checked["a"], ParamValue::from(2));
    }

    #[test]
    fn test_validate_coerces_quoted_numbers() {
        let checked = calculator_schema()
            .validate(&params(json!({"a": "10", "b": "2.5"})))
            .unwrap();
        assert_eq!(checked["a"], ParamValue::from(10));
        assert_eq!(checked["b"], ParamValue::from(2.5));
    }

    #[test]
    fn test_validate_missing_required() {
        let err = calculator_schema().validate(&params(json!({"a": 1}))).unwrap_err();
        assert_eq!(err, "missing required parameter 'b'");
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = calculator_schema()
            .validate(&params(json!({"a": "two", "b": 3})))
            .unwrap_err();
        assert!(err.contains("'a' must be of type number"));
    }

    #[test]
    fn test_validate_unexpected_parameter() {
        let err = calculator_schema()
            .validate(&params(json!({"a": 1, "b": 2, "c": 3})))
            .unwrap_err();
        assert_eq!(err, "unexpected parameter 'c'");
    }

    #[test]
    fn test_validate_null_optional_is_dropped() {
        let schema = ParameterSchema::object().property("unit", ParamType::String, "Unit");
        let checked = schema.validate(&params(json!({"unit": null}))).unwrap();
        assert!(checked.is_empty());
    }

    #[test]
    fn test_validate_boolean_and_integer() {
        let schema = ParameterSchema::object()
            .property("verbose", ParamType::Boolean, "")
            .property("count", ParamType::Integer, "");
        let checked = schema
            .validate(&params(json!({"verbose": "TRUE", "count": "4"})))
            .unwrap();
        assert_eq!(checked["verbose"], ParamValue::Bool(true));
        assert_eq!(checked["count"], ParamValue::from(4));

        assert!(schema.validate(&params(json!({"count": 1.5}))).is_err());
    }

    #[test]
    fn test_descriptor_wire_form_omits_name() {
        let descriptor = ToolDescriptor::new("addNumber", "Add two numbers together", calculator_schema());
        let value = serde_json::to_value(&descriptor).unwrap();
        assert!(value.get("name").is_none());
        assert_eq!(value["description"], "Add two numbers together");
        assert_eq!(value["parameters"]["required"], json!(["a", "b"]));
    }

    #[test]
    fn test_descriptor_with_description() {
        let descriptor = ToolDescriptor::new("getTime", "old", ParameterSchema::object()).with_description("new");
        assert_eq!(descriptor.name, "getTime");
        assert_eq!(descriptor.description, "new");
    }
}

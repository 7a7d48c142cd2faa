//! Turning an LLM reply into a Decision
//!
//! Framing is handled permissively (code fences, prose around the object) but
//! the content must have the expected shape. Callers map any error here to
//! `Decision::selection_error()`.

use serde_json::{Map, Value};

use crate::domain::{Decision, json_type_name, parameters_from_json};
use crate::error::{AgentError, Result};

const FENCE: &str = "```";

/// How much framing around the JSON object is tolerated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Fenced block, or the span from the first `{` to the last `}`, or the whole text
    #[default]
    Lenient,
    /// Only a lone JSON object or a single fenced block
    Strict,
}

fn parse_error(msg: impl Into<String>) -> AgentError {
    AgentError::SelectionParse(msg.into())
}

/// Drop the opening and closing fence lines
fn unfence(trimmed: &str) -> String {
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < 2 {
        return String::new();
    }
    lines[1..lines.len() - 1].join("\n")
}

/// Find the JSON text inside a reply
pub fn extract_json(reply: &str, mode: ParseMode) -> Result<String> {
    let trimmed = reply.trim();

    if trimmed.starts_with(FENCE) {
        if mode == ParseMode::Strict {
            let closed = trimmed.lines().count() >= 2 && trimmed.lines().last().map(str::trim) == Some(FENCE);
            let inner = unfence(trimmed);
            if !closed || inner.contains(FENCE) {
                return Err(parse_error("reply is not a single fenced block"));
            }
            return Ok(inner);
        }
        return Ok(unfence(trimmed));
    }

    match mode {
        ParseMode::Lenient => match (reply.find('{'), reply.rfind('}')) {
            (Some(start), Some(end)) if start < end => Ok(reply[start..=end].to_string()),
            _ => Ok(reply.to_string()),
        },
        ParseMode::Strict => {
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                Ok(trimmed.to_string())
            } else {
                Err(parse_error("reply is not a lone JSON object"))
            }
        }
    }
}

fn optional_string(object: &Map<String, Value>, key: &str, required: bool) -> Result<Option<String>> {
    match object.get(key) {
        None if required => Err(parse_error(format!("missing key '{}'", key))),
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(parse_error(format!(
            "'{}' must be a string or null, got {}",
            key,
            json_type_name(other)
        ))),
    }
}

/// Validate the reply object's shape and build a Decision from it
pub fn decision_from_value(value: Value) -> Result<Decision> {
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(parse_error(format!("expected a JSON object, got {}", json_type_name(&other))));
        }
    };

    let server_key = optional_string(&object, "mcp_server", true)?;
    let tool_name = optional_string(&object, "tool_name", true)?;
    let rationale = optional_string(&object, "reasoning", false)?.unwrap_or_default();
    let parameters = parameters_from_json(object.remove("parameters").unwrap_or(Value::Null)).map_err(parse_error)?;

    Ok(Decision {
        server_key,
        tool_name,
        parameters,
        rationale,
    })
}

/// Parse a raw LLM reply
pub fn parse_decision(reply: &str, mode: ParseMode) -> Result<Decision> {
    let json = extract_json(reply, mode)?;
    let value: Value = serde_json::from_str(&json).map_err(|e| parse_error(format!("invalid JSON: {}", e)))?;
    decision_from_value(value)
}

use super::errors::AgentError;
use crate::constants::A2UI_DELIMITER;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum AgentDirective {
    Final { response: String },
    CallTool { tool: String, input: Value },
}

/// Reads one model turn.
///
/// Action objects are honoured; anything else, including replies carrying an
/// A2UI payload, is the final answer verbatim.
pub fn parse_agent_action(content: &str) -> Result<AgentDirective, AgentError> {
    let trimmed = content.trim();

    if let Some(map) = parse_whole(trimmed).and_then(action_object) {
        return parse_action(map);
    }
    if !trimmed.contains(A2UI_DELIMITER) {
        if let Some(map) = embedded_object(trimmed).and_then(action_object) {
            return parse_action(map);
        }
    }

    Ok(AgentDirective::Final {
        response: trimmed.to_string(),
    })
}

fn parse_action(map: Map<String, Value>) -> Result<AgentDirective, AgentError> {
    let action = map.get("action").and_then(Value::as_str).unwrap_or_default();
    match action {
        "call_tool" => {
            let tool = map.get("tool").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("call_tool action missing tool field".into())
            })?;
            let input = map.get("input").cloned().unwrap_or(Value::Null);
            Ok(AgentDirective::CallTool {
                tool: tool.to_string(),
                input,
            })
        }
        "final" => {
            let response = map.get("response").and_then(Value::as_str).ok_or_else(|| {
                AgentError::InvalidResponse("final action missing response field".into())
            })?;
            Ok(AgentDirective::Final {
                response: response.to_string(),
            })
        }
        other => Err(AgentError::InvalidResponse(format!(
            "unsupported action '{other}'"
        ))),
    }
}

fn action_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) if map.contains_key("action") => Some(map),
        _ => None,
    }
}

fn parse_whole(trimmed: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let stripped = trimmed.strip_prefix("```")?;
    let stripped = stripped
        .strip_prefix("json")
        .or_else(|| stripped.strip_prefix("JSON"))
        .unwrap_or(stripped);
    let end = stripped.rfind("```")?;
    serde_json::from_str(stripped[..end].trim()).ok()
}

fn embedded_object(trimmed: &str) -> Option<Value> {
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

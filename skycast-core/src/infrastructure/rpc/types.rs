use crate::domain::a2a::{Message, Part, TaskState, TaskUpdate};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl RpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
                data: None,
            }),
            id,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::error(None, PARSE_ERROR, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::error(None, INVALID_REQUEST, message)
    }

    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(
            id,
            METHOD_NOT_FOUND,
            format!("Method '{method}' is not supported by this agent."),
        )
    }
}

/// Parameters of `message/send` and `message/stream`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendParams {
    pub message: Message,
    #[serde(default)]
    pub configuration: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Agent-authored message attached to a task status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub kind: &'static str,
    pub role: &'static str,
    pub message_id: String,
    pub parts: Vec<Part>,
    pub context_id: String,
    pub task_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<AgentMessage>,
    pub timestamp: String,
}

/// Identifiers shared by every update of one task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub task_id: String,
    pub context_id: String,
}

impl TaskHandle {
    pub fn status(&self, update: &TaskUpdate) -> TaskStatus {
        let message = (!update.parts.is_empty()).then(|| AgentMessage {
            kind: "message",
            role: "agent",
            message_id: uuid::Uuid::new_v4().to_string(),
            parts: update.parts.clone(),
            context_id: self.context_id.clone(),
            task_id: self.task_id.clone(),
        });
        TaskStatus {
            state: update.state,
            message,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn status_update(&self, update: &TaskUpdate) -> TaskStatusUpdateEvent {
        TaskStatusUpdateEvent {
            kind: "status-update",
            task_id: self.task_id.clone(),
            context_id: self.context_id.clone(),
            status: self.status(update),
            is_final: update.is_final(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub kind: &'static str,
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Result of `message/send`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub kind: &'static str,
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    pub history: Vec<TaskStatus>,
}

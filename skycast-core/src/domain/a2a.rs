//! A2A message and task types as they appear on the wire.

use crate::a2ui::Directive;
use crate::constants::A2UI_MIME_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

/// Externally visible task states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Working,
    InputRequired,
    Completed,
}

impl TaskState {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    Data {
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<Value>,
    },
    File {
        file: Value,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// One directive per part, tagged so A2UI clients route it to the renderer.
    pub fn directive(directive: &Directive) -> Result<Self, serde_json::Error> {
        serde_json::to_value(directive).map(Self::a2ui)
    }

    /// Parts for a directive batch in order. A directive that fails to encode
    /// is logged and left out rather than sent as a null payload.
    pub fn directives(directives: &[Directive]) -> Vec<Self> {
        directives
            .iter()
            .filter_map(|directive| match Self::directive(directive) {
                Ok(part) => Some(part),
                Err(err) => {
                    error!(
                        surface_id = directive.surface_id(),
                        %err,
                        "Failed to encode A2UI directive"
                    );
                    None
                }
            })
            .collect()
    }

    pub fn a2ui(data: Value) -> Self {
        Part::Data {
            data,
            metadata: Some(json!({ "mimeType": A2UI_MIME_TYPE })),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Part::Data { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn is_a2ui(&self) -> bool {
        matches!(
            self,
            Part::Data { metadata: Some(meta), .. }
                if meta.get("mimeType").and_then(Value::as_str) == Some(A2UI_MIME_TYPE)
        )
    }
}

/// Inbound user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub context_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

/// One status change emitted while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub state: TaskState,
    pub parts: Vec<Part>,
}

impl TaskUpdate {
    pub fn working() -> Self {
        Self {
            state: TaskState::Working,
            parts: Vec::new(),
        }
    }

    pub fn input_required(parts: Vec<Part>) -> Self {
        Self {
            state: TaskState::InputRequired,
            parts,
        }
    }

    pub fn completed(parts: Vec<Part>) -> Self {
        Self {
            state: TaskState::Completed,
            parts,
        }
    }

    /// Only a completed turn closes the task.
    pub fn is_final(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn directive_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_a2ui()).count()
    }
}

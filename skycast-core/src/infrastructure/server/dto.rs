use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestChatRequest {
    pub prompt: Option<String>,
    /// Conversation to continue. A new one is started when absent.
    pub session_id: Option<String>,
    /// Render A2UI directives in the reply.
    #[serde(default)]
    pub ui: bool,
    /// A `userAction` payload sent back from a rendered surface.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub user_action: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestChatResponse {
    pub session_id: String,
    /// `working`, `input-required` or `completed`.
    pub state: String,
    pub content: String,
    #[schema(value_type = Vec<Object>)]
    pub directives: Vec<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

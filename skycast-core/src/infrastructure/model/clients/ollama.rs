use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::BackendKind;
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, StopReason};

/// Local models served by Ollama's `/api/chat`. No authentication.
#[derive(Clone)]
pub struct OllamaClient {
    base: HttpClientBase,
}

impl OllamaClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), None),
        }
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Ollama
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let body = ChatBody {
            model: &request.model,
            messages: MessageAdapter::to_ollama_format(&request.messages),
            stream: false,
        };
        debug!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            session_id = request.session_id.as_deref().unwrap_or("-"),
            messages = request.messages.len(),
            "Calling Ollama"
        );

        let reply: ChatReply = self
            .base
            .post_no_auth(&self.base.build_url("/api/chat"), &body)
            .await?;
        let (content, stop) = reply.into_content(&self.base.id)?;
        if stop == StopReason::Truncated {
            warn!(provider = self.base.id.as_str(), "Ollama stopped at the output limit");
        }
        Ok(ModelResponse::with_stop(content, request.session_id, stop))
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatReply {
    message: Option<ReplyMessage>,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

impl ChatReply {
    fn into_content(self, provider: &str) -> Result<(String, StopReason), ModelError> {
        let message = self
            .message
            .ok_or_else(|| ModelError::invalid_response(provider, "reply has no message"))?;
        let stop = match self.done_reason.as_deref() {
            Some("stop") => StopReason::Complete,
            Some("length") => StopReason::Truncated,
            _ => StopReason::Unreported,
        };
        Ok((message.content, stop))
    }
}

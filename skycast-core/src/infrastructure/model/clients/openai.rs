use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::{BackendKind, resolve_api_key};
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, StopReason};

/// Any endpoint speaking the chat-completions protocol (OpenAI, Groq, vLLM, ...).
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn kind(&self) -> BackendKind {
        BackendKind::OpenAiCompatible
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let body = CompletionBody {
            model: &request.model,
            messages: MessageAdapter::to_openai_format(&request.messages),
            stream: false,
        };
        debug!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            session_id = request.session_id.as_deref().unwrap_or("-"),
            messages = request.messages.len(),
            "Calling chat-completions endpoint"
        );

        let reply: CompletionReply = self
            .base
            .post_with_bearer(&self.base.build_url(&self.api_path), &body)
            .await?;
        let (content, stop) = reply.into_content(&self.base.id)?;
        if stop == StopReason::Truncated {
            warn!(provider = self.base.id.as_str(), "Completion stopped at the output limit");
        }
        Ok(ModelResponse::with_stop(content, request.session_id, stop))
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<Value>,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionReply {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl CompletionReply {
    fn into_content(self, provider: &str) -> Result<(String, StopReason), ModelError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response(provider, "reply has no choices"))?;
        let stop = match choice.finish_reason.as_deref() {
            Some("stop") => StopReason::Complete,
            Some("length") => StopReason::Truncated,
            _ => StopReason::Unreported,
        };
        let message = choice
            .message
            .ok_or_else(|| ModelError::invalid_response(provider, "choice has no message"))?;

        match (message.content, message.refusal) {
            (Some(content), _) => Ok((content, stop)),
            (None, Some(refusal)) => Err(ModelError::refused(provider, refusal)),
            (None, None) => Err(ModelError::invalid_response(provider, "missing content")),
        }
    }
}

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::base::HttpClientBase;
use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::{BackendKind, resolve_api_key};
use crate::infrastructure::model::traits::ModelClient;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse, StopReason};

/// Google Generative Language API (`models/{model}:generateContent`).
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
}

impl GeminiClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(config.id.clone(), config.endpoint.clone(), api_key),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        let path = self.api_path.trim_matches('/');
        self.base.build_url(&format!("{path}/{model}:generateContent"))
    }
}

/// Replies mix prose with a JSON payload, so no response MIME type is forced.
fn request_body(request: &ModelRequest) -> Value {
    let (system, contents) = MessageAdapter::to_gemini_format(&request.messages);
    let mut body = json!({ "contents": contents });
    if let Some(system) = system {
        body["system_instruction"] = json!({ "parts": [{ "text": system }] });
    }
    body
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Gemini
    }

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        debug!(
            provider = self.base.id.as_str(),
            model = request.model.as_str(),
            session_id = request.session_id.as_deref().unwrap_or("-"),
            messages = request.messages.len(),
            "Calling Gemini"
        );

        let reply: GenerateReply = self
            .base
            .post_with_query_key(&self.generate_url(&request.model), &request_body(&request))
            .await?;
        let (content, stop) = reply.into_content(&self.base.id)?;
        if stop == StopReason::Truncated {
            warn!(provider = self.base.id.as_str(), "Gemini stopped at MAX_TOKENS");
        }
        Ok(ModelResponse::with_stop(content, request.session_id, stop))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl GenerateReply {
    fn into_content(self, provider: &str) -> Result<(String, StopReason), ModelError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ModelError::refused(provider, format!("prompt blocked: {reason}")));
        }
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response(provider, "reply has no candidates"))?;

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        let finish = candidate.finish_reason.as_deref();
        if text.is_empty() {
            return Err(match finish {
                Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST")) => {
                    ModelError::refused(provider, reason)
                }
                _ => ModelError::invalid_response(provider, "missing text"),
            });
        }
        let stop = match finish {
            Some("STOP") => StopReason::Complete,
            Some("MAX_TOKENS") => StopReason::Truncated,
            _ => StopReason::Unreported,
        };
        Ok((text, stop))
    }
}

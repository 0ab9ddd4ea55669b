//! Requests sent to chat backends and the replies they hand back.

use crate::types::{ChatMessage, MessageRole};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub provider: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<String>,
}

/// Why the backend stopped producing tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    Complete,
    /// Output limit reached. A directive payload in the reply is likely cut short.
    Truncated,
    /// The backend did not say.
    Unreported,
}

#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub message: ChatMessage,
    pub session_id: Option<String>,
    pub stop: StopReason,
}

impl ModelResponse {
    pub fn new(content: String, session_id: Option<String>) -> Self {
        Self::with_stop(content, session_id, StopReason::Complete)
    }

    pub fn with_stop(content: String, session_id: Option<String>, stop: StopReason) -> Self {
        Self {
            message: ChatMessage::new(MessageRole::Assistant, content),
            session_id,
            stop,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.stop == StopReason::Truncated
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' is not configured")]
    ProviderNotFound { provider: String },
    #[error("model '{model}' is not available for provider '{provider}'")]
    ModelNotFound { provider: String, model: String },
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' refused to answer: {reason}")]
    Refused { provider: String, reason: String },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn provider_not_found(provider: impl Into<String>) -> Self {
        Self::ProviderNotFound {
            provider: provider.into(),
        }
    }

    pub fn model_not_found(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider: provider.into(),
            model: model.into(),
        }
    }

    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn refused(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Refused {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Short explanation suitable for showing to an operator.
    pub fn user_message(&self) -> String {
        match self {
            ModelError::ProviderNotFound { provider } => {
                format!("Model provider '{provider}' is not configured. Check skycast.toml.")
            }
            ModelError::ModelNotFound { provider, model } => {
                format!("Model '{model}' is not offered by provider '{provider}'.")
            }
            ModelError::MissingApiKey { provider } => {
                format!("Provider '{provider}' needs an API key. Set it in config/.env.")
            }
            ModelError::Network { provider, source } => network_message(provider, source),
            ModelError::Refused { provider, reason } => {
                format!("Provider '{provider}' declined the request ({reason}).")
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Provider '{provider}' sent a response that could not be read.")
            }
        }
    }
}

fn network_message(provider: &str, source: &reqwest::Error) -> String {
    if source.is_connect() {
        return format!("Could not connect to model provider '{provider}'.");
    }
    if source.is_timeout() {
        return format!("The request to '{provider}' timed out.");
    }
    match source.status() {
        Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
            format!("Provider '{provider}' rejected the API key.")
        }
        Some(StatusCode::TOO_MANY_REQUESTS) => {
            format!("Provider '{provider}' is rate limiting requests.")
        }
        Some(StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY) => {
            format!("Provider '{provider}' is currently unavailable.")
        }
        Some(status) => format!("Request to '{provider}' failed: {}", status.as_u16()),
        None => format!("Network error talking to '{provider}'."),
    }
}

//! Builds model clients from `[[providers]]` entries.

use super::clients::{GeminiClient, OllamaClient, OpenAIClient};
use super::traits::ModelClient;
use crate::config::ModelProviderConfig;
use std::env;
use std::fmt;
use tracing::debug;

/// Wire protocol spoken by a provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    Ollama,
    /// Anything that speaks `/v1/chat/completions`.
    OpenAiCompatible,
}

impl BackendKind {
    /// Maps a provider `type`. Unrecognised types are treated as OpenAI-compatible.
    pub fn from_provider_type(provider_type: &str) -> Self {
        match provider_type.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" | "google-ai" => BackendKind::Gemini,
            "ollama" | "localai" => BackendKind::Ollama,
            _ => BackendKind::OpenAiCompatible,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Ollama => "ollama",
            BackendKind::OpenAiCompatible => "openai",
        })
    }
}

/// Resolves an `api_key` setting.
///
/// The value names an environment variable. When no such variable is set the
/// value itself is used as the key.
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim).filter(|raw| !raw.is_empty())?;
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(
                provider,
                env_var = raw,
                %err,
                "API key variable not set; using the configured value directly"
            );
            Some(raw.to_string())
        }
    }
}

pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(config: &ModelProviderConfig) -> Box<dyn ModelClient> {
        let kind = BackendKind::from_provider_type(&config.provider_type);
        debug!(provider = config.id.as_str(), %kind, endpoint = config.endpoint.as_str(), "Creating model client");
        match kind {
            BackendKind::Gemini => Box::new(GeminiClient::from_config(config)),
            BackendKind::Ollama => Box::new(OllamaClient::from_config(config)),
            BackendKind::OpenAiCompatible => Box::new(OpenAIClient::from_config(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(provider_type: &str) -> ModelProviderConfig {
        ModelProviderConfig {
            id: "weather-llm".into(),
            provider_type: provider_type.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            api_path: None,
            models: Vec::new(),
        }
    }

    #[test]
    fn api_key_prefers_environment_variable() {
        // PATH is always present in the test environment.
        let resolved = resolve_api_key("gemini", Some("PATH"));
        assert_eq!(resolved, env::var("PATH").ok());
    }

    #[test]
    fn api_key_falls_back_to_literal_value() {
        let resolved = resolve_api_key("gemini", Some("sk-not-a-variable-name-1234"));
        assert_eq!(resolved.as_deref(), Some("sk-not-a-variable-name-1234"));
    }

    #[test]
    fn blank_api_key_resolves_to_none() {
        assert_eq!(resolve_api_key("gemini", Some("  ")), None);
        assert_eq!(resolve_api_key("gemini", None), None);
    }

    #[test]
    fn provider_types_map_to_backends() {
        assert_eq!(BackendKind::from_provider_type("Ollama"), BackendKind::Ollama);
        assert_eq!(BackendKind::from_provider_type("google"), BackendKind::Gemini);
        assert_eq!(
            BackendKind::from_provider_type("groq"),
            BackendKind::OpenAiCompatible
        );
    }

    #[test]
    fn factory_builds_the_matching_client() {
        let client = ProviderFactory::create(&provider("gemini"));
        assert_eq!(client.id(), "weather-llm");
        assert_eq!(client.kind(), BackendKind::Gemini);
        assert_eq!(
            ProviderFactory::create(&provider("openai")).kind(),
            BackendKind::OpenAiCompatible
        );
    }
}

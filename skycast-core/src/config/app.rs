use super::error::ConfigError;
use super::provider::ModelProviderConfig;
use super::settings::{AgentSettings, ServerSettings, SessionSettings, WeatherSettings};
use std::path::Path;

/// Application configuration loaded from skycast.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_provider: String,
    pub model: String,
    pub agent: AgentSettings,
    pub server: ServerSettings,
    pub weather: WeatherSettings,
    pub session: SessionSettings,
    pub providers: Vec<ModelProviderConfig>,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content)
    }

    /// Switches the default provider, keeping the configured one when `provider` is unknown.
    pub fn select_provider(&mut self, provider: &str) -> Result<(), ConfigError> {
        if !self.providers.iter().any(|p| p.id == provider) {
            return Err(ConfigError::UnknownProvider {
                provider: provider.to_string(),
            });
        }
        self.default_provider = provider.to_string();
        let model = self.model.clone();
        self.select_model(&model);
        Ok(())
    }

    pub fn select_model(&mut self, model: &str) {
        self.model = model.to_string();
        if let Some(provider) = self
            .providers
            .iter_mut()
            .find(|p| p.id == self.default_provider)
        {
            provider.ensure_model(model);
        }
    }
}

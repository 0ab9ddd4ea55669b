use super::AppConfig;
use super::error::ConfigError;
use super::provider::{ModelProviderConfig, RawProviderConfig};
use super::settings::{
    AgentSettings, RawAgent, RawServer, RawSession, RawWeather, ServerSettings, SessionSettings,
    SessionStoreKind, WeatherSettings,
};
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawConfig {
    pub model: Option<String>,
    pub default_provider: Option<String>,
    #[serde(default)]
    pub agent: RawAgent,
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub weather: RawWeather,
    #[serde(default)]
    pub session: RawSession,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
}

/// Loads `config/.env`, then `.env`, once per process. Variables already set win.
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        for file in [ENV_PATH, ".env"] {
            if from_filename(file).is_ok() {
                debug!(file, "Loaded environment file");
            }
        }
    });
}

pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    debug!(path = %config_path.display(), "Reading configuration file");

    let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig =
        toml::from_str(content).map_err(|source| ConfigError::Parse { source })?;
    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let model = non_blank(parsed.model).ok_or_else(|| ConfigError::missing("model"))?;
    let default_provider = non_blank(parsed.default_provider)
        .ok_or_else(|| ConfigError::missing("default_provider"))?;

    if parsed.providers.is_empty() {
        return Err(ConfigError::missing("providers"));
    }

    let mut providers = Vec::with_capacity(parsed.providers.len());
    for mut raw in parsed.providers {
        let endpoint = non_blank(raw.endpoint.take())
            .ok_or_else(|| ConfigError::missing(format!("providers.{}.endpoint", raw.id)))?;
        providers.push(ModelProviderConfig::from_raw(raw, endpoint));
    }
    let default = providers
        .iter_mut()
        .find(|p| p.id == default_provider)
        .ok_or_else(|| ConfigError::UnknownProvider {
            provider: default_provider.clone(),
        })?;
    default.ensure_model(&model);

    Ok(AppConfig {
        default_provider,
        model,
        agent: build_agent(parsed.agent)?,
        server: build_server(parsed.server),
        weather: build_weather(parsed.weather)?,
        session: build_session(parsed.session)?,
        providers,
    })
}

fn build_agent(raw: RawAgent) -> Result<AgentSettings, ConfigError> {
    let defaults = AgentSettings::default();
    let max_attempts = raw.max_attempts.unwrap_or(defaults.max_attempts);
    if max_attempts == 0 {
        return Err(ConfigError::invalid("agent.max_attempts", "must be at least 1"));
    }
    Ok(AgentSettings {
        max_attempts,
        max_tool_steps: raw.max_tool_steps.unwrap_or(defaults.max_tool_steps),
        ui_examples: raw.ui_examples.unwrap_or(defaults.ui_examples),
    })
}

fn build_server(raw: RawServer) -> ServerSettings {
    let defaults = ServerSettings::default();
    ServerSettings {
        bind: non_blank(raw.bind).unwrap_or(defaults.bind),
        public_url: non_blank(raw.public_url),
        allowed_origins: raw.allowed_origins.unwrap_or(defaults.allowed_origins),
        force_ui: raw.force_ui.unwrap_or(defaults.force_ui),
    }
}

fn build_weather(raw: RawWeather) -> Result<WeatherSettings, ConfigError> {
    let defaults = WeatherSettings::default();
    let timeout_secs = raw.timeout_secs.unwrap_or(defaults.timeout_secs);
    if timeout_secs == 0 {
        return Err(ConfigError::invalid("weather.timeout_secs", "must be positive"));
    }
    Ok(WeatherSettings {
        geocode_endpoint: non_blank(raw.geocode_endpoint).unwrap_or(defaults.geocode_endpoint),
        forecast_endpoint: non_blank(raw.forecast_endpoint).unwrap_or(defaults.forecast_endpoint),
        user_agent: non_blank(raw.user_agent).unwrap_or(defaults.user_agent),
        timeout_secs,
    })
}

fn build_session(raw: RawSession) -> Result<SessionSettings, ConfigError> {
    let defaults = SessionSettings::default();
    let store = match raw.store.as_deref().map(str::trim) {
        None | Some("memory") => SessionStoreKind::Memory,
        Some("file") => SessionStoreKind::File,
        Some(other) => {
            return Err(ConfigError::invalid(
                "session.store",
                format!("expected \"memory\" or \"file\", got \"{other}\""),
            ));
        }
    };
    let dir = match non_blank(raw.dir) {
        Some(dir) => PathBuf::from(expand(&dir)),
        None => defaults.dir,
    };
    Ok(SessionSettings { store, dir })
}

fn expand(value: &str) -> String {
    shellexpand::full(value)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Typed sections of `skycast.toml` with their defaults applied.

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_FORECAST_ENDPOINT, DEFAULT_GEOCODE_ENDPOINT, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_TOOL_STEPS, DEFAULT_SESSION_DIR, DEFAULT_USER_AGENT, DEFAULT_WEATHER_TIMEOUT_SECS,
};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3001", "http://localhost:5173"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    /// Generation attempts per turn, including the first.
    pub max_attempts: u32,
    pub max_tool_steps: usize,
    /// Embed the forecast and alerts templates in the UI fetcher instructions.
    pub ui_examples: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_tool_steps: DEFAULT_MAX_TOOL_STEPS,
            ui_examples: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: String,
    pub public_url: Option<String>,
    pub allowed_origins: Vec<String>,
    /// Treat every request as if the A2UI extension had been requested.
    pub force_ui: bool,
}

impl ServerSettings {
    /// Base URL advertised in the agent card.
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}/", self.bind))
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
            public_url: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            force_ui: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSettings {
    pub geocode_endpoint: String,
    pub forecast_endpoint: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            geocode_endpoint: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            forecast_endpoint: DEFAULT_FORECAST_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_WEATHER_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStoreKind {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub store: SessionStoreKind,
    pub dir: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store: SessionStoreKind::Memory,
            dir: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawAgent {
    pub(super) max_attempts: Option<u32>,
    pub(super) max_tool_steps: Option<usize>,
    pub(super) ui_examples: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawServer {
    pub(super) bind: Option<String>,
    pub(super) public_url: Option<String>,
    pub(super) allowed_origins: Option<Vec<String>>,
    pub(super) force_ui: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawWeather {
    pub(super) geocode_endpoint: Option<String>,
    pub(super) forecast_endpoint: Option<String>,
    pub(super) user_agent: Option<String>,
    pub(super) timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawSession {
    pub(super) store: Option<String>,
    pub(super) dir: Option<String>,
}

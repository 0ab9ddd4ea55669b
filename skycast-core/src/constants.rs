//! Application constants
//!
//! Single source of truth for paths, wire identifiers and fixed texts.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/skycast.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Separates the natural-language part of a reply from its A2UI payload.
pub const A2UI_DELIMITER: &str = "---a2ui_JSON---";

/// URI under which clients request the A2UI extension.
pub const A2UI_EXTENSION_URI: &str = "https://a2ui.org/a2a-extension/a2ui/v0.8";

/// Request header carrying the extensions a client wants activated.
pub const EXTENSIONS_HEADER: &str = "x-a2a-extensions";

/// MIME type attached to outbound directive parts.
pub const A2UI_MIME_TYPE: &str = "application/json+a2ui";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_MAX_TOOL_STEPS: usize = 8;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:10002";
pub const DEFAULT_SESSION_DIR: &str = "data/sessions";

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_FORECAST_ENDPOINT: &str = "https://api.weather.gov";
pub const DEFAULT_USER_AGENT: &str = "skycast-weather-agent/0.3 (https://github.com/skycast/skycast)";
pub const DEFAULT_WEATHER_TIMEOUT_SECS: u64 = 15;

pub const APOLOGY_TEXT: &str = "I'm sorry, I'm having trouble generating the interface for that request right now. Please try again in a moment.";
pub const REJECTION_TEXT: &str = "No problem! Let me know if you change your mind.";
pub const NO_RESPONSE_TEXT: &str = "Sorry, I didn't get a response. Please try again.";
pub const EMPTY_TURN_TEXT: &str = "Please tell me which location you'd like the weather for.";

/// Default OpenAI-compatible chat path (fallback when not specified in config)
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

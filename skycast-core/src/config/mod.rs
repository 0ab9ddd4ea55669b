pub mod app;
pub mod error;
pub mod loader;
pub mod provider;
pub mod settings;

pub use app::AppConfig;
pub use error::ConfigError;
pub use loader::ensure_env_loaded;
pub use provider::{ModelInfo, ModelProviderConfig};
pub use settings::{AgentSettings, ServerSettings, SessionSettings, SessionStoreKind, WeatherSettings};

// Config loading tests - AppConfig::load from disk, defaults and overrides.

use serial_test::serial;
use skycast_core::config::{AppConfig, ConfigError, SessionStoreKind};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const BASE: &str = r#"
default_provider = "ollama"
model = "llama3.2"

[[providers]]
id = "ollama"
type = "ollama"
endpoint = "http://127.0.0.1:11434"
models = ["llama3.2"]

[[providers]]
id = "gemini"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"
models = [{ name = "gemini-2.5-flash", display_name = "Gemini 2.5 Flash" }]
"#;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("skycast.toml");
    fs::write(&path, content).expect("Failed to write skycast.toml");
    path
}

#[test]
fn returns_io_error_when_file_is_missing() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/skycast.toml")));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn returns_parse_error_for_unknown_sections() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), &format!("{BASE}\n[telemetry]\nenabled = true\n"));

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn loads_defaults_for_omitted_sections() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), BASE);

    let config = AppConfig::load(Some(&path)).expect("config loads");

    assert_eq!(config.default_provider, "ollama");
    assert_eq!(config.model, "llama3.2");
    assert_eq!(config.agent.max_attempts, 2);
    assert!(config.agent.ui_examples);
    assert_eq!(config.server.bind, "127.0.0.1:10002");
    assert_eq!(config.server.public_url(), "http://127.0.0.1:10002/");
    assert!(!config.server.force_ui);
    assert_eq!(config.weather.forecast_endpoint, "https://api.weather.gov");
    assert_eq!(config.session.store, SessionStoreKind::Memory);
    assert_eq!(config.providers.len(), 2);
    assert_eq!(
        config.providers[1].models[0].display_name.as_deref(),
        Some("Gemini 2.5 Flash")
    );
}

#[test]
fn reads_server_and_agent_sections() {
    let dir = tempdir().unwrap();
    let content = format!(
        r#"{BASE}
[agent]
max_attempts = 3
ui_examples = false

[server]
bind = "0.0.0.0:8080"
public_url = "https://weather.example.com/"
allowed_origins = ["https://app.example.com"]
force_ui = true
"#
    );
    let path = write_config(dir.path(), &content);

    let config = AppConfig::load(Some(&path)).unwrap();

    assert_eq!(config.agent.max_attempts, 3);
    assert!(!config.agent.ui_examples);
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.server.public_url(), "https://weather.example.com/");
    assert_eq!(config.server.allowed_origins, vec!["https://app.example.com"]);
    assert!(config.server.force_ui);
}

#[test]
#[serial]
fn expands_environment_in_session_dir() {
    let dir = tempdir().unwrap();
    // SAFETY: serialized with the other env-touching tests in this binary.
    unsafe { std::env::set_var("SKYCAST_TEST_DATA", dir.path()) };
    let content = format!("{BASE}\n[session]\nstore = \"file\"\ndir = \"$SKYCAST_TEST_DATA/sessions\"\n");
    let path = write_config(dir.path(), &content);

    let config = AppConfig::load(Some(&path)).unwrap();
    unsafe { std::env::remove_var("SKYCAST_TEST_DATA") };

    assert_eq!(config.session.store, SessionStoreKind::File);
    assert_eq!(config.session.dir, dir.path().join("sessions"));
}

#[test]
fn select_provider_switches_and_registers_model() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), BASE);
    let mut config = AppConfig::load(Some(&path)).unwrap();

    config.select_provider("gemini").expect("gemini is configured");
    config.select_model("gemini-2.5-pro");

    assert_eq!(config.default_provider, "gemini");
    assert_eq!(config.model, "gemini-2.5-pro");
    let gemini = config.providers.iter().find(|p| p.id == "gemini").unwrap();
    assert!(gemini.models.iter().any(|m| m.name == "gemini-2.5-pro"));
}

#[test]
fn select_provider_rejects_unknown_ids() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), BASE);
    let mut config = AppConfig::load(Some(&path)).unwrap();

    let err = config.select_provider("anthropic").unwrap_err();

    assert!(matches!(err, ConfigError::UnknownProvider { ref provider } if provider == "anthropic"));
    assert_eq!(config.default_provider, "ollama");
}

#[test]
fn provider_without_endpoint_is_rejected() {
    let content = BASE.replace("endpoint = \"http://127.0.0.1:11434\"\n", "");
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), &content);

    let err = AppConfig::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::MissingField { ref field } if field == "providers.ollama.endpoint"));
}

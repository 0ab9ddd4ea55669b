use clap::Parser;
use skycast_core::agent::WeatherToolbox;
use skycast_core::config::{AppConfig, SessionStoreKind};
use skycast_core::dispatch::{AgentRoster, DispatchRouter};
use skycast_core::model::DynamicModelProvider;
use skycast_core::server;
use skycast_core::weather::HttpWeatherService;
use skycast_session::{ConversationStore, FileConversationStore, MemoryConversationStore};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "skycast",
    version,
    about = "A2A weather agent with confirmation-gated A2UI surfaces"
)]
struct Cli {
    /// Configuration file (defaults to config/skycast.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on, overriding `server.bind`
    #[arg(long)]
    bind: Option<String>,
    /// Provider id, overriding `default_provider`
    #[arg(long)]
    provider: Option<String>,
    /// Model name, overriding `model`
    #[arg(long)]
    model: Option<String>,
    /// Render A2UI for every client, even without the extension header
    #[arg(long)]
    force_ui: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    info!("Starting skycast");
    debug!(config = ?cli.config, bind = ?cli.bind, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(provider) = &cli.provider {
        config.select_provider(provider)?;
    }
    if let Some(model) = &cli.model {
        config.select_model(model);
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    config.server.force_ui |= cli.force_ui;
    info!(
        provider = %config.default_provider,
        model = %config.model,
        force_ui = config.server.force_ui,
        "Configuration loaded"
    );

    let store: Arc<dyn ConversationStore> = match config.session.store {
        SessionStoreKind::Memory => Arc::new(MemoryConversationStore::new()),
        SessionStoreKind::File => {
            info!(dir = %config.session.dir.display(), "Persisting conversations to disk");
            Arc::new(FileConversationStore::new(config.session.dir.clone()))
        }
    };

    let provider = Arc::new(DynamicModelProvider::from_configs(&config.providers));
    let weather = Arc::new(HttpWeatherService::from_settings(&config.weather)?);
    let toolbox = WeatherToolbox::new(weather, Arc::clone(&store));
    let roster = AgentRoster::from_config(&config, provider, toolbox, Arc::clone(&store));
    let router = DispatchRouter::new(roster, store);

    server::serve(router, &config.server).await?;
    info!("Server stopped");
    Ok(())
}

fn init_tracing(default_level: &str) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}

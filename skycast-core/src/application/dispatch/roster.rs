use super::agent::{Agent, ReplyAgent};
use crate::agent::{AgentProfile, Generator, ModelSelection, ToolAgent, WeatherToolbox};
use crate::config::AppConfig;
use crate::generation::{OutputMode, RetryLoop};
use crate::model::ModelProvider;
use skycast_session::ConversationStore;
use std::sync::Arc;

/// The agents a router can hand a turn to.
#[derive(Clone)]
pub struct AgentRoster {
    gatherer: Arc<dyn Agent>,
    fetcher_ui: Arc<dyn Agent>,
    fetcher_text: Arc<dyn Agent>,
}

impl AgentRoster {
    pub fn new(
        gatherer: Arc<dyn Agent>,
        fetcher_ui: Arc<dyn Agent>,
        fetcher_text: Arc<dyn Agent>,
    ) -> Self {
        Self {
            gatherer,
            fetcher_ui,
            fetcher_text,
        }
    }

    /// The gatherer and both fetchers, all talking to the configured default
    /// provider and model. Only the UI fetcher validates directive batches.
    pub fn from_config<P>(
        config: &AppConfig,
        provider: Arc<P>,
        toolbox: WeatherToolbox,
        store: Arc<dyn ConversationStore>,
    ) -> Self
    where
        P: ModelProvider + 'static,
    {
        let selection = ModelSelection {
            provider: config.default_provider.clone(),
            model: config.model.clone(),
        };
        let max_attempts = config.agent.max_attempts;
        let build = |profile: AgentProfile, mode: OutputMode| -> Arc<dyn Agent> {
            let name = profile.name;
            let generator: Arc<dyn Generator> = Arc::new(ToolAgent::new(
                profile,
                Arc::clone(&provider),
                selection.clone(),
                toolbox.clone(),
                Arc::clone(&store),
                config.agent.max_tool_steps,
            ));
            Arc::new(ReplyAgent::new(
                name,
                generator,
                RetryLoop::new(mode, max_attempts),
            ))
        };

        Self::new(
            build(AgentProfile::gatherer(), OutputMode::Text),
            build(
                AgentProfile::ui_fetcher(config.agent.ui_examples),
                OutputMode::Structured,
            ),
            build(AgentProfile::text_fetcher(), OutputMode::Text),
        )
    }

    pub fn gatherer(&self) -> &dyn Agent {
        self.gatherer.as_ref()
    }

    /// The structured fetcher when the client renders A2UI, the prose one otherwise.
    pub fn fetcher(&self, ui_active: bool) -> &dyn Agent {
        if ui_active {
            self.fetcher_ui.as_ref()
        } else {
            self.fetcher_text.as_ref()
        }
    }
}

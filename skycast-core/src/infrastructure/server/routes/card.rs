use super::super::state::ServerState;
use crate::constants::A2UI_EXTENSION_URI;
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub version: String,
    pub protocol_version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub capabilities: AgentCapabilities,
    pub skills: Vec<AgentSkill>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    pub extensions: Vec<AgentExtension>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AgentExtension {
    pub uri: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub examples: Vec<String>,
}

impl AgentCard {
    /// The card advertised for the weather agent at `url`.
    pub fn weather(url: impl Into<String>) -> Self {
        let modes = vec!["text".to_string(), "text/plain".to_string()];
        Self {
            name: "Weather Agent".into(),
            description: "This agent provides weather information with human-in-the-loop \
                          confirmation before any forecast or alert lookup."
                .into(),
            url: url.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: "0.3.0".into(),
            default_input_modes: modes.clone(),
            default_output_modes: modes,
            capabilities: AgentCapabilities {
                streaming: true,
                extensions: vec![AgentExtension {
                    uri: A2UI_EXTENSION_URI.into(),
                    description: "Renders forecasts, alerts and the confirmation step as A2UI \
                                  surfaces."
                        .into(),
                    required: false,
                }],
            },
            skills: vec![AgentSkill {
                id: "weather_info".into(),
                name: "Weather Information Tool".into(),
                description: "Provides weather forecasts and alerts for US locations after the \
                              user confirms the resolved location."
                    .into(),
                tags: vec!["weather".into(), "forecast".into(), "alerts".into()],
                examples: vec![
                    "What's the weather in San Francisco?".into(),
                    "Get weather alerts for California".into(),
                ],
            }],
        }
    }
}

#[utoipa::path(
    get,
    path = "/.well-known/agent-card.json",
    tag = "agent",
    responses(
        (status = 200, description = "A2A agent card", body = AgentCard)
    )
)]
pub async fn agent_card_handler(State(state): State<Arc<ServerState>>) -> Json<AgentCard> {
    Json(state.card().clone())
}

use crate::model::ModelError;
use crate::weather::WeatherError;
use skycast_session::StateAccessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("invalid agent response: {0}")]
    InvalidResponse(String),
    #[error("conversation state unavailable: {0}")]
    Store(#[from] StateAccessError),
    #[error("agent exceeded the limit of {limit} tool calls")]
    StepLimit { limit: usize },
}

impl AgentError {
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Model(err) => err.user_message(),
            AgentError::Tool(err) => err.to_string(),
            AgentError::InvalidResponse(_) => {
                "The assistant produced a reply that could not be understood.".to_string()
            }
            AgentError::Store(_) => "Conversation history is unavailable right now.".to_string(),
            AgentError::StepLimit { .. } => {
                "The assistant needed too many steps to answer.".to_string()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool requested: {0}")]
    UnknownTool(String),
    #[error("tool '{tool}' is not available to agent '{agent}'")]
    NotPermitted { tool: String, agent: String },
    #[error("invalid input for tool '{tool}': {reason}")]
    InvalidInput { tool: String, reason: String },
    #[error("failed to execute tool '{tool}': {source}")]
    Execution {
        tool: String,
        #[source]
        source: WeatherError,
    },
    #[error("tool '{tool}' could not update conversation state: {source}")]
    State {
        tool: String,
        #[source]
        source: StateAccessError,
    },
}

impl ToolError {
    /// Errors the model can recover from by seeing them as a tool result.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ToolError::NotPermitted { .. })
    }
}

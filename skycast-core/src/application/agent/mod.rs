//! # Agent Module
//!
//! Model-driven tool loops behind the weather assistant.
//!
//! Each turn:
//! 1. Send the agent's instructions, its stored history and the prompt to the model
//! 2. Parse the reply (one corrective re-prompt for a malformed action)
//! 3. If a tool call was requested, execute it and feed the result back
//! 4. Otherwise the reply is final and is recorded in the conversation history

mod directive;
mod errors;
pub mod instructions;
mod runner;
pub mod tools;


pub use directive::{AgentDirective, parse_agent_action};
pub use errors::{AgentError, ToolError};
pub use runner::{AgentProfile, Generator, ModelSelection, ToolAgent};
pub use tools::{FETCHER_TOOLS, GATHERER_TOOLS, ToolExecution, WeatherTool, WeatherToolbox};

pub const GATHERER_AGENT: &str = "confirmation_agent";
pub const UI_FETCHER_AGENT: &str = "weather_agent_ui";
pub const TEXT_FETCHER_AGENT: &str = "weather_agent_text";

impl AgentProfile {
    pub fn gatherer() -> Self {
        Self {
            name: GATHERER_AGENT,
            instructions: instructions::gatherer_instructions(GATHERER_TOOLS),
            tools: GATHERER_TOOLS,
        }
    }

    pub fn ui_fetcher(include_examples: bool) -> Self {
        Self {
            name: UI_FETCHER_AGENT,
            instructions: instructions::ui_fetcher_instructions(FETCHER_TOOLS, include_examples),
            tools: FETCHER_TOOLS,
        }
    }

    pub fn text_fetcher() -> Self {
        Self {
            name: TEXT_FETCHER_AGENT,
            instructions: instructions::text_fetcher_instructions(FETCHER_TOOLS),
            tools: FETCHER_TOOLS,
        }
    }
}
